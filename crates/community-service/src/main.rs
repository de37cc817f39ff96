//! Reaction reconciler command-line client
//!
//! Run with:
//! ```bash
//! cargo run -p community-service -- <post-id> [--like]
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use anyhow::Context;
use community_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use community_core::PostId;
use community_service::{PostReactionService, ServiceContext};
use tracing::{error, info, warn};

const USAGE: &str = "usage: community-reactions <post-id> [--like]";

#[tokio::main]
async fn main() {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = ?e, "Reaction client failed");
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let post_id: PostId = args
        .next()
        .context(USAGE)?
        .parse()
        .context("post id must be an integer")?;
    let like = args.any(|arg| arg == "--like");

    info!(
        env = ?config.app.env,
        base_url = %config.api.base_url,
        debounce_ms = config.reaction.debounce_ms,
        "Configuration loaded"
    );

    let ctx = ServiceContext::from_config(&config).context("Failed to build HTTP client")?;
    let mut notices = ctx.notices().subscribe();
    let posts = PostReactionService::new(ctx);

    let post = posts
        .load(post_id)
        .await
        .with_context(|| format!("Failed to load post {post_id}"))?;
    info!(
        post_id = %post.id,
        title = %post.title,
        count = post.reaction.count,
        liked = post.reaction.is_reacted,
        "Loaded post"
    );

    if like {
        posts.toggle(post_id)?;
        posts.flush_all().await;

        for notice in notices.drain() {
            warn!(message = %notice.message, "Notice");
        }
        if let Some(state) = posts.visual_state(post_id) {
            info!(count = state.count, liked = state.is_reacted, "Like settled");
        }
    }

    Ok(())
}
