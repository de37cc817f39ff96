//! Test helpers for integration tests
//!
//! `TestBackend` is an in-process axum server speaking the community REST
//! contract. It keeps posts and comments in memory, records every request,
//! and can be told to reject reaction calls.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use community_common::{ApiConfig, ClientConfig, ReactionConfig};
use community_core::{
    Comment, EntityId, Post, ReactionRequest, ReactionState, ReactionTarget, TargetType,
};
use community_service::ServiceContext;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{comment_body, error_body, post_body};

/// Cookie handed out with every post read
pub const SESSION_COOKIE: &str = "SESSION=integration";

/// Request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
    pub cookie: Option<String>,
}

impl RecordedRequest {
    pub fn is_reaction(&self) -> bool {
        self.path == "/reactions"
    }
}

#[derive(Default)]
struct MockState {
    posts: Mutex<HashMap<EntityId, Post>>,
    comments: Mutex<HashMap<EntityId, Vec<Comment>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    reaction_failure: Mutex<Option<(StatusCode, String)>>,
}

impl MockState {
    fn record(&self, method: &str, path: String, headers: &HeaderMap, body: Option<Value>) {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().push(RecordedRequest {
            method: method.to_string(),
            path,
            body,
            cookie,
        });
    }

    /// Apply a like change. `None` when the target does not exist,
    /// `Some(false)` when it is already in the requested state.
    fn apply(&self, target: ReactionTarget, desired: bool) -> Option<bool> {
        let apply_to = |state: &mut ReactionState| {
            if state.is_reacted == desired {
                return false;
            }
            *state = state.with_reacted(desired);
            true
        };

        let applied = match target.target_type {
            TargetType::Post => self
                .posts
                .lock()
                .get_mut(&target.target_id)
                .map(|p| apply_to(&mut p.reaction)),
            TargetType::Comment => self
                .comments
                .lock()
                .values_mut()
                .find_map(|list| Comment::find_mut(list, target.target_id))
                .map(|c| apply_to(&mut c.reaction)),
        };
        applied
    }
}

/// In-process mock of the community backend
pub struct TestBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    _handle: JoinHandle<()>,
}

impl TestBackend {
    /// Start the mock on an ephemeral port
    pub async fn start() -> Result<Self> {
        let _ = community_common::try_init_tracing();

        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/v1/posts/:id", get(get_post))
            .route("/api/v1/posts/:id/comments", get(get_comments))
            .route("/api/v1/reactions", post(add_reaction).delete(remove_reaction))
            .with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Base URL including the API prefix
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Client configuration pointing at this backend
    pub fn client_config(&self, debounce_ms: u64) -> ClientConfig {
        ClientConfig {
            api: ApiConfig {
                base_url: self.base_url(),
                timeout_secs: 5,
            },
            reaction: ReactionConfig {
                debounce_ms,
                notice_capacity: 16,
            },
            ..ClientConfig::default()
        }
    }

    /// Service context talking to this backend over HTTP
    pub fn context(&self, debounce_ms: u64) -> Result<ServiceContext> {
        Ok(ServiceContext::from_config(&self.client_config(debounce_ms))?)
    }

    pub fn seed_post(&self, post: Post) {
        self.state.posts.lock().insert(post.id, post);
    }

    pub fn seed_comments(&self, post_id: i64, comments: Vec<Comment>) {
        self.state
            .comments
            .lock()
            .insert(EntityId::new(post_id), comments);
    }

    /// Server-side like state of a post
    pub fn post_reaction(&self, post_id: i64) -> Option<ReactionState> {
        self.state
            .posts
            .lock()
            .get(&EntityId::new(post_id))
            .map(|p| p.reaction)
    }

    /// Server-side like state of a comment or reply
    pub fn comment_reaction(&self, post_id: i64, comment_id: i64) -> Option<ReactionState> {
        let comments = self.state.comments.lock();
        let list = comments.get(&EntityId::new(post_id))?;
        Comment::find(list, EntityId::new(comment_id)).map(|c| c.reaction)
    }

    /// Answer every reaction call with `status` and `body`
    pub fn fail_reactions(&self, status: StatusCode, body: impl Into<String>) {
        *self.state.reaction_failure.lock() = Some((status, body.into()));
    }

    pub fn clear_failure(&self) {
        *self.state.reaction_failure.lock() = None;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    /// Recorded `POST`/`DELETE /reactions` calls
    pub fn reaction_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(RecordedRequest::is_reaction)
            .collect()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_post(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", format!("/posts/{id}"), &headers, None);

    let post = state.posts.lock().get(&EntityId::new(id)).cloned();
    match post {
        Some(post) => (
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(post_body(&post)),
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "POST_NOT_FOUND", "Post not found"),
    }
}

async fn get_comments(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", format!("/posts/{id}/comments"), &headers, None);

    let comments = state
        .comments
        .lock()
        .get(&EntityId::new(id))
        .cloned()
        .unwrap_or_default();
    let contents: Vec<Value> = comments.iter().map(comment_body).collect();
    Json(json!({ "contents": contents })).into_response()
}

async fn add_reaction(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<ReactionRequest>,
) -> Response {
    change_reaction(&state, "POST", &headers, request, true)
}

async fn remove_reaction(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<ReactionRequest>,
) -> Response {
    change_reaction(&state, "DELETE", &headers, request, false)
}

fn change_reaction(
    state: &MockState,
    method: &str,
    headers: &HeaderMap,
    request: ReactionRequest,
    desired: bool,
) -> Response {
    state.record(
        method,
        "/reactions".to_string(),
        headers,
        serde_json::to_value(request).ok(),
    );

    let failure = state.reaction_failure.lock().clone();
    if let Some((status, body)) = failure {
        return (status, body).into_response();
    }

    match state.apply(request.target(), desired) {
        Some(true) if desired => StatusCode::CREATED.into_response(),
        Some(true) => StatusCode::NO_CONTENT.into_response(),
        Some(false) => error(
            StatusCode::CONFLICT,
            "REACTION_CONFLICT",
            "Reaction already in requested state",
        ),
        None => error(StatusCode::NOT_FOUND, "TARGET_NOT_FOUND", "Target not found"),
    }
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        error_body(code, message, &[]),
    )
        .into_response()
}
