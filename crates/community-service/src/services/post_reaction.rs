//! Post like service
//!
//! A click flips the visible like state at once and (re)arms a per-post
//! debounce timer. When the timer fires, the final desired state is compared
//! with the server baseline held in the query cache, and at most one request
//! is sent. Afterwards the post is refetched and the visible state follows the
//! server again, unless another click is already pending.
//!
//! Per post there is at most one armed timer and at most one request in
//! flight. Replacing the timer is the only cancellation; a request that has
//! been dispatched always runs to completion.
//!
//! Per-post bookkeeping is dropped again once the post is idle and shows
//! exactly what the cache holds.

use std::collections::HashMap;
use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use community_cache::PostQuery;
use community_core::{DomainError, Post, PostId, ReactionState, ReactionTarget};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::{reaction_failed, ServiceResult};
use super::queries::QueryService;

/// How a sync with the backend ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Desired state already matched the server; no request was sent
    Skipped,
    /// The backend accepted the change
    Synced,
    /// The request failed and a notice was published
    Failed,
}

/// Armed debounce timer for one post
struct PendingSync {
    desired: bool,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct State {
    /// What the user currently sees, per post
    visual: DashMap<PostId, ReactionState>,
    pending: Mutex<HashMap<PostId, PendingSync>>,
    /// Held for the whole of a sync, including the refetch
    sync_locks: DashMap<PostId, Arc<AsyncMutex<()>>>,
    generation: AtomicU64,
    /// Signalled whenever a timer or flush finishes
    idle: Notify,
}

/// Debounced post like service
#[derive(Clone)]
pub struct PostReactionService {
    ctx: ServiceContext,
    state: Arc<State>,
}

impl std::fmt::Debug for PostReactionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostReactionService")
            .field("visual", &self.state.visual.len())
            .field("pending", &self.state.pending.lock().len())
            .finish()
    }
}

impl PostReactionService {
    /// Create a new PostReactionService
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            ctx,
            state: Arc::new(State::default()),
        }
    }

    /// Shared context of this service
    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Fetch a post and show its server state.
    ///
    /// The visible state is left alone while a click for the post is pending
    /// or being synced.
    #[instrument(skip(self))]
    pub async fn load(&self, post_id: PostId) -> ServiceResult<Post> {
        let post = QueryService::new(&self.ctx).post(post_id).await?;
        if !self.is_syncing(post_id) {
            self.adopt(post_id, post.reaction);
            self.evict_idle(post_id);
        }
        Ok(post)
    }

    /// Like state the user currently sees
    pub fn visual_state(&self, post_id: PostId) -> Option<ReactionState> {
        self.state
            .visual
            .get(&post_id)
            .map(|state| *state)
            .or_else(|| {
                self.ctx
                    .cache()
                    .read(&PostQuery(post_id))
                    .map(|post| post.reaction)
            })
    }

    /// Flip the like on a post.
    ///
    /// The new state is visible immediately; the backend hears about it once
    /// no further click arrives within the debounce window. Must be called
    /// from within a tokio runtime.
    #[instrument(skip(self))]
    pub fn toggle(&self, post_id: PostId) -> ServiceResult<ReactionState> {
        let mut pending = self.state.pending.lock();

        let current = self
            .visual_state(post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;
        let next = current.toggled();
        self.state.visual.insert(post_id, next);

        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let timer = self.arm(post_id, generation);
        let replaced = pending.insert(
            post_id,
            PendingSync {
                desired: next.is_reacted,
                generation,
                timer,
            },
        );
        if let Some(previous) = replaced {
            previous.timer.abort();
        }

        debug!(
            post_id = %post_id,
            desired = next.is_reacted,
            count = next.count,
            "Post like toggled"
        );
        Ok(next)
    }

    /// Check whether a click is waiting for its debounce timer
    pub fn is_pending(&self, post_id: PostId) -> bool {
        self.state.pending.lock().contains_key(&post_id)
    }

    /// Check whether a sync for the post is running
    pub fn is_syncing(&self, post_id: PostId) -> bool {
        self.state
            .sync_locks
            .get(&post_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    /// Fire the pending timer for a post now.
    ///
    /// Returns `None` when nothing was pending.
    #[instrument(skip(self))]
    pub async fn flush(&self, post_id: PostId) -> Option<SyncOutcome> {
        let lock = self.sync_lock(post_id);
        let guard = lock.lock().await;

        let pending = self.state.pending.lock().remove(&post_id);
        let outcome = match pending {
            Some(pending) => {
                pending.timer.abort();
                Some(self.sync(post_id, pending.desired).await)
            }
            None => None,
        };

        drop(guard);
        drop(lock);
        self.evict_idle(post_id);
        self.state.idle.notify_waiters();
        outcome
    }

    /// Flush every pending post, e.g. when the page is left.
    ///
    /// Returns how many posts had a pending click.
    pub async fn flush_all(&self) -> usize {
        let posts: Vec<PostId> = self.state.pending.lock().keys().copied().collect();

        let mut flushed = 0;
        for post_id in posts {
            if self.flush(post_id).await.is_some() {
                flushed += 1;
            }
        }
        flushed
    }

    /// Wait until the post has no pending click and no sync in flight
    pub async fn settled(&self, post_id: PostId) {
        loop {
            let mut notified = pin!(self.state.idle.notified());
            notified.as_mut().enable();

            if !self.is_pending(post_id) && !self.is_syncing(post_id) {
                return;
            }
            notified.await;
        }
    }

    fn sync_lock(&self, post_id: PostId) -> Arc<AsyncMutex<()>> {
        Arc::clone(&self.state.sync_locks.entry(post_id).or_default())
    }

    fn arm(&self, post_id: PostId, generation: u64) -> JoinHandle<()> {
        let service = self.clone();
        let delay = self.ctx.reaction_config().debounce();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            service.fire(post_id, generation).await;
        })
    }

    async fn fire(&self, post_id: PostId, generation: u64) {
        let lock = self.sync_lock(post_id);
        let guard = lock.lock().await;

        // Past this point the timer is no longer in the map and cannot be
        // aborted by a newer click.
        let desired = {
            let mut pending = self.state.pending.lock();
            let current = pending
                .get(&post_id)
                .is_some_and(|p| p.generation == generation);
            if current {
                pending.remove(&post_id).map(|p| p.desired)
            } else {
                None
            }
        };

        if let Some(desired) = desired {
            let outcome = self.sync(post_id, desired).await;
            debug!(post_id = %post_id, ?outcome, "Debounced sync finished");
        }

        drop(guard);
        drop(lock);
        self.evict_idle(post_id);
        self.state.idle.notify_waiters();
    }

    /// Bring the server in line with `desired`, then refetch.
    ///
    /// Caller holds the post's sync lock.
    #[instrument(skip(self))]
    async fn sync(&self, post_id: PostId, desired: bool) -> SyncOutcome {
        let target = ReactionTarget::post(post_id);
        let query = PostQuery(post_id);
        let baseline = self.ctx.cache().read(&query).map(|post| post.reaction);

        if let Some(baseline) = baseline.filter(|b| b.is_reacted == desired) {
            debug!(post_id = %post_id, desired, "Server already in desired state");
            self.adopt(post_id, baseline);
            return SyncOutcome::Skipped;
        }

        let outcome = match self.ctx.api().set_reaction(target, desired).await {
            Ok(()) => {
                info!(
                    target_type = %target.target_type,
                    target_id = %target.target_id,
                    desired,
                    "Post like synced"
                );
                // confirmed server state, kept even if the refetch fails
                self.ctx.cache().update(&query, |post| {
                    post.reaction = post.reaction.with_reacted(desired);
                });
                SyncOutcome::Synced
            }
            Err(e) => {
                warn!(
                    target_type = %target.target_type,
                    target_id = %target.target_id,
                    desired,
                    error = %e,
                    "Post like sync failed"
                );
                self.ctx.notices().publish(reaction_failed(target, &e));
                SyncOutcome::Failed
            }
        };

        self.ctx.cache().invalidate(&query);
        match QueryService::new(&self.ctx).post(post_id).await {
            Ok(post) => self.adopt(post_id, post.reaction),
            Err(e) => {
                warn!(post_id = %post_id, error = %e, "Refetch after sync failed");
                // fall back to the last state the server is known to hold
                if let Some(post) = self.ctx.cache().read(&query) {
                    self.adopt(post_id, post.reaction);
                }
            }
        }

        outcome
    }

    /// Show the server state unless a newer click is pending
    fn adopt(&self, post_id: PostId, server: ReactionState) {
        let pending = self.state.pending.lock();
        if pending.contains_key(&post_id) {
            debug!(post_id = %post_id, "Newer click pending, keeping local state");
            return;
        }
        self.state.visual.insert(post_id, server);
    }

    /// Drop bookkeeping for a post with no pending click whose visible state
    /// matches the cache
    fn evict_idle(&self, post_id: PostId) {
        let pending = self.state.pending.lock();
        if pending.contains_key(&post_id) {
            return;
        }

        let cached = self.ctx.cache().read(&PostQuery(post_id)).map(|p| p.reaction);
        self.state
            .visual
            .remove_if(&post_id, |_, shown| cached == Some(*shown));
        self.state
            .sync_locks
            .remove_if(&post_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
