//! Reaction Integration Tests
//!
//! Drive the reconciler services through the real HTTP backend client against
//! the in-process mock server.
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use axum::http::StatusCode;
use community_cache::CommentsQuery;
use community_client::{CommunityApi, HttpBackend};
use community_common::AppError;
use community_core::{EntityId, ReactionState, ReactionTarget};
use community_service::{
    CommentReactionService, PostReactionService, QueryService, SyncOutcome,
};
use integration_tests::{comment, error_body, post, reply, TestBackend, SESSION_COOKIE};
use serde_json::json;

const DEBOUNCE_MS: u64 = 50;

async fn post_backend(state: ReactionState) -> (TestBackend, PostReactionService) {
    let backend = TestBackend::start().await.expect("Failed to start backend");
    backend.seed_post(post(1, state));

    let service = PostReactionService::new(backend.context(DEBOUNCE_MS).unwrap());
    service.load(EntityId::new(1)).await.unwrap();
    (backend, service)
}

async fn comment_backend() -> (TestBackend, CommentReactionService) {
    let backend = TestBackend::start().await.expect("Failed to start backend");
    backend.seed_comments(
        1,
        vec![
            comment(
                10,
                ReactionState::new(false, 2),
                vec![reply(11, 10, ReactionState::new(true, 1))],
            ),
            comment(20, ReactionState::new(false, 0), Vec::new()),
        ],
    );

    let ctx = backend.context(DEBOUNCE_MS).unwrap();
    QueryService::new(&ctx).comments(EntityId::new(1)).await.unwrap();
    (backend, CommentReactionService::new(ctx))
}

// ============================================================================
// Post Likes
// ============================================================================

#[tokio::test]
async fn test_post_single_click() {
    let (backend, service) = post_backend(ReactionState::new(false, 3)).await;
    let id = EntityId::new(1);

    assert_eq!(service.toggle(id).unwrap(), ReactionState::new(true, 4));
    assert!(backend.reaction_requests().is_empty());

    service.settled(id).await;

    let calls = backend.reaction_requests();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "POST");
    assert_eq!(
        calls[0].body,
        Some(json!({ "targetType": "POST", "targetId": 1, "reactionType": "LIKE" }))
    );
    assert_eq!(backend.post_reaction(1), Some(ReactionState::new(true, 4)));
    assert_eq!(service.visual_state(id), Some(ReactionState::new(true, 4)));
}

#[tokio::test]
async fn test_post_double_click_sends_nothing() {
    let (backend, service) = post_backend(ReactionState::new(false, 3)).await;
    let id = EntityId::new(1);

    service.toggle(id).unwrap();
    assert_eq!(service.toggle(id).unwrap(), ReactionState::new(false, 3));

    service.settled(id).await;
    assert!(backend.reaction_requests().is_empty());
    assert_eq!(service.visual_state(id), Some(ReactionState::new(false, 3)));
}

#[tokio::test]
async fn test_post_unlike_uses_delete() {
    let (backend, service) = post_backend(ReactionState::new(true, 7)).await;
    let id = EntityId::new(1);

    for _ in 0..3 {
        service.toggle(id).unwrap();
    }
    service.settled(id).await;

    let calls = backend.reaction_requests();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "DELETE");
    assert_eq!(service.visual_state(id), Some(ReactionState::new(false, 6)));
}

#[tokio::test]
async fn test_post_failure_resyncs_and_notifies() {
    let (backend, service) = post_backend(ReactionState::new(false, 3)).await;
    let mut notices = service.context().notices().subscribe();
    let id = EntityId::new(1);
    backend.fail_reactions(
        StatusCode::INTERNAL_SERVER_ERROR,
        error_body("INTERNAL_ERROR", "Reaction store unavailable", &[]),
    );

    service.toggle(id).unwrap();
    assert_eq!(service.flush(id).await, Some(SyncOutcome::Failed));

    assert_eq!(backend.post_reaction(1), Some(ReactionState::new(false, 3)));
    assert_eq!(service.visual_state(id), Some(ReactionState::new(false, 3)));

    let notice = notices.try_recv().expect("Expected a failure notice");
    assert!(notice.is_error());
    assert_eq!(notice.target, Some(ReactionTarget::post(id)));
}

#[tokio::test]
async fn test_session_cookie_is_sent_with_reactions() {
    let (backend, service) = post_backend(ReactionState::new(false, 0)).await;
    let id = EntityId::new(1);

    service.toggle(id).unwrap();
    service.flush(id).await;

    let calls = backend.reaction_requests();
    assert_eq!(calls.len(), 1);
    assert!(calls[0]
        .cookie
        .as_deref()
        .is_some_and(|c| c.contains(SESSION_COOKIE)));
}

// ============================================================================
// Comment Likes
// ============================================================================

#[tokio::test]
async fn test_comment_like_reaches_server() {
    let (backend, service) = comment_backend().await;

    let outcome = service
        .toggle(EntityId::new(1), EntityId::new(10))
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Synced);
    assert_eq!(backend.comment_reaction(1, 10), Some(ReactionState::new(true, 3)));

    let calls = backend.reaction_requests();
    assert_eq!(
        calls[0].body,
        Some(json!({ "targetType": "COMMENT", "targetId": 10, "reactionType": "LIKE" }))
    );
}

#[tokio::test]
async fn test_reply_unlike_then_refetch_matches_server() {
    let (backend, service) = comment_backend().await;

    service
        .toggle(EntityId::new(1), EntityId::new(11))
        .await
        .unwrap();
    assert_eq!(backend.comment_reaction(1, 11), Some(ReactionState::new(false, 0)));

    // the list was invalidated, so the next read goes to the server
    let reads_before = backend.requests().len();
    let comments = QueryService::new(service.context())
        .comments(EntityId::new(1))
        .await
        .unwrap();
    assert_eq!(comments[0].replies[0].reaction, ReactionState::new(false, 0));
    assert_eq!(backend.requests().len(), reads_before + 1);
    assert_eq!(
        service.visual_state(EntityId::new(1), EntityId::new(11)),
        Some(ReactionState::new(false, 0))
    );
}

#[tokio::test]
async fn test_comment_rejection_rolls_back() {
    let (backend, service) = comment_backend().await;
    backend.fail_reactions(
        StatusCode::UNPROCESSABLE_ENTITY,
        error_body(
            "INVALID_TARGET",
            "Cannot like a deleted comment",
            &[("targetId", "deleted")],
        ),
    );
    let before = service.visual_state(EntityId::new(1), EntityId::new(20));

    let outcome = service
        .toggle(EntityId::new(1), EntityId::new(20))
        .await
        .unwrap();
    assert_eq!(outcome, SyncOutcome::Failed);
    assert_eq!(service.visual_state(EntityId::new(1), EntityId::new(20)), before);
    assert_eq!(backend.comment_reaction(1, 20), Some(ReactionState::new(false, 0)));
}

#[tokio::test]
async fn test_concurrent_comment_likes_converge() {
    let (backend, service) = comment_backend().await;
    let post_id = EntityId::new(1);

    let outcomes = futures::future::join_all([
        service.toggle(post_id, EntityId::new(10)),
        service.toggle(post_id, EntityId::new(20)),
    ])
    .await;
    assert!(outcomes
        .into_iter()
        .all(|r| matches!(r, Ok(SyncOutcome::Synced))));
    assert_eq!(backend.reaction_requests().len(), 2);

    let comments = QueryService::new(service.context())
        .comments(post_id)
        .await
        .unwrap();
    assert_eq!(comments[0].reaction, ReactionState::new(true, 3));
    assert_eq!(comments[1].reaction, ReactionState::new(true, 1));
}

#[tokio::test]
async fn test_unknown_comment_sends_no_request() {
    let (backend, service) = comment_backend().await;

    let err = service
        .toggle(EntityId::new(1), EntityId::new(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(backend.reaction_requests().is_empty());
}

// ============================================================================
// HTTP Backend
// ============================================================================

#[tokio::test]
async fn test_error_body_decoding() {
    let backend = TestBackend::start().await.unwrap();
    backend.seed_post(post(1, ReactionState::default()));
    let http = HttpBackend::from_config(backend.client_config(DEBOUNCE_MS).api).unwrap();
    let target = ReactionTarget::post(EntityId::new(1));

    backend.fail_reactions(
        StatusCode::BAD_REQUEST,
        error_body("INVALID_TARGET", "Bad target", &[("targetType", "unsupported")]),
    );
    match http.add_reaction(target).await.unwrap_err() {
        AppError::Api {
            status,
            code,
            errors,
            ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, "INVALID_TARGET");
            assert_eq!(errors[0].field, "targetType");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // non-JSON body falls back to the default error code
    backend.fail_reactions(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
    let err = http.add_reaction(target).await.unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_ERROR");
    assert!(err.is_server_error());

    backend.fail_reactions(StatusCode::UNAUTHORIZED, "");
    assert!(http.remove_reaction(target).await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let backend = TestBackend::start().await.unwrap();
    let ctx = backend.context(DEBOUNCE_MS).unwrap();

    let err = QueryService::new(&ctx)
        .post(EntityId::new(9))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(ctx.cache().read(&community_cache::PostQuery(EntityId::new(9))).is_none());
}

#[tokio::test]
async fn test_duplicate_like_is_conflict() {
    let backend = TestBackend::start().await.unwrap();
    backend.seed_post(post(1, ReactionState::new(true, 1)));
    let http = HttpBackend::from_config(backend.client_config(DEBOUNCE_MS).api).unwrap();

    let err = http
        .add_reaction(ReactionTarget::post(EntityId::new(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(backend.post_reaction(1), Some(ReactionState::new(true, 1)));
}

#[tokio::test]
async fn test_comments_fetch_decodes_stats() {
    let backend = TestBackend::start().await.unwrap();
    backend.seed_comments(
        3,
        vec![comment(
            30,
            ReactionState::new(true, 4),
            vec![reply(31, 30, ReactionState::default())],
        )],
    );
    let ctx = backend.context(DEBOUNCE_MS).unwrap();

    let comments = ctx.api().fetch_comments(EntityId::new(3)).await.unwrap();
    assert_eq!(comments[0].reaction, ReactionState::new(true, 4));
    assert_eq!(comments[0].replies[0].parent_id, Some(EntityId::new(30)));
    assert!(comments[0].created_at.is_some());
    assert!(ctx.cache().read(&CommentsQuery(EntityId::new(3))).is_none());
}
