mod common;

use std::{sync::Arc, sync::atomic::Ordering, time::Duration};

use common::{BAD_CODE, EXPIRED_TOKEN, FakeAuth, FakeCatalog, ids};
use redditsync::{
    SyncError,
    sync::{CallbackOutcome, Phase, Session, reconcile, resolve},
};

const TOKEN: &str = "correlation-123";

#[tokio::test]
async fn test_refresh_token_authenticates_synchronously() {
    let session = Session::begin_with_refresh_token(FakeAuth::default(), "refresh-token")
        .await
        .unwrap();

    assert!(session.is_ready());
    assert_eq!(session.phase(), Phase::Authenticated);
    assert_eq!(session.client().unwrap().label, "refresh");
    assert_eq!(session.current_user_id().await.unwrap(), "tester");
}

#[tokio::test]
async fn test_rejected_refresh_token_is_auth_exchange_error() {
    let result = Session::begin_with_refresh_token(FakeAuth::default(), EXPIRED_TOKEN).await;
    assert!(matches!(result, Err(SyncError::AuthExchange(_))));
}

#[tokio::test]
async fn test_new_session_is_not_ready() {
    let session = Session::new(FakeAuth::default());

    assert!(!session.is_ready());
    assert_eq!(session.phase(), Phase::Unauthenticated);
    assert!(matches!(
        session.current_user_id().await,
        Err(SyncError::NotReady)
    ));
}

#[tokio::test]
async fn test_begin_interactive_embeds_correlation_token() {
    let mut session = Session::new(FakeAuth::default());
    let (url, _handler) = session.begin_interactive(TOKEN).unwrap();

    assert!(url.contains("state=correlation-123"));
    assert_eq!(session.phase(), Phase::AwaitingCallback);
    assert!(!session.is_ready());
}

#[tokio::test]
async fn test_session_is_single_use() {
    let mut session = Session::new(FakeAuth::default());
    let _first = session.begin_interactive(TOKEN).unwrap();

    assert!(matches!(
        session.begin_interactive("other"),
        Err(SyncError::SessionConsumed)
    ));
}

#[tokio::test]
async fn test_valid_callback_authenticates_session() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();
    assert!(handler.is_pending().await);

    let outcome = handler.handle(Some("good-code"), Some(TOKEN)).await;
    assert_eq!(outcome, CallbackOutcome::Completed);
    assert!(!handler.is_pending().await);

    session
        .wait_authenticated(Duration::from_secs(1))
        .await
        .unwrap();
    assert!(session.is_ready());
    assert_eq!(session.client().unwrap().label, "good-code");
}

#[tokio::test]
async fn test_failed_exchange_leaves_session_waiting() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();

    assert_eq!(
        handler.handle(Some(BAD_CODE), Some(TOKEN)).await,
        CallbackOutcome::ExchangeFailed
    );
    assert_eq!(
        handler.handle(None, Some(TOKEN)).await,
        CallbackOutcome::ExchangeFailed
    );
    assert!(handler.is_pending().await);
    assert_eq!(session.phase(), Phase::AwaitingCallback);

    // a later valid callback still completes the handshake
    assert_eq!(
        handler.handle(Some("good-code"), Some(TOKEN)).await,
        CallbackOutcome::Completed
    );
    session
        .wait_authenticated(Duration::from_secs(1))
        .await
        .unwrap();
    assert!(session.is_ready());
}

#[tokio::test]
async fn test_state_mismatch_does_not_complete() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();

    assert_eq!(
        handler.handle(Some("good-code"), Some("forged")).await,
        CallbackOutcome::StateMismatch
    );
    assert_eq!(
        handler.handle(Some("good-code"), None).await,
        CallbackOutcome::StateMismatch
    );
    assert!(handler.is_pending().await);

    let result = session.wait_authenticated(Duration::from_millis(50)).await;
    assert!(matches!(result, Err(SyncError::Timeout(_))));
    assert_eq!(session.phase(), Phase::AwaitingCallback);
}

#[tokio::test]
async fn test_concurrent_callbacks_complete_once() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();
    let handler = Arc::new(handler);

    let first = {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move { handler.handle(Some("code-a"), Some(TOKEN)).await })
    };
    let second = {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move { handler.handle(Some("code-b"), Some(TOKEN)).await })
    };
    let outcomes = [first.await.unwrap(), second.await.unwrap()];

    let completed: Vec<usize> = (0..2)
        .filter(|&i| outcomes[i] == CallbackOutcome::Completed)
        .collect();
    assert_eq!(completed.len(), 1);
    assert!(outcomes.contains(&CallbackOutcome::AlreadyCompleted));

    session
        .wait_authenticated(Duration::from_secs(1))
        .await
        .unwrap();
    let winner = if completed[0] == 0 { "code-a" } else { "code-b" };
    assert_eq!(session.client().unwrap().label, winner);

    // a third delivery changes nothing
    assert_eq!(
        handler.handle(Some("code-c"), Some(TOKEN)).await,
        CallbackOutcome::AlreadyCompleted
    );
    assert_eq!(session.client().unwrap().label, winner);
}

#[tokio::test]
async fn test_timeout_fails_without_catalog_calls() {
    let catalog = FakeCatalog::with_tracks(3).with_search("Song", "id-song");
    let auth = FakeAuth::new(catalog.clone());
    let exchanges = Arc::clone(&auth.exchanges);

    let mut session = Session::new(auth);
    let (_url, _handler) = session.begin_interactive(TOKEN).unwrap();

    let result = session.wait_authenticated(Duration::from_millis(50)).await;
    assert!(matches!(result, Err(SyncError::Timeout(d)) if d == Duration::from_millis(50)));

    assert!(matches!(
        resolve(&session, &ids(&["Song"])).await,
        Err(SyncError::NotReady)
    ));
    assert!(matches!(
        reconcile(&session, "playlist", &ids(&["id-song"])).await,
        Err(SyncError::NotReady)
    ));
    assert_eq!(exchanges.load(Ordering::SeqCst), 0);
    assert_eq!(catalog.total_calls(), 0);
}

#[tokio::test]
async fn test_dropped_handler_unblocks_waiter_with_not_ready() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();
    drop(handler);

    let result = session.wait_authenticated(Duration::from_secs(5)).await;
    assert!(matches!(result, Err(SyncError::NotReady)));
    assert!(!session.is_ready());
}

#[tokio::test]
async fn test_callback_after_waiter_gave_up_is_rejected() {
    let mut session = Session::new(FakeAuth::default());
    let (_url, handler) = session.begin_interactive(TOKEN).unwrap();
    drop(session);

    assert!(!handler.is_pending().await);
    assert_eq!(
        handler.handle(Some("good-code"), Some(TOKEN)).await,
        CallbackOutcome::AlreadyCompleted
    );
}

#[tokio::test]
async fn test_wait_without_handshake_is_not_ready() {
    let mut session = Session::new(FakeAuth::default());
    let result = session.wait_authenticated(Duration::from_millis(10)).await;
    assert!(matches!(result, Err(SyncError::NotReady)));
}

#[tokio::test]
async fn test_create_playlist_uses_current_user() {
    let catalog = FakeCatalog::default();
    let session = common::ready_session(catalog.clone()).await;

    let id = session
        .create_playlist("Reddit Sync - /r/music ", "desc")
        .await
        .unwrap();

    assert_eq!(id, "new-playlist");
    let calls = catalog.calls.lock().unwrap();
    assert_eq!(
        calls.created,
        vec![("tester".to_string(), "Reddit Sync - /r/music ".to_string())]
    );
}
