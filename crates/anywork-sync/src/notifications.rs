//! Live notification feed with optimistic updates.
//!
//! The feed keeps two layers of state: the last server snapshot and a queue
//! of locally-pending mutations. Reads replay the pending mutations on top
//! of the snapshot, so an in-flight mark-read is visible immediately while
//! the server confirms it. A confirmed mutation folds its effect into the
//! snapshot and retires; a failed one just retires, reverting the view.
//!
//! Refreshes re-establish ground truth. A refresh only commits if it is
//! still the newest one issued and no mutation confirmed while it was in
//! flight, so a slow response can never resurrect state a mutation already
//! settled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use anywork_models::{Notification, NotificationId};
use anywork_services::NotificationService;
use anywork_session::AuthState;

/// How often the background poller re-fetches while authenticated.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// A mutation applied locally but not yet confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingOp {
    MarkRead(NotificationId),
    MarkAllRead,
    Delete(NotificationId),
}

struct FeedState {
    /// Server ground truth, descending by creation time.
    snapshot: Vec<Notification>,
    pending: Vec<PendingOp>,
    loading: bool,
    error: Option<String>,
    /// Sequence number of the newest refresh issued.
    refresh_seq: u64,
    /// Bumped on every confirmed mutation; refreshes dispatched before the
    /// bump must not commit.
    generation: u64,
}

/// Owns the notification list for one session.
pub struct NotificationFeed {
    service: NotificationService,
    auth_rx: watch::Receiver<AuthState>,
    state: Mutex<FeedState>,
}

impl NotificationFeed {
    pub fn new(service: NotificationService, auth_rx: watch::Receiver<AuthState>) -> Self {
        Self {
            service,
            auth_rx,
            state: Mutex::new(FeedState {
                snapshot: Vec::new(),
                pending: Vec::new(),
                loading: false,
                error: None,
                refresh_seq: 0,
                generation: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replay(snapshot: &[Notification], pending: &[PendingOp]) -> Vec<Notification> {
        let mut view = snapshot.to_vec();
        for op in pending {
            match op {
                PendingOp::MarkRead(id) => {
                    if let Some(n) = view.iter_mut().find(|n| &n.notification_id == id) {
                        n.is_read = true;
                    }
                }
                PendingOp::MarkAllRead => {
                    for n in view.iter_mut() {
                        n.is_read = true;
                    }
                }
                PendingOp::Delete(id) => {
                    view.retain(|n| &n.notification_id != id);
                }
            }
        }
        view
    }

    /// Current list with pending mutations applied.
    pub fn notifications(&self) -> Vec<Notification> {
        let state = self.lock();
        Self::replay(&state.snapshot, &state.pending)
    }

    pub fn unread_count(&self) -> usize {
        self.notifications().iter().filter(|n| !n.is_read).count()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Drop all local state. Used when the session leaves `Authenticated`.
    fn clear(&self) {
        let mut state = self.lock();
        state.snapshot.clear();
        state.pending.clear();
        state.loading = false;
        state.error = None;
    }

    /// Re-fetch the full list from the server.
    ///
    /// Skipped entirely (and the list cleared) when the session is not
    /// authenticated. Stale completions are discarded: only the newest
    /// issued refresh commits, and only if no mutation confirmed after it
    /// was dispatched.
    pub async fn refresh(&self) {
        if *self.auth_rx.borrow() != AuthState::Authenticated {
            self.clear();
            return;
        }

        let (seq, generation_at_dispatch) = {
            let mut state = self.lock();
            state.refresh_seq += 1;
            state.loading = true;
            (state.refresh_seq, state.generation)
        };

        let result = self.service.list_notifications().await;

        let mut state = self.lock();
        if seq != state.refresh_seq {
            // A newer refresh owns the loading flag and the commit.
            return;
        }
        state.loading = false;
        if generation_at_dispatch != state.generation {
            debug!("Discarding notification refresh that raced a mutation");
            return;
        }

        match result {
            Ok(page) => {
                let mut items = page.results;
                items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                state.snapshot = items;
                state.error = None;
            }
            Err(e) => {
                state.error = Some(e.to_string());
            }
        }
    }

    /// Mark one notification read, optimistically.
    ///
    /// A second call for the same id while one is in flight is a no-op, so
    /// double clicks cannot double-send or corrupt the list.
    pub async fn mark_as_read(&self, id: &NotificationId) {
        let op = PendingOp::MarkRead(id.clone());
        {
            let mut state = self.lock();
            if state.pending.contains(&op) {
                return;
            }
            state.error = None;
            state.pending.push(op.clone());
        }

        match self.service.mark_as_read(id).await {
            Ok(_) => {
                let mut state = self.lock();
                if let Some(n) = state
                    .snapshot
                    .iter_mut()
                    .find(|n| &n.notification_id == id)
                {
                    n.is_read = true;
                }
                state.pending.retain(|p| p != &op);
                state.generation += 1;
            }
            Err(e) => {
                let mut state = self.lock();
                state.pending.retain(|p| p != &op);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Mark every unread notification read.
    ///
    /// Only currently-unread items are sent to the server; re-running with
    /// nothing unread issues no mutations.
    pub async fn mark_all_as_read(&self) {
        {
            let mut state = self.lock();
            if state.pending.contains(&PendingOp::MarkAllRead) {
                return;
            }
            state.error = None;
            state.pending.push(PendingOp::MarkAllRead);
        }

        match self.service.mark_all_as_read().await {
            Ok(()) => {
                let mut state = self.lock();
                for n in state.snapshot.iter_mut() {
                    n.is_read = true;
                }
                state.pending.retain(|p| p != &PendingOp::MarkAllRead);
                state.generation += 1;
            }
            Err(e) => {
                let mut state = self.lock();
                state.pending.retain(|p| p != &PendingOp::MarkAllRead);
                state.error = Some(e.to_string());
            }
        }
    }

    /// Delete one notification, optimistically removing it from the list.
    pub async fn delete_notification(&self, id: &NotificationId) {
        let op = PendingOp::Delete(id.clone());
        {
            let mut state = self.lock();
            if state.pending.contains(&op) {
                return;
            }
            state.error = None;
            state.pending.push(op.clone());
        }

        match self.service.delete_notification(id).await {
            Ok(()) => {
                let mut state = self.lock();
                state.snapshot.retain(|n| &n.notification_id != id);
                state.pending.retain(|p| p != &op);
                state.generation += 1;
            }
            Err(e) => {
                let mut state = self.lock();
                state.pending.retain(|p| p != &op);
                state.error = Some(e.to_string());
            }
        }
    }
}

// =============================================================================
// Background Poller
// =============================================================================

/// Periodic refresh task for a shared [`NotificationFeed`].
///
/// The loop sleeps while the session is not authenticated, refreshes
/// immediately on entering `Authenticated`, then ticks at the configured
/// interval. Leaving `Authenticated` clears the feed and cancels the
/// ticker until the next login.
pub struct NotificationPoller {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl NotificationPoller {
    pub fn spawn(feed: Arc<NotificationFeed>, interval: Duration) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let mut auth_rx = feed.auth_rx.clone();

        let handle = tokio::spawn(async move {
            loop {
                while *auth_rx.borrow() != AuthState::Authenticated {
                    tokio::select! {
                        changed = auth_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                return;
                            }
                        }
                    }
                }

                info!("Notification polling started");
                feed.refresh().await;

                let mut ticker = tokio::time::interval(interval);
                // The first tick completes immediately and the refresh
                // above already covered it.
                ticker.tick().await;

                loop {
                    tokio::select! {
                        changed = auth_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            if *auth_rx.borrow() != AuthState::Authenticated {
                                info!("Notification polling stopped");
                                feed.clear();
                                break;
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                return;
                            }
                        }
                        _ = ticker.tick() => {
                            feed.refresh().await;
                        }
                    }
                }
            }
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the loop to stop and wait for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anywork_client::{ApiClient, ApiConfig, MemoryStore};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_with_auth(
        server: &MockServer,
        auth: AuthState,
    ) -> (Arc<NotificationFeed>, watch::Sender<AuthState>) {
        let config = ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(config, Arc::new(MemoryStore::new())).unwrap();
        let (auth_tx, auth_rx) = watch::channel(auth);
        let feed = NotificationFeed::new(NotificationService::new(client), auth_rx);
        (Arc::new(feed), auth_tx)
    }

    fn notification_json(id: &str, created_at: &str, is_read: bool) -> serde_json::Value {
        json!({
            "notification_id": id,
            "message": format!("Notification {}", id),
            "is_read": is_read,
            "created_at": created_at,
            "user": "u-1"
        })
    }

    fn list_body(items: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "count": items.len(),
            "next": null,
            "previous": null,
            "results": items
        })
    }

    #[tokio::test]
    async fn test_refresh_sorts_newest_first() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-old", "2024-01-01T00:00:00Z", false),
                notification_json("n-new", "2024-01-03T00:00:00Z", false),
                notification_json("n-mid", "2024-01-02T00:00:00Z", true),
            ])))
            .mount(&server)
            .await;

        feed.refresh().await;

        let ids: Vec<String> = feed
            .notifications()
            .iter()
            .map(|n| n.notification_id.to_string())
            .collect();
        assert_eq!(ids, vec!["n-new", "n-mid", "n-old"]);
        assert_eq!(feed.unread_count(), 2);
    }

    #[tokio::test]
    async fn test_refresh_clears_when_not_authenticated() {
        let server = MockServer::start().await;
        let (feed, auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        feed.refresh().await;
        assert_eq!(feed.notifications().len(), 1);

        auth_tx.send_replace(AuthState::Anonymous);
        feed.refresh().await;

        assert!(feed.notifications().is_empty());
        assert_eq!(feed.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_as_read_flips_one_item_in_place() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-2", "2024-01-02T00:00:00Z", false),
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(notification_json("n-1", "2024-01-01T00:00:00Z", true)),
            )
            .expect(1)
            .mount(&server)
            .await;

        feed.refresh().await;
        assert_eq!(feed.unread_count(), 2);

        feed.mark_as_read(&NotificationId::from("n-1")).await;

        assert_eq!(feed.unread_count(), 1);
        let view = feed.notifications();
        // Order preserved, no refetch shuffle.
        assert_eq!(view[0].notification_id.as_str(), "n-2");
        assert!(!view[0].is_read);
        assert!(view[1].is_read);
        assert!(feed.error().is_none());
    }

    #[tokio::test]
    async fn test_mark_as_read_failure_reverts_and_sets_error() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-1/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .mount(&server)
            .await;

        feed.refresh().await;
        feed.mark_as_read(&NotificationId::from("n-1")).await;

        assert_eq!(feed.unread_count(), 1);
        assert!(!feed.notifications()[0].is_read);
        assert_eq!(feed.error().as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_concurrent_mark_as_read_sends_one_request() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(notification_json("n-1", "2024-01-01T00:00:00Z", true))
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        feed.refresh().await;

        let first = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move {
                feed.mark_as_read(&NotificationId::from("n-1")).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Second click while the first is in flight: no-op, but the view
        // already shows the optimistic effect.
        assert_eq!(feed.unread_count(), 0);
        feed.mark_as_read(&NotificationId::from("n-1")).await;

        first.await.unwrap();
        assert_eq!(feed.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_all_as_read_is_idempotent() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        // First pass sees two unread items; afterwards the server reports
        // everything read.
        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
                notification_json("n-2", "2024-01-02T00:00:00Z", false),
            ])))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", true),
                notification_json("n-2", "2024-01-02T00:00:00Z", true),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(notification_json("n-1", "2024-01-01T00:00:00Z", true)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-2/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(notification_json("n-2", "2024-01-02T00:00:00Z", true)),
            )
            .expect(1)
            .mount(&server)
            .await;

        feed.refresh().await;
        feed.mark_all_as_read().await;
        assert_eq!(feed.unread_count(), 0);

        // Second run finds nothing unread and PATCHes nothing; the
        // expect(1) counters above verify that.
        feed.mark_all_as_read().await;
        assert_eq!(feed.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_item_and_adjusts_unread_count() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-read", "2024-01-02T00:00:00Z", true),
                notification_json("n-unread", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        feed.refresh().await;
        assert_eq!(feed.unread_count(), 1);

        // Deleting a read item leaves the unread count alone.
        feed.delete_notification(&NotificationId::from("n-read")).await;
        assert_eq!(feed.notifications().len(), 1);
        assert_eq!(feed.unread_count(), 1);

        // Deleting the unread one decrements it.
        feed.delete_notification(&NotificationId::from("n-unread")).await;
        assert!(feed.notifications().is_empty());
        assert_eq!(feed.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_refresh_cannot_undo_confirmed_mutation() {
        let server = MockServer::start().await;
        let (feed, _auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        // Initial load, then a slow second refresh that still reports the
        // notification unread.
        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(list_body(vec![notification_json(
                        "n-1",
                        "2024-01-01T00:00:00Z",
                        false,
                    )]))
                    .set_delay(Duration::from_millis(80)),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/notifications/n-1/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(notification_json("n-1", "2024-01-01T00:00:00Z", true)),
            )
            .mount(&server)
            .await;

        feed.refresh().await;

        let slow_refresh = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move {
                feed.refresh().await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        feed.mark_as_read(&NotificationId::from("n-1")).await;
        assert_eq!(feed.unread_count(), 0);

        slow_refresh.await.unwrap();

        // The stale snapshot was discarded; the item stays read.
        assert_eq!(feed.unread_count(), 0);
        assert!(feed.notifications()[0].is_read);
    }

    #[tokio::test]
    async fn test_poller_refreshes_until_logout_then_clears() {
        let server = MockServer::start().await;
        let (feed, auth_tx) = feed_with_auth(&server, AuthState::Authenticated);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;

        let poller = NotificationPoller::spawn(Arc::clone(&feed), Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(feed.unread_count(), 1);
        let fetches_while_active = server.received_requests().await.unwrap().len();
        assert!(fetches_while_active >= 2);

        auth_tx.send_replace(AuthState::Anonymous);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(feed.notifications().is_empty());

        let fetches_after_logout = server.received_requests().await.unwrap().len();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            fetches_after_logout
        );

        poller.stop().await;
    }

    #[tokio::test]
    async fn test_poller_waits_for_authentication() {
        let server = MockServer::start().await;
        let (feed, auth_tx) = feed_with_auth(&server, AuthState::Anonymous);

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                notification_json("n-1", "2024-01-01T00:00:00Z", false),
            ])))
            .mount(&server)
            .await;

        let poller = NotificationPoller::spawn(Arc::clone(&feed), Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(server.received_requests().await.unwrap().is_empty());

        auth_tx.send_replace(AuthState::Authenticated);
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(!server.received_requests().await.unwrap().is_empty());
        assert_eq!(feed.unread_count(), 1);

        poller.stop().await;
    }
}
