//! Notification endpoints.

use tracing::debug;

use anywork_client::{ApiClient, ApiResult};
use anywork_models::{CreateNotificationPayload, Notification, NotificationId, Page};

#[derive(Clone)]
pub struct NotificationService {
    client: ApiClient,
}

impl NotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The current user's notifications, unpaged on the server side beyond
    /// the standard envelope.
    pub async fn list_notifications(&self) -> ApiResult<Page<Notification>> {
        self.client
            .get("/notifications/", &[])
            .await
            .map_err(|e| e.with_fallback("Failed to fetch notifications"))
    }

    pub async fn get_notification(&self, id: &NotificationId) -> ApiResult<Notification> {
        self.client
            .get(&format!("/notifications/{}/", id), &[])
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    e.with_fallback("Notification not found")
                } else {
                    e.with_fallback("Failed to fetch notification")
                }
            })
    }

    pub async fn create_notification(
        &self,
        payload: &CreateNotificationPayload,
    ) -> ApiResult<Notification> {
        self.client
            .post("/notifications/", payload)
            .await
            .map_err(|e| e.with_fallback("Failed to create notification"))
    }

    pub async fn mark_as_read(&self, id: &NotificationId) -> ApiResult<Notification> {
        self.client
            .patch(
                &format!("/notifications/{}/", id),
                &serde_json::json!({ "is_read": true }),
            )
            .await
            .map_err(|e| e.with_fallback("Failed to mark notification as read"))
    }

    /// Fetch the current list and mark every unread notification read.
    ///
    /// Already-read items are never re-sent. The server exposes no bulk
    /// endpoint, so this issues one PATCH per unread notification.
    pub async fn mark_all_as_read(&self) -> ApiResult<()> {
        let page = self
            .list_notifications()
            .await
            .map_err(|e| e.with_fallback("Failed to mark all notifications as read"))?;

        let unread: Vec<&Notification> =
            page.results.iter().filter(|n| !n.is_read).collect();
        debug!("Marking {} notifications as read", unread.len());

        for notification in unread {
            self.mark_as_read(&notification.notification_id)
                .await
                .map_err(|e| e.with_fallback("Failed to mark all notifications as read"))?;
        }
        Ok(())
    }

    pub async fn delete_notification(&self, id: &NotificationId) -> ApiResult<()> {
        self.client
            .delete(&format!("/notifications/{}/", id))
            .await
            .map_err(|e| e.with_fallback("Failed to delete notification"))
    }
}
