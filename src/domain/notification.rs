use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    OrderDelivered,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewOrder => "new_order",
            NotificationKind::OrderDelivered => "order_delivered",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification content before a recipient is attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub related_id: Option<i64>,
}

impl NewNotification {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        kind: NotificationKind,
        related_id: i64,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind,
            related_id: Some(related_id),
        }
    }
}

/// Persisted notification row. Append-only apart from `read_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub related_id: Option<i64>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// New unread row for `user_id`. Ids are time-ordered (UUIDv7).
    pub fn unread(user_id: i64, content: NewNotification) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            title: content.title,
            body: content.body,
            kind: content.kind,
            related_id: content.related_id,
            read_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unread_copies_content() {
        let content = NewNotification::new("Order Delivered", "Your order #3 has been delivered.", NotificationKind::OrderDelivered, 3);
        let notification = Notification::unread(8, content);

        assert_eq!(notification.user_id, 8);
        assert_eq!(notification.kind.as_str(), "order_delivered");
        assert_eq!(notification.related_id, Some(3));
        assert!(notification.read_at.is_none());
    }
}
