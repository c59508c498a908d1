use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewNotification, Notification, UserRole};
use crate::error::AppError;
use super::users::UserDirectory;

// ============================================================================
// Notification Service
// ============================================================================
//
// notify_user   - one row for one recipient
// notify_admins - one row per admin-role user, resolved at call time
//
// Rows are append-only; read state is changed elsewhere.
//
// ============================================================================

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Directory used to resolve role groups
    fn users(&self) -> &dyn UserDirectory;

    /// Persist one notification; returns its id
    async fn notify_user(&self, user_id: i64, notification: NewNotification) -> Result<Uuid, AppError>;

    /// Persist one notification per admin; returns how many were written
    async fn notify_admins(&self, notification: NewNotification) -> Result<usize, AppError> {
        let admin_ids = self.users().user_ids_with_role(UserRole::Admin).await?;

        for admin_id in &admin_ids {
            self.notify_user(*admin_id, notification.clone()).await?;
        }

        tracing::info!(
            kind = %notification.kind,
            admin_count = admin_ids.len(),
            "Notified admins"
        );

        Ok(admin_ids.len())
    }
}

pub struct PgNotificationService {
    pool: PgPool,
    users: Arc<dyn UserDirectory>,
}

impl PgNotificationService {
    pub fn new(pool: PgPool, users: Arc<dyn UserDirectory>) -> Self {
        Self { pool, users }
    }
}

#[async_trait]
impl NotificationService for PgNotificationService {
    fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    async fn notify_user(&self, user_id: i64, notification: NewNotification) -> Result<Uuid, AppError> {
        let row = Notification::unread(user_id, notification);

        sqlx::query(
            "INSERT INTO notifications (id, user_id, title, body, kind, related_id, read_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.title)
        .bind(&row.body)
        .bind(row.kind.as_str())
        .bind(row.related_id)
        .bind(row.read_at)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            notification_id = %row.id,
            user_id,
            kind = %row.kind,
            related_id = ?row.related_id,
            "Notification stored"
        );

        Ok(row.id)
    }
}
