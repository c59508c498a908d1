use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{User, UserRole};
use crate::error::AppError;

/// Explicit role lookup: replaces runtime role-capability checks with a
/// query returning the user ids holding a role.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_ids_with_role(&self, role: UserRole) -> Result<Vec<i64>, AppError>;

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError>;
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn user_ids_with_role(&self, role: UserRole) -> Result<Vec<i64>, AppError> {
        let ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE role = $1 ORDER BY id")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn find_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let row: Option<(i64, String, String, String)> =
            sqlx::query_as("SELECT id, name, email, role FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, name, email, role)| {
            let role = role
                .parse()
                .map_err(|e: String| AppError::Internal(format!("unexpected value in users.role: {}", e)))?;
            Ok(User { id, name, email, role })
        })
        .transpose()
    }
}
