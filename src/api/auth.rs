use actix_web::HttpRequest;

use crate::domain::User;
use crate::error::AppError;
use crate::services::UserDirectory;

/// Identifies the caller. Session handling lives in front of this service.
pub const USER_ID_HEADER: &str = "X-User-Id";

pub async fn authenticate(req: &HttpRequest, users: &dyn UserDirectory) -> Result<User, AppError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or(AppError::Unauthenticated)?;

    users.find_user(user_id).await?.ok_or(AppError::Unauthenticated)
}

pub fn require_staff(user: &User) -> Result<(), AppError> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("{} cannot change order status", user.role)))
    }
}
