use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::actors::GetSystemHealth;
use crate::domain::order::{OrderItem, PaymentMethod, PlaceOrder, UpdateOrderStatus};
use crate::domain::UserRole;
use crate::error::AppError;
use crate::metrics::render_metrics;

use super::auth::{authenticate, require_staff};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Ignored for customers, who always order for themselves
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub items: Vec<OrderItem>,
    pub delivery_zone_id: i64,
    pub delivery_address: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn place_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let caller = authenticate(&req, state.users.as_ref()).await?;
    let body = body.into_inner();

    let customer_id = match caller.role {
        UserRole::Customer => caller.id,
        UserRole::Staff | UserRole::Admin => {
            let customer_id = body
                .customer_id
                .ok_or_else(|| AppError::Validation("customer_id is required when staff place an order".to_string()))?;
            ensure_customer(&state, customer_id).await?;
            customer_id
        }
    };

    let order = state
        .orders
        .place_order(PlaceOrder {
            customer_id,
            items: body.items,
            delivery_zone_id: body.delivery_zone_id,
            delivery_address: body.delivery_address,
            payment_method: body.payment_method,
            notes: body.notes,
        })
        .await?;

    Ok(HttpResponse::Created().json(order))
}

/// Orders may only be placed for customer-role users
async fn ensure_customer(state: &AppState, user_id: i64) -> Result<(), AppError> {
    match state.users.find_user(user_id).await? {
        Some(user) if user.role == UserRole::Customer => Ok(()),
        Some(user) => Err(AppError::Validation(format!(
            "user {} is {}, orders can only be placed for customers",
            user_id, user.role
        ))),
        None => Err(AppError::not_found("Customer", user_id)),
    }
}

pub async fn get_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let caller = authenticate(&req, state.users.as_ref()).await?;
    let order = state.orders.get_order(path.into_inner()).await?;

    // Another customer's order looks the same as a missing one
    if !caller.role.is_staff() && order.order.customer_id != caller.id {
        return Err(AppError::not_found("Order", order.id()));
    }

    Ok(HttpResponse::Ok().json(order))
}

pub async fn update_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateOrderStatus>,
) -> Result<HttpResponse, AppError> {
    let caller = authenticate(&req, state.users.as_ref()).await?;
    require_staff(&caller)?;

    let order = state
        .orders
        .update_status(path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(order))
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let Some(monitor) = &state.health else {
        return HttpResponse::Ok().json(json!({ "overall_status": { "state": "healthy" } }));
    };

    match monitor.ask(GetSystemHealth).send().await {
        Ok(system) => {
            let status = if system.overall_status.is_unhealthy() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::OK
            };
            HttpResponse::build(status).json(system)
        }
        Err(e) => {
            tracing::error!(error = ?e, "Health monitor unreachable");
            HttpResponse::ServiceUnavailable().json(json!({
                "overall_status": { "state": "unhealthy", "reason": "health monitor unreachable" }
            }))
        }
    }
}

pub async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let buffer = render_metrics(state.metrics.registry())
        .map_err(|e| AppError::Internal(format!("failed to encode metrics: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer))
}
