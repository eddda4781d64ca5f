use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::order_service::OrderService;
use crate::auth::AuthenticatedUser;
use crate::domain::order::{OrderItemRequest, OrderStatus, OrderView};
use crate::domain::serialize_amount;
use crate::errors::{AppError, ErrorResponse};

use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(create_order))
        .route("/orders", web::get().to(list_orders))
        .route("/orders/{id}", web::get().to(get_order))
        .route("/orders/{id}/pay", web::patch().to(pay_order))
        .route("/orders/{id}/cancel", web::patch().to(cancel_order));
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Uuid,
    /// Must be a positive integer.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "items must contain at least 1 element"))]
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price captured when the order was placed, e.g. 9.99.
    #[serde(serialize_with = "serialize_amount")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(serialize_with = "serialize_amount")]
    #[schema(value_type = f64)]
    pub total_amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status.as_str().to_string(),
            created_at: order.created_at,
            items: order
                .lines
                .into_iter()
                .map(|l| OrderItemResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.unit_price,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Prices every line against the current catalog, stores the order with its
/// items and announces `ORDER_CREATED`. Any unknown or inactive product fails
/// the whole order.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Empty or invalid items", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "A product is unknown or inactive", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    caller: AuthenticatedUser,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let items = body
        .items
        .into_iter()
        .map(|i| OrderItemRequest {
            product_id: i.product_id,
            quantity: i.quantity,
        })
        .collect();

    let order = service.create_order(caller.user_id, items).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/orders
///
/// The caller's own orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderService>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let orders: Vec<OrderResponse> = service
        .list_orders(caller.user_id)
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(orders))
}

/// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found or owned by someone else", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = service.get_order(path.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /api/orders/{id}/pay
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/pay",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order marked PAID", body = OrderResponse),
        (status = 404, description = "Order not found or owned by someone else", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn pay_order(
    service: web::Data<OrderService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = service
        .update_status(path.into_inner(), caller.user_id, OrderStatus::Paid)
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /api/orders/{id}/cancel
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order marked CANCELLED", body = OrderResponse),
        (status = 404, description = "Order not found or owned by someone else", body = ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    service: web::Data<OrderService>,
    caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = service
        .update_status(path.into_inner(), caller.user_id, OrderStatus::Cancelled)
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
