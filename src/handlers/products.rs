use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::product_service::ProductService;
use crate::auth::AuthenticatedUser;
use crate::domain::product::{NewProduct, Product, ProductChanges, ProductStatus};
use crate::domain::serialize_amount;
use crate::errors::{AppError, ErrorResponse};

use super::validated;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/products", web::post().to(create_product))
        .route("/products", web::get().to(list_products))
        .route("/products/{id}", web::get().to(get_product))
        .route("/products/{id}", web::patch().to(update_product))
        .route("/products/{id}", web::delete().to(delete_product));
}

/// A price sent either as a JSON number or as a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    /// Parse to a non-negative amount with two fraction digits.
    fn to_amount(&self) -> Result<BigDecimal, AppError> {
        let raw = match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.trim().to_string(),
        };
        let amount = BigDecimal::from_str(&raw)
            .map_err(|_| AppError::validation(format!("price must be a number (got '{}')", raw)))?;
        if amount < BigDecimal::zero() {
            return Err(AppError::validation("price must not be less than 0"));
        }
        Ok(amount.with_scale_round(2, RoundingMode::HalfUp))
    }
}

fn parse_status(raw: Option<String>) -> Result<Option<ProductStatus>, AppError> {
    raw.map(|s| s.parse::<ProductStatus>())
        .transpose()
        .map_err(AppError::from)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "name should not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "category should not be empty"))]
    pub category: String,
    #[validate(length(min = 1, max = 100, message = "brand should not be empty"))]
    pub brand: String,
    #[schema(value_type = f64, example = 19.99)]
    pub price: PriceInput,
    /// ACTIVE (default) or INACTIVE.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "name should not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "category should not be empty"))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 100, message = "brand should not be empty"))]
    pub brand: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<PriceInput>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    /// Rounded to cents, e.g. 19.99.
    #[serde(serialize_with = "serialize_amount")]
    #[schema(value_type = f64)]
    pub price: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            price: p.price,
            status: p.status.as_str().to_string(),
            name: p.name,
            description: p.description,
            category: p.category,
            brand: p.brand,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn create_product(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let product = service
        .create(NewProduct {
            price: body.price.to_amount()?,
            status: parse_status(body.status)?.unwrap_or_default(),
            name: body.name,
            description: body.description,
            category: body.category,
            brand: body.brand,
        })
        .await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Every product, newest first", body = [ProductResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn list_products(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let products: Vec<ProductResponse> = service
        .list()
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn get_product(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PATCH /api/products/{id}
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn update_product(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = validated(body)?;
    let changes = ProductChanges {
        price: body.price.as_ref().map(PriceInput::to_amount).transpose()?,
        status: parse_status(body.status)?,
        name: body.name,
        description: body.description,
        category: body.category,
        brand: body.brand,
    };
    let product = service.update(path.into_inner(), changes).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "products"
)]
pub async fn delete_product(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
