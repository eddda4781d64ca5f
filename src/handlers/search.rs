use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::product_service::ProductService;
use crate::domain::product::{ProductDocument, SearchPage, SearchQuery};
use crate::errors::{AppError, ErrorResponse};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/search/products", web::get().to(search_products));
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SearchParams {
    /// Full-text match on name and description.
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[validate(range(min = 0.0, message = "minPrice must not be less than 0"))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0, message = "maxPrice must not be less than 0"))]
    pub max_price: Option<f64>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl From<SearchParams> for SearchQuery {
    fn from(p: SearchParams) -> Self {
        SearchQuery {
            q: p.q.filter(|q| !q.trim().is_empty()),
            category: p.category,
            brand: p.brand,
            min_price: p.min_price,
            max_price: p.max_price,
            page: p.page,
            size: p.size,
        }
    }
}

/// A search hit, shaped like the indexed document.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductHit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<ProductDocument> for ProductHit {
    fn from(d: ProductDocument) -> Self {
        ProductHit {
            id: d.id,
            name: d.name,
            description: d.description,
            category: d.category,
            brand: d.brand,
            price: d.price,
            status: d.status,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<ProductHit>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl From<SearchPage> for SearchResponse {
    fn from(page: SearchPage) -> Self {
        SearchResponse {
            data: page.data.into_iter().map(ProductHit::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

/// GET /api/search/products
///
/// Public. Only ACTIVE products are returned.
#[utoipa::path(
    get,
    path = "/api/search/products",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching active products, newest first", body = SearchResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
    ),
    tag = "search"
)]
pub async fn search_products(
    service: web::Data<ProductService>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    params.validate()?;
    let page = service.search(SearchQuery::from(params)).await?;
    Ok(HttpResponse::Ok().json(SearchResponse::from(page)))
}
