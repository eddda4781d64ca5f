use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::product_service::ProductService;
use crate::application::stats_service::StatsService;
use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, ErrorResponse};

use super::stats::DailyStatsResponse;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/reindex/products", web::post().to(reindex_products))
        .route("/admin/stats/aggregate", web::post().to(aggregate_stats));
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReindexResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AggregateQuery {
    /// Day to aggregate (YYYY-MM-DD); today in UTC when omitted.
    pub date: Option<NaiveDate>,
}

/// POST /api/admin/reindex/products
///
/// Drops the search mirror and rebuilds it from every stored product.
#[utoipa::path(
    post,
    path = "/api/admin/reindex/products",
    responses(
        (status = 200, description = "Mirror rebuilt", body = ReindexResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Search backend unavailable", body = ErrorResponse),
    ),
    tag = "admin"
)]
pub async fn reindex_products(
    service: web::Data<ProductService>,
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let count = service.reindex().await?;
    Ok(HttpResponse::Ok().json(ReindexResponse {
        message: "Products reindexed successfully".to_string(),
        count,
    }))
}

/// POST /api/admin/stats/aggregate
#[utoipa::path(
    post,
    path = "/api/admin/stats/aggregate",
    params(AggregateQuery),
    responses(
        (status = 200, description = "Stats computed and stored", body = DailyStatsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    tag = "admin"
)]
pub async fn aggregate_stats(
    service: web::Data<StatsService>,
    _caller: AuthenticatedUser,
    query: web::Query<AggregateQuery>,
) -> Result<HttpResponse, AppError> {
    let date = query
        .into_inner()
        .date
        .unwrap_or_else(|| Utc::now().date_naive());
    let stats = service.aggregate_daily(date).await?;
    Ok(HttpResponse::Ok().json(DailyStatsResponse::from(stats)))
}
