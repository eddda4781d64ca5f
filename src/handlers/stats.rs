use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::stats_service::StatsService;
use crate::auth::AuthenticatedUser;
use crate::domain::stats::DailyStats;
use crate::errors::{AppError, ErrorResponse};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats/daily", web::get().to(daily_stats));
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyStatsQuery {
    /// First day, inclusive (YYYY-MM-DD).
    pub from: NaiveDate,
    /// Last day, inclusive (YYYY-MM-DD).
    pub to: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatsResponse {
    #[schema(value_type = String, example = "2025-03-09")]
    pub date: NaiveDate,
    pub created_count: i32,
    pub resolved_count: i32,
    pub comment_count: i32,
}

impl From<DailyStats> for DailyStatsResponse {
    fn from(s: DailyStats) -> Self {
        DailyStatsResponse {
            date: s.date,
            created_count: s.created_count,
            resolved_count: s.resolved_count,
            comment_count: s.comment_count,
        }
    }
}

/// GET /api/stats/daily
#[utoipa::path(
    get,
    path = "/api/stats/daily",
    params(DailyStatsQuery),
    responses(
        (status = 200, description = "Stored daily rows, oldest first", body = [DailyStatsResponse]),
        (status = 400, description = "Missing or malformed dates", body = ErrorResponse),
    ),
    tag = "stats"
)]
pub async fn daily_stats(
    service: web::Data<StatsService>,
    _caller: AuthenticatedUser,
    query: web::Query<DailyStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let DailyStatsQuery { from, to } = query.into_inner();
    let rows: Vec<DailyStatsResponse> = service
        .list(from, to)
        .await?
        .into_iter()
        .map(DailyStatsResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(rows))
}
