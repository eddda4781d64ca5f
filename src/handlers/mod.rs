pub mod admin;
pub mod auth;
pub mod comments;
pub mod health;
pub mod issues;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod projects;
pub mod search;
pub mod stats;
pub mod teams;
pub mod users;

use actix_web::web;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{OpenApi, ToSchema};
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};

/// Mount every endpoint; called inside the `/api` scope.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .configure(auth::routes)
        .configure(users::routes)
        .configure(projects::routes)
        .configure(issues::routes)
        .configure(comments::routes)
        .configure(teams::routes)
        .configure(products::routes)
        .configure(search::routes)
        .configure(orders::routes)
        .configure(notifications::routes)
        .configure(stats::routes)
        .configure(admin::routes);
}

/// Unwrap a JSON body and run its `validator` rules.
pub(crate) fn validated<T: Validate>(body: web::Json<T>) -> Result<T, AppError> {
    let body = body.into_inner();
    body.validate()?;
    Ok(body)
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        users::register,
        users::me,
        projects::create_project,
        projects::list_projects,
        issues::create_issue,
        issues::list_issues,
        issues::popular_issues,
        issues::get_issue,
        issues::update_issue,
        issues::delete_issue,
        comments::create_comment,
        comments::list_comments,
        teams::create_team,
        teams::my_teams,
        teams::get_team,
        teams::list_members,
        teams::add_member,
        teams::update_member_role,
        teams::remove_member,
        teams::create_item,
        teams::list_items,
        teams::get_item,
        teams::update_item,
        teams::delete_item,
        products::create_product,
        products::list_products,
        products::get_product,
        products::update_product,
        products::delete_product,
        search::search_products,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::pay_order,
        orders::cancel_order,
        notifications::list_notifications,
        stats::daily_stats,
        admin::reindex_products,
        admin::aggregate_stats,
    ),
    components(schemas(ErrorResponse, MessageResponse))
)]
pub struct ApiDoc;
