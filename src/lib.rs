pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod scheduler;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::Service;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::comment_service::CommentService;
use application::issue_service::IssueService;
use application::notification_service::NotificationService;
use application::order_service::OrderService;
use application::product_service::ProductService;
use application::project_service::ProjectService;
use application::stats_service::StatsService;
use application::team_service::TeamService;
use application::user_service::UserService;
use domain::errors::DomainError;
use domain::ports::{
    Cache, CommentRepository, EventPublisher, IssueRepository, NotificationRepository,
    OrderRepository, ProductRepository, ProjectRepository, SearchIndex, StatsRepository,
    TeamRepository, UserRepository,
};
use infrastructure::jwt::JwtService;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("migrations failed: {}", e)))?;
    Ok(())
}

/// Storage and external clients the services are built on.
pub struct Ports {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub issues: Arc<dyn IssueRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub stats: Arc<dyn StatsRepository>,
    pub publisher: Arc<dyn EventPublisher>,
    pub search: Arc<dyn SearchIndex>,
    pub cache: Arc<dyn Cache>,
}

impl Ports {
    /// Diesel repositories over `pool`, plus the given clients.
    pub fn diesel(
        pool: DbPool,
        publisher: Arc<dyn EventPublisher>,
        search: Arc<dyn SearchIndex>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        use crate::infrastructure::*;

        Self {
            users: Arc::new(user_repo::DieselUserRepository::new(pool.clone())),
            projects: Arc::new(project_repo::DieselProjectRepository::new(pool.clone())),
            issues: Arc::new(issue_repo::DieselIssueRepository::new(pool.clone())),
            comments: Arc::new(comment_repo::DieselCommentRepository::new(pool.clone())),
            teams: Arc::new(team_repo::DieselTeamRepository::new(pool.clone())),
            products: Arc::new(product_repo::DieselProductRepository::new(pool.clone())),
            orders: Arc::new(order_repo::DieselOrderRepository::new(pool.clone())),
            notifications: Arc::new(notification_repo::DieselNotificationRepository::new(
                pool.clone(),
            )),
            stats: Arc::new(stats_repo::DieselStatsRepository::new(pool)),
            publisher,
            search,
            cache,
        }
    }
}

/// Tunables the services need beyond their ports.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub popular_ttl: Duration,
    pub bcrypt_cost: u32,
}

/// Every service, shared with handlers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub jwt: web::Data<JwtService>,
    pub users: web::Data<UserService>,
    pub projects: web::Data<ProjectService>,
    pub issues: web::Data<IssueService>,
    pub comments: web::Data<CommentService>,
    pub teams: web::Data<TeamService>,
    pub products: web::Data<ProductService>,
    pub orders: web::Data<OrderService>,
    pub notifications: web::Data<NotificationService>,
    pub stats: web::Data<StatsService>,
}

impl AppState {
    pub fn new(ports: Ports, jwt: JwtService, settings: ServiceSettings) -> Self {
        let jwt = web::Data::new(jwt);
        Self {
            users: web::Data::new(UserService::new(
                ports.users.clone(),
                jwt.clone().into_inner(),
                settings.bcrypt_cost,
            )),
            projects: web::Data::new(ProjectService::new(ports.projects.clone())),
            issues: web::Data::new(IssueService::new(
                ports.issues.clone(),
                ports.projects,
                ports.users.clone(),
                ports.cache,
                settings.popular_ttl,
            )),
            comments: web::Data::new(CommentService::new(ports.comments, ports.issues)),
            teams: web::Data::new(TeamService::new(ports.teams, ports.users)),
            products: web::Data::new(ProductService::new(
                ports.products.clone(),
                ports.search,
            )),
            orders: web::Data::new(OrderService::new(
                ports.products,
                ports.orders,
                ports.publisher,
            )),
            notifications: web::Data::new(NotificationService::new(ports.notifications)),
            stats: web::Data::new(StatsService::new(ports.stats)),
            jwt,
        }
    }
}

/// Register shared state, extractor error handlers and every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(state.jwt.clone())
        .app_data(state.users.clone())
        .app_data(state.projects.clone())
        .app_data(state.issues.clone())
        .app_data(state.comments.clone())
        .app_data(state.teams.clone())
        .app_data(state.products.clone())
        .app_data(state.orders.clone())
        .app_data(state.notifications.clone())
        .app_data(state.stats.clone())
        .app_data(web::JsonConfig::default().error_handler(errors::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(errors::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(errors::query_error_handler))
        // Ahead of the `/api` scope so the document path is not swallowed by it.
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api/openapi.json", handlers::ApiDoc::openapi()),
        )
        .service(web::scope("/api").configure(handlers::routes));
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .configure(|cfg| configure(cfg, &state))
            .wrap_fn(|req, srv| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let response = srv.call(req);
                async move {
                    let res = response.await?;
                    if let Some(err) = res.response().error() {
                        log::error!("{} {} - {} - {}", method, uri, res.status().as_u16(), err);
                    }
                    Ok(res)
                }
            })
            .wrap(Logger::default())
    })
    .bind((host.to_string(), port))?
    .run())
}
