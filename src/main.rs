use std::io;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::sync::mpsc;

use tracker_commerce::config::AppConfig;
use tracker_commerce::domain::ports::{EventHandler, EventPublisher, SearchIndex};
use tracker_commerce::infrastructure::cache::MokaCacheStore;
use tracker_commerce::infrastructure::events::{
    run_channel_consumer, run_kafka_consumer, ChannelEventPublisher, KafkaEventPublisher,
};
use tracker_commerce::infrastructure::jwt::JwtService;
use tracker_commerce::infrastructure::search::{ElasticsearchIndex, InMemorySearchIndex};
use tracker_commerce::scheduler::start_scheduler;
use tracker_commerce::{build_server, create_pool, run_migrations, AppState, Ports, ServiceSettings};

fn startup_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cfg = AppConfig::from_env().map_err(startup_error)?;

    let pool = create_pool(&cfg.database_url).map_err(startup_error)?;
    run_migrations(&pool).map_err(startup_error)?;

    // Order events go through Kafka when enabled, otherwise an in-process channel.
    let mut local_events: Option<mpsc::UnboundedReceiver<Vec<u8>>> = None;
    let publisher: Arc<dyn EventPublisher> = if cfg.kafka_enabled {
        log::info!("Publishing order events to Kafka at {}", cfg.kafka_brokers);
        Arc::new(
            KafkaEventPublisher::new(&cfg.kafka_brokers, &cfg.kafka_client_id)
                .map_err(startup_error)?,
        )
    } else {
        log::info!("Kafka disabled; order events stay in-process");
        let (publisher, receiver) = ChannelEventPublisher::channel();
        local_events = Some(receiver);
        Arc::new(publisher)
    };

    let search: Arc<dyn SearchIndex> = if cfg.elasticsearch_enabled {
        let index = ElasticsearchIndex::new(&cfg.elasticsearch_node);
        if let Err(e) = index.ensure_index().await {
            log::error!("Could not prepare search index at {}: {}", cfg.elasticsearch_node, e);
        }
        Arc::new(index)
    } else {
        log::info!("Elasticsearch disabled; using the in-memory search index");
        Arc::new(InMemorySearchIndex::new())
    };

    let ports = Ports::diesel(
        pool,
        publisher.clone(),
        search,
        Arc::new(MokaCacheStore::new()),
    );
    let state = AppState::new(
        ports,
        JwtService::new(&cfg.jwt_secret, cfg.jwt_expires_in_secs),
        ServiceSettings {
            popular_ttl: cfg.cache_ttl,
            bcrypt_cost: cfg.bcrypt_cost,
        },
    );

    let handler: Arc<dyn EventHandler> = state.notifications.clone().into_inner();
    let consumer = match local_events {
        Some(receiver) => tokio::spawn(run_channel_consumer(receiver, handler)),
        None => {
            let (brokers, group_id, client_id) = (
                cfg.kafka_brokers.clone(),
                cfg.kafka_group_id.clone(),
                cfg.kafka_client_id.clone(),
            );
            tokio::spawn(async move {
                if let Err(e) = run_kafka_consumer(brokers, group_id, client_id, handler).await {
                    log::error!("Kafka consumer stopped: {}", e);
                }
            })
        }
    };

    let mut scheduler = start_scheduler(&cfg.stats_cron, state.stats.clone().into_inner())
        .await
        .map_err(startup_error)?;

    log::info!("Starting server at http://{}:{}", cfg.host, cfg.port);
    let result = build_server(state, &cfg.host, cfg.port)?.await;

    log::info!("Shutting down");
    publisher.close();
    consumer.abort();
    if let Err(e) = scheduler.shutdown().await {
        log::warn!("Scheduler did not shut down cleanly: {}", e);
    }

    result
}
