//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One job: aggregate yesterday's issue statistics on `STATS_CRON`
//! (03:00 UTC daily by default).

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::application::stats_service::StatsService;

/// The UTC day before `today`.
pub fn previous_day(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// Register the daily aggregation job and start the scheduler.
pub async fn start_scheduler(
    cron: &str,
    stats: Arc<StatsService>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let aggregate_job = Job::new_async(cron, move |_uuid, _lock| {
        let stats = stats.clone();
        Box::pin(async move {
            let date = previous_day(Utc::now().date_naive());
            if let Err(e) = stats.aggregate_daily(date).await {
                log::error!("Daily stats aggregation for {} failed: {}", date, e);
            }
        })
    })?;

    scheduler.add(aggregate_job).await?;
    scheduler.start().await?;

    log::info!("Scheduled tasks started (daily stats on '{}')", cron);
    Ok(scheduler)
}
