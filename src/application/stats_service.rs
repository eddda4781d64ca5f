use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::errors::DomainError;
use crate::domain::ports::StatsRepository;
use crate::domain::stats::{day_bounds, DailyStats};

use super::run_blocking;

pub struct StatsService {
    repo: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(repo: Arc<dyn StatsRepository>) -> Self {
        Self { repo }
    }

    /// Count one UTC day's activity and store it, replacing any earlier row
    /// for the same date.
    pub async fn aggregate_daily(&self, date: NaiveDate) -> Result<DailyStats, DomainError> {
        let (from, to) = day_bounds(date);
        let repo = self.repo.clone();

        let stats = run_blocking(move || {
            let stats = DailyStats {
                date,
                created_count: count(repo.count_issues_created(from, to)?)?,
                resolved_count: count(repo.count_issues_resolved(from, to)?)?,
                comment_count: count(repo.count_comments_created(from, to)?)?,
            };
            repo.upsert(stats.clone())?;
            Ok(stats)
        })
        .await?;

        log::info!(
            "Aggregated stats for {}: created={} resolved={} comments={}",
            date,
            stats.created_count,
            stats.resolved_count,
            stats.comment_count
        );
        Ok(stats)
    }

    /// Stored rows with `from <= date <= to`, oldest first.
    pub async fn list(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyStats>, DomainError> {
        if from > to {
            return Err(DomainError::Validation(
                "from must not be after to".to_string(),
            ));
        }
        let repo = self.repo.clone();
        run_blocking(move || repo.list_between(from, to)).await
    }
}

fn count(n: i64) -> Result<i32, DomainError> {
    i32::try_from(n).map_err(|_| DomainError::Internal(format!("count {} overflows", n)))
}
