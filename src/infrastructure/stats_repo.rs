use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::issue::IssueStatus;
use crate::domain::ports::StatsRepository;
use crate::domain::stats::DailyStats;
use crate::schema::{comments, daily_issue_stats, issues};

use super::models::{DailyStatsRow, NewDailyStatsRow};

pub struct DieselStatsRepository {
    pool: DbPool,
}

impl DieselStatsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl StatsRepository for DieselStatsRepository {
    fn count_issues_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        let count = issues::table
            .filter(issues::created_at.ge(from))
            .filter(issues::created_at.lt(to))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }

    fn count_issues_resolved(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        let done = vec![IssueStatus::Resolved.as_str(), IssueStatus::Closed.as_str()];
        let count = issues::table
            .filter(issues::updated_at.ge(from))
            .filter(issues::updated_at.lt(to))
            .filter(issues::status.eq_any(done))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }

    fn count_comments_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;

        let count = comments::table
            .filter(comments::created_at.ge(from))
            .filter(comments::created_at.lt(to))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }

    fn upsert(&self, stats: DailyStats) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(daily_issue_stats::table)
            .values(&NewDailyStatsRow {
                date: stats.date,
                created_count: stats.created_count,
                resolved_count: stats.resolved_count,
                comment_count: stats.comment_count,
            })
            .on_conflict(daily_issue_stats::date)
            .do_update()
            .set((
                daily_issue_stats::created_count.eq(excluded(daily_issue_stats::created_count)),
                daily_issue_stats::resolved_count.eq(excluded(daily_issue_stats::resolved_count)),
                daily_issue_stats::comment_count.eq(excluded(daily_issue_stats::comment_count)),
                daily_issue_stats::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyStats>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = daily_issue_stats::table
            .filter(daily_issue_stats::date.ge(from))
            .filter(daily_issue_stats::date.le(to))
            .select(DailyStatsRow::as_select())
            .order(daily_issue_stats::date.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(DailyStats::from).collect())
    }
}
