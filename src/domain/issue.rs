use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

/// Number of issues returned by the popular ranking.
pub const POPULAR_LIMIT: usize = 10;
/// Only issues created within this many days are ranked.
pub const POPULAR_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "OPEN",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(IssueStatus::Open),
            "IN_PROGRESS" => Ok(IssueStatus::InProgress),
            "RESOLVED" => Ok(IssueStatus::Resolved),
            "CLOSED" => Ok(IssueStatus::Closed),
            other => Err(DomainError::Validation(format!(
                "status must be one of OPEN, IN_PROGRESS, RESOLVED, CLOSED (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reporter_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: IssueStatus,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewIssue {
    pub project_id: Uuid,
    pub reporter_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update. `assignee_id: Some(None)` clears the assignee.
#[derive(Debug, Clone, Default)]
pub struct IssueChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
    pub assignee_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone)]
pub struct IssuePage {
    pub items: Vec<Issue>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl IssuePage {
    pub fn total_pages(&self) -> i64 {
        if self.size <= 0 {
            return 0;
        }
        (self.total + self.size - 1) / self.size
    }
}

/// Rank issues by `view_count + comment_count`, highest first, keeping the
/// incoming order for equal scores, and keep the top `limit`.
pub fn rank_popular(candidates: Vec<(Issue, i64)>, limit: usize) -> Vec<Issue> {
    let mut scored: Vec<(i64, Issue)> = candidates
        .into_iter()
        .map(|(issue, comments)| (i64::from(issue.view_count) + comments, issue))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, issue)| issue)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(title: &str, views: i32) -> Issue {
        Issue {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            reporter_id: Uuid::new_v4(),
            assignee_id: None,
            title: title.to_string(),
            description: None,
            status: IssueStatus::Open,
            view_count: views,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rank_popular_orders_by_views_plus_comments() {
        let ranked = rank_popular(
            vec![(issue("a", 1), 0), (issue("b", 0), 5), (issue("c", 3), 1)],
            10,
        );
        let titles: Vec<&str> = ranked.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
    }

    #[test]
    fn rank_popular_keeps_store_order_on_ties() {
        let ranked = rank_popular(vec![(issue("first", 2), 0), (issue("second", 1), 1)], 10);
        assert_eq!(ranked[0].title, "first");
        assert_eq!(ranked[1].title, "second");
    }

    #[test]
    fn rank_popular_truncates_to_limit() {
        let candidates = (0..15).map(|n| (issue(&n.to_string(), n), 0)).collect();
        let ranked = rank_popular(candidates, POPULAR_LIMIT);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].title, "14");
    }

    #[test]
    fn status_parses_from_wire_names() {
        assert_eq!(
            "IN_PROGRESS".parse::<IssueStatus>().unwrap(),
            IssueStatus::InProgress
        );
        assert!("DONE".parse::<IssueStatus>().is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = IssuePage {
            items: vec![],
            total: 21,
            page: 1,
            size: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
