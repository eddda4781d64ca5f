use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::errors::DomainError;
use crate::domain::issue::Issue;
use crate::domain::notification::Notification;
use crate::domain::order::{OrderLineView, OrderView};
use crate::domain::product::Product;
use crate::domain::project::Project;
use crate::domain::stats::DailyStats;
use crate::domain::team::{Team, TeamMember, WorkspaceItem};
use crate::domain::user::User;
use crate::schema::{
    comments, daily_issue_stats, issues, notifications, order_items, orders, products, projects,
    team_members, teams, users, workspace_items,
};

// ── users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            nickname: r.nickname,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── projects ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Project {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── issues ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reporter_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = issues)]
pub struct NewIssueRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reporter_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = issues)]
pub struct IssueChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_id: Option<Option<Uuid>>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<IssueRow> for Issue {
    type Error = DomainError;

    fn try_from(r: IssueRow) -> Result<Self, Self::Error> {
        Ok(Issue {
            id: r.id,
            project_id: r.project_id,
            reporter_id: r.reporter_id,
            assignee_id: r.assignee_id,
            title: r.title,
            description: r.description,
            status: r.status.parse()?,
            view_count: r.view_count,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

// ── comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow {
    pub id: Uuid,
    pub issue_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

impl From<CommentRow> for Comment {
    fn from(r: CommentRow) -> Self {
        Comment {
            id: r.id,
            issue_id: r.issue_id,
            author_id: r.author_id,
            content: r.content,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── teams ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = teams)]
pub struct NewTeamRow {
    pub id: Uuid,
    pub name: String,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = team_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TeamMemberRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = team_members)]
pub struct NewTeamMemberRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
}

impl TryFrom<TeamMemberRow> for TeamMember {
    type Error = DomainError;

    fn try_from(r: TeamMemberRow) -> Result<Self, Self::Error> {
        Ok(TeamMember {
            id: r.id,
            team_id: r.team_id,
            user_id: r.user_id,
            role: r
                .role
                .parse()
                .map_err(|_| DomainError::Internal(format!("unknown team role '{}'", r.role)))?,
            joined_at: r.joined_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = workspace_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceItemRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = workspace_items)]
pub struct NewWorkspaceItemRow {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = workspace_items)]
pub struct WorkspaceItemChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkspaceItemRow> for WorkspaceItem {
    fn from(r: WorkspaceItemRow) -> Self {
        WorkspaceItem {
            id: r.id,
            team_id: r.team_id,
            title: r.title,
            content: r.content,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: BigDecimal,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<BigDecimal>,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            brand: r.brand,
            price: r.price,
            status: r.status.parse().map_err(|_| {
                DomainError::Internal(format!("unknown product status '{}'", r.status))
            })?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

// ── orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Position in the request, from 0.
    pub line_no: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub line_no: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderRow {
    pub fn into_view(self, items: Vec<OrderItemRow>) -> Result<OrderView, DomainError> {
        Ok(OrderView {
            id: self.id,
            user_id: self.user_id,
            total_amount: self.total_amount,
            status: self.status.parse()?,
            created_at: self.created_at,
            lines: items
                .into_iter()
                .map(|l| OrderLineView {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        })
    }
}

// ── notifications ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: String,
    pub message: String,
}

impl From<NotificationRow> for Notification {
    fn from(r: NotificationRow) -> Self {
        Notification {
            id: r.id,
            user_id: r.user_id,
            notification_type: r.notification_type,
            message: r.message,
            created_at: r.created_at,
        }
    }
}

// ── daily_issue_stats ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = daily_issue_stats)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DailyStatsRow {
    pub date: NaiveDate,
    pub created_count: i32,
    pub resolved_count: i32,
    pub comment_count: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = daily_issue_stats)]
pub struct NewDailyStatsRow {
    pub date: NaiveDate,
    pub created_count: i32,
    pub resolved_count: i32,
    pub comment_count: i32,
}

impl From<DailyStatsRow> for DailyStats {
    fn from(r: DailyStatsRow) -> Self {
        DailyStats {
            date: r.date,
            created_count: r.created_count,
            resolved_count: r.resolved_count,
            comment_count: r.comment_count,
        }
    }
}
