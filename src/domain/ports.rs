//! Boundaries the application layer depends on.
//!
//! Repository traits are synchronous (the ORM blocks); the application layer
//! runs them on the blocking pool. Clients for external systems are async.

use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::comment::Comment;
use super::errors::DomainError;
use super::events::OrderEvent;
use super::issue::{Issue, IssueChanges, IssuePage, IssueStatus, NewIssue};
use super::notification::{NewNotification, Notification};
use super::order::{OrderLineInput, OrderStatus, OrderView};
use super::product::{NewProduct, Product, ProductChanges, ProductDocument, SearchPage, SearchQuery};
use super::project::{NewProject, Project};
use super::stats::DailyStats;
use super::team::{
    NewWorkspaceItem, Team, TeamMember, TeamMemberView, TeamRole, WorkspaceItem,
    WorkspaceItemChanges,
};
use super::user::{NewUser, User};

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

pub trait ProjectRepository: Send + Sync + 'static {
    fn create(&self, project: NewProject) -> Result<Project, DomainError>;
    fn list(&self) -> Result<Vec<Project>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError>;
}

pub trait IssueRepository: Send + Sync + 'static {
    fn create(&self, issue: NewIssue) -> Result<Issue, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>, DomainError>;
    fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<IssueStatus>,
        page: i64,
        size: i64,
    ) -> Result<IssuePage, DomainError>;
    fn update(&self, id: Uuid, changes: IssueChanges) -> Result<Option<Issue>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn increment_view_count(&self, id: Uuid) -> Result<(), DomainError>;
    /// Issues created at or after `since`, each with its comment count, in
    /// the store's default order.
    fn created_since_with_comment_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(Issue, i64)>, DomainError>;
}

pub trait CommentRepository: Send + Sync + 'static {
    fn create(&self, issue_id: Uuid, author_id: Uuid, content: String)
        -> Result<Comment, DomainError>;
    fn list_by_issue(&self, issue_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}

pub trait TeamRepository: Send + Sync + 'static {
    /// Creates the team and its first OWNER membership atomically.
    fn create_with_owner(&self, name: String, owner_id: Uuid) -> Result<Team, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError>;
    fn teams_for_user(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError>;
    fn find_membership(&self, team_id: Uuid, user_id: Uuid)
        -> Result<Option<TeamMember>, DomainError>;
    fn find_member(&self, member_id: Uuid) -> Result<Option<TeamMember>, DomainError>;
    fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberView>, DomainError>;
    fn member_view(&self, member_id: Uuid) -> Result<Option<TeamMemberView>, DomainError>;
    fn add_member(&self, team_id: Uuid, user_id: Uuid, role: TeamRole)
        -> Result<TeamMember, DomainError>;
    fn update_member_role(&self, member_id: Uuid, role: TeamRole) -> Result<(), DomainError>;
    fn remove_member(&self, member_id: Uuid) -> Result<(), DomainError>;
    fn count_owners(&self, team_id: Uuid) -> Result<i64, DomainError>;
    fn create_item(&self, item: NewWorkspaceItem) -> Result<WorkspaceItem, DomainError>;
    fn list_items(&self, team_id: Uuid) -> Result<Vec<WorkspaceItem>, DomainError>;
    fn find_item(&self, id: Uuid) -> Result<Option<WorkspaceItem>, DomainError>;
    fn update_item(&self, id: Uuid, changes: WorkspaceItemChanges)
        -> Result<WorkspaceItem, DomainError>;
    fn delete_item(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// One query: the products among `ids` whose status is ACTIVE.
    fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Inserts the order (PENDING) and all of its lines in one transaction.
    fn create(
        &self,
        user_id: Uuid,
        total_amount: BigDecimal,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError>;
    fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus)
        -> Result<Option<OrderView>, DomainError>;
}

pub trait NotificationRepository: Send + Sync + 'static {
    fn create(&self, notification: NewNotification) -> Result<Notification, DomainError>;
    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError>;
}

pub trait StatsRepository: Send + Sync + 'static {
    fn count_issues_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError>;
    /// Issues whose last update falls in the window and whose status is
    /// RESOLVED or CLOSED.
    fn count_issues_resolved(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError>;
    fn count_comments_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError>;
    fn upsert(&self, stats: DailyStats) -> Result<(), DomainError>;
    fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyStats>, DomainError>;
}

/// Producer side of the order event channel.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    async fn publish(&self, event: &OrderEvent) -> Result<(), DomainError>;

    /// Flush anything buffered; called once at shutdown.
    fn close(&self) {}
}

/// Consumer side of the order event channel. Receives raw payloads one at a
/// time; failures are the handler's to log.
#[async_trait]
pub trait EventHandler: Send + Sync + 'static {
    async fn handle(&self, payload: &[u8]);
}

/// The product search mirror.
#[async_trait]
pub trait SearchIndex: Send + Sync + 'static {
    async fn index(&self, doc: &ProductDocument) -> Result<(), DomainError>;
    async fn update(&self, doc: &ProductDocument) -> Result<(), DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, DomainError>;
    /// Drop the mirror and rebuild it from `docs`.
    async fn reindex_all(&self, docs: &[ProductDocument]) -> Result<(), DomainError>;
}

/// Key/value cache holding opaque serialized values with a per-entry TTL.
#[async_trait]
pub trait Cache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
}
