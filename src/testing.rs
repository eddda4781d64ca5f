//! In-memory port implementations for service and handler tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::errors::DomainError;
use crate::domain::events::OrderEvent;
use crate::domain::issue::{Issue, IssueChanges, IssuePage, IssueStatus, NewIssue};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::order::{OrderLineInput, OrderLineView, OrderStatus, OrderView};
use crate::domain::ports::{
    Cache, CommentRepository, EventPublisher, IssueRepository, NotificationRepository,
    OrderRepository, ProductRepository, ProjectRepository, SearchIndex, StatsRepository,
    TeamRepository, UserRepository,
};
use crate::domain::product::{
    NewProduct, Product, ProductChanges, ProductDocument, ProductStatus, SearchPage, SearchQuery,
};
use crate::domain::project::{NewProject, Project};
use crate::domain::stats::DailyStats;
use crate::domain::team::{
    MemberUser, NewWorkspaceItem, Team, TeamMember, TeamMemberView, TeamRole, WorkspaceItem,
    WorkspaceItemChanges,
};
use crate::domain::user::{NewUser, User};
use crate::infrastructure::cache::MokaCacheStore;
use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::search::InMemorySearchIndex;
use crate::{AppState, Ports, ServiceSettings};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    issues: Vec<Issue>,
    comments: Vec<Comment>,
    teams: Vec<Team>,
    members: Vec<TeamMember>,
    items: Vec<WorkspaceItem>,
    products: Vec<Product>,
    orders: Vec<OrderView>,
    notifications: Vec<Notification>,
    stats: Vec<DailyStats>,
}

/// Every repository port over one set of in-memory tables. Rows are kept in
/// insertion order, so "newest first" is reverse iteration.
#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_user(&self, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "not-a-hash".to_string(),
            nickname: email.split('@').next().unwrap_or(email).to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn seed_project(&self, name: &str) -> Project {
        ProjectRepository::create(
            self,
            NewProject {
                name: name.to_string(),
                description: None,
            },
        )
        .unwrap()
    }

    pub fn seed_product(&self, name: &str, price: BigDecimal, status: ProductStatus) -> Product {
        ProductRepository::create(
            self,
            NewProduct {
                name: name.to_string(),
                description: None,
                category: "General".to_string(),
                brand: "Acme".to_string(),
                price,
                status,
            },
        )
        .unwrap()
    }

    pub fn insert_issue(&self, issue: Issue) {
        self.tables.lock().unwrap().issues.push(issue);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.tables.lock().unwrap().comments.push(comment);
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }

    pub fn order_line_count(&self) -> usize {
        let t = self.tables.lock().unwrap();
        t.orders.iter().map(|o| o.lines.len()).sum()
    }

    pub fn set_product_price(&self, id: Uuid, price: BigDecimal) {
        let mut t = self.tables.lock().unwrap();
        if let Some(p) = t.products.iter_mut().find(|p| p.id == id) {
            p.price = price;
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.tables.lock().unwrap().notifications.clone()
    }

    pub fn stats_rows(&self) -> Vec<DailyStats> {
        self.tables.lock().unwrap().stats.clone()
    }
}

fn member_view(t: &Tables, member: &TeamMember) -> Option<TeamMemberView> {
    t.users.iter().find(|u| u.id == member.user_id).map(|u| TeamMemberView {
        member: member.clone(),
        user: MemberUser {
            id: u.id,
            email: u.email.clone(),
            nickname: u.nickname.clone(),
        },
    })
}

impl UserRepository for MemoryDb {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            nickname: user.nickname,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }
}

impl ProjectRepository for MemoryDb {
    fn create(&self, project: NewProject) -> Result<Project, DomainError> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: project.name,
            description: project.description,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().projects.push(project.clone());
        Ok(project)
    }

    fn list(&self) -> Result<Vec<Project>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.projects.iter().rev().cloned().collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.projects.iter().find(|p| p.id == id).cloned())
    }
}

impl IssueRepository for MemoryDb {
    fn create(&self, issue: NewIssue) -> Result<Issue, DomainError> {
        let now = Utc::now();
        let issue = Issue {
            id: Uuid::new_v4(),
            project_id: issue.project_id,
            reporter_id: issue.reporter_id,
            assignee_id: issue.assignee_id,
            title: issue.title,
            description: issue.description,
            status: IssueStatus::Open,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().issues.push(issue.clone());
        Ok(issue)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.issues.iter().find(|i| i.id == id).cloned())
    }

    fn list_by_project(
        &self,
        project_id: Uuid,
        status: Option<IssueStatus>,
        page: i64,
        size: i64,
    ) -> Result<IssuePage, DomainError> {
        let t = self.tables.lock().unwrap();
        let matching: Vec<&Issue> = t
            .issues
            .iter()
            .rev()
            .filter(|i| i.project_id == project_id)
            .filter(|i| status.map_or(true, |s| i.status == s))
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(crate::domain::page_offset(page, size) as usize)
            .take(size as usize)
            .cloned()
            .collect();
        Ok(IssuePage {
            items,
            total,
            page,
            size,
        })
    }

    fn update(&self, id: Uuid, changes: IssueChanges) -> Result<Option<Issue>, DomainError> {
        let mut t = self.tables.lock().unwrap();
        let Some(issue) = t.issues.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            issue.title = title;
        }
        if let Some(description) = changes.description {
            issue.description = Some(description);
        }
        if let Some(status) = changes.status {
            issue.status = status;
        }
        if let Some(assignee_id) = changes.assignee_id {
            issue.assignee_id = assignee_id;
        }
        issue.updated_at = Utc::now();
        Ok(Some(issue.clone()))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.issues.len();
        t.issues.retain(|i| i.id != id);
        t.comments.retain(|c| c.issue_id != id);
        Ok(t.issues.len() < before)
    }

    fn increment_view_count(&self, id: Uuid) -> Result<(), DomainError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(issue) = t.issues.iter_mut().find(|i| i.id == id) {
            issue.view_count += 1;
        }
        Ok(())
    }

    fn created_since_with_comment_counts(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(Issue, i64)>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.issues
            .iter()
            .filter(|i| i.created_at >= since)
            .map(|i| {
                let comments = t.comments.iter().filter(|c| c.issue_id == i.id).count() as i64;
                (i.clone(), comments)
            })
            .collect())
    }
}

impl CommentRepository for MemoryDb {
    fn create(
        &self,
        issue_id: Uuid,
        author_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            issue_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    fn list_by_issue(&self, issue_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments
            .iter()
            .filter(|c| c.issue_id == issue_id)
            .cloned()
            .collect())
    }
}

impl TeamRepository for MemoryDb {
    fn create_with_owner(&self, name: String, owner_id: Uuid) -> Result<Team, DomainError> {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        };
        let mut t = self.tables.lock().unwrap();
        t.teams.push(team.clone());
        t.members.push(TeamMember {
            id: Uuid::new_v4(),
            team_id: team.id,
            user_id: owner_id,
            role: TeamRole::Owner,
            joined_at: now,
        });
        Ok(team)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.teams.iter().find(|team| team.id == id).cloned())
    }

    fn teams_for_user(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| t.teams.iter().find(|team| team.id == m.team_id).cloned())
            .collect())
    }

    fn find_membership(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TeamMember>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .cloned())
    }

    fn find_member(&self, member_id: Uuid) -> Result<Option<TeamMember>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members.iter().find(|m| m.id == member_id).cloned())
    }

    fn list_members(&self, team_id: Uuid) -> Result<Vec<TeamMemberView>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members
            .iter()
            .filter(|m| m.team_id == team_id)
            .filter_map(|m| member_view(&t, m))
            .collect())
    }

    fn member_view(&self, member_id: Uuid) -> Result<Option<TeamMemberView>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members
            .iter()
            .find(|m| m.id == member_id)
            .and_then(|m| member_view(&t, m)))
    }

    fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> Result<TeamMember, DomainError> {
        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role,
            joined_at: Utc::now(),
        };
        self.tables.lock().unwrap().members.push(member.clone());
        Ok(member)
    }

    fn update_member_role(&self, member_id: Uuid, role: TeamRole) -> Result<(), DomainError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(m) = t.members.iter_mut().find(|m| m.id == member_id) {
            m.role = role;
        }
        Ok(())
    }

    fn remove_member(&self, member_id: Uuid) -> Result<(), DomainError> {
        self.tables
            .lock()
            .unwrap()
            .members
            .retain(|m| m.id != member_id);
        Ok(())
    }

    fn count_owners(&self, team_id: Uuid) -> Result<i64, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.members
            .iter()
            .filter(|m| m.team_id == team_id && m.role == TeamRole::Owner)
            .count() as i64)
    }

    fn create_item(&self, item: NewWorkspaceItem) -> Result<WorkspaceItem, DomainError> {
        let now = Utc::now();
        let item = WorkspaceItem {
            id: Uuid::new_v4(),
            team_id: item.team_id,
            title: item.title,
            content: item.content,
            created_by: item.created_by,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().items.push(item.clone());
        Ok(item)
    }

    fn list_items(&self, team_id: Uuid) -> Result<Vec<WorkspaceItem>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.items
            .iter()
            .rev()
            .filter(|i| i.team_id == team_id)
            .cloned()
            .collect())
    }

    fn find_item(&self, id: Uuid) -> Result<Option<WorkspaceItem>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.items.iter().find(|i| i.id == id).cloned())
    }

    fn update_item(
        &self,
        id: Uuid,
        changes: WorkspaceItemChanges,
    ) -> Result<WorkspaceItem, DomainError> {
        let mut t = self.tables.lock().unwrap();
        let item = t
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DomainError::not_found_id("WorkspaceItem", id))?;
        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(content) = changes.content {
            item.content = Some(content);
        }
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    fn delete_item(&self, id: Uuid) -> Result<(), DomainError> {
        self.tables.lock().unwrap().items.retain(|i| i.id != id);
        Ok(())
    }
}

impl ProductRepository for MemoryDb {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            category: product.category,
            brand: product.brand,
            price: product.price,
            status: product.status,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().unwrap().products.push(product.clone());
        Ok(product)
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().rev().cloned().collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, DomainError> {
        let mut t = self.tables.lock().unwrap();
        let Some(p) = t.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            p.name = name;
        }
        if let Some(description) = changes.description {
            p.description = Some(description);
        }
        if let Some(category) = changes.category {
            p.category = category;
        }
        if let Some(brand) = changes.brand {
            p.brand = brand;
        }
        if let Some(price) = changes.price {
            p.price = price;
        }
        if let Some(status) = changes.status {
            p.status = status;
        }
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() < before)
    }

    fn find_active_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products
            .iter()
            .filter(|p| ids.contains(&p.id) && p.status == ProductStatus::Active)
            .cloned()
            .collect())
    }
}

impl OrderRepository for MemoryDb {
    fn create(
        &self,
        user_id: Uuid,
        total_amount: BigDecimal,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError> {
        let order = OrderView {
            id: Uuid::new_v4(),
            user_id,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            lines: lines
                .into_iter()
                .map(|l| OrderLineView {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        };
        self.tables.lock().unwrap().orders.push(order.clone());
        Ok(order)
    }

    fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.orders
            .iter()
            .find(|o| o.id == id && o.user_id == user_id)
            .cloned())
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderView>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.orders.iter_mut().find(|o| o.id == id).map(|o| {
            o.status = status;
            o.clone()
        }))
    }
}

impl NotificationRepository for MemoryDb {
    fn create(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            notification_type: notification.notification_type,
            message: notification.message,
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl StatsRepository for MemoryDb {
    fn count_issues_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.issues
            .iter()
            .filter(|i| i.created_at >= from && i.created_at < to)
            .count() as i64)
    }

    fn count_issues_resolved(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.issues
            .iter()
            .filter(|i| i.updated_at >= from && i.updated_at < to)
            .filter(|i| matches!(i.status, IssueStatus::Resolved | IssueStatus::Closed))
            .count() as i64)
    }

    fn count_comments_created(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<i64, DomainError> {
        let t = self.tables.lock().unwrap();
        Ok(t.comments
            .iter()
            .filter(|c| c.created_at >= from && c.created_at < to)
            .count() as i64)
    }

    fn upsert(&self, stats: DailyStats) -> Result<(), DomainError> {
        let mut t = self.tables.lock().unwrap();
        match t.stats.iter_mut().find(|s| s.date == stats.date) {
            Some(existing) => *existing = stats,
            None => t.stats.push(stats),
        }
        Ok(())
    }

    fn list_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyStats>, DomainError> {
        let t = self.tables.lock().unwrap();
        let mut rows: Vec<DailyStats> = t
            .stats
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.date);
        Ok(rows)
    }
}

/// Records published events; can be switched to fail every publish.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<OrderEvent>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            fail: true,
        }
    }

    pub fn published(&self) -> Vec<OrderEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &OrderEvent) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::Internal("broker unavailable".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A search mirror that is always down.
pub struct UnavailableSearchIndex;

#[async_trait]
impl SearchIndex for UnavailableSearchIndex {
    async fn index(&self, _doc: &ProductDocument) -> Result<(), DomainError> {
        Err(DomainError::Internal("search unavailable".to_string()))
    }

    async fn update(&self, _doc: &ProductDocument) -> Result<(), DomainError> {
        Err(DomainError::Internal("search unavailable".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Err(DomainError::Internal("search unavailable".to_string()))
    }

    async fn search(&self, _query: &SearchQuery) -> Result<SearchPage, DomainError> {
        Err(DomainError::Internal("search unavailable".to_string()))
    }

    async fn reindex_all(&self, _docs: &[ProductDocument]) -> Result<(), DomainError> {
        Err(DomainError::Internal("search unavailable".to_string()))
    }
}

/// A cache that never holds anything; counts writes.
#[derive(Default)]
pub struct NullCache {
    pub writes: Mutex<Vec<(String, Duration)>>,
}

#[async_trait]
impl Cache for NullCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, key: &str, _value: String, ttl: Duration) {
        self.writes.lock().unwrap().push((key.to_string(), ttl));
    }
}

/// Full application state over in-memory ports, for handler tests.
pub struct TestApp {
    pub state: AppState,
    pub db: Arc<MemoryDb>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestApp {
    pub fn new() -> Self {
        let db = MemoryDb::new();
        let publisher = Arc::new(RecordingPublisher::default());
        let ports = Ports {
            users: db.clone(),
            projects: db.clone(),
            issues: db.clone(),
            comments: db.clone(),
            teams: db.clone(),
            products: db.clone(),
            orders: db.clone(),
            notifications: db.clone(),
            stats: db.clone(),
            publisher: publisher.clone(),
            search: Arc::new(InMemorySearchIndex::new()),
            cache: Arc::new(MokaCacheStore::new()),
        };
        let state = AppState::new(
            ports,
            JwtService::new("test-secret", 3600),
            ServiceSettings {
                popular_ttl: Duration::from_secs(300),
                bcrypt_cost: 4,
            },
        );
        Self {
            state,
            db,
            publisher,
        }
    }

    /// A seeded user and an `Authorization` header value for them.
    pub fn user_with_token(&self, email: &str) -> (User, String) {
        let user = self.db.seed_user(email);
        let token = self
            .state
            .jwt
            .create_token(user.id, &user.email)
            .unwrap();
        (user, format!("Bearer {}", token))
    }
}
