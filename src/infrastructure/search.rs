//! Product search mirror: Elasticsearch over its REST API, plus an in-memory
//! index with the same query semantics.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::SearchIndex;
use crate::domain::product::{ProductDocument, ProductStatus, SearchPage, SearchQuery};

pub const PRODUCTS_INDEX: &str = "products";
/// Elasticsearch's default `index.max_result_window`; `from + size` may not exceed it.
pub const MAX_RESULT_WINDOW: i64 = 10_000;

fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": { "type": "text" },
                "description": { "type": "text" },
                "category": { "type": "keyword" },
                "brand": { "type": "keyword" },
                "price": { "type": "double" },
                "status": { "type": "keyword" },
                "created_at": { "type": "date" }
            }
        }
    })
}

/// Request body for `_search`. Only ACTIVE products are ever returned.
pub fn build_search_body(query: &SearchQuery) -> Value {
    let mut must = Vec::new();
    let mut filter = vec![json!({ "term": { "status": ProductStatus::Active.as_str() } })];

    if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        must.push(json!({
            "multi_match": { "query": q, "fields": ["name^2", "description"] }
        }));
    }
    if let Some(category) = &query.category {
        filter.push(json!({ "term": { "category": category } }));
    }
    if let Some(brand) = &query.brand {
        filter.push(json!({ "term": { "brand": brand } }));
    }
    if query.min_price.is_some() || query.max_price.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(min) = query.min_price {
            range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = query.max_price {
            range.insert("lte".to_string(), json!(max));
        }
        filter.push(json!({ "range": { "price": range } }));
    }

    // Past the result window only the total is requested.
    let (from, size) = if query.offset().saturating_add(query.size) > MAX_RESULT_WINDOW {
        (0, 0)
    } else {
        (query.offset(), query.size)
    };

    json!({
        "from": from,
        "size": size,
        "track_total_hits": true,
        "query": { "bool": { "must": must, "filter": filter } },
        "sort": [{ "created_at": { "order": "desc" } }]
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: Total,
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Total {
    value: i64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: ProductDocument,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
}

pub struct ElasticsearchIndex {
    client: Client,
    node: String,
}

impl ElasticsearchIndex {
    pub fn new(node: &str) -> Self {
        Self {
            client: Client::new(),
            node: node.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.node, PRODUCTS_INDEX, path)
    }

    /// Create the index with its mapping unless it already exists.
    pub async fn ensure_index(&self) -> Result<(), DomainError> {
        let exists = self.client.head(self.url("")).send().await?;
        if exists.status().is_success() {
            return Ok(());
        }

        self.client
            .put(self.url(""))
            .json(&index_mapping())
            .send()
            .await?
            .error_for_status()?;
        log::info!("Created search index '{}'", PRODUCTS_INDEX);
        Ok(())
    }

    async fn drop_index(&self) -> Result<(), DomainError> {
        let response = self.client.delete(self.url("")).send().await?;
        if response.status() != StatusCode::NOT_FOUND {
            response.error_for_status()?;
        }
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn index(&self, doc: &ProductDocument) -> Result<(), DomainError> {
        self.client
            .put(self.url(&format!("/_doc/{}?refresh=true", doc.id)))
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, doc: &ProductDocument) -> Result<(), DomainError> {
        self.client
            .post(self.url(&format!("/_update/{}?refresh=true", doc.id)))
            .json(&json!({ "doc": doc, "doc_as_upsert": true }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let response = self
            .client
            .delete(self.url(&format!("/_doc/{}?refresh=true", id)))
            .send()
            .await?;
        if response.status() != StatusCode::NOT_FOUND {
            response.error_for_status()?;
        }
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, DomainError> {
        let response: SearchResponse = self
            .client
            .post(self.url("/_search"))
            .json(&build_search_body(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(SearchPage {
            data: response.hits.hits.into_iter().map(|h| h.source).collect(),
            total: response.hits.total.value,
            page: query.page,
            size: query.size,
        })
    }

    async fn reindex_all(&self, docs: &[ProductDocument]) -> Result<(), DomainError> {
        self.drop_index().await?;
        self.ensure_index().await?;
        if docs.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for doc in docs {
            body.push_str(&json!({ "index": { "_id": doc.id } }).to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(doc)?);
            body.push('\n');
        }

        let response: BulkResponse = self
            .client
            .post(self.url("/_bulk?refresh=true"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.errors {
            return Err(DomainError::Internal(
                "bulk indexing reported item failures".to_string(),
            ));
        }
        Ok(())
    }
}

/// Search mirror kept in process memory.
#[derive(Default)]
pub struct InMemorySearchIndex {
    docs: RwLock<HashMap<Uuid, ProductDocument>>,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(doc: &ProductDocument, query: &SearchQuery) -> bool {
    if doc.status != ProductStatus::Active.as_str() {
        return false;
    }
    if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        let name = doc.name.to_lowercase();
        let description = doc.description.as_deref().unwrap_or_default().to_lowercase();
        let hit = q
            .split_whitespace()
            .map(str::to_lowercase)
            .any(|term| name.contains(&term) || description.contains(&term));
        if !hit {
            return false;
        }
    }
    if query.category.as_ref().is_some_and(|c| *c != doc.category) {
        return false;
    }
    if query.brand.as_ref().is_some_and(|b| *b != doc.brand) {
        return false;
    }
    if query.min_price.is_some_and(|min| doc.price < min) {
        return false;
    }
    if query.max_price.is_some_and(|max| doc.price > max) {
        return false;
    }
    true
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn index(&self, doc: &ProductDocument) -> Result<(), DomainError> {
        self.docs.write().await.insert(doc.id, doc.clone());
        Ok(())
    }

    async fn update(&self, doc: &ProductDocument) -> Result<(), DomainError> {
        self.index(doc).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.docs.write().await.remove(&id);
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchPage, DomainError> {
        let docs = self.docs.read().await;
        let mut hits: Vec<&ProductDocument> = docs.values().filter(|d| matches(d, query)).collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = hits.len() as i64;
        let data = hits
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.size as usize)
            .cloned()
            .collect();

        Ok(SearchPage {
            data,
            total,
            page: query.page,
            size: query.size,
        })
    }

    async fn reindex_all(&self, docs: &[ProductDocument]) -> Result<(), DomainError> {
        let mut current = self.docs.write().await;
        current.clear();
        current.extend(docs.iter().map(|d| (d.id, d.clone())));
        Ok(())
    }
}
