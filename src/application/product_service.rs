use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, SearchIndex};
use crate::domain::product::{
    NewProduct, Product, ProductChanges, ProductDocument, SearchPage, SearchQuery,
};

use super::run_blocking;

/// Catalog writes go to the database first; the search mirror follows on a
/// best-effort basis.
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    search: Arc<dyn SearchIndex>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, search: Arc<dyn SearchIndex>) -> Self {
        Self { repo, search }
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let repo = self.repo.clone();
        let product = run_blocking(move || repo.create(product)).await?;

        if let Err(e) = self.search.index(&ProductDocument::from(&product)).await {
            log::error!("Failed to index product {}: {}", product.id, e);
        }
        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.list()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, DomainError> {
        let repo = self.repo.clone();
        run_blocking(move || repo.find_by_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Product", id))
    }

    pub async fn update(&self, id: Uuid, changes: ProductChanges) -> Result<Product, DomainError> {
        let repo = self.repo.clone();
        let product = run_blocking(move || repo.update(id, changes))
            .await?
            .ok_or_else(|| DomainError::not_found_id("Product", id))?;

        if let Err(e) = self.search.update(&ProductDocument::from(&product)).await {
            log::error!("Failed to update product {} in search index: {}", id, e);
        }
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let repo = self.repo.clone();
        if !run_blocking(move || repo.delete(id)).await? {
            return Err(DomainError::not_found_id("Product", id));
        }

        if let Err(e) = self.search.delete(id).await {
            log::error!("Failed to remove product {} from search index: {}", id, e);
        }
        Ok(())
    }

    /// Only ACTIVE products are ever returned, whatever the filters.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchPage, DomainError> {
        self.search.search(&query).await
    }

    /// Rebuild the mirror from every stored product; returns how many were
    /// indexed.
    pub async fn reindex(&self) -> Result<usize, DomainError> {
        let repo = self.repo.clone();
        let products = run_blocking(move || repo.list()).await?;
        let docs: Vec<ProductDocument> = products.iter().map(ProductDocument::from).collect();

        self.search.reindex_all(&docs).await?;
        log::info!("Reindexed {} products", docs.len());
        Ok(docs.len())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::product::ProductStatus;
    use crate::infrastructure::search::InMemorySearchIndex;
    use crate::testing::{MemoryDb, UnavailableSearchIndex};

    fn new_product(name: &str, status: ProductStatus) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(format!("A fine {}", name)),
            category: "Furniture".to_string(),
            brand: "Acme".to_string(),
            price: BigDecimal::from_str("49.90").unwrap(),
            status,
        }
    }

    fn query(q: &str) -> SearchQuery {
        SearchQuery {
            q: Some(q.to_string()),
            page: 1,
            size: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn writes_are_mirrored_into_search() {
        let svc = ProductService::new(MemoryDb::new(), Arc::new(InMemorySearchIndex::new()));

        let desk = svc
            .create(new_product("desk", ProductStatus::Active))
            .await
            .unwrap();
        assert_eq!(svc.search(query("desk")).await.unwrap().total, 1);

        svc.update(
            desk.id,
            ProductChanges {
                status: Some(ProductStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(svc.search(query("desk")).await.unwrap().total, 0);

        svc.delete(desk.id).await.unwrap();
        assert!(matches!(
            svc.get(desk.id).await,
            Err(DomainError::NotFound { resource: "Product", .. })
        ));
    }

    #[tokio::test]
    async fn search_outage_does_not_fail_writes() {
        let db = MemoryDb::new();
        let svc = ProductService::new(db.clone(), Arc::new(UnavailableSearchIndex));

        let chair = svc
            .create(new_product("chair", ProductStatus::Active))
            .await
            .unwrap();
        svc.update(
            chair.id,
            ProductChanges {
                name: Some("armchair".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        svc.delete(chair.id).await.unwrap();

        assert!(svc.search(query("chair")).await.is_err());
    }

    #[tokio::test]
    async fn reindex_rebuilds_from_every_row() {
        let db = MemoryDb::new();
        let index = Arc::new(InMemorySearchIndex::new());
        db.seed_product("lamp", BigDecimal::from(12), ProductStatus::Active);
        db.seed_product("sofa", BigDecimal::from(400), ProductStatus::Active);
        db.seed_product("stool", BigDecimal::from(30), ProductStatus::Inactive);
        let svc = ProductService::new(db.clone(), index.clone());
        let everything = SearchQuery {
            page: 1,
            size: 10,
            ..Default::default()
        };
        assert_eq!(svc.search(everything.clone()).await.unwrap().total, 0);

        let count = svc.reindex().await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(svc.search(everything).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn update_of_missing_product_is_not_found() {
        let svc = ProductService::new(MemoryDb::new(), Arc::new(InMemorySearchIndex::new()));
        let err = svc
            .update(Uuid::new_v4(), ProductChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { resource: "Product", .. }));
    }
}
