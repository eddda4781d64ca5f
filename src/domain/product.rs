use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ProductStatus::Active),
            "INACTIVE" => Ok(ProductStatus::Inactive),
            other => Err(DomainError::Validation(format!(
                "status must be one of ACTIVE, INACTIVE (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: BigDecimal,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: BigDecimal,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<BigDecimal>,
    pub status: Option<ProductStatus>,
}

/// Denormalized product as stored in the search mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductDocument {
    fn from(p: &Product) -> Self {
        ProductDocument {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            category: p.category.clone(),
            brand: p.brand.clone(),
            price: p.price.to_f64().unwrap_or_default(),
            status: p.status.as_str().to_string(),
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: i64,
    pub size: i64,
}

impl SearchQuery {
    pub fn offset(&self) -> i64 {
        super::page_offset(self.page, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct SearchPage {
    pub data: Vec<ProductDocument>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}
