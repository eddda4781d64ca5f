use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Internal(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

/// One requested line: which product and how many.
#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A priced line ready to be persisted; `unit_price` is the catalog price at
/// the time of ordering.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub lines: Vec<OrderLineInput>,
    pub total_amount: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

/// Reject empty orders and non-positive quantities before touching storage.
pub fn validate_items(items: &[OrderItemRequest]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::Validation(
            "items must contain at least 1 element".to_string(),
        ));
    }
    if let Some(bad) = items.iter().find(|i| i.quantity <= 0) {
        return Err(DomainError::Validation(format!(
            "quantity for product {} must be a positive integer",
            bad.product_id
        )));
    }
    Ok(())
}

/// Distinct product ids in request order.
pub fn distinct_product_ids(items: &[OrderItemRequest]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|i| i.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Price every requested line against the fetched ACTIVE products.
///
/// `active` must be the result of looking up the distinct requested ids
/// filtered to ACTIVE; any id missing from it means the product is unknown or
/// inactive, and the whole order is rejected.
pub fn price_order(
    items: &[OrderItemRequest],
    active: &[Product],
) -> Result<PricedOrder, DomainError> {
    let requested = distinct_product_ids(items);
    let prices: HashMap<Uuid, &BigDecimal> = active.iter().map(|p| (p.id, &p.price)).collect();

    if requested.iter().any(|id| !prices.contains_key(id)) {
        return Err(DomainError::not_found(
            "Product",
            "One or more products not found or inactive",
        ));
    }

    let mut total_amount = BigDecimal::from(0);
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let unit_price = prices[&item.product_id].clone();
        total_amount += &unit_price * &BigDecimal::from(item.quantity);
        lines.push(OrderLineInput {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price,
        });
    }

    Ok(PricedOrder {
        lines,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductStatus;

    fn product(price: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "p".to_string(),
            description: None,
            category: "c".to_string(),
            brand: "b".to_string(),
            price: BigDecimal::from_str(price).unwrap(),
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn price_order_sums_unit_price_times_quantity() {
        let p = product("10.00");
        let q = product("20.00");
        let items = vec![
            OrderItemRequest {
                product_id: p.id,
                quantity: 2,
            },
            OrderItemRequest {
                product_id: q.id,
                quantity: 1,
            },
        ];

        let priced = price_order(&items, &[p.clone(), q.clone()]).unwrap();

        assert_eq!(priced.total_amount, BigDecimal::from_str("40.00").unwrap());
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].unit_price, p.price);
        assert_eq!(priced.lines[1].unit_price, q.price);
    }

    #[test]
    fn price_order_rejects_missing_product() {
        let p = product("1.00");
        let items = vec![
            OrderItemRequest {
                product_id: p.id,
                quantity: 1,
            },
            OrderItemRequest {
                product_id: Uuid::new_v4(),
                quantity: 1,
            },
        ];

        let err = price_order(&items, &[p]).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { resource: "Product", .. }));
    }

    #[test]
    fn repeated_product_counts_once_for_lookup() {
        let p = product("2.50");
        let items = vec![
            OrderItemRequest {
                product_id: p.id,
                quantity: 1,
            },
            OrderItemRequest {
                product_id: p.id,
                quantity: 3,
            },
        ];

        assert_eq!(distinct_product_ids(&items), vec![p.id]);
        let priced = price_order(&items, &[p]).unwrap();
        assert_eq!(priced.total_amount, BigDecimal::from(10));
        assert_eq!(priced.lines.len(), 2);
    }

    #[test]
    fn validate_items_rejects_empty_and_non_positive() {
        assert!(matches!(
            validate_items(&[]),
            Err(DomainError::Validation(_))
        ));
        let zero = vec![OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity: 0,
        }];
        assert!(matches!(
            validate_items(&zero),
            Err(DomainError::Validation(_))
        ));
    }
}
