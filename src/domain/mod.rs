pub mod comment;
pub mod errors;
pub mod events;
pub mod issue;
pub mod notification;
pub mod order;
pub mod ports;
pub mod product;
pub mod project;
pub mod stats;
pub mod team;
pub mod user;

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{ser, Serializer};

/// Render a money amount with exactly two fraction digits, e.g. `"100.00"`.
pub fn format_amount(amount: &BigDecimal) -> String {
    amount.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

/// Rows to skip for a 1-based `page`. Saturates instead of overflowing on
/// absurd page numbers.
pub fn page_offset(page: i64, size: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(size.max(0))
}

/// `serialize_with` helper writing a money amount as a JSON number rounded to
/// cents, e.g. `199.98`.
pub fn serialize_amount<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let cents = format_amount(amount);
    let value: f64 = cents
        .parse()
        .map_err(|_| <S::Error as ser::Error>::custom(format!("amount {} is not finite", cents)))?;
    serializer.serialize_f64(value)
}
