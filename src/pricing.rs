//! Discount arithmetic shared by the catalog, the cart and checkout.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Price after the product's own discount: `price * (1 - discount / 100)`.
pub fn effective_price(price: f64, discount_percent: f64) -> f64 {
    price * (1.0 - discount_percent / 100.0)
}

/// `percent` of `amount`.
pub fn percent_of(amount: f64, percent: f64) -> f64 {
    amount * (percent / 100.0)
}

/// Rejects anything that is not a finite percentage in `[0, 100]`.
pub fn validate_percentage(value: f64, field: &str) -> AppResult<f64> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(AppError::BadRequest(format!(
            "{field} must be between 0 and 100"
        )));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CartTotals {
    pub item_count: i64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl CartTotals {
    /// Totals for a subtotal with an optional coupon percentage on top.
    pub fn from_subtotal(item_count: i64, subtotal: f64, coupon_percent: Option<f64>) -> Self {
        let discount = coupon_percent
            .map(|percent| percent_of(subtotal, percent))
            .unwrap_or(0.0);
        Self {
            item_count,
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}
