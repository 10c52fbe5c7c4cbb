//! In-memory cart document.
//!
//! A cart is an ordered list of product snapshots with quantities plus an
//! optional coupon. The services load it from the `carts` row, mutate it
//! with the methods below and write it straight back.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Product,
    pricing::{CartTotals, effective_price},
};

/// Display fields of a product captured when it was added, plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    pub discount: f64,
    pub image: String,
    pub category: String,
    pub description: String,
    pub quantity: i32,
}

impl CartItem {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            discount: product.discount,
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            quantity: 1,
        }
    }

    pub fn unit_price(&self) -> f64 {
        effective_price(self.price, self.discount)
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub coupon: Option<AppliedCoupon>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>, coupon: Option<AppliedCoupon>) -> Self {
        Self { items, coupon }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit. A product already in the cart keeps its position.
    pub fn add_product(&mut self, product: &Product) -> AppResult<()> {
        match self.find_mut(product.id) {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| AppError::BadRequest("quantity is too large".into()))?;
            }
            None => self.items.push(CartItem::from_product(product)),
        }
        Ok(())
    }

    /// Sets the quantity of a line; zero or less drops the line.
    /// Returns `false` when the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        match self.find_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// `None` clears whatever coupon was applied.
    pub fn apply_coupon(&mut self, coupon: Option<AppliedCoupon>) {
        self.coupon = coupon;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from_subtotal(
            self.item_count(),
            self.subtotal(),
            self.coupon.as_ref().map(|coupon| coupon.discount),
        )
    }

    fn find_mut(&mut self, product_id: Uuid) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }
}
