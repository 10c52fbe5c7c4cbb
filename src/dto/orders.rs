use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub pincode: String,
}

/// What the order success page shows; carries no customer details.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderConfirmation {
    pub id: Uuid,
    pub item_count: i64,
    pub coupon_applied: Option<String>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderConfirmation {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            item_count: order.items.iter().map(|i| i64::from(i.quantity)).sum(),
            coupon_applied: order.coupon_applied.clone(),
            total_price: order.total_price,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
