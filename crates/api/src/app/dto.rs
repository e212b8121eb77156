use chrono::{DateTime, Utc};
use serde::Deserialize;

use relaycrm_core::Entity;
use relaycrm_customers::{Customer, CustomerImportItem};
use relaycrm_orders::Order;
use relaycrm_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Bulk items keep every field optional so one malformed item is reported
/// individually instead of rejecting the whole request body.
#[derive(Debug, Deserialize)]
pub struct BulkCustomerItemRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<BulkCustomerItemRequest> for CustomerImportItem {
    fn from(req: BulkCustomerItemRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreateCustomersRequest {
    pub customers: Vec<BulkCustomerItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    pub order_date: Option<DateTime<Utc>>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn customer_to_json(customer: &Customer) -> serde_json::Value {
    serde_json::json!({
        "id": customer.id().to_string(),
        "name": customer.name(),
        "email": customer.email(),
        "phone": customer.phone(),
    })
}

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id().to_string(),
        "name": product.name(),
        "price_cents": product.price_cents(),
        "stock": product.stock(),
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id().to_string(),
        "customer_id": order.customer_id().to_string(),
        "product_ids": order
            .product_ids()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        "order_date": order.order_date().to_rfc3339(),
        "total_amount_cents": order.total_amount_cents(),
    })
}
