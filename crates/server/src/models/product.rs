//! Catalog product types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sentra_core::{ProductId, ProductType, Rupiah};

/// A catalog product.
///
/// `items` lists bundle contents and is only meaningful for
/// [`ProductType::Paket`]. Nothing enforces that.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub price: Rupiah,
    pub description: Option<String>,
    pub image: Option<String>,
    pub items: Option<Vec<String>>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable product fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub product_type: ProductType,
    pub price: Rupiah,
    pub description: Option<String>,
    pub image: Option<String>,
    pub items: Option<Vec<String>>,
    /// `None` keeps the current value on update and means active on create.
    pub is_active: Option<bool>,
    pub sort_order: i32,
}
