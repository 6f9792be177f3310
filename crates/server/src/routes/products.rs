//! Catalog endpoints.
//!
//! Listing is public. Writes require an admin.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use sentra_core::{ProductId, ProductType, Rupiah};

use crate::db::ProductRepository;
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::ProductInput;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/products",
        get(list_products)
            .post(create_product)
            .put(update_product)
            .delete(delete_product),
    )
}

/// A number that admin forms may send as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    /// Integer value, reading strings by their leading digits (`"28000abc"` is 28000).
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) => f.is_finite().then(|| f.trunc() as i64),
            Self::Text(s) => leading_integer(s),
        }
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits.get(..end)?.parse::<i64>().ok().map(|n| sign * n)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRequest {
    id: Option<Numeric>,
    name: Option<String>,
    #[serde(rename = "type")]
    product_type: Option<ProductType>,
    price: Option<Numeric>,
    description: Option<String>,
    image: Option<String>,
    items: Option<Vec<String>>,
    is_active: Option<bool>,
    sort_order: Option<Numeric>,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput> {
        let missing = || AppError::BadRequest("Nama, tipe, dan harga wajib diisi".to_string());

        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(missing)?;
        let product_type = self.product_type.ok_or_else(missing)?;
        let price = self.price.as_ref().and_then(Numeric::to_i64).ok_or_else(missing)?;
        let sort_order = self
            .sort_order
            .as_ref()
            .and_then(Numeric::to_i64)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0);

        Ok(ProductInput {
            name,
            product_type,
            price: Rupiah::new(price),
            description: self.description,
            image: self.image.filter(|i| !i.is_empty()),
            items: self.items.filter(|i| !i.is_empty()),
            is_active: self.is_active,
            sort_order,
        })
    }
}

fn parse_id(raw: Option<&Numeric>) -> Result<ProductId> {
    raw.and_then(Numeric::to_i64)
        .and_then(|n| i32::try_from(n).ok())
        .filter(|n| *n > 0)
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("ID produk tidak valid".to_string()))
}

/// GET /api/products - All products by sort order, inactive ones included.
#[instrument(skip(state))]
async fn list_products(State(state): State<AppState>) -> Result<Json<Value>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(json!({ "success": true, "data": products })))
}

/// POST /api/products - Create a product.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn create_product(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<Json<Value>> {
    let mut input = body.into_input()?;
    if input.is_active.is_none() {
        input.is_active = Some(true);
    }

    let product = ProductRepository::new(state.pool()).create(&input).await?;
    info!(product_id = %product.id, name = %product.name, "Product created");

    Ok(Json(json!({ "success": true, "data": product })))
}

/// PUT /api/products - Replace a product's fields.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn update_product(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<Json<Value>> {
    let id = parse_id(body.id.as_ref())?;
    let input = body.into_input()?;

    let product = ProductRepository::new(state.pool())
        .update(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Produk tidak ditemukan".to_string()))?;
    info!(product_id = %product.id, "Product updated");

    Ok(Json(json!({ "success": true, "data": product })))
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    id: Option<String>,
}

/// DELETE /api/products?id=N - Delete a product.
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn delete_product(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>> {
    let id = parse_id(query.id.map(Numeric::Text).as_ref())?;

    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("Produk tidak ditemukan".to_string()));
    }
    info!(product_id = %id, "Product deleted");

    Ok(Json(json!({ "success": true })))
}
