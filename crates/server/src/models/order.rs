//! Order types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sentra_core::{OrderId, OrderNumber, OrderStatus, ProductId, ProductType, Rupiah};

/// One line of an order.
///
/// This is a snapshot taken at checkout: product name, type, price and
/// bundle contents are copied so later catalog edits do not change
/// historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_type: ProductType,
    pub quantity: i64,
    /// Unit price for `satuan`, bundle price for `paket`.
    pub price: Rupiah,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl OrderItem {
    /// Amount shown for this line in customer messages.
    ///
    /// Bundles show their captured price as-is; unit items are multiplied
    /// by quantity.
    #[must_use]
    pub const fn line_total(&self) -> Rupiah {
        match self.product_type {
            ProductType::Paket => self.price,
            ProductType::Satuan => self.price.times(self.quantity),
        }
    }
}

/// A stored order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_name: String,
    /// Free-form, exactly as the customer typed it.
    pub whatsapp_number: String,
    pub kelompok: String,
    pub items: Vec<OrderItem>,
    /// Client-submitted total. Never recomputed server-side.
    pub total_amount: Rupiah,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub wa_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new order. Status starts as `pending` and `wa_sent` as false.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub customer_name: String,
    pub whatsapp_number: String,
    pub kelompok: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Rupiah,
}

/// Customer-facing view of an order for public lookups.
///
/// Omits internal ids, the phone number, group, notes and the notification flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_number: String,
    pub customer_name: String,
    pub items: Vec<OrderSummaryItem>,
    pub total_amount: Rupiah,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryItem {
    pub product_name: String,
    pub quantity: i64,
    pub price: Rupiah,
    pub product_type: ProductType,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            order_number: order.order_number,
            customer_name: order.customer_name,
            items: order
                .items
                .into_iter()
                .map(|item| OrderSummaryItem {
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                    product_type: item.product_type,
                })
                .collect(),
            total_amount: order.total_amount,
            status: order.status,
            created_at: order.created_at,
        }
    }
}
