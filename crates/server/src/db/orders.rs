//! Order repository.
//!
//! Reads and writes take an optional office scope. `None` means all orders;
//! `Some(offices)` restricts to orders whose `kelompok` is in the list.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use sentra_core::{OrderId, OrderStatus, Rupiah};

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

const ORDER_COLUMNS: &str = "id, order_number, customer_name, whatsapp_number, kelompok, items, \
                             total_amount, status, notes, wa_sent, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    customer_name: String,
    whatsapp_number: String,
    kelompok: String,
    items: Json<Vec<OrderItem>>,
    total_amount: i64,
    status: OrderStatus,
    notes: Option<String>,
    wa_sent: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            customer_name: row.customer_name,
            whatsapp_number: row.whatsapp_number,
            kelompok: row.kelompok,
            items: row.items.0,
            total_amount: Rupiah::new(row.total_amount),
            status: row.status,
            notes: row.notes,
            wa_sent: row.wa_sent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn scope_param(scope: Option<&[String]>) -> Option<Vec<String>> {
    scope.map(<[String]>::to_vec)
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, scope: Option<&[String]>) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE $1::text[] IS NULL OR kelompok = ANY($1)
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(scope_param(scope))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one order by ID, honouring the scope.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: OrderId,
        scope: Option<&[String]>,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE id = $1 AND ($2::text[] IS NULL OR kelompok = ANY($2))
            "
        ))
        .bind(id.as_i32())
        .bind(scope_param(scope))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Exact lookup by order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new order with status `pending` and `wa_sent = false`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails, including a
    /// collision on the order number.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (order_number, customer_name, whatsapp_number, kelompok, items, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.order_number.as_str())
        .bind(&order.customer_name)
        .bind(&order.whatsapp_number)
        .bind(&order.kelompok)
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Record that the confirmation message went out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_wa_sent(&self, order_number: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE orders SET wa_sent = TRUE, updated_at = NOW() WHERE order_number = $1")
            .bind(order_number)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Update status and/or notes.
    ///
    /// `notes` is tri-state: `None` leaves it, `Some(None)` clears it.
    /// Returns whether an order in scope was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        notes: Option<Option<String>>,
        scope: Option<&[String]>,
    ) -> Result<bool, RepositoryError> {
        let (set_notes, notes) = match notes {
            Some(value) => (true, value),
            None => (false, None),
        };

        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = COALESCE($2, status),
                notes = CASE WHEN $3 THEN $4 ELSE notes END,
                updated_at = NOW()
            WHERE id = $1 AND ($5::text[] IS NULL OR kelompok = ANY($5))
            ",
        )
        .bind(id.as_i32())
        .bind(status)
        .bind(set_notes)
        .bind(notes)
        .bind(scope_param(scope))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete orders by ID. Returns how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(
        &self,
        ids: &[OrderId],
        scope: Option<&[String]>,
    ) -> Result<u64, RepositoryError> {
        let ids: Vec<i32> = ids.iter().map(OrderId::as_i32).collect();

        let result = sqlx::query(
            r"
            DELETE FROM orders
            WHERE id = ANY($1) AND ($2::text[] IS NULL OR kelompok = ANY($2))
            ",
        )
        .bind(ids)
        .bind(scope_param(scope))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
