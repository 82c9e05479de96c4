// src/db/order_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{CreateOrderPayload, Order},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere o pedido e seus itens na mesma transação. `external_id`
    /// duplicado dentro da loja vira conflito, não erro genérico.
    pub async fn create_with_items(
        &self,
        store_id: Uuid,
        payload: &CreateOrderPayload,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (seller_id, store_id, external_id, sold_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(payload.seller_id)
        .bind(store_id)
        .bind(&payload.external_id)
        .bind(payload.sold_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateOrder;
                }
            }
            AppError::DatabaseError(e)
        })?;

        for item in &payload.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, store_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(store_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }
}
