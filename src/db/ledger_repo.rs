// src/db/ledger_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::DateRange},
    models::sales::{ExchangeRow, ReturnRow, SaleRow},
};

// Leitura dos fatos de venda (itens, devoluções, trocas) para agregação em
// memória. O filtro de vendedores vem da resolução de escopo; `None` = sem
// filtro (todos os pedidos).
//
// A única escrita deste repositório é a memoização de `return_value`.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Uma linha por item de pedido com `sold_at` dentro da janela.
    pub async fn fetch_sales(
        &self,
        seller_filter: Option<&[Uuid]>,
        range: &DateRange,
    ) -> Result<Vec<SaleRow>, AppError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT o.seller_id, oi.order_id, o.sold_at, oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            WHERE ($1::uuid[] IS NULL OR o.seller_id = ANY($1))
              AND o.sold_at BETWEEN $2 AND $3
            ORDER BY o.sold_at ASC
            "#,
        )
        .bind(seller_filter)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Devoluções atribuídas ao escopo, diretamente via `seller_id` ou pelo
    /// vendedor do pedido original.
    pub async fn fetch_returns(
        &self,
        seller_filter: Option<&[Uuid]>,
        range: &DateRange,
    ) -> Result<Vec<ReturnRow>, AppError> {
        let rows = sqlx::query_as::<_, ReturnRow>(
            r#"
            SELECT r.id,
                   COALESCE(r.seller_id, o.seller_id) AS seller_id,
                   r.product_id,
                   r.quantity_returned,
                   r.return_value,
                   r.processed_at
            FROM returns r
            LEFT JOIN orders o ON r.original_order_id = o.id
            WHERE ($1::uuid[] IS NULL OR COALESCE(r.seller_id, o.seller_id) = ANY($1))
              AND r.processed_at BETWEEN $2 AND $3
            "#,
        )
        .bind(seller_filter)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn fetch_exchanges(
        &self,
        seller_filter: Option<&[Uuid]>,
        range: &DateRange,
    ) -> Result<Vec<ExchangeRow>, AppError> {
        let rows = sqlx::query_as::<_, ExchangeRow>(
            r#"
            SELECT e.id,
                   COALESCE(e.seller_id, o.seller_id) AS seller_id,
                   e.voucher_value,
                   e.is_credit,
                   e.processed_at
            FROM exchanges e
            LEFT JOIN orders o ON e.original_order_id = o.id
            WHERE ($1::uuid[] IS NULL OR COALESCE(e.seller_id, o.seller_id) = ANY($1))
              AND e.processed_at BETWEEN $2 AND $3
            "#,
        )
        .bind(seller_filter)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Preço unitário médio histórico de um produto para um vendedor.
    /// Base da derivação de `return_value` quando ele não veio preenchido.
    pub async fn average_unit_price(
        &self,
        product_id: Uuid,
        seller_id: Uuid,
    ) -> Result<Option<Decimal>, AppError> {
        let avg = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT AVG(oi.unit_price)
            FROM order_items oi
            JOIN orders o ON oi.order_id = o.id
            WHERE oi.product_id = $1 AND o.seller_id = $2
            "#,
        )
        .bind(product_id)
        .bind(seller_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(avg)
    }

    /// Persiste o valor derivado da devolução (memoização: derivado uma vez,
    /// gravado para sempre).
    pub async fn set_return_value(&self, return_id: Uuid, value: Decimal) -> Result<(), AppError> {
        sqlx::query("UPDATE returns SET return_value = $1 WHERE id = $2 AND return_value IS NULL")
            .bind(value)
            .bind(return_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
