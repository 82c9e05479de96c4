// src/db/store_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::store::{Seller, Store},
    services::ledger::Scope,
};

// Repositório de lojas, vendedores e dados operacionais (escalas, turnos,
// ausências). Tudo que o dashboard precisa além dos fatos de venda.
#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>(
            "SELECT id, company_id, name, slug FROM stores WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    pub async fn find_seller(&self, id: Uuid) -> Result<Option<Seller>, AppError> {
        let seller = sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(seller)
    }

    pub async fn sellers_of_store(&self, store_id: Uuid) -> Result<Vec<Seller>, AppError> {
        let sellers = sqlx::query_as::<_, Seller>(
            "SELECT * FROM sellers WHERE store_id = $1 ORDER BY created_at ASC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sellers)
    }

    /// Resolve um escopo para o conjunto concreto de vendedores.
    /// `None` = sem filtro (escopo global, todos os pedidos).
    pub async fn resolve_scope(&self, scope: &Scope) -> Result<Option<Vec<Uuid>>, AppError> {
        match scope {
            Scope::Seller(id) => Ok(Some(vec![*id])),
            Scope::Store(store_id) => {
                let ids = sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM sellers WHERE store_id = $1",
                )
                .bind(store_id)
                .fetch_all(&self.pool)
                .await?;
                Ok(Some(ids))
            }
            Scope::Global => Ok(None),
        }
    }

    // --- Contagens operacionais do dashboard ---

    pub async fn count_shifts(&self, store_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shifts WHERE store_id = $1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_schedules(&self, store_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM schedules WHERE store_id = $1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_absences(&self, store_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM absences WHERE store_id = $1",
        )
        .bind(store_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Vendedores da loja com ausência cobrindo a data de referência.
    pub async fn sellers_on_vacation(
        &self,
        store_id: Uuid,
        reference: NaiveDate,
    ) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT seller_id
            FROM absences
            WHERE store_id = $1
              AND start_date <= $2
              AND end_date >= $2
            "#,
        )
        .bind(store_id)
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Primeira data com pelo menos uma escala dentro do horizonte,
    /// junto com o número de vendedores escalados nesse dia.
    pub async fn next_scheduled_day(
        &self,
        store_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<(NaiveDate, i64)>, AppError> {
        let row = sqlx::query_as::<_, (NaiveDate, i64)>(
            r#"
            SELECT work_date, COUNT(*)
            FROM schedules
            WHERE store_id = $1 AND work_date BETWEEN $2 AND $3
            GROUP BY work_date
            ORDER BY work_date ASC
            LIMIT 1
            "#,
        )
        .bind(store_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Dias de trabalho agendados por vendedor dentro da janela.
    pub async fn scheduled_days_by_seller(
        &self,
        store_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(Uuid, i64)>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT seller_id, COUNT(DISTINCT work_date)
            FROM schedules
            WHERE store_id = $1 AND work_date BETWEEN $2 AND $3
            GROUP BY seller_id
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total de ajustes manuais (crédito/débito) por vendedor na janela.
    pub async fn adjustments_by_seller(
        &self,
        store_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(Uuid, rust_decimal::Decimal)>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, rust_decimal::Decimal)>(
            r#"
            SELECT seller_id, COALESCE(SUM(amount), 0)
            FROM adjustments
            WHERE store_id = $1 AND created_at::date BETWEEN $2 AND $3
            GROUP BY seller_id
            "#,
        )
        .bind(store_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
