// src/db/commission_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::commission::{CommissionLevel, CreateCommissionLevelPayload},
};

#[derive(Clone)]
pub struct CommissionRepository {
    pool: PgPool,
}

impl CommissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Níveis ativos da loja, do menor para o maior limiar de atingimento.
    pub async fn active_levels(&self, store_id: Uuid) -> Result<Vec<CommissionLevel>, AppError> {
        let levels = sqlx::query_as::<_, CommissionLevel>(
            r#"
            SELECT * FROM commission_levels
            WHERE store_id = $1 AND active = true
            ORDER BY achievement_percentage ASC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    pub async fn list(&self, store_id: Uuid) -> Result<Vec<CommissionLevel>, AppError> {
        let levels = sqlx::query_as::<_, CommissionLevel>(
            r#"
            SELECT * FROM commission_levels
            WHERE store_id = $1
            ORDER BY achievement_percentage ASC
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<CommissionLevel>, AppError> {
        let level = sqlx::query_as::<_, CommissionLevel>(
            "SELECT * FROM commission_levels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    pub async fn create(
        &self,
        store_id: Uuid,
        payload: &CreateCommissionLevelPayload,
    ) -> Result<CommissionLevel, AppError> {
        let level = sqlx::query_as::<_, CommissionLevel>(
            r#"
            INSERT INTO commission_levels
                (store_id, name, achievement_percentage, commission_percentage, active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(&payload.name)
        .bind(payload.achievement_percentage)
        .bind(payload.commission_percentage)
        .bind(payload.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // O limiar de atingimento é único por loja
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateCommissionLevel;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(level)
    }

    pub async fn update(&self, level: &CommissionLevel) -> Result<CommissionLevel, AppError> {
        let updated = sqlx::query_as::<_, CommissionLevel>(
            r#"
            UPDATE commission_levels
            SET name = $2, achievement_percentage = $3, commission_percentage = $4, active = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(level.id)
        .bind(&level.name)
        .bind(level.achievement_percentage)
        .bind(level.commission_percentage)
        .bind(level.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateCommissionLevel;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM commission_levels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
