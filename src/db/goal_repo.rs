// src/db/goal_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::DateRange},
    models::goal::{CreateGoalPayload, Goal, GoalScope},
};

#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateGoalPayload) -> Result<Goal, AppError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (seller_id, store_id, goal_scope, start_date, end_date, target_value)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.seller_id)
        .bind(payload.store_id)
        .bind(payload.goal_scope)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.target_value)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Goal>, AppError> {
        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(goal)
    }

    pub async fn list(&self) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }

    pub async fn update(
        &self,
        id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        target_value: Decimal,
    ) -> Result<Goal, AppError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET start_date = $2, end_date = $3, target_value = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date)
        .bind(target_value)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Metas cuja janela contém a data de referência.
    pub async fn active_at(&self, reference: NaiveDate) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT * FROM goals
            WHERE start_date <= $1 AND end_date >= $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    /// Metas individuais dos vendedores informados cuja janela intersecta a
    /// janela pedida, em ordem de criação (o "primeiro" de cada vendedor é o
    /// que vale para o ranking).
    pub async fn individual_goals_overlapping(
        &self,
        seller_ids: &[Uuid],
        range: &DateRange,
    ) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT * FROM goals
            WHERE goal_scope = $1
              AND seller_id = ANY($2)
              AND start_date <= $4
              AND end_date >= $3
            ORDER BY created_at ASC
            "#,
        )
        .bind(GoalScope::Individual)
        .bind(seller_ids)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    /// Metas do vendedor cuja janela contém a data de referência.
    pub async fn seller_goals_active_at(
        &self,
        seller_id: Uuid,
        reference: NaiveDate,
    ) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT * FROM goals
            WHERE seller_id = $1
              AND start_date <= $2 AND end_date >= $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(seller_id)
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    /// Metas ativas vinculadas à loja (diretamente ou via vendedor).
    pub async fn store_goals_active_at(
        &self,
        store_id: Uuid,
        reference: NaiveDate,
    ) -> Result<Vec<Goal>, AppError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT g.* FROM goals g
            LEFT JOIN sellers s ON g.seller_id = s.id
            WHERE (g.store_id = $1 OR s.store_id = $1)
              AND g.start_date <= $2 AND g.end_date >= $2
            ORDER BY g.created_at ASC
            "#,
        )
        .bind(store_id)
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        Ok(goals)
    }

    /// Grava o cache `current_value` recalculado.
    pub async fn update_current_value(&self, id: Uuid, value: Decimal) -> Result<(), AppError> {
        sqlx::query("UPDATE goals SET current_value = $1 WHERE id = $2")
            .bind(value)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Loja de um vendedor (para resolver escopo store_wide via vendedor).
    pub async fn store_of_seller(&self, seller_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let store_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT store_id FROM sellers WHERE id = $1",
        )
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store_id)
    }
}
