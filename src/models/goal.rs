// src/models/goal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "goal_scope", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoalScope {
    Individual, // Meta de um vendedor
    StoreWide,  // Meta da loja inteira
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,

    // NULL + escopo store_wide = meta global (todas as lojas)
    pub seller_id: Option<Uuid>,
    pub store_id: Option<Uuid>,

    #[schema(example = "sales")]
    pub goal_type: String,

    pub goal_scope: GoalScope,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[schema(example = "10000.00")]
    pub target_value: Decimal,

    // Cache das vendas líquidas dentro da janela; recalculado integralmente
    // a cada escrita relevante, nunca por delta incremental.
    #[schema(example = "3000.00")]
    pub current_value: Decimal,

    pub created_at: Option<DateTime<Utc>>,
}

// Visão da meta com os campos derivados que o frontend consome
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,

    // Contrato com o frontend: este nome não muda
    #[serde(rename = "percentual_atingido")]
    #[schema(example = 30.0)]
    pub percentual_atingido: Decimal,

    pub completed: bool,
    pub overdue: bool,
    pub days_remaining: i64,

    #[schema(example = "monthly")]
    pub period: String,
}

// --- Payloads de CRUD ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalPayload {
    pub seller_id: Option<Uuid>,
    pub store_id: Option<Uuid>,

    #[serde(default = "default_goal_scope")]
    pub goal_scope: GoalScope,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "10000.00")]
    pub target_value: Decimal,
}

fn default_goal_scope() -> GoalScope {
    GoalScope::Individual
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalPayload {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_positive"))]
    pub target_value: Option<Decimal>,
}

pub fn validate_positive(val: &Decimal) -> Result<(), validator::ValidationError> {
    if val <= &Decimal::ZERO {
        let mut err = validator::ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor da meta deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}
