// src/models/commission.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um degrau da escada de comissão: "atingiu >= X% da meta, comissão de Y%"
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionLevel {
    pub id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(example = "Prata")]
    pub name: String,
    #[schema(example = "90.00")]
    pub achievement_percentage: Decimal,
    #[schema(example = "4.50")]
    pub commission_percentage: Decimal,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

// Resultado da resolução: taxa aplicada e valor em reais
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResult {
    #[schema(example = 4.5)]
    pub percentage: Decimal,
    #[schema(example = "225.00")]
    pub amount: Decimal,
}

// --- Payloads de CRUD ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommissionLevelPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Prata")]
    pub name: String,

    #[validate(custom(function = "validate_percentage"))]
    #[schema(example = "90.00")]
    pub achievement_percentage: Decimal,

    #[validate(custom(function = "validate_percentage"))]
    #[schema(example = "4.50")]
    pub commission_percentage: Decimal,

    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommissionLevelPayload {
    pub name: Option<String>,

    #[validate(custom(function = "validate_percentage"))]
    pub achievement_percentage: Option<Decimal>,

    #[validate(custom(function = "validate_percentage"))]
    pub commission_percentage: Option<Decimal>,

    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn validate_percentage(val: &Decimal) -> Result<(), validator::ValidationError> {
    if val <= &Decimal::ZERO || val > &Decimal::ONE_HUNDRED {
        let mut err = validator::ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &100.0);
        err.message = Some("O percentual deve estar entre 0 (exclusivo) e 100.".into());
        return Err(err);
    }
    Ok(())
}
