// src/models/ranking.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{commission::CommissionResult, store::SellerRef};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub period: RankingWindow,
    pub ranking: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    #[schema(example = 1)]
    pub position: i64,

    pub seller: SellerRef,

    pub sales: SalesComparison,

    pub goal: GoalAchievement,

    pub commission: CommissionResult,

    // Posição anterior menos a atual: positivo = subiu no ranking
    #[serde(rename = "position_evolution")]
    pub position_evolution: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesComparison {
    #[schema(example = "7000.00")]
    pub current: Decimal,
    #[schema(example = "5000.00")]
    pub previous: Decimal,
    // (atual - anterior) / anterior * 100; 0 quando anterior é 0
    #[schema(example = 40.0)]
    pub evolution: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalAchievement {
    #[schema(example = "10000.00")]
    pub target: Decimal,

    #[serde(rename = "percentual_atingido")]
    #[schema(example = 70.0)]
    pub percentual_atingido: Decimal,
}
