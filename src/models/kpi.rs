// src/models/kpi.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{commission::CommissionResult, goal::Goal, store::SellerRef};

// KPIs de um vendedor no mês corrente + metas vigentes.
// Os nomes em snake_case português são contrato com o frontend.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerKpisResponse {
    pub seller: SellerRef,

    pub month: MonthKpis,

    pub goals: Vec<GoalKpis>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthKpis {
    #[schema(example = "12000.00")]
    pub gross_sales: Decimal,

    #[schema(example = "11400.00")]
    pub net_sales: Decimal,

    #[schema(example = "190.00")]
    pub ticket_medio: Decimal,

    #[schema(example = 2.4)]
    pub pa_produtos_atendimento: Decimal,

    pub order_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalKpis {
    #[serde(flatten)]
    pub goal: Goal,

    #[serde(rename = "percentual_atingido")]
    #[schema(example = 30.0)]
    pub percentual_atingido: Decimal,

    pub completed: bool,
    pub overdue: bool,

    #[schema(example = "monthly")]
    pub period: String,

    pub days_total: i64,
    pub days_elapsed: i64,
    pub days_remaining: i64,

    pub commission: CommissionResult,
}

// Bloco extra exposto apenas na rota /beta: recálculo diário e "super meta"
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalKpisBeta {
    #[serde(flatten)]
    pub base: GoalKpis,

    // (meta - atual) / dias restantes; 0 quando não restam dias
    #[schema(example = "233.33")]
    pub recalculated_daily_target: Decimal,

    // Quanto falta para 120% da meta
    #[schema(example = "9000.00")]
    pub stretch_gap: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerKpisBetaResponse {
    pub seller: SellerRef,

    pub month: MonthKpis,

    pub goals: Vec<GoalKpisBeta>,
}
