// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{commission::CommissionResult, store::{SellerCounts, SellerRef, Store}};

// Envelope completo do dashboard da loja. As chaves estruturais são
// camelCase; as métricas mantêm os nomes em snake_case português que o
// frontend já consome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub store: Store,

    pub sellers: SellerCounts,

    pub shifts: i64,
    pub schedules: i64,
    pub absences: i64,

    pub next_schedule: Option<NextSchedule>,

    // Vendas líquidas em quatro granularidades
    pub sales: SalesTotals,
    pub order_count: OrderCounts,

    pub metrics: MetricsByGranularity,

    pub targets: GoalTargetsSummary,

    pub sales_potential: SalesPotential,

    // Top 3 do ano por vendas brutas
    pub top_sellers: Vec<SellerAnnualRow>,
    pub sellers_annual_data: Vec<SellerAnnualRow>,

    pub monthly_sales: Vec<MonthlyNetSales>,

    pub best_seller_week: Option<BestSellerWeek>,

    pub goals: Vec<crate::models::goal::GoalView>,

    pub period: AppliedPeriod,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Primeiro dia, a partir de amanhã, com pelo menos uma escala
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextSchedule {
    pub date: NaiveDate,
    #[schema(example = 3)]
    pub headcount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub today: Decimal,
    pub current_week: Decimal,
    pub current_month: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCounts {
    pub today: i64,
    pub current_week: i64,
    pub current_month: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsByGranularity {
    pub today: SalesMetrics,
    pub current_week: SalesMetrics,
    pub current_month: SalesMetrics,
    pub total: SalesMetrics,
}

// Contrato com o frontend: nomes não mudam
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SalesMetrics {
    #[schema(example = "11400.00")]
    pub net_sales: Decimal,
    #[schema(example = "190.00")]
    pub ticket_medio: Decimal,
    #[schema(example = 2.4)]
    pub pa_produtos_atendimento: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GoalTargetsSummary {
    #[schema(example = "20000.00")]
    pub target_total: Decimal,
    #[schema(example = "11400.00")]
    pub current_month_sales: Decimal,
    #[schema(example = 57.0)]
    pub percentual_atingido: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesPotential {
    #[schema(example = "48000.00")]
    pub potential: Decimal,
    #[schema(example = "2000.00")]
    pub best_seller_average: Decimal,
    #[schema(example = 72)]
    pub total_work_days: i64,
    pub best_seller: Option<SellerRef>,
}

// Uma linha por vendedor ativo, janela anual do dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerAnnualRow {
    pub seller: SellerRef,

    #[schema(example = "52000.00")]
    pub sales: Decimal,

    #[serde(rename = "net_sales")]
    pub net_sales: Decimal,

    #[serde(rename = "ticket_medio")]
    pub ticket_medio: Decimal,

    #[serde(rename = "pa_produtos_atendimento")]
    pub pa_produtos_atendimento: Decimal,

    pub days_worked: i64,

    pub returns_value: Decimal,
    pub exchanges_value: Decimal,
    pub adjustments_value: Decimal,

    pub potential: Decimal,

    pub commission: CommissionResult,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyNetSales {
    #[schema(example = 3)]
    pub month: u32,

    #[serde(rename = "net_sales")]
    pub net_sales: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestSellerWeek {
    pub seller: SellerRef,
    #[schema(example = "7000.00")]
    pub sales: Decimal,
}
