// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::store_dashboard,

        // --- Ranking ---
        handlers::ranking::sellers_ranking,

        // --- KPIs ---
        handlers::kpis::seller_kpis,
        handlers::kpis::seller_kpis_beta,

        // --- Metas ---
        handlers::goals::create_goal,
        handlers::goals::list_goals,
        handlers::goals::get_goal,
        handlers::goals::update_goal,
        handlers::goals::delete_goal,
        handlers::goals::recalculate_goals,

        // --- Comissões ---
        handlers::commission_levels::create_level,
        handlers::commission_levels::list_levels,
        handlers::commission_levels::update_level,
        handlers::commission_levels::delete_level,

        // --- Pedidos ---
        handlers::orders::create_order,
    ),
    components(
        schemas(
            // --- Dashboard ---
            models::dashboard::DashboardResponse,
            models::dashboard::SalesMetrics,
            models::dashboard::SalesPotential,
            models::dashboard::SellerAnnualRow,

            // --- Ranking ---
            models::ranking::RankingResponse,
            models::ranking::RankingEntry,

            // --- KPIs ---
            models::kpi::SellerKpisResponse,
            models::kpi::SellerKpisBetaResponse,

            // --- Metas ---
            models::goal::Goal,
            models::goal::GoalView,
            models::goal::GoalScope,
            models::goal::CreateGoalPayload,
            models::goal::UpdateGoalPayload,

            // --- Comissões ---
            models::commission::CommissionLevel,
            models::commission::CommissionResult,
            models::commission::CreateCommissionLevelPayload,
            models::commission::UpdateCommissionLevelPayload,

            // --- Pedidos ---
            models::sales::Order,
            models::sales::CreateOrderPayload,
            models::sales::OrderItemPayload,

            // --- Base ---
            models::store::Store,
            models::store::Seller,
            models::store::SellerRef,
        )
    ),
    tags(
        (name = "Dashboard", description = "Resumo consolidado por loja"),
        (name = "Ranking", description = "Ranking de vendedores por período"),
        (name = "KPIs", description = "Indicadores por vendedor"),
        (name = "Metas", description = "Metas de venda e recálculo de progresso"),
        (name = "Comissões", description = "Escada de níveis de comissão"),
        (name = "Pedidos", description = "Entrada manual de pedidos"),
    )
)]
pub struct ApiDoc;
