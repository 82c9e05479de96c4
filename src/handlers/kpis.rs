// src/handlers/kpis.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::kpi::{SellerKpisBetaResponse, SellerKpisResponse},
};

// GET /api/sellers/{id}/kpis
#[utoipa::path(
    get,
    path = "/api/sellers/{id}/kpis",
    tag = "KPIs",
    params(
        ("id" = Uuid, Path, description = "ID do vendedor")
    ),
    responses(
        (status = 200, description = "KPIs do vendedor no mês corrente", body = SellerKpisResponse),
        (status = 404, description = "Vendedor não encontrado")
    )
)]
pub async fn seller_kpis(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let kpis = app_state.goal_service.seller_kpis(id, reference).await?;

    Ok((StatusCode::OK, Json(kpis)))
}

// GET /api/beta/sellers/{id}/kpis
// Variante com o bloco de alvo diário recalculado e super meta.
#[utoipa::path(
    get,
    path = "/api/beta/sellers/{id}/kpis",
    tag = "KPIs",
    params(
        ("id" = Uuid, Path, description = "ID do vendedor")
    ),
    responses(
        (status = 200, description = "KPIs do vendedor (formato beta)", body = SellerKpisBetaResponse),
        (status = 404, description = "Vendedor não encontrado")
    )
)]
pub async fn seller_kpis_beta(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let kpis = app_state.goal_service.seller_kpis_beta(id, reference).await?;

    Ok((StatusCode::OK, Json(kpis)))
}
