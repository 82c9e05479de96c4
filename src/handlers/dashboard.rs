// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::DashboardResponse,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DashboardQuery {
    // current-month | all-time | YYYY-MM; ausente = último ano corrido
    pub period: Option<String>,
}

// GET /api/stores/{slug}/dashboard
#[utoipa::path(
    get,
    path = "/api/stores/{slug}/dashboard",
    tag = "Dashboard",
    params(
        ("slug" = String, Path, description = "Slug da loja"),
        DashboardQuery
    ),
    responses(
        (status = 200, description = "Resumo completo da loja", body = DashboardResponse),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn store_dashboard(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let dashboard = app_state
        .dashboard_service
        .store_dashboard(&slug, query.period.as_deref(), reference)
        .await?;

    Ok((StatusCode::OK, Json(dashboard)))
}
