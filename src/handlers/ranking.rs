// src/handlers/ranking.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::ranking::RankingResponse,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct RankingQuery {
    // week | month | quarter | year | custom; desconhecido = semana atual
    pub period: Option<String>,
    // Obrigatórios apenas com period=custom
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// GET /api/stores/{slug}/sellers/ranking
#[utoipa::path(
    get,
    path = "/api/stores/{slug}/sellers/ranking",
    tag = "Ranking",
    params(
        ("slug" = String, Path, description = "Slug da loja"),
        RankingQuery
    ),
    responses(
        (status = 200, description = "Ranking de vendedores do período", body = RankingResponse),
        (status = 400, description = "Período custom sem datas"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn sellers_ranking(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let ranking = app_state
        .ranking_service
        .rank_sellers(
            &slug,
            query.period.as_deref(),
            query.start_date,
            query.end_date,
            reference,
        )
        .await?;

    Ok((StatusCode::OK, Json(ranking)))
}
