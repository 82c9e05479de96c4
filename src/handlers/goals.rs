// src/handlers/goals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::goal::{CreateGoalPayload, GoalView, UpdateGoalPayload},
};

// POST /api/goals
#[utoipa::path(
    post,
    path = "/api/goals",
    tag = "Metas",
    request_body = CreateGoalPayload,
    responses(
        (status = 201, description = "Meta criada com o cache já recalculado", body = GoalView),
        (status = 400, description = "Campos inválidos")
    )
)]
pub async fn create_goal(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let goal = app_state.goal_service.create(payload, reference).await?;

    Ok((StatusCode::CREATED, Json(goal)))
}

// GET /api/goals
#[utoipa::path(
    get,
    path = "/api/goals",
    tag = "Metas",
    responses(
        (status = 200, description = "Todas as metas com campos derivados", body = Vec<GoalView>)
    )
)]
pub async fn list_goals(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let goals = app_state.goal_service.list(reference).await?;

    Ok((StatusCode::OK, Json(goals)))
}

// GET /api/goals/{id}
#[utoipa::path(
    get,
    path = "/api/goals/{id}",
    tag = "Metas",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 200, description = "Meta com campos derivados", body = GoalView),
        (status = 404, description = "Meta não encontrada")
    )
)]
pub async fn get_goal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let goal = app_state.goal_service.get(id, reference).await?;

    Ok((StatusCode::OK, Json(goal)))
}

// PUT /api/goals/{id}
#[utoipa::path(
    put,
    path = "/api/goals/{id}",
    tag = "Metas",
    request_body = UpdateGoalPayload,
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 200, description = "Meta atualizada e recalculada", body = GoalView),
        (status = 404, description = "Meta não encontrada")
    )
)]
pub async fn update_goal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalPayload>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let goal = app_state.goal_service.update(id, payload, reference).await?;

    Ok((StatusCode::OK, Json(goal)))
}

// DELETE /api/goals/{id}
#[utoipa::path(
    delete,
    path = "/api/goals/{id}",
    tag = "Metas",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 204, description = "Meta removida"),
        (status = 404, description = "Meta não encontrada")
    )
)]
pub async fn delete_goal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.goal_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/goals/recalculate
// Recalcula sob demanda toda meta cuja janela contém hoje. Idempotente:
// rodar duas vezes seguidas produz os mesmos valores.
#[utoipa::path(
    post,
    path = "/api/goals/recalculate",
    tag = "Metas",
    responses(
        (status = 200, description = "Quantidade de metas recalculadas")
    )
)]
pub async fn recalculate_goals(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let reference = Utc::now().date_naive();

    let refreshed = app_state
        .goal_service
        .refresh_goals_for_date(reference)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "refreshed": refreshed }))))
}
