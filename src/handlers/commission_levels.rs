// src/handlers/commission_levels.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::commission::{
        CommissionLevel, CreateCommissionLevelPayload, UpdateCommissionLevelPayload,
    },
};

// POST /api/stores/{slug}/commission_levels
#[utoipa::path(
    post,
    path = "/api/stores/{slug}/commission_levels",
    tag = "Comissões",
    request_body = CreateCommissionLevelPayload,
    params(("slug" = String, Path, description = "Slug da loja")),
    responses(
        (status = 201, description = "Nível criado", body = CommissionLevel),
        (status = 404, description = "Loja não encontrada"),
        (status = 409, description = "Limiar duplicado na loja")
    )
)]
pub async fn create_level(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateCommissionLevelPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let store = app_state
        .store_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::StoreNotFound)?;

    let level = app_state.commission_repo.create(store.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(level)))
}

// GET /api/stores/{slug}/commission_levels
#[utoipa::path(
    get,
    path = "/api/stores/{slug}/commission_levels",
    tag = "Comissões",
    params(("slug" = String, Path, description = "Slug da loja")),
    responses(
        (status = 200, description = "Níveis da loja em ordem de limiar", body = Vec<CommissionLevel>),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn list_levels(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let store = app_state
        .store_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::StoreNotFound)?;

    let levels = app_state.commission_repo.list(store.id).await?;

    Ok((StatusCode::OK, Json(levels)))
}

// PUT /api/commission_levels/{id}
#[utoipa::path(
    put,
    path = "/api/commission_levels/{id}",
    tag = "Comissões",
    request_body = UpdateCommissionLevelPayload,
    params(("id" = Uuid, Path, description = "ID do nível")),
    responses(
        (status = 200, description = "Nível atualizado", body = CommissionLevel),
        (status = 404, description = "Nível não encontrado"),
        (status = 409, description = "Limiar duplicado na loja")
    )
)]
pub async fn update_level(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCommissionLevelPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut level = app_state
        .commission_repo
        .find(id)
        .await?
        .ok_or(AppError::CommissionLevelNotFound)?;

    if let Some(name) = payload.name {
        level.name = name;
    }
    if let Some(achievement) = payload.achievement_percentage {
        level.achievement_percentage = achievement;
    }
    if let Some(commission) = payload.commission_percentage {
        level.commission_percentage = commission;
    }
    if let Some(active) = payload.active {
        level.active = active;
    }

    let updated = app_state.commission_repo.update(&level).await?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/commission_levels/{id}
#[utoipa::path(
    delete,
    path = "/api/commission_levels/{id}",
    tag = "Comissões",
    params(("id" = Uuid, Path, description = "ID do nível")),
    responses(
        (status = 204, description = "Nível removido"),
        (status = 404, description = "Nível não encontrado")
    )
)]
pub async fn delete_level(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.commission_repo.delete(id).await? {
        return Err(AppError::CommissionLevelNotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
