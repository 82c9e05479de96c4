// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::sales::{CreateOrderPayload, Order},
};

// POST /api/stores/{slug}/orders
// Entrada manual de pedidos. Depois de persistir, o recálculo das metas
// vigentes é chamado EXPLICITAMENTE — nada de gancho escondido de
// persistência.
#[utoipa::path(
    post,
    path = "/api/stores/{slug}/orders",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    params(("slug" = String, Path, description = "Slug da loja")),
    responses(
        (status = 201, description = "Pedido registrado e metas recalculadas", body = Order),
        (status = 400, description = "Campos inválidos"),
        (status = 404, description = "Loja ou vendedor não encontrado"),
        (status = 409, description = "external_id duplicado na loja")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let store = app_state
        .store_repo
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::StoreNotFound)?;

    // O vendedor precisa existir E pertencer à loja do pedido
    let seller = app_state
        .store_repo
        .find_seller(payload.seller_id)
        .await?
        .ok_or(AppError::SellerNotFound)?;
    if seller.store_id != store.id {
        return Err(AppError::SellerNotFound);
    }

    let order = app_state.order_repo.create_with_items(store.id, &payload).await?;

    // Efeito colateral do caminho de escrita: re-soma integral de toda meta
    // cuja janela contém hoje
    let reference = Utc::now().date_naive();
    app_state
        .goal_service
        .refresh_goals_for_date(reference)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}
