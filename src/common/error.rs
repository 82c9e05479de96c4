// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// "Não encontrado" é distinto de "calculado como zero": venda zero é um
// resultado válido, nunca um erro.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Loja não encontrada")]
    StoreNotFound,

    #[error("Vendedor não encontrado")]
    SellerNotFound,

    #[error("Meta não encontrada")]
    GoalNotFound,

    #[error("Nível de comissão não encontrado")]
    CommissionLevelNotFound,

    #[error("Pedido duplicado")]
    DuplicateOrder,

    #[error("Nível de comissão duplicado")]
    DuplicateCommissionLevel,

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    #[error("Escopo de meta inconsistente")]
    GoalScopeMismatch,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::StoreNotFound => (StatusCode::NOT_FOUND, "Loja não encontrada."),
            AppError::SellerNotFound => (StatusCode::NOT_FOUND, "Vendedor não encontrado."),
            AppError::GoalNotFound => (StatusCode::NOT_FOUND, "Meta não encontrada."),
            AppError::CommissionLevelNotFound => {
                (StatusCode::NOT_FOUND, "Nível de comissão não encontrado.")
            }
            AppError::DuplicateOrder => {
                (StatusCode::CONFLICT, "Já existe um pedido com este external_id nesta loja.")
            }
            AppError::DuplicateCommissionLevel => {
                (StatusCode::CONFLICT, "Já existe um nível com este percentual de atingimento nesta loja.")
            }
            AppError::InvalidDateRange => {
                (StatusCode::BAD_REQUEST, "A data final deve ser posterior à data inicial.")
            }
            AppError::GoalScopeMismatch => {
                (StatusCode::BAD_REQUEST, "Meta individual exige um vendedor vinculado.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
