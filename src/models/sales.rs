// src/models/sales.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub seller_id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(example = "PED-2026-0001")]
    pub external_id: String,
    // Data da venda, granularidade de dia
    pub sold_at: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

// --- Linhas cruas lidas pelo livro-razão (agregadas em memória) ---

// Uma linha por item de pedido dentro da janela
#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub seller_id: Uuid,
    pub order_id: Uuid,
    pub sold_at: NaiveDate,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl SaleRow {
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReturnRow {
    pub id: Uuid,
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub quantity_returned: i32,
    // NULL = ainda não derivado do preço médio histórico
    pub return_value: Option<Decimal>,
    pub processed_at: NaiveDate,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExchangeRow {
    pub id: Uuid,
    pub seller_id: Option<Uuid>,
    pub voucher_value: Decimal,
    pub is_credit: bool,
    pub processed_at: NaiveDate,
}

// --- Entrada manual de pedidos ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "PED-2026-0001")]
    pub external_id: String,

    pub seller_id: Uuid,

    pub sold_at: NaiveDate,

    #[validate(length(min = 1, message = "required"), nested)]
    pub items: Vec<OrderItemPayload>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Option<Uuid>,

    #[validate(range(min = 1, message = "quantity must be positive"))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(custom(function = "validate_non_negative"))]
    #[schema(example = "150.00")]
    pub unit_price: Decimal,
}

fn validate_non_negative(val: &Decimal) -> Result<(), validator::ValidationError> {
    if val.is_sign_negative() {
        let mut err = validator::ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}
