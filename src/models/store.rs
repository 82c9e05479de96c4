// src/models/store.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Loja Centro")]
    pub name: String,
    #[schema(example = "loja-centro")]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(ignore)]
    pub company_id: Uuid,
    pub user_id: Option<Uuid>,
    // Chave de importação de sistemas externos
    pub external_id: Option<String>,
    #[schema(example = "Maria Souza")]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    // NULL = ativo por tempo indeterminado
    pub active_until: Option<NaiveDate>,
    pub is_busy: bool,
    pub queue_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl Seller {
    pub fn is_active(&self, reference: NaiveDate) -> bool {
        match self.active_until {
            None => true,
            Some(until) => until >= reference,
        }
    }
}

// Versão resumida usada em rankings e dashboards
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&Seller> for SellerRef {
    fn from(seller: &Seller) -> Self {
        Self {
            id: seller.id,
            name: seller.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerCounts {
    pub total: i64,
    pub active: i64,
    pub on_vacation: i64,
}
