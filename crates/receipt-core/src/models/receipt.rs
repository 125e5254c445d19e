use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A stored receipt.
///
/// Identity and timestamps only exist once the repository has saved the
/// record; before that the workflow works with [`NewReceipt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    #[serde(rename = "date")]
    pub transaction_date: NaiveDate,
    #[serde(rename = "store")]
    pub store_name: String,
    pub items: String,
    pub total_amount: i64,
    pub payer: String,
    pub payment_method: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    /// Attach identity and timestamps to a draft.
    pub fn from_new(new: NewReceipt, id: Uuid, saved_at: DateTime<Utc>) -> Self {
        Self {
            id,
            transaction_date: new.transaction_date,
            store_name: new.store_name,
            items: new.items,
            total_amount: new.total_amount,
            payer: new.payer,
            payment_method: new.payment_method,
            image_url: new.image_url,
            created_at: saved_at,
            updated_at: saved_at,
        }
    }
}

/// A fully-formed receipt that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReceipt {
    pub transaction_date: NaiveDate,
    pub store_name: String,
    pub items: String,
    pub total_amount: i64,
    pub payer: String,
    pub payment_method: String,
    pub image_url: String,
}

/// Pagination parameters for listing receipts
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListReceiptsQuery {
    /// Page size (1-100, default 20)
    pub limit: Option<i64>,
    /// Number of receipts to skip (default 0)
    pub offset: Option<i64>,
}

impl ListReceiptsQuery {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptListResponse {
    pub receipts: Vec<Receipt>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
