use receipt_core::{AppError, NewReceipt, Receipt};
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

/// Trait for receipt repository operations
/// This abstracts the database implementation (PostgreSQL)
#[async_trait::async_trait]
pub trait ReceiptRepositoryTrait: Send + Sync {
    /// Store a new receipt. Identity and timestamps are assigned here.
    async fn save(&self, receipt: NewReceipt) -> Result<Receipt, AppError>;

    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>, AppError>;

    /// Newest transaction date first
    async fn list_receipts(&self, limit: i64, offset: i64) -> Result<Vec<Receipt>, AppError>;

    async fn count_receipts(&self) -> Result<i64, AppError>;

    /// Round trip to the database, for health checks
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PostgresReceiptRepository {
    pool: PgPool,
}

impl PostgresReceiptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReceiptRepositoryTrait for PostgresReceiptRepository {
    #[tracing::instrument(skip(self, receipt), fields(
        db.system = "postgresql",
        db.table = "receipts",
        db.operation = "insert",
        receipt.id = tracing::field::Empty
    ))]
    async fn save(&self, receipt: NewReceipt) -> Result<Receipt, AppError> {
        let id = Uuid::new_v4();
        tracing::Span::current().record("receipt.id", tracing::field::display(id));

        let saved = sqlx::query_as::<Postgres, Receipt>(
            r#"
            INSERT INTO receipts (
                id, transaction_date, store_name, items, total_amount,
                payer, payment_method, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, transaction_date, store_name, items, total_amount,
                      payer, payment_method, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(receipt.transaction_date)
        .bind(&receipt.store_name)
        .bind(&receipt.items)
        .bind(receipt.total_amount)
        .bind(&receipt.payer)
        .bind(&receipt.payment_method)
        .bind(&receipt.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = ?e,
                receipt_id = %id,
                transaction_date = %receipt.transaction_date,
                "Failed to insert receipt"
            );
            AppError::from(e)
        })?;

        Ok(saved)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "receipts",
        db.operation = "select"
    ))]
    async fn get_receipt(&self, id: Uuid) -> Result<Option<Receipt>, AppError> {
        let receipt = sqlx::query_as::<Postgres, Receipt>(
            r#"
            SELECT id, transaction_date, store_name, items, total_amount,
                   payer, payment_method, image_url, created_at, updated_at
            FROM receipts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "receipts",
        db.operation = "select"
    ))]
    async fn list_receipts(&self, limit: i64, offset: i64) -> Result<Vec<Receipt>, AppError> {
        let receipts = sqlx::query_as::<Postgres, Receipt>(
            r#"
            SELECT id, transaction_date, store_name, items, total_amount,
                   payer, payment_method, image_url, created_at, updated_at
            FROM receipts
            ORDER BY transaction_date DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "receipts",
        db.operation = "count"
    ))]
    async fn count_receipts(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create the receipt repository backed by the given pool
pub fn create_receipt_repository(pool: PgPool) -> Arc<dyn ReceiptRepositoryTrait> {
    tracing::info!("Initializing PostgreSQL receipt repository");
    Arc::new(PostgresReceiptRepository::new(pool))
}
