use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::domain::invoice::Invoice;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persists one invoice in a single statement: the record either lands
    /// whole or not at all. Invoices are never updated or deleted afterwards.
    async fn insert(&self, invoice: Invoice) -> Result<Invoice, DomainError>;
    /// All invoices, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<Invoice>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn insert(&self, invoice: Invoice) -> Result<Invoice, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO invoices
                (id, date, description, quantity, payment_method, currency,
                 invoice_number, vat_percentage, price, sum, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.date)
        .bind(&invoice.description)
        .bind(invoice.quantity)
        .bind(invoice.payment_method)
        .bind(&invoice.currency)
        .bind(&invoice.invoice_number)
        .bind(invoice.vat_percentage)
        .bind(invoice.price)
        .bind(invoice.sum)
        .bind(invoice.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create invoice: {}", e);
            DomainError::Storage(format!("database error: {}", e))
        })?;

        info!(invoice_id = %invoice.id, sum = invoice.sum, "invoice created");
        Ok(invoice)
    }

    async fn list_newest_first(&self) -> Result<Vec<Invoice>, DomainError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, date, description, quantity, payment_method, currency,
                   invoice_number, vat_percentage, price, sum, created_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching invoices: {}", e);
            DomainError::Storage(e.to_string())
        })
    }
}
