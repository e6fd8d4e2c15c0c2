use std::sync::Arc;

use tracing::instrument;

use crate::data::invoice_repository::InvoiceRepository;
use crate::domain::error::DomainError;
use crate::domain::invoice::{Invoice, InvoiceDraft};

#[derive(Clone)]
pub struct InvoiceService<R: InvoiceRepository + 'static> {
    repo: Arc<R>,
}

impl<R> InvoiceService<R>
where
    R: InvoiceRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Validates the draft, derives `sum` server-side and persists the record.
    /// A validation failure writes nothing.
    #[instrument(skip(self))]
    pub async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, DomainError> {
        let fields = draft.validate()?;
        let invoice = Invoice::new(fields);
        self.repo.insert(invoice).await
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, DomainError> {
        self.repo.list_newest_first().await
    }
}
