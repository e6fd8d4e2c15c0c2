//! HTTP client for the FluxFinance API: sign-in plus invoice create/list.
//! Wire types are deliberately duplicated from the server so this crate
//! stands alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod error;
mod http_client;

pub use error::FluxClientError;
pub use http_client::FluxClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub quantity: i32,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: f64,
    pub price: f64,
    pub sum: f64,
    pub created_at: DateTime<Utc>,
}

/// The raw create fields. There is no `sum`: the server derives it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    pub date: String,
    pub description: String,
    pub quantity: i64,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: f64,
    pub price: f64,
}

/// Outcome of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIn {
    pub token: String,
    pub user_id: Uuid,
}
