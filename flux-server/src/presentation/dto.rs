use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceDraft, RawNumber};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub success: bool,
    pub token: String,
    pub user_id: Uuid,
}

/// The eight raw invoice fields. There is no `sum` here on purpose: anything
/// the client claims for it is dropped and the server derives its own.
/// Numeric fields decode leniently so an absent or mistyped value surfaces
/// as a named validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub quantity: RawNumber<i64>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vat_percentage: RawNumber<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: RawNumber<f64>,
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<RawNumber<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => RawNumber::Absent,
        Value::Number(n) => n.as_i64().map_or(RawNumber::Invalid, RawNumber::Value),
        _ => RawNumber::Invalid,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<RawNumber<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => RawNumber::Absent,
        Value::Number(n) => n.as_f64().map_or(RawNumber::Invalid, RawNumber::Value),
        _ => RawNumber::Invalid,
    })
}

impl From<CreateInvoiceRequest> for InvoiceDraft {
    fn from(request: CreateInvoiceRequest) -> Self {
        InvoiceDraft {
            date: request.date,
            description: request.description,
            quantity: request.quantity,
            payment_method: request.payment_method,
            currency: request.currency,
            invoice_number: request.invoice_number,
            vat_percentage: request.vat_percentage,
            price: request.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceCreatedResponse {
    pub success: bool,
    pub invoice: Invoice,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub success: bool,
    pub invoices: Vec<Invoice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mutate: impl FnOnce(&mut Value)) -> CreateInvoiceRequest {
        let mut body = serde_json::json!({
            "date": "2024-01-15",
            "description": "Office supplies",
            "quantity": 2,
            "paymentMethod": "credit-card",
            "currency": "EUR",
            "invoiceNumber": "INV-001",
            "vatPercentage": 20.0,
            "price": 100.0,
        });
        mutate(&mut body);
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn well_formed_body_decodes_every_field() {
        let request = request(|_| {});
        assert_eq!(request.quantity, RawNumber::Value(2));
        assert_eq!(request.price, RawNumber::Value(100.0));
        let valid = InvoiceDraft::from(request).validate().unwrap();
        assert_eq!(valid.invoice_number, "INV-001");
    }

    #[test]
    fn non_numeric_price_and_quantity_still_decode_and_fail_by_name() {
        let request = request(|body| {
            body["quantity"] = "two".into();
            body["price"] = "abc".into();
        });
        assert_eq!(request.quantity, RawNumber::Invalid);
        assert_eq!(request.price, RawNumber::Invalid);

        let err = InvoiceDraft::from(request).validate().unwrap_err();
        assert_eq!(err.fields(), vec!["quantity", "price"]);
    }

    #[test]
    fn fractional_quantity_is_not_an_integer() {
        let request = request(|body| body["quantity"] = 2.5.into());
        assert_eq!(request.quantity, RawNumber::Invalid);
    }

    #[test]
    fn explicit_null_reads_as_absent() {
        let request = request(|body| body["price"] = Value::Null);
        assert_eq!(request.price, RawNumber::Absent);
        let err = InvoiceDraft::from(request).validate().unwrap_err();
        assert_eq!(err.fields(), vec!["price"]);
    }

    #[test]
    fn client_sent_sum_is_dropped_and_recomputed() {
        let request = request(|body| body["sum"] = 1.0.into());
        let invoice = Invoice::new(InvoiceDraft::from(request).validate().unwrap());
        assert_eq!(invoice.sum, 240.0);
    }
}
