use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::error::{ValidationError, ValidationErrors};

/// Rounds to two decimal places, half-up, matching currency minor-unit display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The one numeric contract of the system: gross total from unit price,
/// quantity and VAT percentage. The server result is authoritative; clients
/// may only preview it.
pub fn compute_sum(price: f64, quantity: i32, vat_percentage: f64) -> f64 {
    round2(price * f64::from(quantity) * (1.0 + vat_percentage / 100.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::BankTransfer => "bank-transfer",
            PaymentMethod::Cash => "cash",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown payment method: {0}")]
pub struct ParsePaymentMethodError(String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit-card" => Ok(PaymentMethod::CreditCard),
            "bank-transfer" => Ok(PaymentMethod::BankTransfer),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(ParsePaymentMethodError(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as TEXT rather than a Postgres enum so new methods need no migration.
impl sqlx::Type<sqlx::Postgres> for PaymentMethod {
    fn type_info() -> PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PaymentMethod {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PaymentMethod {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        raw.parse().map_err(Into::into)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: f64,
    pub price: f64,
    pub sum: f64,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(fields: ValidInvoice) -> Self {
        let sum = compute_sum(fields.price, fields.quantity, fields.vat_percentage);
        Self {
            id: Uuid::new_v4(),
            date: fields.date,
            description: fields.description,
            quantity: fields.quantity,
            payment_method: fields.payment_method,
            currency: fields.currency,
            invoice_number: fields.invoice_number,
            vat_percentage: fields.vat_percentage,
            price: fields.price,
            sum,
            created_at: Utc::now(),
        }
    }
}

/// A numeric field as it arrived on the wire: absent, present but not a
/// number of the right kind, or usable. Carrying the broken state into
/// validation lets the response name the offending field instead of dying
/// in the JSON decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawNumber<T> {
    Absent,
    Invalid,
    Value(T),
}

impl<T> Default for RawNumber<T> {
    fn default() -> Self {
        RawNumber::Absent
    }
}

/// Raw create input as the client sent it. `sum` is deliberately absent: the
/// server derives it and ignores anything the client claims.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub date: String,
    pub description: String,
    pub quantity: RawNumber<i64>,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: RawNumber<f64>,
    pub price: RawNumber<f64>,
}

/// Draft that passed validation; every field is in its domain type.
#[derive(Debug, Clone)]
pub struct ValidInvoice {
    pub date: NaiveDate,
    pub description: String,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: f64,
    pub price: f64,
}

impl InvoiceDraft {
    /// Checks every field and reports all violations at once, so a form can
    /// highlight each offending input in a single round-trip.
    pub fn validate(self) -> Result<ValidInvoice, ValidationErrors> {
        let mut errors = Vec::new();

        let date = match self.date.trim() {
            "" => {
                errors.push(ValidationError::MissingField { field: "date" });
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(ValidationError::InvalidType {
                        field: "date",
                        expected: "a calendar date in YYYY-MM-DD format",
                    });
                    None
                }
            },
        };

        let description = self.description.trim().to_string();
        if description.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "description",
            });
        }

        let quantity = match self.quantity {
            RawNumber::Absent => {
                errors.push(ValidationError::MissingField { field: "quantity" });
                None
            }
            RawNumber::Invalid => {
                errors.push(ValidationError::InvalidType {
                    field: "quantity",
                    expected: "an integer",
                });
                None
            }
            RawNumber::Value(q) if q < 1 => {
                errors.push(ValidationError::OutOfRange {
                    field: "quantity",
                    reason: "must be a positive integer",
                });
                None
            }
            RawNumber::Value(q) => match i32::try_from(q) {
                Ok(q) => Some(q),
                Err(_) => {
                    errors.push(ValidationError::OutOfRange {
                        field: "quantity",
                        reason: "is too large",
                    });
                    None
                }
            },
        };

        let payment_method = match self.payment_method.trim() {
            "" => {
                errors.push(ValidationError::MissingField {
                    field: "paymentMethod",
                });
                None
            }
            raw => match raw.parse::<PaymentMethod>() {
                Ok(method) => Some(method),
                Err(_) => {
                    errors.push(ValidationError::InvalidType {
                        field: "paymentMethod",
                        expected: "one of credit-card, bank-transfer, cash",
                    });
                    None
                }
            },
        };

        let currency = self.currency.trim().to_string();
        if currency.is_empty() {
            errors.push(ValidationError::MissingField { field: "currency" });
        } else if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push(ValidationError::InvalidType {
                field: "currency",
                expected: "a three-letter ISO 4217 code",
            });
        }

        let invoice_number = self.invoice_number.trim().to_string();
        if invoice_number.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "invoiceNumber",
            });
        }

        let vat_percentage = match self.vat_percentage {
            RawNumber::Absent => {
                errors.push(ValidationError::MissingField {
                    field: "vatPercentage",
                });
                None
            }
            RawNumber::Invalid => {
                errors.push(ValidationError::InvalidType {
                    field: "vatPercentage",
                    expected: "a number",
                });
                None
            }
            RawNumber::Value(v) if !v.is_finite() => {
                errors.push(ValidationError::InvalidType {
                    field: "vatPercentage",
                    expected: "a finite number",
                });
                None
            }
            RawNumber::Value(v) if v < 0.0 => {
                errors.push(ValidationError::OutOfRange {
                    field: "vatPercentage",
                    reason: "must not be negative",
                });
                None
            }
            RawNumber::Value(v) => Some(v),
        };

        let price = match self.price {
            RawNumber::Absent => {
                errors.push(ValidationError::MissingField { field: "price" });
                None
            }
            RawNumber::Invalid => {
                errors.push(ValidationError::InvalidType {
                    field: "price",
                    expected: "a number",
                });
                None
            }
            RawNumber::Value(p) if !p.is_finite() => {
                errors.push(ValidationError::InvalidType {
                    field: "price",
                    expected: "a finite number",
                });
                None
            }
            RawNumber::Value(p) if p < 0.0 => {
                errors.push(ValidationError::OutOfRange {
                    field: "price",
                    reason: "must not be negative",
                });
                None
            }
            RawNumber::Value(p) => Some(p),
        };

        match (date, quantity, payment_method, vat_percentage, price) {
            (Some(date), Some(quantity), Some(payment_method), Some(vat_percentage), Some(price))
                if errors.is_empty() =>
            {
                Ok(ValidInvoice {
                    date,
                    description,
                    quantity,
                    payment_method,
                    currency,
                    invoice_number,
                    vat_percentage,
                    price,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }
}
