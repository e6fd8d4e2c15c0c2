use chrono::NaiveDate;
use serde::Serialize;

/// Two-decimal, half-up rounding. Must stay in step with the server's rule;
/// the value shown here is only ever a preview.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Live preview of the invoice total from the raw form inputs. Unparseable
/// or empty inputs count as zero, so a half-filled form previews a partial
/// total instead of an error.
pub fn preview_sum(quantity: &str, price: &str, vat_percentage: &str) -> f64 {
    let quantity: f64 = quantity.trim().parse().unwrap_or(0.0);
    let price: f64 = price.trim().parse().unwrap_or(0.0);
    let vat: f64 = vat_percentage.trim().parse().unwrap_or(0.0);
    round2(price * quantity * (1.0 + vat / 100.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Description,
    Quantity,
    PaymentMethod,
    Currency,
    InvoiceNumber,
    VatPercentage,
    Price,
}

/// What the form submits: the raw fields, never the previewed sum. The
/// server recomputes the total and is the sole authority on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub date: String,
    pub description: String,
    pub quantity: Option<i64>,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: Option<f64>,
    pub price: Option<f64>,
}

/// The new-invoice form as the user sees it: all inputs kept as entered,
/// plus the busy/error state of the save control.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub date: String,
    pub description: String,
    pub quantity: String,
    pub payment_method: String,
    pub currency: String,
    pub invoice_number: String,
    pub vat_percentage: String,
    pub price: String,
    pub busy: bool,
    pub error: Option<String>,
}

impl InvoiceForm {
    /// Opens empty except for the date, prefilled with the current day.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            description: String::new(),
            quantity: String::new(),
            payment_method: String::new(),
            currency: String::new(),
            invoice_number: String::new(),
            vat_percentage: String::new(),
            price: String::new(),
            busy: false,
            error: None,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Date => self.date = value,
            FormField::Description => self.description = value,
            FormField::Quantity => self.quantity = value,
            FormField::PaymentMethod => self.payment_method = value,
            FormField::Currency => self.currency = value,
            FormField::InvoiceNumber => self.invoice_number = value,
            FormField::VatPercentage => self.vat_percentage = value,
            FormField::Price => self.price = value,
        }
    }

    /// The sum preview as displayed next to the form, e.g. "240.00".
    pub fn preview(&self) -> String {
        format!(
            "{:.2}",
            preview_sum(&self.quantity, &self.price, &self.vat_percentage)
        )
    }

    pub fn payload(&self) -> InvoicePayload {
        InvoicePayload {
            date: self.date.clone(),
            description: self.description.clone(),
            quantity: self.quantity.trim().parse().ok(),
            payment_method: self.payment_method.clone(),
            currency: self.currency.clone(),
            invoice_number: self.invoice_number.clone(),
            vat_percentage: self.vat_percentage.trim().parse().ok(),
            price: self.price.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> InvoiceForm {
        InvoiceForm::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn opens_prefilled_with_the_current_date() {
        let form = form();
        assert_eq!(form.date, "2024-01-15");
        assert!(form.description.is_empty());
        assert!(!form.busy);
    }

    #[test]
    fn preview_matches_the_server_rule() {
        let mut form = form();
        form.set(FormField::Quantity, "2".into());
        form.set(FormField::VatPercentage, "20".into());
        form.set(FormField::Price, "100".into());
        assert_eq!(form.preview(), "240.00");
    }

    #[test]
    fn preview_tracks_every_field_change() {
        let mut form = form();
        form.set(FormField::Quantity, "1".into());
        form.set(FormField::VatPercentage, "10".into());
        form.set(FormField::Price, "100".into());
        assert_eq!(form.preview(), "110.00");

        form.set(FormField::Quantity, "3".into());
        assert_eq!(form.preview(), "330.00");

        form.set(FormField::VatPercentage, "25".into());
        assert_eq!(form.preview(), "375.00");
    }

    #[test]
    fn blank_inputs_preview_as_zero() {
        assert_eq!(form().preview(), "0.00");
        assert_eq!(preview_sum("", "100", "20"), 0.0);
        assert_eq!(preview_sum("abc", "100", "20"), 0.0);
    }

    #[test]
    fn fractional_previews_round_half_up() {
        assert_eq!(preview_sum("1", "50", "21"), 60.5);
        assert_eq!(preview_sum("1", "0.125", "0"), 0.13);
    }

    #[test]
    fn payload_carries_raw_fields_and_no_sum() {
        let mut form = form();
        form.set(FormField::Description, "Office supplies".into());
        form.set(FormField::Quantity, "2".into());
        form.set(FormField::PaymentMethod, "credit-card".into());
        form.set(FormField::Currency, "EUR".into());
        form.set(FormField::InvoiceNumber, "INV-001".into());
        form.set(FormField::VatPercentage, "20".into());
        form.set(FormField::Price, "100".into());

        let payload = form.payload();
        assert_eq!(payload.quantity, Some(2));
        assert_eq!(payload.price, Some(100.0));

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("sum").is_none());
        assert_eq!(json["paymentMethod"], "credit-card");
    }

    #[test]
    fn unparseable_numbers_submit_as_missing() {
        let mut form = form();
        form.set(FormField::Quantity, "two".into());
        assert_eq!(form.payload().quantity, None);
    }
}
