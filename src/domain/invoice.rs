use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::OrderItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Cash,
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: String,
    pub order_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: PaymentStatus,
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceChanges {
    pub fn apply_to(&self, invoice: &mut Invoice) {
        if self.payment_method.is_some() {
            invoice.payment_method = self.payment_method;
        }
        if let Some(status) = self.payment_status {
            invoice.payment_status = status;
        }
        if let Some(updated_at) = self.updated_at {
            invoice.updated_at = updated_at;
        }
    }
}

/// Invoice joined with its table number and ordered items
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub invoice_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub order_id: String,
    pub payment_status: PaymentStatus,
    pub table_number: i32,
    pub payment_due_date: DateTime<Utc>,
    pub order_details: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_enums_wire_format() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Online).unwrap(), "\"ONLINE\"");
        assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"PAID\"");
        assert!(serde_json::from_str::<PaymentMethod>("\"CHEQUE\"").is_err());
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }
}
