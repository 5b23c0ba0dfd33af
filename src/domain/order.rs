use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub table_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.order_date.is_none() && self.table_id.is_none()
    }

    pub fn apply_to(&self, order: &mut Order) {
        if let Some(order_date) = self.order_date {
            order.order_date = order_date;
        }
        if let Some(table_id) = &self.table_id {
            order.table_id = table_id.clone();
        }
        if let Some(updated_at) = self.updated_at {
            order.updated_at = updated_at;
        }
    }
}
