use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub table_id: String,
    pub number_of_guests: i32,
    pub table_number: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TableChanges {
    pub fn is_empty(&self) -> bool {
        self.number_of_guests.is_none() && self.table_number.is_none()
    }

    pub fn apply_to(&self, table: &mut Table) {
        if let Some(guests) = self.number_of_guests {
            table.number_of_guests = guests;
        }
        if let Some(number) = self.table_number {
            table.table_number = number;
        }
        if let Some(updated_at) = self.updated_at {
            table.updated_at = updated_at;
        }
    }
}
