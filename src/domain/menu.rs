use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a menu; `None` fields are left alone
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MenuChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn apply_to(&self, menu: &mut Menu) {
        if let Some(name) = &self.name {
            menu.name = name.clone();
        }
        if let Some(category) = &self.category {
            menu.category = category.clone();
        }
        if self.start_date.is_some() {
            menu.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            menu.end_date = self.end_date;
        }
        if let Some(updated_at) = self.updated_at {
            menu.updated_at = updated_at;
        }
    }
}
