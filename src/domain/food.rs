use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub food_id: String,
    pub name: String,
    /// Always stored rounded to two decimals
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FoodChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FoodChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.food_image.is_none()
            && self.menu_id.is_none()
    }

    pub fn apply_to(&self, food: &mut Food) {
        if let Some(name) = &self.name {
            food.name = name.clone();
        }
        if let Some(price) = self.price {
            food.price = price;
        }
        if let Some(food_image) = &self.food_image {
            food.food_image = food_image.clone();
        }
        if let Some(menu_id) = &self.menu_id {
            food.menu_id = menu_id.clone();
        }
        if let Some(updated_at) = self.updated_at {
            food.updated_at = updated_at;
        }
    }
}
