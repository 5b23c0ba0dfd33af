use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portion size of an ordered dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    S,
    M,
    L,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_item_id: String,
    pub order_id: String,
    pub food_id: String,
    pub quantity: Quantity,
    /// Food price at the time the item was ordered
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderItemChanges {
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.unit_price.is_none() && self.food_id.is_none()
    }

    pub fn apply_to(&self, item: &mut OrderItem) {
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            item.unit_price = unit_price;
        }
        if let Some(food_id) = &self.food_id {
            item.food_id = food_id.clone();
        }
        if let Some(updated_at) = self.updated_at {
            item.updated_at = updated_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_wire_format() {
        assert_eq!(serde_json::to_string(&Quantity::M).unwrap(), "\"M\"");
        assert!(serde_json::from_str::<Quantity>("\"XL\"").is_err());
    }
}
