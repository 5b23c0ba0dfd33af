/// Order Item Routes
///
/// Items are created in bulk for a table: one new order, one item per
/// requested dish, each priced at the dish's current price.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{new_id, Order, OrderItem, OrderItemChanges, Quantity};
use crate::error::{AppError, ErrorContext};
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;
use crate::routes::orders::ensure_table_exists;
use crate::utils::to_fixed;
use crate::validators::require_non_empty;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemEntry {
    pub food_id: String,
    pub quantity: Quantity,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemsRequest {
    pub table_id: String,
    pub order_items: Vec<OrderItemEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPatch {
    pub food_id: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit_price: Option<f64>,
}

/// Write the order and then its items. If the items cannot be written the
/// order is removed again so no empty order is left behind.
async fn store_order(
    repositories: &Repositories,
    order: &Order,
    items: &[OrderItem],
) -> Result<(), AppError> {
    repositories.orders.insert(order).await?;

    if let Err(e) = repositories.order_items.insert_many(items).await {
        tracing::error!(
            order_id = %order.order_id,
            error = %e,
            "Order item write failed, removing the order"
        );
        if let Err(rollback) = repositories.orders.delete(&order.order_id).await {
            tracing::error!(
                order_id = %order.order_id,
                error = %rollback,
                "Could not remove order after failed item write"
            );
        }
        return Err(e);
    }
    Ok(())
}

/// POST /api/v1/orderItems
///
/// The table and every referenced food are looked up before anything is
/// written, so an unknown food leaves no stray order behind.
pub async fn create_order_items(
    body: web::Json<OrderItemsRequest>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_order_items");
    let request = body.into_inner();

    if request.order_items.is_empty() {
        return Err(AppError::rejected("orderItems must not be empty"));
    }
    let table_id = require_non_empty("tableId", &request.table_id)?;
    ensure_table_exists(&repositories, &table_id).await?;

    let mut priced = Vec::with_capacity(request.order_items.len());
    for entry in request.order_items {
        let food = repositories
            .foods
            .find(&entry.food_id)
            .await?
            .ok_or_else(|| AppError::not_found("Food"))?;
        priced.push((entry, food.price));
    }

    let now = Utc::now();
    let order = Order {
        order_id: new_id(),
        order_date: now,
        table_id,
        created_at: now,
        updated_at: now,
    };

    let items: Vec<OrderItem> = priced
        .into_iter()
        .map(|(entry, price)| OrderItem {
            order_item_id: new_id(),
            order_id: order.order_id.clone(),
            food_id: entry.food_id,
            quantity: entry.quantity,
            unit_price: price,
            created_at: now,
            updated_at: now,
        })
        .collect();
    store_order(&repositories, &order, &items).await?;

    tracing::info!(
        request_id = %context.request_id,
        order_id = %order.order_id,
        items = items.len(),
        "Order items created"
    );

    Ok(HttpResponse::Created().json(json!({
        "orderId": order.order_id,
        "orderItems": items,
    })))
}

/// GET /api/v1/orderItems
///
/// 404 when no item exists at all
pub async fn list_order_items(
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let items = repositories.order_items.list().await?;
    if items.is_empty() {
        return Err(AppError::not_found("Order items"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "totalCount": items.len(),
        "orderItems": items,
    })))
}

/// GET /api/v1/orderItems/order/{orderId}
pub async fn list_order_items_by_order(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    if repositories.orders.find(&order_id).await?.is_none() {
        return Err(AppError::not_found("Order"));
    }

    let items = repositories.order_items.list_by_order(&order_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "totalCount": items.len(),
        "orderItems": items,
    })))
}

/// GET /api/v1/orderItems/{orderItemId}
pub async fn get_order_item(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let item = repositories
        .order_items
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Order item"))?;

    Ok(HttpResponse::Ok().json(item))
}

/// PATCH /api/v1/orderItems/{orderItemId}
pub async fn update_order_item(
    path: web::Path<String>,
    body: web::Json<OrderItemPatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner();
    if let Some(price) = patch.unit_price {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::rejected("unitPrice must be a non-negative number"));
        }
    }

    let mut changes = OrderItemChanges {
        quantity: patch.quantity,
        unit_price: patch.unit_price.map(|p| to_fixed(p, 2)),
        food_id: patch
            .food_id
            .map(|f| require_non_empty("foodId", &f))
            .transpose()?,
        updated_at: None,
    };
    if changes.is_empty() {
        return Err(no_fields_to_update());
    }
    if let Some(food_id) = &changes.food_id {
        if repositories.foods.find(food_id).await?.is_none() {
            return Err(AppError::not_found("Food"));
        }
    }

    changes.updated_at = Some(Utc::now());
    let item = repositories
        .order_items
        .update(&path, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Order item"))?;

    tracing::info!(order_item_id = %item.order_item_id, "Order item updated");
    Ok(HttpResponse::Ok().json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use crate::repository::OrderItemRepository;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct BrokenItems;

    #[async_trait]
    impl OrderItemRepository for BrokenItems {
        async fn insert_many(&self, _items: &[OrderItem]) -> Result<(), AppError> {
            Err(DatabaseError::Persistence("write timed out".to_string()).into())
        }

        async fn list(&self) -> Result<Vec<OrderItem>, AppError> {
            Ok(Vec::new())
        }

        async fn list_by_order(&self, _order_id: &str) -> Result<Vec<OrderItem>, AppError> {
            Ok(Vec::new())
        }

        async fn find(&self, _order_item_id: &str) -> Result<Option<OrderItem>, AppError> {
            Ok(None)
        }

        async fn update(
            &self,
            _order_item_id: &str,
            _changes: &OrderItemChanges,
        ) -> Result<Option<OrderItem>, AppError> {
            Ok(None)
        }
    }

    fn order() -> Order {
        let now = Utc::now();
        Order {
            order_id: new_id(),
            order_date: now,
            table_id: new_id(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_failed_item_write_removes_order() {
        let repositories = Repositories {
            order_items: Arc::new(BrokenItems),
            ..Repositories::in_memory()
        };
        let order = order();

        let result = store_order(&repositories, &order, &[]).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::Persistence(_)))
        ));
        assert!(repositories.orders.find(&order.order_id).await.unwrap().is_none());
        assert!(repositories.orders.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_and_items_are_stored() {
        let repositories = Repositories::in_memory();
        let order = order();

        store_order(&repositories, &order, &[]).await.unwrap();

        assert!(repositories.orders.find(&order.order_id).await.unwrap().is_some());
    }
}
