use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{new_id, Order, OrderChanges};
use crate::error::AppError;
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;
use crate::validators::require_non_empty;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_date: DateTime<Utc>,
    pub table_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub order_date: Option<DateTime<Utc>>,
    pub table_id: Option<String>,
}

pub(crate) async fn ensure_table_exists(
    repositories: &Repositories,
    table_id: &str,
) -> Result<(), AppError> {
    match repositories.tables.find(table_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Table")),
    }
}

/// POST /api/v1/orders
pub async fn create_order(
    body: web::Json<OrderRequest>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let table_id = require_non_empty("tableId", &body.table_id)?;
    ensure_table_exists(&repositories, &table_id).await?;

    let now = Utc::now();
    let order = Order {
        order_id: new_id(),
        order_date: body.order_date,
        table_id,
        created_at: now,
        updated_at: now,
    };
    repositories.orders.insert(&order).await?;

    tracing::info!(order_id = %order.order_id, table_id = %order.table_id, "Order created");
    Ok(HttpResponse::Created().json(order))
}

/// GET /api/v1/orders
pub async fn list_orders(repositories: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let orders = repositories.orders.list().await?;
    Ok(HttpResponse::Ok().json(json!({
        "totalCount": orders.len(),
        "orders": orders,
    })))
}

/// GET /api/v1/orders/{orderId}
pub async fn get_order(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let order = repositories
        .orders
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    Ok(HttpResponse::Ok().json(order))
}

/// PATCH /api/v1/orders/{orderId}
pub async fn update_order(
    path: web::Path<String>,
    body: web::Json<OrderPatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner();
    let mut changes = OrderChanges {
        order_date: patch.order_date,
        table_id: patch
            .table_id
            .map(|t| require_non_empty("tableId", &t))
            .transpose()?,
        updated_at: None,
    };
    if changes.is_empty() {
        return Err(no_fields_to_update());
    }
    if let Some(table_id) = &changes.table_id {
        ensure_table_exists(&repositories, table_id).await?;
    }

    changes.updated_at = Some(Utc::now());
    let order = repositories
        .orders
        .update(&path, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    tracing::info!(order_id = %order.order_id, "Order updated");
    Ok(HttpResponse::Ok().json(order))
}
