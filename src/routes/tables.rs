use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{new_id, Table, TableChanges};
use crate::error::AppError;
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    pub number_of_guests: i32,
    pub table_number: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePatch {
    pub number_of_guests: Option<i32>,
    pub table_number: Option<i32>,
}

fn positive(field: &str, value: i32) -> Result<i32, AppError> {
    if value < 1 {
        return Err(AppError::rejected(format!("{} must be at least 1", field)));
    }
    Ok(value)
}

/// POST /api/v1/tables
pub async fn create_table(
    body: web::Json<TableRequest>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let now = Utc::now();
    let table = Table {
        table_id: new_id(),
        number_of_guests: positive("numberOfGuests", body.number_of_guests)?,
        table_number: positive("tableNumber", body.table_number)?,
        created_at: now,
        updated_at: now,
    };
    repositories.tables.insert(&table).await?;

    tracing::info!(
        table_id = %table.table_id,
        table_number = table.table_number,
        "Table created"
    );
    Ok(HttpResponse::Created().json(table))
}

/// GET /api/v1/tables
pub async fn list_tables(repositories: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let tables = repositories.tables.list().await?;
    Ok(HttpResponse::Ok().json(json!({
        "totalCount": tables.len(),
        "tables": tables,
    })))
}

/// GET /api/v1/tables/{tableId}
pub async fn get_table(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let table = repositories
        .tables
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;

    Ok(HttpResponse::Ok().json(table))
}

/// PATCH /api/v1/tables/{tableId}
pub async fn update_table(
    path: web::Path<String>,
    body: web::Json<TablePatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let mut changes = TableChanges {
        number_of_guests: body
            .number_of_guests
            .map(|n| positive("numberOfGuests", n))
            .transpose()?,
        table_number: body
            .table_number
            .map(|n| positive("tableNumber", n))
            .transpose()?,
        updated_at: None,
    };
    if changes.is_empty() {
        return Err(no_fields_to_update());
    }

    changes.updated_at = Some(Utc::now());
    let table = repositories
        .tables
        .update(&path, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;

    tracing::info!(table_id = %table.table_id, "Table updated");
    Ok(HttpResponse::Ok().json(table))
}
