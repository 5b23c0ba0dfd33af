use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    new_id, Invoice, InvoiceChanges, InvoiceView, PaymentMethod, PaymentStatus,
};
use crate::error::{AppError, ErrorContext};
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;
use crate::validators::require_non_empty;

/// Days between invoicing and the payment due date
const PAYMENT_TERM_DAYS: i64 = 1;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub order_id: String,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

/// POST /api/v1/invoices
pub async fn create_invoice(
    body: web::Json<InvoiceRequest>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_invoice");

    let order_id = require_non_empty("orderId", &body.order_id)?;
    if repositories.orders.find(&order_id).await?.is_none() {
        return Err(AppError::not_found("Order"));
    }

    let now = Utc::now();
    let invoice = Invoice {
        invoice_id: new_id(),
        order_id,
        payment_method: body.payment_method,
        payment_status: body.payment_status.unwrap_or_default(),
        payment_due_date: now + Duration::days(PAYMENT_TERM_DAYS),
        created_at: now,
        updated_at: now,
    };
    repositories.invoices.insert(&invoice).await?;

    tracing::info!(
        request_id = %context.request_id,
        invoice_id = %invoice.invoice_id,
        order_id = %invoice.order_id,
        "Invoice created"
    );
    Ok(HttpResponse::Created().json(invoice))
}

/// GET /api/v1/invoices
pub async fn list_invoices(repositories: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let invoices = repositories.invoices.list().await?;
    Ok(HttpResponse::Ok().json(json!({
        "totalCount": invoices.len(),
        "invoices": invoices,
    })))
}

/// GET /api/v1/invoices/{invoiceId}
///
/// The invoice joined with its table number and ordered items. Any missing
/// link in invoice → order → table/items is a 404.
pub async fn get_invoice(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let invoice = repositories
        .invoices
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice"))?;
    let order = repositories
        .orders
        .find(&invoice.order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    let table = repositories
        .tables
        .find(&order.table_id)
        .await?
        .ok_or_else(|| AppError::not_found("Table"))?;
    let order_details = repositories.order_items.list_by_order(&order.order_id).await?;
    if order_details.is_empty() {
        return Err(AppError::not_found("Order items"));
    }

    Ok(HttpResponse::Ok().json(InvoiceView {
        invoice_id: invoice.invoice_id,
        payment_method: invoice.payment_method,
        order_id: invoice.order_id,
        payment_status: invoice.payment_status,
        table_number: table.table_number,
        payment_due_date: invoice.payment_due_date,
        order_details,
    }))
}

/// PATCH /api/v1/invoices/{invoiceId}
///
/// A patch without `paymentStatus` puts the invoice back to PENDING.
pub async fn update_invoice(
    path: web::Path<String>,
    body: web::Json<InvoicePatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    if body.payment_method.is_none() && body.payment_status.is_none() {
        return Err(no_fields_to_update());
    }

    let changes = InvoiceChanges {
        payment_method: body.payment_method,
        payment_status: Some(body.payment_status.unwrap_or_default()),
        updated_at: Some(Utc::now()),
    };
    let invoice = repositories
        .invoices
        .update(&path, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice"))?;

    tracing::info!(
        invoice_id = %invoice.invoice_id,
        payment_status = ?invoice.payment_status,
        "Invoice updated"
    );
    Ok(HttpResponse::Ok().json(invoice))
}
