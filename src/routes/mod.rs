mod foods;
mod health_check;
mod invoices;
mod menus;
mod order_items;
mod orders;
mod tables;
mod users;

pub use foods::{create_food, get_food, list_foods, update_food};
pub use health_check::{database_health, router_health};
pub use invoices::{create_invoice, get_invoice, list_invoices, update_invoice};
pub use menus::{create_menu, get_menu, list_menus, update_menu};
pub use order_items::{
    create_order_items, get_order_item, list_order_items, list_order_items_by_order,
    update_order_item,
};
pub use orders::{create_order, get_order, list_orders, update_order};
pub use tables::{create_table, get_table, list_tables, update_table};
pub use users::{get_user, list_users, login, refresh, signup};

use actix_web::{error::JsonPayloadError, HttpRequest};

use crate::error::AppError;

/// Turn body extraction failures into the usual 400 error body
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");
    AppError::rejected(format!("Invalid request body: {}", err)).into()
}

/// Returned by every PATCH whose body sets nothing
fn no_fields_to_update() -> AppError {
    AppError::rejected("No fields to update")
}
