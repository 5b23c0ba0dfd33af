//! Documents stored by the service and the change sets applied to them.
//!
//! Every document is serialized camelCase, both on the wire and in MongoDB,
//! and carries its own string id (`menuId`, `foodId`, ...).

mod food;
mod invoice;
mod menu;
mod order;
mod order_item;
mod table;
mod user;

pub use food::{Food, FoodChanges};
pub use invoice::{Invoice, InvoiceChanges, InvoiceView, PaymentMethod, PaymentStatus};
pub use menu::{Menu, MenuChanges};
pub use order::{Order, OrderChanges};
pub use order_item::{OrderItem, OrderItemChanges, Quantity};
pub use table::{Table, TableChanges};
pub use user::{User, UserProfile};

/// New document id, an ObjectId rendered as 24 hex characters
pub fn new_id() -> String {
    mongodb::bson::oid::ObjectId::new().to_hex()
}
