//! MongoDB backend.
//!
//! One collection per document type; every document is keyed by its own
//! string id field rather than `_id`.

use std::sync::Arc;

use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{
    ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::configuration::DatabaseSettings;
use crate::error::AppError;
use crate::repository::{HealthCheck, Repositories};

mod catalog;
mod dining;
mod invoices;
mod users;

pub use catalog::{MongoFoods, MongoMenus};
pub use dining::{MongoOrderItems, MongoOrders, MongoTables};
pub use invoices::MongoInvoices;
pub use users::MongoUsers;

pub const USER_COLLECTION: &str = "user";
pub const MENU_COLLECTION: &str = "menu";
pub const FOOD_COLLECTION: &str = "food";
pub const TABLE_COLLECTION: &str = "table";
pub const ORDER_COLLECTION: &str = "order";
pub const ORDER_ITEM_COLLECTION: &str = "orderItem";
pub const INVOICE_COLLECTION: &str = "invoice";

const APP_NAME: &str = "restaurant-api";

/// Build a client for `settings.uri` and hand back the configured database.
///
/// No round trip happens here; the driver connects lazily. Connect and
/// server selection are both bounded by `connect_timeout_secs`.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, AppError> {
    let mut options = ClientOptions::parse(&settings.uri).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(settings.connect_timeout());
    options.server_selection_timeout = Some(settings.connect_timeout());

    let client = Client::with_options(options)?;
    Ok(client.database(&settings.database_name))
}

/// Unique indexes backing signup's duplicate checks
pub async fn ensure_indexes(db: &Database) -> Result<(), AppError> {
    let unique = IndexOptions::builder().unique(true).build();
    let indexes: Vec<IndexModel> = ["email", "phone", "userId"]
        .iter()
        .map(|field| {
            IndexModel::builder()
                .keys(single_field(field, 1))
                .options(unique.clone())
                .build()
        })
        .collect();

    db.collection::<Document>(USER_COLLECTION)
        .create_indexes(indexes, None)
        .await?;

    tracing::info!(collection = USER_COLLECTION, "Unique indexes ensured");
    Ok(())
}

/// Repositories for every collection of `db`
pub fn repositories(db: &Database) -> Repositories {
    Repositories {
        users: Arc::new(MongoUsers::new(db)),
        menus: Arc::new(MongoMenus::new(db)),
        foods: Arc::new(MongoFoods::new(db)),
        tables: Arc::new(MongoTables::new(db)),
        orders: Arc::new(MongoOrders::new(db)),
        order_items: Arc::new(MongoOrderItems::new(db)),
        invoices: Arc::new(MongoInvoices::new(db)),
        health: Arc::new(MongoHealth { db: db.clone() }),
    }
}

pub struct MongoHealth {
    db: Database,
}

#[async_trait::async_trait]
impl HealthCheck for MongoHealth {
    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

pub(crate) fn single_field(field: &str, value: impl Into<bson::Bson>) -> Document {
    let mut document = Document::new();
    document.insert(field, value);
    document
}

/// Stable insertion order for unsorted listings
pub(crate) fn natural_order() -> FindOptions {
    FindOptions::builder().sort(doc! { "_id": 1 }).build()
}

pub(crate) async fn collect_all<T>(
    collection: &Collection<T>,
    filter: Document,
    options: FindOptions,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection.find(filter, options).await?;
    Ok(cursor.try_collect().await?)
}

pub(crate) async fn find_by<T>(
    collection: &Collection<T>,
    id_field: &str,
    id: &str,
) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    Ok(collection.find_one(single_field(id_field, id), None).await?)
}

/// `$set` the populated fields of `changes` on the document whose
/// `id_field` equals `id`; returns the updated document, `None` if no match.
pub(crate) async fn set_fields<T, C>(
    collection: &Collection<T>,
    id_field: &str,
    id: &str,
    changes: &C,
) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
    C: Serialize,
{
    let fields = bson::to_document(changes)?;
    let options = FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .upsert(false)
        .build();

    Ok(collection
        .find_one_and_update(single_field(id_field, id), doc! { "$set": fields }, options)
        .await?)
}
