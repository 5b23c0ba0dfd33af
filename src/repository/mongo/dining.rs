use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use super::{
    collect_all, find_by, natural_order, set_fields, ORDER_COLLECTION, ORDER_ITEM_COLLECTION,
    TABLE_COLLECTION,
};
use crate::domain::{Order, OrderChanges, OrderItem, OrderItemChanges, Table, TableChanges};
use crate::error::AppError;
use crate::repository::{OrderItemRepository, OrderRepository, TableRepository};

pub struct MongoTables {
    collection: Collection<Table>,
}

impl MongoTables {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(TABLE_COLLECTION),
        }
    }
}

#[async_trait]
impl TableRepository for MongoTables {
    async fn insert(&self, table: &Table) -> Result<(), AppError> {
        self.collection.insert_one(table, None).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Table>, AppError> {
        collect_all(&self.collection, doc! {}, natural_order()).await
    }

    async fn find(&self, table_id: &str) -> Result<Option<Table>, AppError> {
        find_by(&self.collection, "tableId", table_id).await
    }

    async fn update(&self, table_id: &str, changes: &TableChanges) -> Result<Option<Table>, AppError> {
        set_fields(&self.collection, "tableId", table_id, changes).await
    }
}

pub struct MongoOrders {
    collection: Collection<Order>,
}

impl MongoOrders {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ORDER_COLLECTION),
        }
    }
}

#[async_trait]
impl OrderRepository for MongoOrders {
    async fn insert(&self, order: &Order) -> Result<(), AppError> {
        self.collection.insert_one(order, None).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        collect_all(&self.collection, doc! {}, natural_order()).await
    }

    async fn find(&self, order_id: &str) -> Result<Option<Order>, AppError> {
        find_by(&self.collection, "orderId", order_id).await
    }

    async fn update(&self, order_id: &str, changes: &OrderChanges) -> Result<Option<Order>, AppError> {
        set_fields(&self.collection, "orderId", order_id, changes).await
    }

    async fn delete(&self, order_id: &str) -> Result<(), AppError> {
        self.collection
            .delete_one(doc! { "orderId": order_id }, None)
            .await?;
        Ok(())
    }
}

pub struct MongoOrderItems {
    collection: Collection<OrderItem>,
}

impl MongoOrderItems {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(ORDER_ITEM_COLLECTION),
        }
    }
}

#[async_trait]
impl OrderItemRepository for MongoOrderItems {
    async fn insert_many(&self, items: &[OrderItem]) -> Result<(), AppError> {
        // the driver rejects an empty batch
        if items.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(items, None).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OrderItem>, AppError> {
        collect_all(&self.collection, doc! {}, natural_order()).await
    }

    async fn list_by_order(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError> {
        collect_all(&self.collection, doc! { "orderId": order_id }, natural_order()).await
    }

    async fn find(&self, order_item_id: &str) -> Result<Option<OrderItem>, AppError> {
        find_by(&self.collection, "orderItemId", order_item_id).await
    }

    async fn update(
        &self,
        order_item_id: &str,
        changes: &OrderItemChanges,
    ) -> Result<Option<OrderItem>, AppError> {
        set_fields(&self.collection, "orderItemId", order_item_id, changes).await
    }
}
