//! Storage seams for every collection.
//!
//! Handlers only talk to these traits. `mongo` is the production backend,
//! `memory` keeps everything in process and backs the integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auth::TokenUpdate;
use crate::domain::{
    Food, FoodChanges, Invoice, InvoiceChanges, Menu, MenuChanges, Order, OrderChanges,
    OrderItem, OrderItemChanges, Table, TableChanges, User, UserProfile,
};
use crate::error::AppError;
use crate::utils::Page;

pub mod memory;
pub mod mongo;

/// Persists newly issued tokens on the user record
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Set the token field(s) present in `update` plus `updatedAt` on the
    /// record keyed by `user_id`, creating it if missing.
    async fn upsert_tokens(
        &self,
        user_id: &str,
        update: &TokenUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: TokenStore {
    async fn insert(&self, user: &User) -> Result<(), AppError>;
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
    async fn phone_exists(&self, phone: &str) -> Result<bool, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;
    /// One page of profiles plus the total number of users
    async fn list(&self, page: Page) -> Result<(Vec<UserProfile>, u64), AppError>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn insert(&self, menu: &Menu) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Menu>, AppError>;
    async fn find(&self, menu_id: &str) -> Result<Option<Menu>, AppError>;
    /// Apply `changes`; `None` when no menu has this id
    async fn update(&self, menu_id: &str, changes: &MenuChanges) -> Result<Option<Menu>, AppError>;
}

#[async_trait]
pub trait FoodRepository: Send + Sync {
    async fn insert(&self, food: &Food) -> Result<(), AppError>;
    async fn list(&self, page: Page) -> Result<(Vec<Food>, u64), AppError>;
    async fn find(&self, food_id: &str) -> Result<Option<Food>, AppError>;
    async fn update(&self, food_id: &str, changes: &FoodChanges) -> Result<Option<Food>, AppError>;
}

#[async_trait]
pub trait TableRepository: Send + Sync {
    async fn insert(&self, table: &Table) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Table>, AppError>;
    async fn find(&self, table_id: &str) -> Result<Option<Table>, AppError>;
    async fn update(&self, table_id: &str, changes: &TableChanges) -> Result<Option<Table>, AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Order>, AppError>;
    async fn find(&self, order_id: &str) -> Result<Option<Order>, AppError>;
    async fn update(&self, order_id: &str, changes: &OrderChanges) -> Result<Option<Order>, AppError>;
    /// Remove an order; used to roll back a failed bulk item write
    async fn delete(&self, order_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait OrderItemRepository: Send + Sync {
    async fn insert_many(&self, items: &[OrderItem]) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<OrderItem>, AppError>;
    async fn list_by_order(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError>;
    async fn find(&self, order_item_id: &str) -> Result<Option<OrderItem>, AppError>;
    async fn update(
        &self,
        order_item_id: &str,
        changes: &OrderItemChanges,
    ) -> Result<Option<OrderItem>, AppError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn insert(&self, invoice: &Invoice) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<Invoice>, AppError>;
    async fn find(&self, invoice_id: &str) -> Result<Option<Invoice>, AppError>;
    async fn update(
        &self,
        invoice_id: &str,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

/// Every repository the HTTP layer needs, shared across workers
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub menus: Arc<dyn MenuRepository>,
    pub foods: Arc<dyn FoodRepository>,
    pub tables: Arc<dyn TableRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub order_items: Arc<dyn OrderItemRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    /// Fresh in-process store, empty on creation
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::InMemoryStore::default());
        Self {
            users: store.clone(),
            menus: store.clone(),
            foods: store.clone(),
            tables: store.clone(),
            orders: store.clone(),
            order_items: store.clone(),
            invoices: store.clone(),
            health: store,
        }
    }
}
