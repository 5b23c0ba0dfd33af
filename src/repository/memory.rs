//! In-process implementation of every repository trait.
//!
//! Collections are plain vectors in insertion order behind async locks;
//! lookups are linear scans, which is fine for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::auth::TokenUpdate;
use crate::domain::{
    Food, FoodChanges, Invoice, InvoiceChanges, Menu, MenuChanges, Order, OrderChanges,
    OrderItem, OrderItemChanges, Table, TableChanges, User, UserProfile,
};
use crate::error::{AppError, DatabaseError};
use crate::repository::{
    FoodRepository, HealthCheck, InvoiceRepository, MenuRepository, OrderItemRepository,
    OrderRepository, TableRepository, TokenStore, UserRepository,
};
use crate::utils::Page;

#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    menus: RwLock<Vec<Menu>>,
    foods: RwLock<Vec<Food>>,
    tables: RwLock<Vec<Table>>,
    orders: RwLock<Vec<Order>>,
    order_items: RwLock<Vec<OrderItem>>,
    invoices: RwLock<Vec<Invoice>>,
}

fn paginate<T: Clone>(records: &[T], page: Page) -> Vec<T> {
    records
        .iter()
        .skip(page.skip() as usize)
        .take(page.size as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl TokenStore for InMemoryStore {
    async fn upsert_tokens(
        &self,
        user_id: &str,
        update: &TokenUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            // a token-only record has nothing a User can be built from
            .ok_or_else(|| {
                AppError::Database(DatabaseError::Persistence(format!(
                    "no user record {} to attach tokens to",
                    user_id
                )))
            })?;

        user.access_token = Some(update.access_token.clone());
        if let Some(refresh_token) = &update.refresh_token {
            user.refresh_token = Some(refresh_token.clone());
        }
        user.updated_at = updated_at;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email == user.email || u.phone == user.phone || u.user_id == user.user_id)
        {
            return Err(AppError::Database(DatabaseError::Duplicate(
                "user already exists".to_string(),
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.iter().any(|u| u.email == email))
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, AppError> {
        Ok(self.users.read().await.iter().any(|u| u.phone == phone))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn list(&self, page: Page) -> Result<(Vec<UserProfile>, u64), AppError> {
        let users = self.users.read().await;
        let profiles = paginate(&users, page).iter().map(User::profile).collect();
        Ok((profiles, users.len() as u64))
    }
}

#[async_trait]
impl MenuRepository for InMemoryStore {
    async fn insert(&self, menu: &Menu) -> Result<(), AppError> {
        self.menus.write().await.push(menu.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Menu>, AppError> {
        Ok(self.menus.read().await.clone())
    }

    async fn find(&self, menu_id: &str) -> Result<Option<Menu>, AppError> {
        Ok(self.menus.read().await.iter().find(|m| m.menu_id == menu_id).cloned())
    }

    async fn update(&self, menu_id: &str, changes: &MenuChanges) -> Result<Option<Menu>, AppError> {
        let mut menus = self.menus.write().await;
        Ok(menus.iter_mut().find(|m| m.menu_id == menu_id).map(|menu| {
            changes.apply_to(menu);
            menu.clone()
        }))
    }
}

#[async_trait]
impl FoodRepository for InMemoryStore {
    async fn insert(&self, food: &Food) -> Result<(), AppError> {
        self.foods.write().await.push(food.clone());
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<(Vec<Food>, u64), AppError> {
        let foods = self.foods.read().await;
        Ok((paginate(&foods, page), foods.len() as u64))
    }

    async fn find(&self, food_id: &str) -> Result<Option<Food>, AppError> {
        Ok(self.foods.read().await.iter().find(|f| f.food_id == food_id).cloned())
    }

    async fn update(&self, food_id: &str, changes: &FoodChanges) -> Result<Option<Food>, AppError> {
        let mut foods = self.foods.write().await;
        Ok(foods.iter_mut().find(|f| f.food_id == food_id).map(|food| {
            changes.apply_to(food);
            food.clone()
        }))
    }
}

#[async_trait]
impl TableRepository for InMemoryStore {
    async fn insert(&self, table: &Table) -> Result<(), AppError> {
        self.tables.write().await.push(table.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Table>, AppError> {
        Ok(self.tables.read().await.clone())
    }

    async fn find(&self, table_id: &str) -> Result<Option<Table>, AppError> {
        Ok(self.tables.read().await.iter().find(|t| t.table_id == table_id).cloned())
    }

    async fn update(&self, table_id: &str, changes: &TableChanges) -> Result<Option<Table>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.iter_mut().find(|t| t.table_id == table_id).map(|table| {
            changes.apply_to(table);
            table.clone()
        }))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn insert(&self, order: &Order) -> Result<(), AppError> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.read().await.clone())
    }

    async fn find(&self, order_id: &str) -> Result<Option<Order>, AppError> {
        Ok(self.orders.read().await.iter().find(|o| o.order_id == order_id).cloned())
    }

    async fn update(&self, order_id: &str, changes: &OrderChanges) -> Result<Option<Order>, AppError> {
        let mut orders = self.orders.write().await;
        Ok(orders.iter_mut().find(|o| o.order_id == order_id).map(|order| {
            changes.apply_to(order);
            order.clone()
        }))
    }

    async fn delete(&self, order_id: &str) -> Result<(), AppError> {
        self.orders.write().await.retain(|o| o.order_id != order_id);
        Ok(())
    }
}

#[async_trait]
impl OrderItemRepository for InMemoryStore {
    async fn insert_many(&self, items: &[OrderItem]) -> Result<(), AppError> {
        self.order_items.write().await.extend_from_slice(items);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<OrderItem>, AppError> {
        Ok(self.order_items.read().await.clone())
    }

    async fn list_by_order(&self, order_id: &str) -> Result<Vec<OrderItem>, AppError> {
        Ok(self
            .order_items
            .read()
            .await
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn find(&self, order_item_id: &str) -> Result<Option<OrderItem>, AppError> {
        Ok(self
            .order_items
            .read()
            .await
            .iter()
            .find(|i| i.order_item_id == order_item_id)
            .cloned())
    }

    async fn update(
        &self,
        order_item_id: &str,
        changes: &OrderItemChanges,
    ) -> Result<Option<OrderItem>, AppError> {
        let mut items = self.order_items.write().await;
        Ok(items
            .iter_mut()
            .find(|i| i.order_item_id == order_item_id)
            .map(|item| {
                changes.apply_to(item);
                item.clone()
            }))
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
    async fn insert(&self, invoice: &Invoice) -> Result<(), AppError> {
        self.invoices.write().await.push(invoice.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.invoices.read().await.clone())
    }

    async fn find(&self, invoice_id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self
            .invoices
            .read()
            .await
            .iter()
            .find(|i| i.invoice_id == invoice_id)
            .cloned())
    }

    async fn update(
        &self,
        invoice_id: &str,
        changes: &InvoiceChanges,
    ) -> Result<Option<Invoice>, AppError> {
        let mut invoices = self.invoices.write().await;
        Ok(invoices
            .iter_mut()
            .find(|i| i.invoice_id == invoice_id)
            .map(|invoice| {
                changes.apply_to(invoice);
                invoice.clone()
            }))
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::new_id;

    fn user(email: &str, phone: &str) -> User {
        User {
            user_id: new_id(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            phone: phone.to_string(),
            avatar: None,
            access_token: None,
            refresh_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_tokens_only_touches_given_fields() {
        let store = InMemoryStore::default();
        let mut stored = user("a@b.com", "5551234567");
        stored.refresh_token = Some("old-refresh".to_string());
        UserRepository::insert(&store, &stored).await.unwrap();

        let update = TokenUpdate {
            access_token: "new-access".to_string(),
            refresh_token: None,
        };
        let now = Utc::now();
        store.upsert_tokens(&stored.user_id, &update, now).await.unwrap();

        let found = store.find_by_id(&stored.user_id).await.unwrap().unwrap();
        assert_eq!(found.access_token.as_deref(), Some("new-access"));
        assert_eq!(found.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(found.updated_at, now);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::default();
        UserRepository::insert(&store, &user("a@b.com", "5551234567")).await.unwrap();
        let result = UserRepository::insert(&store, &user("a@b.com", "5559999999")).await;
        assert!(matches!(result, Err(AppError::Database(DatabaseError::Duplicate(_)))));
    }

    #[tokio::test]
    async fn test_user_pagination() {
        let store = InMemoryStore::default();
        for i in 0..5 {
            let u = user(&format!("user{}@example.com", i), &format!("555000000{}", i));
            UserRepository::insert(&store, &u).await.unwrap();
        }

        let page = Page { number: 2, size: 2 };
        let (profiles, total) = UserRepository::list(&store, page).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].email, "user2@example.com");
    }
}
