use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use super::{collect_all, find_by, natural_order, set_fields, FOOD_COLLECTION, MENU_COLLECTION};
use crate::domain::{Food, FoodChanges, Menu, MenuChanges};
use crate::error::AppError;
use crate::repository::{FoodRepository, MenuRepository};
use crate::utils::Page;

pub struct MongoMenus {
    collection: Collection<Menu>,
}

impl MongoMenus {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(MENU_COLLECTION),
        }
    }
}

#[async_trait]
impl MenuRepository for MongoMenus {
    async fn insert(&self, menu: &Menu) -> Result<(), AppError> {
        self.collection.insert_one(menu, None).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Menu>, AppError> {
        collect_all(&self.collection, doc! {}, natural_order()).await
    }

    async fn find(&self, menu_id: &str) -> Result<Option<Menu>, AppError> {
        find_by(&self.collection, "menuId", menu_id).await
    }

    async fn update(&self, menu_id: &str, changes: &MenuChanges) -> Result<Option<Menu>, AppError> {
        set_fields(&self.collection, "menuId", menu_id, changes).await
    }
}

pub struct MongoFoods {
    collection: Collection<Food>,
}

impl MongoFoods {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(FOOD_COLLECTION),
        }
    }
}

#[async_trait]
impl FoodRepository for MongoFoods {
    async fn insert(&self, food: &Food) -> Result<(), AppError> {
        self.collection.insert_one(food, None).await?;
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<(Vec<Food>, u64), AppError> {
        let total = self.collection.count_documents(doc! {}, None).await?;
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(page.skip())
            .limit(page.size as i64)
            .build();
        let foods = collect_all(&self.collection, doc! {}, options).await?;
        Ok((foods, total))
    }

    async fn find(&self, food_id: &str) -> Result<Option<Food>, AppError> {
        find_by(&self.collection, "foodId", food_id).await
    }

    async fn update(&self, food_id: &str, changes: &FoodChanges) -> Result<Option<Food>, AppError> {
        set_fields(&self.collection, "foodId", food_id, changes).await
    }
}
