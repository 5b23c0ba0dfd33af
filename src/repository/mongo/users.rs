use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc};
use mongodb::options::{FindOptions, UpdateOptions};
use mongodb::{Collection, Database};

use super::{collect_all, find_by, single_field, USER_COLLECTION};
use crate::auth::TokenUpdate;
use crate::domain::{User, UserProfile};
use crate::error::AppError;
use crate::repository::{TokenStore, UserRepository};
use crate::utils::Page;

pub struct MongoUsers {
    collection: Collection<User>,
}

impl MongoUsers {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USER_COLLECTION),
        }
    }

    async fn exists(&self, field: &str, value: &str) -> Result<bool, AppError> {
        let count = self
            .collection
            .count_documents(single_field(field, value), None)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl TokenStore for MongoUsers {
    async fn upsert_tokens(
        &self,
        user_id: &str,
        update: &TokenUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut fields = doc! {
            "accessToken": update.access_token.as_str(),
            "updatedAt": bson::to_bson(&updated_at)?,
        };
        if let Some(refresh_token) = &update.refresh_token {
            fields.insert("refreshToken", refresh_token.as_str());
        }

        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(doc! { "userId": user_id }, doc! { "$set": fields }, options)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUsers {
    async fn insert(&self, user: &User) -> Result<(), AppError> {
        self.collection.insert_one(user, None).await?;
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        self.exists("email", email).await
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, AppError> {
        self.exists("phone", phone).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        find_by(&self.collection, "email", email).await
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        find_by(&self.collection, "userId", user_id).await
    }

    async fn list(&self, page: Page) -> Result<(Vec<UserProfile>, u64), AppError> {
        let total = self.collection.count_documents(doc! {}, None).await?;

        let options = FindOptions::builder()
            .projection(doc! { "password": 0, "accessToken": 0, "refreshToken": 0 })
            .sort(doc! { "_id": 1 })
            .skip(page.skip())
            .limit(page.size as i64)
            .build();
        let profiles = self.collection.clone_with_type::<UserProfile>();
        let users = collect_all(&profiles, doc! {}, options).await?;

        Ok((users, total))
    }
}
