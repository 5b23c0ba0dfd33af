use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{new_id, Food, FoodChanges};
use crate::error::{AppError, ErrorContext};
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;
use crate::utils::{to_fixed, Page, PaginationQuery};
use crate::validators::{is_valid_name, require_non_empty};

const PRICE_PRECISION: i32 = 2;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}

/// Negative or non-finite prices are refused; the rest is rounded to cents
fn checked_price(price: f64) -> Result<f64, AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::rejected("price must be a non-negative number"));
    }
    Ok(to_fixed(price, PRICE_PRECISION))
}

async fn ensure_menu_exists(repositories: &Repositories, menu_id: &str) -> Result<(), AppError> {
    match repositories.menus.find(menu_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Menu")),
    }
}

/// POST /api/v1/foods
pub async fn create_food(
    body: web::Json<FoodRequest>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_food");

    let name = is_valid_name("name", &body.name)?;
    let food_image = require_non_empty("foodImage", &body.food_image)?;
    let menu_id = require_non_empty("menuId", &body.menu_id)?;
    let price = checked_price(body.price)?;
    ensure_menu_exists(&repositories, &menu_id).await?;

    let now = Utc::now();
    let food = Food {
        food_id: new_id(),
        name,
        price,
        food_image,
        menu_id,
        created_at: now,
        updated_at: now,
    };
    repositories.foods.insert(&food).await?;

    tracing::info!(
        request_id = %context.request_id,
        food_id = %food.food_id,
        menu_id = %food.menu_id,
        "Food created"
    );

    Ok(HttpResponse::Created().json(food))
}

/// GET /api/v1/foods?page=&recordPerPage=
pub async fn list_foods(
    query: web::Query<PaginationQuery>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from_query(&query);
    let (foods, total) = repositories.foods.list(page).await?;

    Ok(HttpResponse::Ok().json(json!({
        "totalCount": total,
        "foodItems": foods,
    })))
}

/// GET /api/v1/foods/{foodId}
pub async fn get_food(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let food = repositories
        .foods
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Food"))?;

    Ok(HttpResponse::Ok().json(food))
}

/// PATCH /api/v1/foods/{foodId}
pub async fn update_food(
    path: web::Path<String>,
    body: web::Json<FoodPatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner();
    let mut changes = FoodChanges {
        name: patch.name.map(|n| is_valid_name("name", &n)).transpose()?,
        price: patch.price.map(checked_price).transpose()?,
        food_image: patch
            .food_image
            .map(|i| require_non_empty("foodImage", &i))
            .transpose()?,
        menu_id: patch
            .menu_id
            .map(|m| require_non_empty("menuId", &m))
            .transpose()?,
        updated_at: None,
    };
    if changes.is_empty() {
        return Err(no_fields_to_update());
    }
    if let Some(menu_id) = &changes.menu_id {
        ensure_menu_exists(&repositories, menu_id).await?;
    }

    changes.updated_at = Some(Utc::now());
    let food = repositories
        .foods
        .update(&path, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Food"))?;

    tracing::info!(food_id = %food.food_id, "Food updated");
    Ok(HttpResponse::Ok().json(food))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_is_rounded_to_cents() {
        assert_eq!(checked_price(9.999).unwrap(), 10.0);
        assert_eq!(checked_price(4.5).unwrap(), 4.5);
    }

    #[test]
    fn test_bad_prices_rejected() {
        assert!(checked_price(-1.0).is_err());
        assert!(checked_price(f64::NAN).is_err());
    }
}
