use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::auth::Claims;
use crate::domain::{new_id, Menu, MenuChanges};
use crate::error::{AppError, ErrorContext};
use crate::repository::Repositories;
use crate::routes::no_fields_to_update;
use crate::validators::require_non_empty;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn check_window(
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    match (start_date, end_date) {
        (Some(start), Some(end)) if start > end => {
            Err(AppError::rejected("startDate must not be after endDate"))
        }
        _ => Ok(()),
    }
}

/// POST /api/v1/menus
pub async fn create_menu(
    body: web::Json<MenuRequest>,
    claims: web::ReqData<Claims>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_menu").with_user_id(claims.user_id());

    let name = require_non_empty("name", &body.name)?;
    let category = require_non_empty("category", &body.category)?;
    check_window(body.start_date, body.end_date)?;

    let now = Utc::now();
    let menu = Menu {
        menu_id: new_id(),
        name,
        category,
        start_date: body.start_date,
        end_date: body.end_date,
        created_at: now,
        updated_at: now,
    };
    repositories.menus.insert(&menu).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        menu_id = %menu.menu_id,
        "Menu created"
    );

    Ok(HttpResponse::Created().json(menu))
}

/// GET /api/v1/menus
pub async fn list_menus(repositories: web::Data<Repositories>) -> Result<HttpResponse, AppError> {
    let menus = repositories.menus.list().await?;
    Ok(HttpResponse::Ok().json(json!({ "menus": menus })))
}

/// GET /api/v1/menus/{menuId}
pub async fn get_menu(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let menu = repositories
        .menus
        .find(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Menu"))?;

    Ok(HttpResponse::Ok().json(menu))
}

/// PATCH /api/v1/menus/{menuId}
///
/// The resulting start/end window is checked against the stored menu, so a
/// patch of one bound alone cannot invert it.
pub async fn update_menu(
    path: web::Path<String>,
    body: web::Json<MenuPatch>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner();
    let mut changes = MenuChanges {
        name: patch
            .name
            .map(|n| require_non_empty("name", &n))
            .transpose()?,
        category: patch
            .category
            .map(|c| require_non_empty("category", &c))
            .transpose()?,
        start_date: patch.start_date,
        end_date: patch.end_date,
        updated_at: None,
    };
    if changes.is_empty() {
        return Err(no_fields_to_update());
    }

    let menu_id = path.into_inner();
    let current = repositories
        .menus
        .find(&menu_id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu"))?;
    check_window(
        changes.start_date.or(current.start_date),
        changes.end_date.or(current.end_date),
    )?;

    changes.updated_at = Some(Utc::now());
    let menu = repositories
        .menus
        .update(&menu_id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Menu"))?;

    tracing::info!(menu_id = %menu.menu_id, "Menu updated");
    Ok(HttpResponse::Ok().json(menu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_window_order() {
        let now = Utc::now();
        assert!(check_window(Some(now), Some(now + Duration::days(1))).is_ok());
        assert!(check_window(Some(now), Some(now)).is_ok());
        assert!(check_window(Some(now), None).is_ok());
        assert!(check_window(Some(now + Duration::days(1)), Some(now)).is_err());
    }
}
