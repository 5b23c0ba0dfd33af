/// User Routes
///
/// Signup, login and refresh are public; listing and lookup sit behind the
/// JWT middleware.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::{
    hash_password, resolve_session_tokens, verify_password, Identity, StoredTokens, TokenIssuer,
    TokenKind, TokenUpdate, TokenValidator,
};
use crate::domain::{new_id, User, UserProfile};
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::repository::{Repositories, TokenStore};
use crate::utils::{Page, PaginationQuery};
use crate::validators::{is_valid_email, is_valid_name, is_valid_phone};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// POST /api/v1/users/signup
///
/// Creates the user with a bcrypt-hashed password and a fresh token pair.
///
/// # Errors
/// - 400: invalid name, email, phone or password
/// - 409: email or phone already registered
pub async fn signup(
    body: web::Json<SignupRequest>,
    repositories: web::Data<Repositories>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_signup");

    let first_name = is_valid_name("firstName", &body.first_name)?;
    let last_name = is_valid_name("lastName", &body.last_name)?;
    let email = is_valid_email(&body.email)?;
    let phone = is_valid_phone(&body.phone)?;
    let password = hash_password(&body.password)?;

    if repositories.users.email_exists(&email).await? {
        return Err(DatabaseError::Duplicate("this email already exists".to_string()).into());
    }
    if repositories.users.phone_exists(&phone).await? {
        return Err(DatabaseError::Duplicate("this phone number already exists".to_string()).into());
    }

    let identity = Identity {
        user_id: new_id(),
        email,
        first_name,
        last_name,
    };
    let tokens = issuer.issue_pair(&identity)?;

    let now = Utc::now();
    let user = User {
        user_id: identity.user_id.clone(),
        first_name: identity.first_name,
        last_name: identity.last_name,
        email: identity.email,
        password,
        phone,
        avatar: body.avatar.clone().filter(|a| !a.trim().is_empty()),
        access_token: Some(tokens.access_token),
        refresh_token: Some(tokens.refresh_token),
        created_at: now,
        updated_at: now,
    };
    repositories.users.insert(&user).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.user_id,
        "User signed up"
    );

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "userId": user.user_id,
    })))
}

/// POST /api/v1/users/login
///
/// Checks the password, then reuses, refreshes or reissues the stored
/// tokens.
///
/// # Errors
/// - 401: unknown email or wrong password (same message for both)
/// - 500: tokens could not be signed or stored
pub async fn login(
    body: web::Json<LoginRequest>,
    repositories: web::Data<Repositories>,
    issuer: web::Data<TokenIssuer>,
    validator: web::Data<TokenValidator>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let email = is_valid_email(&body.email)?;
    let user = repositories
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let context = context.with_user_id(&user.user_id);
    let stored = StoredTokens {
        access_token: user.access_token.as_deref(),
        refresh_token: user.refresh_token.as_deref(),
    };
    let session = resolve_session_tokens(
        issuer.get_ref(),
        validator.get_ref(),
        repositories.users.as_ref(),
        &user.identity(),
        stored,
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        decision = ?session.decision,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: user.profile(),
        access_token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// POST /api/v1/users/refresh
///
/// Trades the stored refresh token for a new access token. The refresh
/// token itself is kept.
///
/// # Errors
/// - 401: token invalid, expired, not a refresh token, or no longer the one
///   stored for its user
pub async fn refresh(
    body: web::Json<RefreshRequest>,
    repositories: web::Data<Repositories>,
    issuer: web::Data<TokenIssuer>,
    validator: web::Data<TokenValidator>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let claims = validator.validate_kind(&body.refresh_token, TokenKind::Refresh)?;
    let user = repositories
        .users
        .find_by_id(claims.user_id())
        .await?
        .ok_or(AuthError::TokenInvalid)?;

    if user.refresh_token.as_deref() != Some(body.refresh_token.as_str()) {
        tracing::warn!(
            request_id = %context.request_id,
            user_id = %user.user_id,
            "Refresh token does not match the stored one"
        );
        return Err(AuthError::TokenInvalid.into());
    }

    let access_token = issuer.issue_access(&user.identity())?;
    let update = TokenUpdate {
        access_token: access_token.clone(),
        refresh_token: None,
    };
    repositories
        .users
        .upsert_tokens(&user.user_id, &update, Utc::now())
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(RefreshResponse {
        access_token,
        refresh_token: body.into_inner().refresh_token,
    }))
}

/// GET /api/v1/users?page=&recordPerPage=
pub async fn list_users(
    query: web::Query<PaginationQuery>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from_query(&query);
    let (users, total) = repositories.users.list(page).await?;

    Ok(HttpResponse::Ok().json(json!({
        "totalCount": total,
        "userItems": users,
    })))
}

/// GET /api/v1/users/{userId}
pub async fn get_user(
    path: web::Path<String>,
    repositories: web::Data<Repositories>,
) -> Result<HttpResponse, AppError> {
    let user = repositories
        .users
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(HttpResponse::Ok().json(json!({ "user": user.profile() })))
}
