/// JWT Authentication Middleware
///
/// Accepts an access token from `Authorization: Bearer <token>` or from the
/// bare `token` header, validates it and injects the claims into request
/// extensions for the handlers. Refresh tokens are refused.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{TokenKind, TokenValidator};
use crate::error::{AppError, AuthError};

const TOKEN_HEADER: &str = "token";

/// JWT middleware for protecting routes
pub struct JwtMiddleware {
    validator: TokenValidator,
}

impl JwtMiddleware {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    validator: TokenValidator,
}

/// Bearer token first, then the plain `token` header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    let plain = || {
        headers
            .get(TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
    };

    bearer
        .or_else(plain)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match extract_token(req.headers()) {
            Some(token) => token,
            None => {
                tracing::warn!(path = %req.path(), "Missing authentication token");
                let error: Error = AppError::Auth(AuthError::MissingToken).into();
                return Box::pin(async move { Err(error) });
            }
        };

        match self.validator.validate_kind(&token, TokenKind::Access) {
            Ok(claims) => {
                tracing::debug!(
                    user_id = %claims.user_id(),
                    email = %claims.email,
                    "JWT validated successfully"
                );
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), error = %e, "JWT validation failed");
                let error: Error = AppError::Token(e).into();
                Box::pin(async move { Err(error) })
            }
        }
    }
}
