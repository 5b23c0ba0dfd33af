/// Session token lifecycle
///
/// On every login the user's stored tokens are inspected and the cheapest
/// valid outcome wins:
/// 1. Reuse: stored access token still valid, nothing is signed or written
/// 2. RefreshOnly: stored refresh token still valid, only a new access token
/// 3. FullReissue: a brand new pair
///
/// `decide` is pure; `resolve_session_tokens` persists its outcome.

use chrono::Utc;

use crate::auth::claims::{Identity, TokenKind};
use crate::auth::tokens::{TokenIssuer, TokenValidator};
use crate::error::{AppError, TokenError};
use crate::repository::TokenStore;

/// Which branch of the lifecycle produced the session tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenDecision {
    Reuse,
    RefreshOnly,
    FullReissue,
}

/// Token fields to write back; `refresh_token` is `None` when the stored
/// refresh token stays as it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUpdate {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Tokens currently stored on the user record
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredTokens<'a> {
    pub access_token: Option<&'a str>,
    pub refresh_token: Option<&'a str>,
}

/// Tokens handed back to the client after login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub decision: TokenDecision,
}

/// A stored token is usable when it validates, is of the expected kind and
/// belongs to `identity`.
fn still_valid(
    validator: &TokenValidator,
    token: Option<&str>,
    kind: TokenKind,
    identity: &Identity,
) -> bool {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => validator
            .validate_kind(token, kind)
            .map(|claims| claims.user_id() == identity.user_id)
            .unwrap_or(false),
        None => false,
    }
}

/// Pick the lifecycle branch for `identity` and sign whatever it needs.
///
/// Returns the session tokens and, unless the stored tokens are reused,
/// the update that must be persisted before the tokens are handed out.
pub fn decide(
    issuer: &TokenIssuer,
    validator: &TokenValidator,
    identity: &Identity,
    stored: StoredTokens<'_>,
) -> Result<(SessionTokens, Option<TokenUpdate>), TokenError> {
    if let Some(access) = stored
        .access_token
        .filter(|a| still_valid(validator, Some(a), TokenKind::Access, identity))
    {
        let session = SessionTokens {
            access_token: access.to_string(),
            refresh_token: stored.refresh_token.unwrap_or_default().to_string(),
            decision: TokenDecision::Reuse,
        };
        return Ok((session, None));
    }

    if let Some(refresh) = stored
        .refresh_token
        .filter(|r| still_valid(validator, Some(r), TokenKind::Refresh, identity))
    {
        let access_token = issuer.issue_access(identity)?;
        let update = TokenUpdate {
            access_token: access_token.clone(),
            refresh_token: None,
        };
        let session = SessionTokens {
            access_token,
            refresh_token: refresh.to_string(),
            decision: TokenDecision::RefreshOnly,
        };
        return Ok((session, Some(update)));
    }

    let pair = issuer.issue_pair(identity)?;
    let update = TokenUpdate {
        access_token: pair.access_token.clone(),
        refresh_token: Some(pair.refresh_token.clone()),
    };
    let session = SessionTokens {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        decision: TokenDecision::FullReissue,
    };
    Ok((session, Some(update)))
}

/// Run the lifecycle decision and persist any newly issued token.
///
/// # Errors
/// Signing failures surface as `AppError::Token`; a failed write fails the
/// whole call so no unsaved token ever reaches the client.
pub async fn resolve_session_tokens<S>(
    issuer: &TokenIssuer,
    validator: &TokenValidator,
    store: &S,
    identity: &Identity,
    stored: StoredTokens<'_>,
) -> Result<SessionTokens, AppError>
where
    S: TokenStore + ?Sized,
{
    let (session, update) = decide(issuer, validator, identity, stored)?;

    if let Some(update) = update {
        store
            .upsert_tokens(&identity.user_id, &update, Utc::now())
            .await?;
    }

    tracing::debug!(
        user_id = %identity.user_id,
        decision = ?session.decision,
        "Session tokens resolved"
    );

    Ok(session)
}
