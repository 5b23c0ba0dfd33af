/// JWT Token Issuing and Validation
///
/// `TokenIssuer` signs access/refresh pairs, `TokenValidator` checks them.
/// Both take the shared secret from `JwtSettings` at construction.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, Identity, TokenKind};
use crate::configuration::JwtSettings;
use crate::error::{ConfigError, TokenError};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// A freshly signed access/refresh pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    issuer: String,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// # Errors
    /// Returns error if a lifetime is not positive or the access lifetime is
    /// not strictly shorter than the refresh lifetime. An empty secret is
    /// accepted here and rejected when signing.
    pub fn new(config: &JwtSettings) -> Result<Self, ConfigError> {
        if config.access_token_expiry <= 0 || config.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt token lifetimes must be positive".to_string(),
            ));
        }
        if config.access_token_expiry >= config.refresh_token_expiry {
            return Err(ConfigError::InvalidValue(format!(
                "jwt.access_token_expiry ({}s) must be shorter than jwt.refresh_token_expiry ({}s)",
                config.access_token_expiry, config.refresh_token_expiry
            )));
        }

        Ok(Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            access_ttl: config.access_token_expiry,
            refresh_ttl: config.refresh_token_expiry,
        })
    }

    /// Access token lifetime in seconds
    pub fn access_ttl(&self) -> i64 {
        self.access_ttl
    }

    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        self.issue_pair_at(identity, Utc::now())
    }

    /// Sign a new pair as if issued at `issued_at`
    pub fn issue_pair_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access_at(identity, issued_at)?;
        let refresh_claims = Claims::new(
            identity,
            TokenKind::Refresh,
            issued_at.timestamp(),
            self.refresh_ttl,
            &self.issuer,
        );
        let refresh_token = self.sign(&refresh_claims)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn issue_access(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_access_at(identity, Utc::now())
    }

    pub fn issue_access_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(
            identity,
            TokenKind::Access,
            issued_at.timestamp(),
            self.access_ttl,
            &self.issuer,
        );
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::Signing("JWT secret is not configured".to_string()));
        }

        encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

#[derive(Clone)]
pub struct TokenValidator {
    secret: String,
    issuer: String,
}

impl TokenValidator {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
        }
    }

    /// Verify signature, algorithm, issuer and expiry; return the claims
    ///
    /// # Errors
    /// - `InvalidSignature`: wrong algorithm, bad signature or foreign issuer
    /// - `Expired`: past `exp` (no leeway)
    /// - `Malformed`: anything that does not parse as one of our tokens
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidIssuer => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e.to_string()),
        })
    }

    /// Validate and additionally require a token of `kind`
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.validate(token)?;
        if claims.kind != kind {
            return Err(TokenError::Malformed(format!(
                "expected {:?} token, got {:?}",
                kind, claims.kind
            )));
        }
        Ok(claims)
    }
}
