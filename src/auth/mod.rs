/// Authentication module
///
/// Handles JWT issuing/validation, the login token lifecycle and
/// password hashing.

mod claims;
mod lifecycle;
mod password;
mod tokens;

pub use claims::{Claims, Identity, TokenKind};
pub use lifecycle::{
    decide, resolve_session_tokens, SessionTokens, StoredTokens, TokenDecision, TokenUpdate,
};
pub use password::{hash_password, verify_password};
pub use tokens::{TokenIssuer, TokenPair, TokenValidator};
