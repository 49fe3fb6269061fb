//! In-memory session: at most one bearer token, shared by the screens that
//! need it.
//!
//! A `Session` is constructed once and handed to each consumer; clones share
//! the same slot. The token is never written to disk, never refreshed, and
//! never dropped on expiry. A token the server no longer accepts surfaces as
//! an ordinary submission failure.

use std::sync::{Arc, PoisonError, RwLock};

use exr_core::identity::AuthIdentity;

use crate::claims::TokenClaims;
use crate::error::AuthError;

#[derive(Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current token unconditionally.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// `Authorization` header value for the current token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no token is set.
    pub fn bearer(&self) -> Result<String, AuthError> {
        self.token()
            .map(|token| format!("Bearer {token}"))
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Claims of the current token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no token is set and
    /// [`AuthError::InvalidToken`] when the token cannot be decoded.
    pub fn claims(&self) -> Result<TokenClaims, AuthError> {
        let token = self.token().ok_or(AuthError::NotAuthenticated)?;
        TokenClaims::decode(&token)
    }

    /// Identity of the signed-in user, derived from the token.
    ///
    /// # Errors
    ///
    /// Same as [`Self::claims`].
    pub fn identity(&self) -> Result<AuthIdentity, AuthError> {
        self.claims().map(|claims| claims.to_identity())
    }

    /// The signed-in user's id: `cognito:username`, else the subject.
    ///
    /// # Errors
    ///
    /// Same as [`Self::claims`].
    pub fn user_id(&self) -> Result<String, AuthError> {
        self.claims().map(|claims| claims.user_id)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
