use base64::Engine as _;
use chrono::{DateTime, Utc};
use exr_core::identity::AuthIdentity;

use crate::error::AuthError;

/// Claims read from the session's ID token.
///
/// Decoded WITHOUT signature verification: the token is only ever sent back
/// to servers that verify it themselves. Used to stamp the user id on uploads
/// and for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// `cognito:username`, falling back to `sub`.
    pub user_id: String,
    pub subject: Option<String>,
    pub email: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the JWT format is invalid, the
    /// payload is not base64url JSON, or no user identifier claim is present.
    pub fn decode(jwt: &str) -> Result<Self, AuthError> {
        let parts: Vec<&str> = jwt.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::InvalidToken("invalid JWT format".into()));
        }
        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(format!("base64 decode failed: {e}")))?;
        let value: serde_json::Value = serde_json::from_slice(&payload)
            .map_err(|e| AuthError::InvalidToken(format!("JSON parse failed: {e}")))?;

        let text = |key: &str| {
            value[key]
                .as_str()
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        let subject = text("sub");
        let user_id = text("cognito:username")
            .or_else(|| subject.clone())
            .ok_or_else(|| AuthError::InvalidToken("missing cognito:username and sub claims".into()))?;
        let expires_at = value["exp"]
            .as_i64()
            .and_then(|exp| DateTime::from_timestamp(exp, 0));

        Ok(Self {
            user_id,
            subject,
            email: text("email"),
            expires_at,
        })
    }

    /// Convert to a lightweight `AuthIdentity` for cross-crate passing.
    #[must_use]
    pub fn to_identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }

    /// Whether the `exp` claim is in the past. Informational only: the
    /// session never drops a token on its own.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp <= Utc::now())
    }
}

#[cfg(test)]
pub(crate) fn make_jwt(payload: &str) -> String {
    let header = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#);
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(payload);
    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}
