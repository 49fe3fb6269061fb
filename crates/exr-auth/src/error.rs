use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not signed in: run `exr auth sign-in` or sign in from `exr shell`")]
    NotAuthenticated,

    /// The identity provider rejected the request. `message` is shown to the user as-is.
    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected identity provider response: {0}")]
    Parse(String),

    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

impl AuthError {
    /// Provider error code (e.g. `UsernameExistsException`), if this is a provider rejection.
    #[must_use]
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}
