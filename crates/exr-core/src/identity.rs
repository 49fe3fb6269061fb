use serde::{Deserialize, Serialize};

/// Lightweight authenticated user identity for cross-crate passing.
///
/// Produced by `exr-auth` from the session token's claims and consumed by the
/// receipt upload, which stamps `user_id` into every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Identity provider username (`cognito:username`), or the subject id when absent.
    pub user_id: String,
    /// Email attribute carried in the token, when present.
    pub email: Option<String>,
}
