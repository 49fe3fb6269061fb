//! # exr-auth
//!
//! Authentication for the exr expense client.
//!
//! Provides the identity provider client (register, authenticate, confirm,
//! resend code), the in-memory [`Session`] holding the bearer token, and
//! unverified decoding of the token's claims for the session user id.

pub mod claims;
pub mod error;
pub mod gateway;
mod phone;
pub mod session;

pub use claims::TokenClaims;
pub use error::AuthError;
pub use gateway::{AuthTokens, CodeDelivery, IdentityGateway, Registration, SignUpOutcome};
pub use phone::normalize_phone_number;
pub use session::Session;

/// Authenticate and store the resulting ID token in `session`.
///
/// On failure the session is left untouched.
///
/// # Errors
///
/// Propagates [`IdentityGateway::authenticate`] errors.
pub async fn sign_in(
    gateway: &IdentityGateway,
    session: &Session,
    username: &str,
    password: &str,
) -> Result<AuthTokens, AuthError> {
    let tokens = gateway.authenticate(username, password).await?;
    session.set_token(tokens.id_token.clone());
    Ok(tokens)
}
