use exr_core::identity::AuthIdentity;

use crate::context::AppContext;
use crate::progress::Progress;
use crate::screens::{Alert, Route, ScreenOutcome};

const ERROR_TITLE: &str = "Sign In Error";

/// Authenticate, store the token in the session, and go Home.
///
/// The value is the identity read from the new token; `None` if its claims
/// could not be read (the session is still signed in).
pub async fn submit(
    ctx: &AppContext,
    username: &str,
    password: &str,
) -> ScreenOutcome<Option<AuthIdentity>> {
    let gateway = match ctx.gateway() {
        Ok(gateway) => gateway,
        Err(error) => return ScreenOutcome::failed(Alert::failure(ERROR_TITLE, error.to_string())),
    };

    let progress = Progress::spinner("Signing in...");
    match exr_auth::sign_in(gateway, &ctx.session, username, password).await {
        Ok(tokens) => {
            progress.finish_clear();
            let identity = match ctx.session.identity() {
                Ok(identity) => Some(identity),
                Err(error) => {
                    tracing::warn!(%error, "signed in but the token's claims are unreadable");
                    None
                }
            };
            tracing::info!(%username, expires_in = ?tokens.expires_in, "signed in");
            ScreenOutcome::succeeded(identity, None, Some(Route::Home))
        }
        Err(error) => {
            progress.finish_err("sign-in failed");
            ScreenOutcome::failed(Alert::failure(ERROR_TITLE, error.to_string()))
        }
    }
}
