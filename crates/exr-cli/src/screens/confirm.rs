use exr_auth::CodeDelivery;

use crate::context::AppContext;
use crate::progress::Progress;
use crate::screens::{Alert, Route, ScreenOutcome};

/// Verify the emailed code; on success move to Sign In.
pub async fn verify(ctx: &AppContext, username: &str, code: &str) -> ScreenOutcome<()> {
    const TITLE: &str = "Verification Error";
    let gateway = match ctx.gateway() {
        Ok(gateway) => gateway,
        Err(error) => return ScreenOutcome::failed(Alert::failure(TITLE, error.to_string())),
    };

    let progress = Progress::spinner("Verifying...");
    match gateway.confirm_registration(username, code).await {
        Ok(()) => {
            progress.finish_clear();
            tracing::info!(%username, "account confirmed");
            ScreenOutcome::succeeded(
                (),
                Some(Alert::success("Success", "Your account has been verified!")),
                Some(Route::SignIn),
            )
        }
        Err(error) => {
            progress.finish_err("verification failed");
            ScreenOutcome::failed(Alert::failure(TITLE, error.to_string()))
        }
    }
}

/// Ask the provider to send a new code. Stays on the screen either way.
pub async fn resend(ctx: &AppContext, username: &str) -> ScreenOutcome<Option<CodeDelivery>> {
    const TITLE: &str = "Resend Failed";
    let gateway = match ctx.gateway() {
        Ok(gateway) => gateway,
        Err(error) => return ScreenOutcome::failed(Alert::failure(TITLE, error.to_string())),
    };

    let progress = Progress::spinner("Requesting a new code...");
    match gateway.resend_confirmation_code(username).await {
        Ok(delivery) => {
            progress.finish_clear();
            ScreenOutcome::succeeded(
                delivery,
                Some(Alert::success(
                    "Resend Successful",
                    "A new verification code has been sent to your email.",
                )),
                None,
            )
        }
        Err(error) => {
            progress.finish_err("resend failed");
            ScreenOutcome::failed(Alert::failure(TITLE, error.to_string()))
        }
    }
}
