use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::{ConfirmArgs, ResendCodeArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::{StdinPrompter, preset_or_ask};
use crate::screens::confirm;
use crate::ui;

#[derive(Serialize)]
struct ConfirmResponse {
    username: String,
    confirmed: bool,
}

#[derive(Serialize)]
struct ResendResponse {
    username: String,
    destination: Option<String>,
    delivery_medium: Option<String>,
}

pub async fn handle_confirm(
    args: &ConfirmArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    let username = preset_or_ask(&mut prompter, "Username", args.username.as_deref())?;
    let code = preset_or_ask(&mut prompter, "Verification Code", args.code.as_deref())?;

    let ((), alert) = confirm::verify(ctx, &username, &code).await.into_result()?;
    if let Some(alert) = &alert {
        ui::alert(alert);
    }

    output(
        &ConfirmResponse {
            username,
            confirmed: true,
        },
        flags.format,
    )
}

pub async fn handle_resend(
    args: &ResendCodeArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    let username = preset_or_ask(&mut prompter, "Username", args.username.as_deref())?;

    let (delivery, alert) = confirm::resend(ctx, &username).await.into_result()?;
    if let Some(alert) = &alert {
        ui::alert(alert);
    }

    let (destination, delivery_medium) = delivery
        .map(|d| (d.destination, d.delivery_medium))
        .unwrap_or_default();
    output(
        &ResendResponse {
            username,
            destination,
            delivery_medium,
        },
        flags.format,
    )
}
