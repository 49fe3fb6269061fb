use exr_auth::CodeDelivery;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::SignUpArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::{StdinPrompter, preset_or_ask};
use crate::screens::sign_up::{self, SignUpForm};
use crate::ui;

#[derive(Serialize)]
struct SignUpResponse {
    username: String,
    user_confirmed: bool,
    user_sub: Option<String>,
    code_delivery: Option<CodeDelivery>,
}

pub async fn handle(args: &SignUpArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    let form = SignUpForm {
        username: preset_or_ask(&mut prompter, "Username", args.username.as_deref())?,
        password: preset_or_ask(&mut prompter, "Password", args.password.as_deref())?,
        email: preset_or_ask(&mut prompter, "Email", args.email.as_deref())?,
        nickname: preset_or_ask(&mut prompter, "Nickname", args.nickname.as_deref())?,
        phone_number: preset_or_ask(&mut prompter, "Phone Number", args.phone.as_deref())?,
    };

    let (outcome, alert) = sign_up::submit(ctx, &form).await.into_result()?;
    if let Some(alert) = &alert {
        ui::alert(alert);
    }

    output(
        &SignUpResponse {
            username: form.username,
            user_confirmed: outcome.user_confirmed,
            user_sub: outcome.user_sub,
            code_delivery: outcome.code_delivery_details,
        },
        flags.format,
    )
}
