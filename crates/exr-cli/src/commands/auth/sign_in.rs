use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::SignInArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::{StdinPrompter, preset_or_ask};
use crate::screens::sign_in;

#[derive(Serialize)]
struct SignInResponse {
    authenticated: bool,
    user_id: Option<String>,
    email: Option<String>,
    expires_at: Option<String>,
    /// Pass to `--token` on later one-shot commands.
    id_token: String,
}

pub async fn handle(args: &SignInArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    let username = preset_or_ask(&mut prompter, "Username", args.username.as_deref())?;
    let password = preset_or_ask(&mut prompter, "Password", args.password.as_deref())?;

    let (identity, _) = sign_in::submit(ctx, &username, &password).await.into_result()?;
    let claims = ctx.session.claims().ok();

    output(
        &SignInResponse {
            authenticated: true,
            user_id: identity.as_ref().map(|i| i.user_id.clone()),
            email: identity.and_then(|i| i.email),
            expires_at: claims
                .and_then(|c| c.expires_at)
                .map(|at| at.to_rfc3339()),
            id_token: ctx.session.token().unwrap_or_default(),
        },
        flags.format,
    )
}
