use crate::cli::subcommands::CredentialArgs;
use crate::context::AppContext;
use crate::prompt::{self, Prompter};
use crate::screens::sign_in;

/// Put a token into the context's session for a one-shot command.
///
/// `--token` is used as is; otherwise the user signs in, with missing
/// credentials prompted for.
pub async fn establish(
    ctx: &AppContext,
    credentials: &CredentialArgs,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<()> {
    if let Some(token) = &credentials.token {
        ctx.session.set_token(token.trim());
        return Ok(());
    }

    let username = prompt::preset_or_ask(prompter, "Username", credentials.username.as_deref())?;
    let password = prompt::preset_or_ask(prompter, "Password", credentials.password.as_deref())?;
    sign_in::submit(ctx, &username, &password).await.into_result()?;
    Ok(())
}
