mod confirm;
mod sign_in;
mod sign_up;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Handle `exr auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::SignUp(args) => sign_up::handle(args, ctx, flags).await,
        AuthCommands::Confirm(args) => confirm::handle_confirm(args, ctx, flags).await,
        AuthCommands::ResendCode(args) => confirm::handle_resend(args, ctx, flags).await,
        AuthCommands::SignIn(args) => sign_in::handle(args, ctx, flags).await,
    }
}
