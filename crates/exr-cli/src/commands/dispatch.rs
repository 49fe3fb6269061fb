use crate::cli::subcommands::{FormCommands, ReceiptCommands};
use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => super::auth::handle(&action, ctx, flags).await,
        Commands::Form {
            action: FormCommands::Submit(args),
        } => super::form::handle_submit(&args, ctx, flags).await,
        Commands::Receipt {
            action: ReceiptCommands::Upload(args),
        } => super::receipt::handle_upload(&args, ctx, flags).await,
        Commands::Shell => super::shell::handle(ctx).await,
        Commands::Schema(args) => super::schema::handle(&args, flags),
    }
}
