use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{AuthCommands, FormCommands, ReceiptCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Register, confirm, and sign in against the identity provider.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Travel expense form.
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Receipt photos.
    Receipt {
        #[command(subcommand)]
        action: ReceiptCommands,
    },
    /// Interactive client with a home menu and one session for its lifetime.
    Shell,
    /// Print the JSON Schema of a request or response body.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Which body to describe.
    #[arg(value_enum)]
    pub payload: SchemaPayload,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaPayload {
    /// Expense form request body.
    Form,
    /// Receipt upload request body.
    Receipt,
    /// Receipt upload response body.
    UploadResult,
}
