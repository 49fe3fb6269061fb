use std::path::PathBuf;

use clap::{Args, Subcommand};
use exr_core::enums::ExpenseCategory;

use crate::cli::subcommands::CredentialArgs;

/// Receipt commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReceiptCommands {
    /// Upload a receipt photo with its date, price, and category.
    Upload(ReceiptUploadArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ReceiptUploadArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Image file to upload. Without this or --camera the path is prompted for.
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
    /// Take the photo with the configured camera command.
    #[arg(long, conflicts_with = "image")]
    pub camera: bool,
    /// Receipt date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    /// One of the fixed expense categories, by name or label.
    #[arg(long, value_parser = |s: &str| s.parse::<ExpenseCategory>().map_err(|e| e.to_string()))]
    pub category: Option<ExpenseCategory>,
    /// Open the uploaded receipt URL with the system opener.
    #[arg(long)]
    pub open: bool,
}
