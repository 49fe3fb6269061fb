use clap::{Args, Subcommand};

use crate::cli::subcommands::CredentialArgs;
use crate::screens::form::parse_mileage;

/// Travel expense form commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FormCommands {
    /// Submit the travel expense form.
    Submit(FormSubmitArgs),
}

#[derive(Clone, Debug, Args)]
pub struct FormSubmitArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Employee name or department.
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub school: Option<String>,
    /// Period ending date (YYYY-MM-DD).
    #[arg(long)]
    pub period_ending: Option<String>,
    #[arg(long)]
    pub trip_purpose: Option<String>,
    /// The expense involved travel.
    #[arg(long)]
    pub travel: bool,
    /// Travel start date, sent only with --travel.
    #[arg(long, requires = "travel")]
    pub travel_start: Option<String>,
    /// Travel end date, sent only with --travel.
    #[arg(long, requires = "travel")]
    pub travel_end: Option<String>,
    /// Miles driven on a date, as DATE=MILES. Repeatable.
    #[arg(long, value_name = "DATE=MILES", value_parser = parse_mileage)]
    pub mileage: Vec<(String, f64)>,
}
