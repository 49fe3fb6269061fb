use exr_core::entities::ExpenseFormInput;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::form::FormSubmitArgs;
use crate::commands::session;
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::StdinPrompter;
use crate::screens::form;
use crate::ui;

#[derive(Serialize)]
struct FormSubmitResponse {
    submitted: bool,
    download_url: Option<String>,
    response: String,
}

/// Handle `exr form submit`. Fields left off the command line are sent
/// empty and caught by the required-field check.
pub async fn handle_submit(
    args: &FormSubmitArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let input = input_from_args(args);
    input.validate()?;

    session::establish(ctx, &args.credentials, &mut StdinPrompter).await?;

    let (receipt, alert) = form::submit(ctx, &input).await.into_result()?;
    if let Some(alert) = &alert {
        ui::alert(alert);
    }

    output(
        &FormSubmitResponse {
            submitted: true,
            download_url: receipt.download_url,
            response: receipt.raw,
        },
        flags.format,
    )
}

fn input_from_args(args: &FormSubmitArgs) -> ExpenseFormInput {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    ExpenseFormInput {
        employee_department: text(&args.department),
        school: text(&args.school),
        period_ending: text(&args.period_ending),
        trip_purpose: text(&args.trip_purpose),
        travel: args.travel,
        travel_start_date: args.travel_start.clone(),
        travel_end_date: args.travel_end.clone(),
        mileage: args.mileage.iter().cloned().collect(),
    }
}
