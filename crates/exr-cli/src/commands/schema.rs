use exr_core::entities::{ExpenseFormPayload, ReceiptSubmission, UploadResult};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaPayload};
use crate::output::output;

/// Handle `exr schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = match args.payload {
        SchemaPayload::Form => schema_for!(ExpenseFormPayload),
        SchemaPayload::Receipt => schema_for!(ReceiptSubmission),
        SchemaPayload::UploadResult => schema_for!(UploadResult),
    };
    output(&schema, flags.format)
}
