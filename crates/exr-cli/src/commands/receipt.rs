use exr_core::enums::{ExpenseCategory, ReceiptStage};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::receipt::ReceiptUploadArgs;
use crate::commands::session;
use crate::context::AppContext;
use crate::output::output;
use crate::prompt::StdinPrompter;
use crate::screens::receipt::{CameraSource, LibrarySource, ReceiptFlow, open_url};
use crate::ui;

#[derive(Serialize)]
struct ReceiptUploadResponse {
    uploaded: bool,
    url: String,
    file_name: String,
    date: String,
    price: String,
    category: ExpenseCategory,
}

/// Handle `exr receipt upload`.
pub async fn handle_upload(
    args: &ReceiptUploadArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    session::establish(ctx, &args.credentials, &mut prompter).await?;

    let mut flow = ReceiptFlow::new();
    if let Some(date) = &args.date {
        flow.metadata_mut().date.clone_from(date);
    }
    if let Some(price) = &args.price {
        flow.metadata_mut().price.clone_from(price);
    }
    flow.metadata_mut().category = args.category;

    let alert = if args.camera {
        let mut camera = CameraSource::new(ctx.config.capture.clone());
        flow.acquire(&mut camera, &mut prompter).await?
    } else {
        let mut library = args
            .image
            .clone()
            .map_or_else(LibrarySource::default, LibrarySource::with_path);
        flow.acquire(&mut library, &mut prompter).await?
    };
    if let Some(alert) = alert {
        anyhow::bail!("{}: {}", alert.title, alert.message);
    }
    if flow.stage() != ReceiptStage::FormVisible {
        anyhow::bail!("cancelled");
    }

    if args.price.is_none() || args.category.is_none() {
        flow.collect(&mut prompter)?;
    }
    let file_name = flow
        .image()
        .map(|image| image.file_name.clone())
        .unwrap_or_default();
    let metadata = flow.metadata().clone();

    let (result, alert) = flow.submit(ctx).await?.into_result()?;
    if let Some(alert) = &alert {
        ui::alert(alert);
    }
    if args.open || ctx.config.general.open_upload_url {
        open_url(&result.url);
    }

    output(
        &ReceiptUploadResponse {
            uploaded: true,
            url: result.url,
            file_name,
            date: metadata.date,
            price: metadata.price,
            category: metadata.category.unwrap_or(ExpenseCategory::Other),
        },
        flags.format,
    )
}
