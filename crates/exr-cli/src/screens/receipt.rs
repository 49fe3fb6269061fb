//! Receipt capture: acquire a photo, collect its details, upload it.
//!
//! [`ReceiptFlow`] owns the stage machine and the typed metadata. A failed
//! upload returns to the details form with everything retained so the user
//! can retry; a cancelled picker returns to idle without an alert.

use std::path::{Path, PathBuf};

use anyhow::Context;
use exr_config::{CaptureConfig, OUTPUT_PLACEHOLDER};
use exr_core::entities::{ReceiptMetadata, ReceiptSubmission, UploadResult, validate_price};
use exr_core::enums::{ExpenseCategory, ReceiptStage};
use exr_submit::{EncodedImage, encode_image};

use crate::context::AppContext;
use crate::progress::Progress;
use crate::prompt::{self, InputClosed, Prompter};
use crate::screens::{Alert, ScreenOutcome};

const UPLOAD_FAILED: &str = "Upload Failed";

// ── Image sources ──────────────────────────────────────────────────

/// A photo on disk. Camera captures are deleted when this is dropped.
#[derive(Debug)]
pub struct PickedImage {
    path: PathBuf,
    temp: Option<tempfile::TempPath>,
}

impl PickedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is a camera capture named by us rather than the user.
    pub const fn is_capture(&self) -> bool {
        self.temp.is_some()
    }
}

#[derive(Debug)]
pub enum Acquisition {
    Picked(PickedImage),
    Cancelled,
}

/// Where photos come from.
pub trait ImageSource {
    /// Produce a photo, or `Cancelled` if the user backed out. Errors mean
    /// the source itself is unavailable.
    async fn acquire(&mut self, prompter: &mut dyn Prompter) -> anyhow::Result<Acquisition>;
}

/// Pick an existing file, either given up front or typed at the prompt.
#[derive(Debug, Default)]
pub struct LibrarySource {
    preset: Option<PathBuf>,
}

impl LibrarySource {
    pub const fn with_path(path: PathBuf) -> Self {
        Self { preset: Some(path) }
    }
}

impl ImageSource for LibrarySource {
    async fn acquire(&mut self, prompter: &mut dyn Prompter) -> anyhow::Result<Acquisition> {
        let path = match self.preset.take() {
            Some(path) => path,
            None => {
                let typed = prompt::answer(prompter, "Image path (blank to cancel)")?;
                if typed.is_empty() {
                    return Ok(Acquisition::Cancelled);
                }
                PathBuf::from(typed)
            }
        };
        Ok(Acquisition::Picked(PickedImage { path, temp: None }))
    }
}

/// Run the configured capture command into a temporary file.
///
/// A non-zero exit is an error. A zero exit that leaves the file empty means
/// the user closed the camera without taking a picture.
#[derive(Debug)]
pub struct CameraSource {
    capture: CaptureConfig,
}

impl CameraSource {
    pub const fn new(capture: CaptureConfig) -> Self {
        Self { capture }
    }
}

impl ImageSource for CameraSource {
    async fn acquire(&mut self, _prompter: &mut dyn Prompter) -> anyhow::Result<Acquisition> {
        if !self.capture.is_configured() {
            anyhow::bail!(
                "no camera configured; set capture.camera_command with an {OUTPUT_PLACEHOLDER} placeholder"
            );
        }

        let temp = tempfile::Builder::new()
            .prefix("receipt-")
            .tempfile()
            .context("failed to create a file for the photo")?
            .into_temp_path();
        let output = temp.to_string_lossy().into_owned();

        let mut argv = self
            .capture
            .camera_command
            .split_whitespace()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output));
        let program = argv.next().context("camera command is empty")?;

        tracing::debug!(%program, %output, "starting camera");
        let status = tokio::process::Command::new(&program)
            .args(argv)
            .status()
            .await
            .with_context(|| format!("failed to start camera command '{program}'"))?;
        if !status.success() {
            anyhow::bail!("camera command '{program}' failed ({status})");
        }

        let captured = tokio::fs::metadata(&temp).await.map(|m| m.len()).unwrap_or(0);
        if captured == 0 {
            return Ok(Acquisition::Cancelled);
        }

        Ok(Acquisition::Picked(PickedImage {
            path: temp.to_path_buf(),
            temp: Some(temp),
        }))
    }
}

// ── Flow ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ReceiptFlow {
    stage: ReceiptStage,
    image: Option<EncodedImage>,
    metadata: ReceiptMetadata,
}

impl ReceiptFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn stage(&self) -> ReceiptStage {
        self.stage
    }

    pub const fn metadata(&self) -> &ReceiptMetadata {
        &self.metadata
    }

    pub const fn metadata_mut(&mut self) -> &mut ReceiptMetadata {
        &mut self.metadata
    }

    pub const fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    fn advance(&mut self, next: ReceiptStage) -> anyhow::Result<()> {
        self.stage = self.stage.transition_to(next)?;
        tracing::debug!(stage = %self.stage, "receipt stage");
        Ok(())
    }

    /// Get a photo from `source` and encode it, ending on the details form.
    ///
    /// Returns the alert to show, if any. A cancelled picker shows nothing.
    pub async fn acquire(
        &mut self,
        source: &mut impl ImageSource,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<Option<Alert>> {
        if self.stage != ReceiptStage::Idle {
            self.advance(ReceiptStage::Idle)?;
            self.image = None;
        }

        let picked = match source.acquire(prompter).await {
            Ok(Acquisition::Picked(picked)) => picked,
            Ok(Acquisition::Cancelled) => {
                tracing::debug!("photo picker cancelled");
                return Ok(None);
            }
            Err(error) if error.is::<InputClosed>() => return Err(error),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "photo unavailable");
                return Ok(Some(Alert::failure("Photo Unavailable", format!("{error:#}"))));
            }
        };

        self.advance(ReceiptStage::PhotoAcquired)?;
        match encode_image(picked.path()).await {
            Ok(image) => {
                self.image = Some(if picked.is_capture() {
                    image.with_detected_extension()
                } else {
                    image
                });
                if self.metadata.date.trim().is_empty() {
                    self.metadata.date = today();
                }
                self.advance(ReceiptStage::FormVisible)?;
                Ok(None)
            }
            Err(error) => {
                self.advance(ReceiptStage::Idle)?;
                Ok(Some(Alert::failure(UPLOAD_FAILED, error.to_string())))
            }
        }
    }

    /// Prompt for date, price, and category, keeping current values on blank answers.
    pub fn collect(&mut self, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        if self.stage != ReceiptStage::FormVisible {
            anyhow::bail!("no photo selected");
        }

        self.metadata.date = prompt::field(prompter, "Date (YYYY-MM-DD)", &self.metadata.date)?;

        loop {
            let price = prompt::field(prompter, "Price", &self.metadata.price)?;
            match validate_price(&price) {
                Ok(_) => {
                    self.metadata.price = price;
                    break;
                }
                Err(error) => {
                    prompter.show(&error.to_string());
                    self.metadata.price.clear();
                }
            }
        }

        self.metadata.category = Some(pick_category(prompter, self.metadata.category)?);
        Ok(())
    }

    /// Upload the photo with its details as the signed-in user.
    pub async fn submit(&mut self, ctx: &AppContext) -> anyhow::Result<ScreenOutcome<UploadResult>> {
        if self.stage != ReceiptStage::FormVisible {
            anyhow::bail!("no photo selected");
        }
        let image = self.image.as_ref().context("no photo selected")?;

        let identity = match ctx.session.identity() {
            Ok(identity) => identity,
            Err(error) => {
                return Ok(ScreenOutcome::failed(Alert::failure(UPLOAD_FAILED, error.to_string())));
            }
        };
        let submission = match ReceiptSubmission::new(
            image.base64.clone(),
            &image.file_name,
            &identity.user_id,
            &self.metadata,
        ) {
            Ok(submission) => submission,
            Err(error) => {
                return Ok(ScreenOutcome::failed(Alert::failure(
                    "Missing Information",
                    error.to_string(),
                )));
            }
        };
        let url = match ctx.config.require_receipt_url() {
            Ok(url) => url,
            Err(error) => {
                return Ok(ScreenOutcome::failed(Alert::failure(UPLOAD_FAILED, error.to_string())));
            }
        };

        self.advance(ReceiptStage::Submitted)?;
        let progress = Progress::spinner("Uploading receipt...");
        match ctx.submit.upload_receipt(url, &ctx.session, &submission).await {
            Ok(result) => {
                progress.finish_clear();
                self.advance(ReceiptStage::Idle)?;
                self.image = None;
                self.metadata = ReceiptMetadata::default();
                let alert = Alert::success(
                    "Upload Successful",
                    format!("File uploaded successfully: {}", result.url),
                );
                Ok(ScreenOutcome::succeeded(result, Some(alert), None))
            }
            Err(error) => {
                progress.finish_err("upload failed");
                tracing::warn!(%error, "receipt upload failed");
                self.advance(ReceiptStage::FormVisible)?;
                Ok(ScreenOutcome::failed(Alert::failure(UPLOAD_FAILED, error.to_string())))
            }
        }
    }

    /// Drop the photo and details and go back to idle.
    pub fn discard(&mut self) -> anyhow::Result<()> {
        if self.stage != ReceiptStage::Idle {
            self.advance(ReceiptStage::Idle)?;
        }
        self.image = None;
        self.metadata = ReceiptMetadata::default();
        Ok(())
    }
}

/// Numbered picker over the fixed categories. Also accepts a name or label.
fn pick_category(
    prompter: &mut dyn Prompter,
    current: Option<ExpenseCategory>,
) -> anyhow::Result<ExpenseCategory> {
    let mut text = String::from("Category:");
    for (index, category) in ExpenseCategory::ALL.iter().enumerate() {
        let marker = if Some(*category) == current { " *" } else { "" };
        text.push_str(&format!("\n  {:>2}) {}{marker}", index + 1, category.label()));
    }
    prompter.show(&text);

    loop {
        let choice = prompt::field(
            prompter,
            "Category number",
            current.map(ExpenseCategory::label).unwrap_or_default(),
        )?;
        let picked = match choice.parse::<usize>() {
            Ok(n) => n
                .checked_sub(1)
                .and_then(|index| ExpenseCategory::ALL.get(index).copied()),
            Err(_) => choice.parse::<ExpenseCategory>().ok(),
        };
        match picked {
            Some(category) => return Ok(category),
            None => prompter.show(&format!(
                "Choose 1-{} from the list.",
                ExpenseCategory::ALL.len()
            )),
        }
    }
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Open the uploaded receipt with the system opener. Failures are only logged.
pub fn open_url(url: &str) {
    if let Err(error) = open::that(url) {
        tracing::warn!(%error, %url, "failed to open receipt URL");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::test_support::{can_bind_localhost, context_for, id_token};
    use crate::prompt::ScriptedPrompter;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn png_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("taxi.png");
        std::fs::write(&path, PNG).unwrap();
        path
    }

    async fn flow_on_form(path: PathBuf) -> ReceiptFlow {
        let mut flow = ReceiptFlow::new();
        let alert = flow
            .acquire(&mut LibrarySource::with_path(path), &mut ScriptedPrompter::new(&[]))
            .await
            .unwrap();
        assert_eq!(alert, None);
        assert_eq!(flow.stage(), ReceiptStage::FormVisible);
        flow
    }

    fn filled(flow: &mut ReceiptFlow) {
        let mut prompter = ScriptedPrompter::new(&["2024-06-11", "18.75", "4"]);
        flow.collect(&mut prompter).unwrap();
    }

    #[tokio::test]
    async fn acquired_photo_defaults_date_to_today() {
        let dir = tempfile::tempdir().unwrap();
        let flow = flow_on_form(png_file(&dir)).await;
        assert_eq!(flow.metadata().date, today());
        assert_eq!(flow.image().unwrap().file_name, "taxi.png");
    }

    #[tokio::test]
    async fn blank_library_answer_cancels_silently() {
        let mut flow = ReceiptFlow::new();
        let alert = flow
            .acquire(&mut LibrarySource::default(), &mut ScriptedPrompter::new(&[""]))
            .await
            .unwrap();
        assert_eq!(alert, None);
        assert_eq!(flow.stage(), ReceiptStage::Idle);
        assert!(flow.image().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn camera_closed_without_photo_cancels_silently() {
        let mut flow = ReceiptFlow::new();
        let mut camera = CameraSource::new(CaptureConfig {
            camera_command: "true {output}".into(),
        });
        let alert = flow
            .acquire(&mut camera, &mut ScriptedPrompter::new(&[]))
            .await
            .unwrap();
        assert_eq!(alert, None);
        assert_eq!(flow.stage(), ReceiptStage::Idle);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn camera_capture_is_named_after_its_format() {
        let dir = tempfile::tempdir().unwrap();
        let source = png_file(&dir);
        let mut flow = ReceiptFlow::new();
        let mut camera = CameraSource::new(CaptureConfig {
            camera_command: format!("cp {} {{output}}", source.display()),
        });
        let alert = flow
            .acquire(&mut camera, &mut ScriptedPrompter::new(&[]))
            .await
            .unwrap();

        assert_eq!(alert, None);
        assert_eq!(flow.stage(), ReceiptStage::FormVisible);
        let file_name = &flow.image().unwrap().file_name;
        assert!(file_name.starts_with("receipt-"), "{file_name}");
        assert!(file_name.ends_with(".png"), "{file_name}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_camera_is_photo_unavailable() {
        let mut flow = ReceiptFlow::new();
        let mut camera = CameraSource::new(CaptureConfig {
            camera_command: "false {output}".into(),
        });
        let alert = flow
            .acquire(&mut camera, &mut ScriptedPrompter::new(&[]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alert.title, "Photo Unavailable");
        assert_eq!(flow.stage(), ReceiptStage::Idle);
    }

    #[tokio::test]
    async fn unconfigured_camera_is_photo_unavailable() {
        let mut flow = ReceiptFlow::new();
        let mut camera = CameraSource::new(CaptureConfig::default());
        let alert = flow
            .acquire(&mut camera, &mut ScriptedPrompter::new(&[]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alert.title, "Photo Unavailable");
        assert!(alert.message.contains("{output}"));
    }

    #[tokio::test]
    async fn unreadable_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow = ReceiptFlow::new();
        let alert = flow
            .acquire(
                &mut LibrarySource::with_path(dir.path().join("missing.jpg")),
                &mut ScriptedPrompter::new(&[]),
            )
            .await
            .unwrap();
        assert_eq!(
            alert,
            Some(Alert::failure(UPLOAD_FAILED, "Image data is incomplete."))
        );
        assert_eq!(flow.stage(), ReceiptStage::Idle);
    }

    #[tokio::test]
    async fn collect_reasks_bad_price_and_accepts_category_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow = flow_on_form(png_file(&dir)).await;
        let mut prompter = ScriptedPrompter::new(&["", "ten", "18.75", "99", "4"]);
        flow.collect(&mut prompter).unwrap();

        assert_eq!(flow.metadata().date, today());
        assert_eq!(flow.metadata().price, "18.75");
        assert_eq!(
            flow.metadata().category,
            Some(ExpenseCategory::GroundTransportation)
        );
        assert!(prompter.shown.iter().any(|text| text.contains("14) Other")));
        assert_eq!(prompter.shown.len(), 3);
        assert_eq!(prompter.remaining(), 0);
    }

    #[tokio::test]
    async fn failed_upload_keeps_form_and_details() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "message": "Failed to upload image: AccessDenied",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let dir = tempfile::tempdir().unwrap();
        let mut flow = flow_on_form(png_file(&dir)).await;
        filled(&mut flow);
        let before = flow.metadata().clone();

        let outcome = flow.submit(&ctx).await.unwrap();

        let alert = outcome.alert.unwrap();
        assert_eq!(alert.title, UPLOAD_FAILED);
        assert!(alert.message.contains("Failed to upload image: AccessDenied"));
        assert_eq!(flow.stage(), ReceiptStage::FormVisible);
        assert_eq!(flow.metadata(), &before);
        assert!(flow.image().is_some());
    }

    #[tokio::test]
    async fn successful_upload_uses_session_user_and_resets() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(body_partial_json(serde_json::json!({
                "userId": "alice",
                "fileName": "taxi.png",
                "date": "2024-06-11",
                "price": "18.75",
                "category": "ground_transportation",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "File successfully uploaded",
                "url": "https://bucket.test/alice/taxi.png",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let dir = tempfile::tempdir().unwrap();
        let mut flow = flow_on_form(png_file(&dir)).await;
        filled(&mut flow);

        let outcome = flow.submit(&ctx).await.unwrap();

        assert_eq!(
            outcome.alert.unwrap().message,
            "File uploaded successfully: https://bucket.test/alice/taxi.png"
        );
        assert_eq!(flow.stage(), ReceiptStage::Idle);
        assert_eq!(flow.metadata(), &ReceiptMetadata::default());
    }

    #[tokio::test]
    async fn upload_without_session_alerts_and_stays() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for("http://127.0.0.1:9");
        let mut flow = flow_on_form(png_file(&dir)).await;
        filled(&mut flow);

        let outcome = flow.submit(&ctx).await.unwrap();
        assert_eq!(outcome.alert.unwrap().title, UPLOAD_FAILED);
        assert_eq!(flow.stage(), ReceiptStage::FormVisible);
    }

    #[tokio::test]
    async fn discard_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut flow = flow_on_form(png_file(&dir)).await;
        flow.discard().unwrap();
        assert_eq!(flow.stage(), ReceiptStage::Idle);
        assert!(flow.image().is_none());
    }
}
