//! Interactive menu-driven session: the home screen and every workflow
//! screen. A screen's draft lives until the user navigates away from it.

use exr_core::entities::ExpenseFormInput;
use exr_core::enums::ReceiptStage;

use crate::context::AppContext;
use crate::prompt::{self, InputClosed, Prompter, StdinPrompter};
use crate::screens::receipt::{CameraSource, LibrarySource, ReceiptFlow, open_url};
use crate::screens::sign_up::SignUpForm;
use crate::screens::{Alert, Route, confirm, form, home, sign_in, sign_up};
use crate::ui;

/// Handle `exr shell`. End of input leaves quietly.
pub async fn handle(ctx: &AppContext) -> anyhow::Result<()> {
    let mut prompter = StdinPrompter;
    run(ctx, &mut prompter).await
}

async fn run(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    match event_loop(ctx, prompter).await {
        Err(error) if error.is::<InputClosed>() => {
            tracing::debug!("input closed, leaving shell");
            Ok(())
        }
        other => other,
    }
}

async fn event_loop(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    let mut route = Route::Home;

    loop {
        tracing::debug!(screen = route.title(), "navigate");
        route = match route {
            Route::Home => {
                let user = ctx.session.user_id().ok();
                match home::show(prompter, user.as_deref())? {
                    Some(next) => next,
                    None => return Ok(()),
                }
            }
            Route::SignUp => sign_up_screen(ctx, prompter).await?,
            Route::ConfirmSignUp { username } => confirm_screen(ctx, username, prompter).await?,
            Route::SignIn => sign_in_screen(ctx, prompter).await?,
            Route::TravelForm => form_screen(ctx, prompter).await?,
            Route::ReceiptUpload => receipt_screen(ctx, prompter).await?,
        };
    }
}

fn present(prompter: &mut dyn Prompter, alert: Option<&Alert>) {
    if let Some(alert) = alert {
        prompter.show(&ui::format_alert(alert));
    }
}

async fn sign_up_screen(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<Route> {
    let mut draft = SignUpForm::default();
    while prompt::menu(prompter, Route::SignUp.title(), &["Enter details and sign up"])?.is_some() {
        draft.edit(prompter)?;
        let outcome = sign_up::submit(ctx, &draft).await;
        present(prompter, outcome.alert.as_ref());
        if let Some(next) = outcome.navigate {
            return Ok(next);
        }
    }
    Ok(Route::Home)
}

async fn confirm_screen(
    ctx: &AppContext,
    username: Option<String>,
    prompter: &mut dyn Prompter,
) -> anyhow::Result<Route> {
    let mut username = username.unwrap_or_default();
    loop {
        let title = if username.is_empty() {
            Route::ConfirmSignUp { username: None }.title().to_string()
        } else {
            format!("Confirm Sign Up ({username})")
        };
        let Some(choice) = prompt::menu(prompter, &title, &["Verify code", "Resend code"])? else {
            return Ok(Route::Home);
        };

        username = prompt::field(prompter, "Username", &username)?;
        if choice == 0 {
            let code = prompt::answer(prompter, "Verification Code")?;
            let outcome = confirm::verify(ctx, &username, &code).await;
            present(prompter, outcome.alert.as_ref());
            if let Some(next) = outcome.navigate {
                return Ok(next);
            }
        } else {
            let outcome = confirm::resend(ctx, &username).await;
            present(prompter, outcome.alert.as_ref());
        }
    }
}

async fn sign_in_screen(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<Route> {
    while prompt::menu(prompter, Route::SignIn.title(), &["Sign in"])?.is_some() {
        let username = prompt::answer(prompter, "Username")?;
        let password = prompt::answer(prompter, "Password")?;
        let outcome = sign_in::submit(ctx, &username, &password).await;
        present(prompter, outcome.alert.as_ref());
        if let Some(next) = outcome.navigate {
            return Ok(next);
        }
    }
    Ok(Route::Home)
}

async fn form_screen(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<Route> {
    let mut draft = ExpenseFormInput::default();
    loop {
        match prompt::menu(prompter, Route::TravelForm.title(), &["Fill in form", "Submit"])? {
            None => return Ok(Route::Home),
            Some(0) => form::edit(&mut draft, prompter)?,
            Some(_) => {
                let outcome = form::submit(ctx, &draft).await;
                present(prompter, outcome.alert.as_ref());
                if let Some(receipt) = outcome.value {
                    draft = ExpenseFormInput::default();
                    if let Some(link) = receipt.download_url {
                        prompter.show(&format!("Download: {link}"));
                    }
                }
            }
        }
    }
}

async fn receipt_screen(ctx: &AppContext, prompter: &mut dyn Prompter) -> anyhow::Result<Route> {
    let mut flow = ReceiptFlow::new();
    loop {
        if flow.stage() == ReceiptStage::FormVisible {
            let title = receipt_title(&flow);
            match prompt::menu(prompter, &title, &["Enter details", "Upload", "Discard photo"])? {
                None => return Ok(Route::Home),
                Some(0) => flow.collect(prompter)?,
                Some(1) => {
                    let outcome = flow.submit(ctx).await?;
                    present(prompter, outcome.alert.as_ref());
                    if ctx.config.general.open_upload_url
                        && let Some(result) = &outcome.value
                    {
                        open_url(&result.url);
                    }
                }
                Some(_) => flow.discard()?,
            }
            continue;
        }

        let alert = match prompt::menu(
            prompter,
            Route::ReceiptUpload.title(),
            &["Take Photo", "Select Photo"],
        )? {
            None => return Ok(Route::Home),
            Some(0) => {
                let mut camera = CameraSource::new(ctx.config.capture.clone());
                flow.acquire(&mut camera, prompter).await?
            }
            Some(_) => flow.acquire(&mut LibrarySource::default(), prompter).await?,
        };
        present(prompter, alert.as_ref());
    }
}

fn receipt_title(flow: &ReceiptFlow) -> String {
    let metadata = flow.metadata();
    let file = flow.image().map_or("-", |image| image.file_name.as_str());
    let category = metadata.category.map_or("-", |category| category.label());
    format!(
        "Receipt Upload ({file}, date {}, price {}, category {category})",
        or_dash(&metadata.date),
        or_dash(&metadata.price),
    )
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::test_support::{can_bind_localhost, context_for, id_token};
    use crate::prompt::ScriptedPrompter;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x02\0\0\0";

    #[tokio::test]
    async fn zero_at_home_leaves() {
        let ctx = context_for("http://127.0.0.1:9");
        let mut prompter = ScriptedPrompter::new(&["0"]);
        run(&ctx, &mut prompter).await.unwrap();
        assert_eq!(prompter.remaining(), 0);
    }

    #[tokio::test]
    async fn end_of_input_leaves_quietly() {
        let ctx = context_for("http://127.0.0.1:9");
        let mut prompter = ScriptedPrompter::new(&["5"]);
        run(&ctx, &mut prompter).await.unwrap();
    }

    #[tokio::test]
    async fn cancelled_picker_shows_no_alert() {
        let ctx = context_for("http://127.0.0.1:9");
        // Receipt Upload, Select Photo, blank path, back, leave.
        let mut prompter = ScriptedPrompter::new(&["5", "2", "", "0", "0"]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert!(
            prompter
                .shown
                .iter()
                .all(|line| !line.contains("Photo Unavailable") && !line.contains("Upload Failed"))
        );
    }

    fn department_prompts(prompter: &ScriptedPrompter) -> Vec<&str> {
        prompter
            .prompts
            .iter()
            .map(String::as_str)
            .filter(|prompt| prompt.starts_with("Employee/Department"))
            .collect()
    }

    fn count_shown(prompter: &ScriptedPrompter, needle: &str) -> usize {
        prompter.shown.iter().filter(|line| line.contains(needle)).count()
    }

    #[tokio::test]
    async fn leaving_travel_form_discards_the_draft() {
        let ctx = context_for("http://127.0.0.1:9");
        let mut prompter = ScriptedPrompter::new(&[
            "4", "1", "Facilities", "", "", "", "n", "", "0", // fill, back
            "4", "1", "Roads", "", "", "", "n", "", "0", // re-enter, fill, back
            "0",
        ]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert_eq!(
            department_prompts(&prompter),
            vec!["Employee/Department: ", "Employee/Department: "]
        );
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_draft() {
        let ctx = context_for("http://127.0.0.1:9");
        ctx.session.set_token(id_token("alice"));
        let mut prompter = ScriptedPrompter::new(&[
            "4", "1", "Facilities", "", "", "", "n", "", // fill
            "2", // submit, school missing
            "1", "", "Lincoln High", "2024-06-30", "Conference", "n", "", // fill again
            "0", "0",
        ]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert_eq!(count_shown(&prompter, "Missing Information"), 1);
        assert_eq!(
            department_prompts(&prompter),
            vec!["Employee/Department: ", "Employee/Department [Facilities]: "]
        );
    }

    #[tokio::test]
    async fn successful_submit_starts_a_blank_form() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .respond_with(ResponseTemplate::new(200).set_body_string("File successfully processed."))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let mut prompter = ScriptedPrompter::new(&[
            "4", "1", "Facilities", "Lincoln High", "2024-06-30", "Conference", "n",
            "2024-06-10=12", "", // fill with one mileage entry
            "2", // submit
            "1", "", "", "", "", "n", "", // fill again
            "0", "0",
        ]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert_eq!(count_shown(&prompter, "Form submitted successfully"), 1);
        assert_eq!(
            department_prompts(&prompter),
            vec!["Employee/Department: ", "Employee/Department: "]
        );
    }

    #[tokio::test]
    async fn leaving_receipt_upload_discards_the_photo() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("taxi.png");
        std::fs::write(&image_path, PNG).unwrap();
        let image_path = image_path.display().to_string();

        let ctx = context_for("http://127.0.0.1:9");
        let mut prompter = ScriptedPrompter::new(&[
            "5", "2", &image_path, "0", // select photo, back
            "5", "0", // re-enter, back
            "0",
        ]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert_eq!(count_shown(&prompter, "1) Take Photo"), 2);
        assert_eq!(count_shown(&prompter, "1) Enter details"), 1);
    }

    #[tokio::test]
    async fn selected_photo_uploads_from_the_receipt_screen() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "File successfully uploaded",
                "url": "https://bucket.test/alice/taxi.png",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image.write_all(PNG).unwrap();
        let image_path = image.path().display().to_string();

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let mut prompter = ScriptedPrompter::new(&[
            "5", "2", &image_path, // Select Photo
            "1", "", "18.75", "meals", // Enter details
            "2", // Upload
            "0", "0",
        ]);
        run(&ctx, &mut prompter).await.unwrap();

        assert_eq!(prompter.remaining(), 0);
        assert_eq!(
            count_shown(&prompter, "File uploaded successfully: https://bucket.test/alice/taxi.png"),
            1
        );
        // Back on the photo choice after a successful upload.
        assert_eq!(count_shown(&prompter, "1) Take Photo"), 2);
    }
}
