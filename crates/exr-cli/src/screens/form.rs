use exr_core::entities::{ExpenseFormInput, FormReceipt};
use exr_submit::SubmitError;

use crate::context::AppContext;
use crate::progress::Progress;
use crate::prompt::{self, Prompter};
use crate::screens::{Alert, ScreenOutcome};

/// Parse a `DATE=MILES` mileage entry.
pub fn parse_mileage(value: &str) -> Result<(String, f64), String> {
    let (date, miles) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DATE=MILES, got '{value}'"))?;
    let date = date.trim();
    if date.is_empty() {
        return Err(format!("missing date in '{value}'"));
    }
    let miles = miles
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m >= 0.0)
        .ok_or_else(|| format!("miles must be a non-negative number in '{value}'"))?;
    Ok((date.to_string(), miles))
}

/// Prompt for every form field, starting from what is already in `input`.
pub fn edit(input: &mut ExpenseFormInput, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    input.employee_department =
        prompt::field(prompter, "Employee/Department", &input.employee_department)?;
    input.school = prompt::field(prompter, "School", &input.school)?;
    input.period_ending = prompt::field(prompter, "Period Ending (YYYY-MM-DD)", &input.period_ending)?;
    input.trip_purpose = prompt::field(prompter, "Trip Purpose", &input.trip_purpose)?;
    input.travel = prompt::yes_no(prompter, "Travel", input.travel)?;

    if input.travel {
        let start = input.travel_start_date.clone().unwrap_or_default();
        let end = input.travel_end_date.clone().unwrap_or_default();
        input.travel_start_date =
            Some(prompt::field(prompter, "Travel Start Date", &start)?).filter(|d| !d.is_empty());
        input.travel_end_date =
            Some(prompt::field(prompter, "Travel End Date", &end)?).filter(|d| !d.is_empty());
    }

    loop {
        let entry = prompt::answer(prompter, "Mileage (DATE=MILES, blank to finish)")?;
        if entry.is_empty() {
            break;
        }
        match parse_mileage(&entry) {
            Ok((date, miles)) => {
                input.mileage.insert(date, miles);
            }
            Err(reason) => prompter.show(&reason),
        }
    }
    Ok(())
}

/// Submit the form. Failures leave `input` as typed for another attempt.
pub async fn submit(ctx: &AppContext, input: &ExpenseFormInput) -> ScreenOutcome<FormReceipt> {
    if let Err(error) = input.validate() {
        return ScreenOutcome::failed(Alert::failure("Missing Information", error.to_string()));
    }
    let url = match ctx.config.require_form_url() {
        Ok(url) => url,
        Err(error) => return ScreenOutcome::failed(Alert::failure("Error", error.to_string())),
    };

    let progress = Progress::spinner("Submitting form...");
    match ctx.submit.submit_expense_form(url, &ctx.session, input).await {
        Ok(receipt) => {
            progress.finish_clear();
            ScreenOutcome::succeeded(
                receipt,
                Some(Alert::success("Success", "Form submitted successfully")),
                None,
            )
        }
        Err(SubmitError::Input(error)) => {
            progress.finish_clear();
            ScreenOutcome::failed(Alert::failure("Missing Information", error.to_string()))
        }
        Err(error) => {
            progress.finish_err("form submission failed");
            tracing::warn!(%error, "form submission failed");
            ScreenOutcome::failed(Alert::failure("Error", "Form submission failed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::test_support::{can_bind_localhost, context_for, id_token};
    use crate::prompt::ScriptedPrompter;

    fn complete() -> ExpenseFormInput {
        ExpenseFormInput {
            employee_department: "Facilities".into(),
            school: "Lincoln High".into(),
            period_ending: "2024-06-30".into(),
            trip_purpose: "Conference".into(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("2024-06-10=42.5", Ok(("2024-06-10".to_string(), 42.5)))]
    #[case(" 2024-06-11 = 3 ", Ok(("2024-06-11".to_string(), 3.0)))]
    #[case("42", Err(()))]
    #[case("=4", Err(()))]
    #[case("2024-06-10=-1", Err(()))]
    #[case("2024-06-10=far", Err(()))]
    fn mileage_entries(#[case] input: &str, #[case] expected: Result<(String, f64), ()>) {
        assert_eq!(parse_mileage(input).map_err(|_| ()), expected);
    }

    #[test]
    fn edit_collects_travel_dates_and_mileage() {
        let mut input = ExpenseFormInput::default();
        let mut prompter = ScriptedPrompter::new(&[
            "Facilities",
            "Lincoln High",
            "2024-06-30",
            "Conference",
            "y",
            "2024-06-10",
            "2024-06-12",
            "bogus",
            "2024-06-10=42",
            "",
        ]);
        edit(&mut input, &mut prompter).unwrap();

        assert!(input.travel);
        assert_eq!(input.travel_start_date.as_deref(), Some("2024-06-10"));
        assert_eq!(input.travel_end_date.as_deref(), Some("2024-06-12"));
        assert_eq!(input.mileage.get("2024-06-10"), Some(&42.0));
        assert_eq!(prompter.shown.len(), 1);
    }

    #[tokio::test]
    async fn success_alert_after_accepted_form() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .and(body_partial_json(serde_json::json!({"travel": "No"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("File successfully processed. Download link: https://files.test/r.pdf"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let outcome = submit(&ctx, &complete()).await;

        assert_eq!(
            outcome.alert,
            Some(Alert::success("Success", "Form submitted successfully"))
        );
        assert_eq!(
            outcome.value.unwrap().download_url.as_deref(),
            Some("https://files.test/r.pdf")
        );
    }

    #[tokio::test]
    async fn server_failure_is_generic_error() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let ctx = context_for(&server.uri());
        ctx.session.set_token(id_token("alice"));
        let outcome = submit(&ctx, &complete()).await;

        assert_eq!(
            outcome.alert,
            Some(Alert::failure("Error", "Form submission failed"))
        );
    }

    #[tokio::test]
    async fn empty_required_field_is_missing_information() {
        let ctx = context_for("http://127.0.0.1:9");
        ctx.session.set_token(id_token("alice"));
        let input = ExpenseFormInput {
            trip_purpose: String::new(),
            ..complete()
        };
        let outcome = submit(&ctx, &input).await;

        let alert = outcome.alert.unwrap();
        assert_eq!(alert.title, "Missing Information");
        assert!(alert.message.contains("tripPurpose"));
    }

    #[tokio::test]
    async fn blank_form_is_missing_information_before_endpoint_check() {
        let ctx = AppContext::new(exr_config::ExrConfig::default()).unwrap();
        let outcome = submit(&ctx, &ExpenseFormInput::default()).await;

        assert_eq!(outcome.alert.unwrap().title, "Missing Information");
    }

    #[tokio::test]
    async fn complete_form_without_endpoint_is_an_error() {
        let ctx = AppContext::new(exr_config::ExrConfig::default()).unwrap();
        let outcome = submit(&ctx, &complete()).await;

        assert_eq!(outcome.alert.unwrap().title, "Error");
    }
}
