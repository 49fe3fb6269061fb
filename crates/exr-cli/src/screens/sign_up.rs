use exr_auth::{Registration, SignUpOutcome, normalize_phone_number};

use crate::context::AppContext;
use crate::progress::Progress;
use crate::prompt::{self, Prompter};
use crate::screens::{Alert, Route, ScreenOutcome};

pub const ERROR_TITLE: &str = "Sign Up Error";

/// The five registration fields as typed. The phone is normalized on submit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub email: String,
    pub nickname: String,
    pub phone_number: String,
}

impl SignUpForm {
    /// Prompt for every field, keeping what was typed on a previous attempt.
    pub fn edit(&mut self, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
        self.username = prompt::field(prompter, "Username", &self.username)?;
        self.password = prompt::answer(prompter, "Password")?;
        self.email = prompt::field(prompter, "Email", &self.email)?;
        self.nickname = prompt::field(prompter, "Nickname", &self.nickname)?;
        self.phone_number = prompt::field(prompter, "Phone Number", &self.phone_number)?;
        Ok(())
    }
}

/// Register the user; on success move to Confirm Sign Up with the username.
pub async fn submit(ctx: &AppContext, form: &SignUpForm) -> ScreenOutcome<SignUpOutcome> {
    let gateway = match ctx.gateway() {
        Ok(gateway) => gateway,
        Err(error) => return ScreenOutcome::failed(Alert::failure(ERROR_TITLE, error.to_string())),
    };

    let phone_number =
        normalize_phone_number(&form.phone_number, &ctx.config.identity.default_country_code);
    let progress = Progress::spinner("Registering...");
    let result = gateway
        .register(Registration {
            username: &form.username,
            password: &form.password,
            email: &form.email,
            nickname: &form.nickname,
            phone_number: &phone_number,
        })
        .await;

    match result {
        Ok(outcome) => {
            progress.finish_clear();
            tracing::info!(username = %form.username, confirmed = outcome.user_confirmed, "registered");
            ScreenOutcome::succeeded(
                outcome,
                Some(Alert::success(
                    "Success",
                    "User registered successfully! Please confirm your email.",
                )),
                Some(Route::ConfirmSignUp {
                    username: Some(form.username.clone()),
                }),
            )
        }
        Err(error) => {
            progress.finish_err("registration failed");
            tracing::debug!(code = error.provider_code().unwrap_or("-"), "sign-up rejected");
            ScreenOutcome::failed(Alert::failure(ERROR_TITLE, error.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::context::test_support::{can_bind_localhost, context_for};
    use crate::prompt::ScriptedPrompter;

    fn alice() -> SignUpForm {
        SignUpForm {
            username: "alice".into(),
            password: "Str0ng!pw".into(),
            email: "a@x.com".into(),
            nickname: "Al".into(),
            phone_number: "5551234567".into(),
        }
    }

    #[tokio::test]
    async fn sign_up_prefixes_country_code_and_navigates_to_confirm() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-amz-target", "AWSCognitoIdentityProviderService.SignUp"))
            .and(body_partial_json(serde_json::json!({
                "Username": "alice",
                "UserAttributes": [
                    {"Name": "email", "Value": "a@x.com"},
                    {"Name": "nickname", "Value": "Al"},
                    {"Name": "phone_number", "Value": "+15551234567"},
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "UserConfirmed": false,
                "UserSub": "3b1e-uuid",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = submit(&context_for(&server.uri()), &alice()).await;

        assert_eq!(
            outcome.navigate,
            Some(Route::ConfirmSignUp {
                username: Some("alice".into())
            })
        );
        assert_eq!(
            outcome.alert,
            Some(Alert::success(
                "Success",
                "User registered successfully! Please confirm your email."
            ))
        );
    }

    #[tokio::test]
    async fn duplicate_username_alerts_and_stays() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "__type": "UsernameExistsException",
                "message": "User already exists",
            })))
            .mount(&server)
            .await;

        let outcome = submit(&context_for(&server.uri()), &alice()).await;

        assert_eq!(outcome.navigate, None);
        assert_eq!(
            outcome.alert,
            Some(Alert::failure(ERROR_TITLE, "User already exists"))
        );
    }

    #[test]
    fn edit_keeps_previous_answers_but_always_asks_password() {
        let mut form = alice();
        let mut prompter = ScriptedPrompter::new(&["", "N3w!pw", "", "", "+445550000"]);
        form.edit(&mut prompter).unwrap();
        assert_eq!(form.username, "alice");
        assert_eq!(form.password, "N3w!pw");
        assert_eq!(form.phone_number, "+445550000");
    }
}
