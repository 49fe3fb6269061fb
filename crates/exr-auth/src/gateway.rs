//! Identity provider client.
//!
//! Speaks the Cognito user-pool JSON protocol: every operation is a `POST /`
//! with `Content-Type: application/x-amz-json-1.1` and an `X-Amz-Target`
//! header naming the operation. The four operations used here are
//! unauthenticated (the app client id is the only credential), so no
//! request signing is needed.
//!
//! Each call is one independent round trip. Nothing is retried or cached.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<AttributeType<'a>>,
}

#[derive(Serialize)]
struct AuthParameters<'a> {
    #[serde(rename = "USERNAME")]
    username: &'a str,
    #[serde(rename = "PASSWORD")]
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthRequest<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUpRequest<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResendCodeRequest<'a> {
    client_id: &'a str,
    username: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResendCodeResponse {
    code_delivery_details: Option<CodeDelivery>,
}

#[derive(Deserialize)]
struct EmptyResponse {}

#[derive(Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

// ── Public types ───────────────────────────────────────────────────

/// Where a confirmation code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDelivery {
    pub destination: Option<String>,
    pub delivery_medium: Option<String>,
    pub attribute_name: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpOutcome {
    #[serde(default)]
    pub user_confirmed: bool,
    pub user_sub: Option<String>,
    pub code_delivery_details: Option<CodeDelivery>,
}

/// Tokens issued by a successful authentication.
///
/// `id_token` is the bearer token attached to expense submissions.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    pub id_token: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("id_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Registration fields, with the phone number already normalized.
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub nickname: &'a str,
    pub phone_number: &'a str,
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for the managed identity provider.
#[derive(Debug, Clone)]
pub struct IdentityGateway {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
}

impl IdentityGateway {
    /// Create a gateway for `endpoint` (e.g. `https://cognito-idp.us-east-1.amazonaws.com/`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "exr/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: endpoint.into(),
            client_id: client_id.into(),
        })
    }

    /// Register a new user. The caller normalizes `phone_number` first
    /// (see [`crate::normalize_phone_number`]).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] on policy violations (weak password,
    /// duplicate username, malformed phone number).
    pub async fn register(&self, registration: Registration<'_>) -> Result<SignUpOutcome, AuthError> {
        let request = SignUpRequest {
            client_id: &self.client_id,
            username: registration.username,
            password: registration.password,
            user_attributes: vec![
                AttributeType {
                    name: "email",
                    value: registration.email,
                },
                AttributeType {
                    name: "nickname",
                    value: registration.nickname,
                },
                AttributeType {
                    name: "phone_number",
                    value: registration.phone_number,
                },
            ],
        };
        let outcome: SignUpOutcome = self.call("SignUp", &request).await?;
        tracing::info!(
            username = registration.username,
            confirmed = outcome.user_confirmed,
            "user registered"
        );
        Ok(outcome)
    }

    /// Authenticate with username and password (`USER_PASSWORD_AUTH`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] on bad credentials or an unconfirmed
    /// account, and when the provider answers with a challenge instead of tokens.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: &self.client_id,
            auth_parameters: AuthParameters { username, password },
        };
        let response: InitiateAuthResponse = self.call("InitiateAuth", &request).await?;

        let Some(result) = response.authentication_result else {
            let challenge = response
                .challenge_name
                .unwrap_or_else(|| "no authentication result".into());
            return Err(AuthError::Provider {
                code: "ChallengeRequired".into(),
                message: format!("sign-in requires an unsupported step: {challenge}"),
            });
        };

        let id_token = result
            .id_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Parse("authentication result missing IdToken".into()))?;

        tracing::info!(username, "user authenticated");
        Ok(AuthTokens {
            id_token,
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: result.expires_in,
        })
    }

    /// Confirm a registration with the emailed/texted code.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] on a wrong or expired code.
    pub async fn confirm_registration(&self, username: &str, code: &str) -> Result<(), AuthError> {
        let request = ConfirmSignUpRequest {
            client_id: &self.client_id,
            username,
            confirmation_code: code.trim(),
        };
        let _: EmptyResponse = self.call("ConfirmSignUp", &request).await?;
        tracing::info!(username, "registration confirmed");
        Ok(())
    }

    /// Send a fresh confirmation code.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if the user does not exist or is already confirmed.
    pub async fn resend_confirmation_code(&self, username: &str) -> Result<Option<CodeDelivery>, AuthError> {
        let request = ResendCodeRequest {
            client_id: &self.client_id,
            username,
        };
        let response: ResendCodeResponse = self.call("ResendConfirmationCode", &request).await?;
        tracing::info!(username, "confirmation code resent");
        Ok(response.code_delivery_details)
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, AuthError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_vec(request)
            .map_err(|e| AuthError::Parse(format!("encode {operation}: {e}")))?;

        tracing::debug!(operation, endpoint = %self.endpoint, "identity provider request");
        let resp = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        let error_type_header = resp
            .headers()
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let text = resp.text().await?;

        if !status.is_success() {
            let error = provider_error(status.as_u16(), error_type_header.as_deref(), &text);
            tracing::warn!(
                operation,
                status = status.as_u16(),
                code = error.provider_code().unwrap_or("unknown"),
                "identity provider rejected request"
            );
            return Err(error);
        }

        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| AuthError::Parse(format!("{operation}: {e}")))
    }
}

/// Map a non-2xx provider reply to [`AuthError::Provider`].
///
/// The error code comes from the body's `__type` (or the `x-amzn-ErrorType`
/// header), with any `namespace#` prefix and `:suffix` removed.
fn provider_error(status: u16, header_type: Option<&str>, body: &str) -> AuthError {
    let parsed = serde_json::from_str::<ProviderErrorBody>(body).ok();
    let raw_code = parsed
        .as_ref()
        .and_then(|b| b.kind.as_deref())
        .or(header_type)
        .unwrap_or("");
    let code = raw_code
        .rsplit('#')
        .next()
        .unwrap_or(raw_code)
        .split(':')
        .next()
        .unwrap_or("")
        .to_string();
    let code = if code.is_empty() {
        format!("Http{status}")
    } else {
        code
    };
    let message = parsed
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("identity provider returned HTTP {status}"));
    AuthError::Provider { code, message }
}
