//! Screens of the expense client and the navigation between them.
//!
//! Each screen exposes its operation as an async function over
//! [`AppContext`](crate::context::AppContext) that returns a
//! [`ScreenOutcome`]: the alert to show, where to navigate next, and the
//! operation's result. One-shot commands call these directly; the shell adds
//! prompting and keeps the in-progress state between attempts.

pub mod confirm;
pub mod form;
pub mod home;
pub mod receipt;
pub mod sign_in;
pub mod sign_up;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Failure,
}

/// A modal message: title plus body.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Failure,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == AlertKind::Failure
    }
}

/// Navigation targets. `ConfirmSignUp` carries the username handed over by Sign Up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Route {
    Home,
    SignUp,
    ConfirmSignUp { username: Option<String> },
    SignIn,
    TravelForm,
    ReceiptUpload,
}

impl Route {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::SignUp => "Sign Up",
            Self::ConfirmSignUp { .. } => "Confirm Sign Up",
            Self::SignIn => "Sign In",
            Self::TravelForm => "Travel Form",
            Self::ReceiptUpload => "Receipt Upload",
        }
    }
}

/// What a screen operation produced.
#[derive(Debug)]
pub struct ScreenOutcome<T> {
    pub alert: Option<Alert>,
    pub navigate: Option<Route>,
    pub value: Option<T>,
}

impl<T> ScreenOutcome<T> {
    pub const fn succeeded(value: T, alert: Option<Alert>, navigate: Option<Route>) -> Self {
        Self {
            alert,
            navigate,
            value: Some(value),
        }
    }

    /// Failure: alert and stay on the screen.
    pub const fn failed(alert: Alert) -> Self {
        Self {
            alert: Some(alert),
            navigate: None,
            value: None,
        }
    }

    /// Nothing happened and nothing is shown (e.g. a cancelled picker).
    pub const fn quiet() -> Self {
        Self {
            alert: None,
            navigate: None,
            value: None,
        }
    }

    /// For one-shot commands: the value on success, the alert as an error otherwise.
    pub fn into_result(self) -> anyhow::Result<(T, Option<Alert>)> {
        match (self.value, self.alert) {
            (Some(value), alert) => Ok((value, alert)),
            (None, Some(alert)) => Err(anyhow::anyhow!("{}: {}", alert.title, alert.message)),
            (None, None) => Err(anyhow::anyhow!("cancelled")),
        }
    }
}
