use clap::{Args, Subcommand};

/// Identity provider commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account. A confirmation code is sent by email.
    SignUp(SignUpArgs),
    /// Confirm an account with the emailed code.
    Confirm(ConfirmArgs),
    /// Send a new confirmation code.
    ResendCode(ResendCodeArgs),
    /// Sign in and print the token's identity.
    SignIn(SignInArgs),
}

/// Missing values are prompted for.
#[derive(Clone, Debug, Args)]
pub struct SignUpArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub nickname: Option<String>,
    /// Phone number; the configured country code is added when it has no leading '+'.
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ConfirmArgs {
    #[arg(long)]
    pub username: Option<String>,
    /// Confirmation code from the email.
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ResendCodeArgs {
    #[arg(long)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SignInArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
}

/// How a one-shot command obtains its session.
///
/// Sessions live in memory only, so each one-shot command either signs in
/// inline or is handed a token from an earlier `auth sign-in`.
#[derive(Clone, Debug, Args)]
pub struct CredentialArgs {
    /// ID token to use as the bearer token.
    #[arg(long, conflicts_with_all = ["username", "password"])]
    pub token: Option<String>,
    /// Sign in as this user before submitting.
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long, requires = "username")]
    pub password: Option<String>,
}
