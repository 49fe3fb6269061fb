use anyhow::Context;
use exr_config::ExrConfig;

use crate::cli::GlobalFlags;

/// Load configuration, reading `--env-file` or the nearest `.env` first.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ExrConfig> {
    match &flags.env_file {
        Some(path) => ExrConfig::load_with_dotenv_from(path)
            .with_context(|| format!("failed to load configuration with {}", path.display())),
        None => ExrConfig::load_with_dotenv().context("failed to load configuration"),
    }
}

/// Emit warnings for env var keys that look like config but did not land anywhere.
pub fn warn_unconfigured(config: &ExrConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &ExrConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let single_underscore = |section: &str| {
        let prefix = format!("EXR_{section}_");
        let nested = format!("EXR_{section}__");
        env_keys
            .iter()
            .any(|key| key.starts_with(&prefix) && !key.starts_with(&nested))
    };

    let mut warnings = Vec::new();

    if !config.identity.is_configured() && single_underscore("IDENTITY") {
        warnings.push(
            "identity config is incomplete while EXR_IDENTITY_* env vars exist. Use double underscores (example: EXR_IDENTITY__CLIENT_ID)."
                .to_string(),
        );
    }

    if !config.endpoints.is_form_configured() && !config.endpoints.is_receipt_configured()
        && single_underscore("ENDPOINTS")
    {
        warnings.push(
            "endpoints are unset while EXR_ENDPOINTS_* env vars exist. Use double underscores (example: EXR_ENDPOINTS__FORM_URL)."
                .to_string(),
        );
    }

    if !config.capture.is_configured() && !config.capture.camera_command.trim().is_empty() {
        warnings.push(format!(
            "capture.camera_command has no {} placeholder; the camera is disabled.",
            exr_config::OUTPUT_PLACEHOLDER
        ));
    }

    warnings
}
