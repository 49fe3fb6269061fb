//! # exr-config
//!
//! Layered configuration loading for exr using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EXR_*` prefix, `__` as separator)
//! 2. The mobile client's `.env` names (`CLIENT_ID`, `AWS_REGION`, `USER_POOL_ID`,
//!    `API_ENDPOINT`, `IMAGE_UPLOAD_ENDPOINT`)
//! 3. Project-level `.exr/config.toml`
//! 4. User-level `~/.config/exr/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EXR_IDENTITY__CLIENT_ID` -> `identity.client_id`,
//! `EXR_ENDPOINTS__RECEIPT_URL` -> `endpoints.receipt_url`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use exr_config::ExrConfig;
//!
//! let config = ExrConfig::load_with_dotenv().expect("config");
//! if config.identity.is_configured() {
//!     println!("identity endpoint: {}", config.identity.endpoint_url());
//! }
//! ```

mod capture;
mod endpoints;
mod error;
mod general;
mod identity;

pub use capture::{CaptureConfig, OUTPUT_PLACEHOLDER};
pub use endpoints::EndpointsConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use identity::IdentityConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `.env` keys used by the mobile client, and where they land.
const LEGACY_ENV_KEYS: [(&str, &str); 5] = [
    ("CLIENT_ID", "identity.client_id"),
    ("AWS_REGION", "identity.region"),
    ("USER_POOL_ID", "identity.user_pool_id"),
    ("API_ENDPOINT", "endpoints.form_url"),
    ("IMAGE_UPLOAD_ENDPOINT", "endpoints.receipt_url"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExrConfig {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl ExrConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.identity.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (or the nearest ancestor
    /// holding one) before building the figment.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration after reading a specific `.env` file.
    pub fn load_with_dotenv_from(path: &Path) -> Result<Self, ConfigError> {
        dotenvy::from_path(path).map_err(|e| ConfigError::InvalidValue {
            field: "dotenv".into(),
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".exr/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: mobile-client .env names
        figment = figment.merge(Self::legacy_env());

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("EXR_").split("__"))
    }

    /// Require the identity provider section.
    pub fn require_identity(&self) -> Result<&IdentityConfig, ConfigError> {
        if self.identity.is_configured() {
            Ok(&self.identity)
        } else {
            Err(ConfigError::NotConfigured {
                section: "identity",
                hint: "EXR_IDENTITY__CLIENT_ID and EXR_IDENTITY__REGION",
            })
        }
    }

    /// Require the form endpoint.
    pub fn require_form_url(&self) -> Result<&str, ConfigError> {
        if self.endpoints.is_form_configured() {
            Ok(&self.endpoints.form_url)
        } else {
            Err(ConfigError::NotConfigured {
                section: "endpoints.form_url",
                hint: "EXR_ENDPOINTS__FORM_URL",
            })
        }
    }

    /// Require the receipt upload endpoint.
    pub fn require_receipt_url(&self) -> Result<&str, ConfigError> {
        if self.endpoints.is_receipt_configured() {
            Ok(&self.endpoints.receipt_url)
        } else {
            Err(ConfigError::NotConfigured {
                section: "endpoints.receipt_url",
                hint: "EXR_ENDPOINTS__RECEIPT_URL",
            })
        }
    }

    fn legacy_env() -> Env {
        let keys: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(key, _)| *key).collect();
        Env::raw().only(&keys).map(map_legacy_key)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("exr").join("config.toml"))
    }
}

fn map_legacy_key(key: &UncasedStr) -> Uncased<'_> {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(legacy, _)| key.as_str().eq_ignore_ascii_case(legacy))
        .map_or_else(|| Uncased::from(key.as_str()), |(_, nested)| Uncased::from(*nested))
}
