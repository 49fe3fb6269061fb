//! Managed identity provider (Cognito user pool) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default country code prefixed to phone numbers entered without one.
fn default_country_code() -> String {
    String::from("+1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// AWS region hosting the user pool (e.g. `us-east-1`).
    #[serde(default)]
    pub region: String,

    /// User pool app client id.
    #[serde(default)]
    pub client_id: String,

    /// User pool id. Informational; the provider operations only need the client id.
    #[serde(default)]
    pub user_pool_id: String,

    /// Custom provider endpoint URL. If empty, built from `region`.
    #[serde(default)]
    pub endpoint: String,

    /// Country code for phone numbers typed without a leading `+`.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            client_id: String::new(),
            user_pool_id: String::new(),
            endpoint: String::new(),
            default_country_code: default_country_code(),
        }
    }
}

impl IdentityConfig {
    /// Check if the identity config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && (!self.region.is_empty() || !self.endpoint.is_empty())
    }

    /// Build the provider endpoint URL.
    ///
    /// Returns the custom `endpoint` if set, otherwise the regional Cognito endpoint.
    pub fn endpoint_url(&self) -> String {
        if self.endpoint.is_empty() {
            format!("https://cognito-idp.{}.amazonaws.com/", self.region)
        } else {
            self.endpoint.clone()
        }
    }

    /// Reject a country code that is not `+` followed by 1-3 digits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let digits = self.default_country_code.strip_prefix('+').unwrap_or("");
        if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidValue {
                field: "identity.default_country_code".into(),
                reason: format!(
                    "expected '+' followed by 1-3 digits, got '{}'",
                    self.default_country_code
                ),
            });
        }
        Ok(())
    }
}
