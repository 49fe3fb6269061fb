//! General application configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Open the returned receipt URL with the system opener after an upload.
    #[serde(default)]
    pub open_upload_url: bool,

    /// Per-request HTTP timeout. `0` leaves the HTTP client default in place.
    #[serde(default)]
    pub request_timeout_secs: u64,
}

impl GeneralConfig {
    /// Configured request timeout, if any.
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(!config.open_upload_url);
        assert_eq!(config.request_timeout_secs, 0);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn nonzero_timeout_is_applied() {
        let config = GeneralConfig {
            request_timeout_secs: 30,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }
}
