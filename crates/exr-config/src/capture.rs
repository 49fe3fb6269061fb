//! Camera capture configuration.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the output file path in `camera_command`.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Shell-free command line that writes a photo to `{output}`,
    /// e.g. `libcamera-still -n -o {output}` or `fswebcam --no-banner {output}`.
    #[serde(default)]
    pub camera_command: String,
}

impl CaptureConfig {
    /// A camera is available when a capture command is set and names its output.
    pub fn is_configured(&self) -> bool {
        !self.camera_command.trim().is_empty() && self.camera_command.contains(OUTPUT_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!CaptureConfig::default().is_configured());
    }

    #[test]
    fn command_without_placeholder_is_not_configured() {
        let config = CaptureConfig {
            camera_command: "fswebcam shot.jpg".into(),
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn command_with_placeholder_is_configured() {
        let config = CaptureConfig {
            camera_command: "fswebcam --no-banner {output}".into(),
        };
        assert!(config.is_configured());
    }
}
