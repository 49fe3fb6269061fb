use exr_auth::{IdentityGateway, Session};
use exr_config::{ConfigError, ExrConfig};
use exr_submit::SubmissionClient;

/// Everything a screen needs: configuration, the session, and the HTTP clients.
///
/// Built once per process. The shell keeps it for its whole lifetime, so the
/// session survives navigation between screens.
pub struct AppContext {
    pub config: ExrConfig,
    pub session: Session,
    pub submit: SubmissionClient,
    gateway: Option<IdentityGateway>,
}

impl AppContext {
    pub fn new(config: ExrConfig) -> anyhow::Result<Self> {
        let timeout = config.general.request_timeout();
        let gateway = if config.identity.is_configured() {
            Some(IdentityGateway::new(
                config.identity.endpoint_url(),
                config.identity.client_id.clone(),
                timeout,
            )?)
        } else {
            None
        };

        Ok(Self {
            submit: SubmissionClient::new(timeout)?,
            session: Session::new(),
            gateway,
            config,
        })
    }

    /// The identity provider client.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] when the identity section is incomplete.
    pub fn gateway(&self) -> Result<&IdentityGateway, ConfigError> {
        self.config.require_identity()?;
        self.gateway.as_ref().ok_or(ConfigError::NotConfigured {
            section: "identity",
            hint: "EXR_IDENTITY__CLIENT_ID and EXR_IDENTITY__REGION",
        })
    }
}


#[cfg(test)]
mod tests {
    use exr_config::ExrConfig;

    use super::AppContext;

    #[test]
    fn unconfigured_identity_is_reported() {
        let ctx = AppContext::new(ExrConfig::default()).unwrap();
        let err = ctx.gateway().unwrap_err();
        assert!(err.to_string().contains("identity"));
        assert!(!ctx.session.is_authenticated());
    }

    #[test]
    fn region_builds_gateway() {
        let mut config = ExrConfig::default();
        config.identity.client_id = "client".into();
        config.identity.region = "us-east-1".into();
        let ctx = AppContext::new(config).unwrap();
        assert!(ctx.gateway().is_ok());
    }
}
