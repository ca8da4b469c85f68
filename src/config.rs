use std::time::Duration;
use reqwest::Url;
use crate::error::{KuduUpdateError, Result};

pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub management_endpoint: String,
    pub access_token: Option<String>,
    pub subscription_id: Option<String>,
    /// Applied to every HTTP request, the upload included. `None` leaves it to the client.
    pub timeout: Option<Duration>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            management_endpoint: DEFAULT_MANAGEMENT_ENDPOINT.to_string(),
            access_token: None,
            subscription_id: None,
            timeout: None,
        }
    }
}

impl DeployConfig {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.management_endpoint).map_err(|e| {
            KuduUpdateError::Config(format!(
                "Invalid management endpoint '{}': {}",
                self.management_endpoint, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(KuduUpdateError::Config(format!(
                "Management endpoint must be http(s), got '{}'",
                url.scheme()
            )));
        }

        if self.access_token().is_none() {
            return Err(KuduUpdateError::Config(
                "Access token required (--access-token or AZURE_ACCESS_TOKEN)".into(),
            ));
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(KuduUpdateError::Config("Timeout must be greater than zero".into()));
            }
        }

        Ok(())
    }

    /// Endpoint without a trailing slash, ready for appending resource paths.
    pub fn endpoint_base(&self) -> &str {
        self.management_endpoint.trim_end_matches('/')
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn user_agent() -> String {
        format!("kudu-update/{}", env!("CARGO_PKG_VERSION"))
    }
}
