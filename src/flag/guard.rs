use tracing::debug;
use crate::control_plane::ControlPlane;
use crate::error::{KuduUpdateError, Result};
use crate::target::{ConfigurationSnapshot, SiteBinding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The key was present and cleared using this exact spelling.
    Cleared(String),
    Skipped,
}

/// Clears the flag ahead of the upload so it can't interfere with it.
pub struct ConfigurationGuard<'a> {
    control_plane: &'a dyn ControlPlane,
    key: &'a str,
}

impl<'a> ConfigurationGuard<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, key: &'a str) -> Self {
        Self { control_plane, key }
    }

    pub async fn clear_if_present(
        &self,
        site: &SiteBinding,
        snapshot: &ConfigurationSnapshot,
    ) -> Result<GuardOutcome> {
        let Some(token) = snapshot.find_token(self.key) else {
            debug!(site = %site.name, key = self.key, "Flag not present, nothing to clear");
            return Ok(GuardOutcome::Skipped);
        };

        println!("--> Clearing {} setting", self.key);

        self.control_plane
            .clear_config(site, &token)
            .await
            .map_err(|e| KuduUpdateError::command(format!("clear {}", token), e))?;

        Ok(GuardOutcome::Cleared(token))
    }
}
