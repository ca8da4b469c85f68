use tracing::info;
use crate::control_plane::ControlPlane;
use crate::error::{KuduUpdateError, Result};
use crate::target::SiteBinding;

pub struct ConfigurationFinalizer<'a> {
    control_plane: &'a dyn ControlPlane,
    key: &'a str,
    value: &'a str,
}

impl<'a> ConfigurationFinalizer<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, key: &'a str, value: &'a str) -> Self {
        Self { control_plane, key, value }
    }

    /// Sets `key=value` on the site. Safe whether or not the key already exists.
    pub async fn set_flag(&self, site: &SiteBinding) -> Result<()> {
        println!("--> Setting {} setting", self.key);

        self.control_plane
            .set_config(site, self.key, self.value)
            .await
            .map_err(|e| KuduUpdateError::command(format!("add {}={}", self.key, self.value), e))?;

        info!(site = %site.name, key = self.key, value = self.value, "Flag set");
        Ok(())
    }
}
