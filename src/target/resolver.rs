use tracing::{debug, info};
use crate::control_plane::ControlPlane;
use crate::error::{ControlPlaneError, KuduUpdateError, Result};
use super::snapshot::ConfigurationSnapshot;
use super::types::{DeploymentTarget, SiteBinding, Subscription};

/// Everything the later stages need to know about the site.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub subscription: Subscription,
    pub site: SiteBinding,
    pub snapshot: ConfigurationSnapshot,
    pub target: DeploymentTarget,
}

pub struct TargetResolver<'a> {
    control_plane: &'a dyn ControlPlane,
}

impl<'a> TargetResolver<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane) -> Self {
        Self { control_plane }
    }

    pub async fn resolve(&self, site_name: &str) -> Result<ResolvedTarget> {
        if site_name.trim().is_empty() {
            return Err(KuduUpdateError::Usage("Site name must not be empty".into()));
        }

        let subscription = self.control_plane
            .lookup_subscription()
            .await
            .map_err(|e| KuduUpdateError::lookup("subscription", e))?;
        debug!(subscription = %subscription.id, "Resolved subscription");

        let site = self.control_plane
            .lookup_site(&subscription, site_name)
            .await
            .map_err(|e| KuduUpdateError::lookup("site", e))?;
        debug!(site = %site.name, resource_group = %site.resource_group, "Resolved site");

        let snapshot = self.control_plane
            .get_config(&site)
            .await
            .map_err(|e| KuduUpdateError::lookup("configuration", e))?;

        let access = self.control_plane
            .ensure_deployment_uri(&site)
            .await
            .map_err(|e| KuduUpdateError::lookup("deployment URI", e))?;

        let target = DeploymentTarget::from_repository(&site.name, &access).ok_or_else(|| {
            KuduUpdateError::lookup(
                "deployment URI",
                ControlPlaneError::InvalidResponse {
                    operation: "ensure_deployment_uri".into(),
                    message: "repository credentials are not in user:password form".into(),
                },
            )
        })?;

        info!(site = %site.name, endpoint = %target.endpoint_uri(), "Resolved deployment target");

        Ok(ResolvedTarget {
            subscription,
            site,
            snapshot,
            target,
        })
    }
}
