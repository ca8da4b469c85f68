use crate::target::{ConfigurationSnapshot, DeploymentTarget, ResolvedTarget, SiteBinding, Subscription};
use crate::upload::ArchiveFile;

/// Inputs for one deployment run.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub site_name: String,
    pub archive: ArchiveFile,
}

impl DeployRequest {
    pub fn new(site_name: impl Into<String>, archive: ArchiveFile) -> Self {
        Self {
            site_name: site_name.into(),
            archive,
        }
    }
}

/// State threaded from the resolver through every later stage.
#[derive(Debug, Clone)]
pub struct DeployContext {
    pub archive: ArchiveFile,
    pub subscription: Subscription,
    pub site: SiteBinding,
    pub snapshot: ConfigurationSnapshot,
    pub target: DeploymentTarget,
}

impl DeployContext {
    pub fn new(request: DeployRequest, resolved: ResolvedTarget) -> Self {
        Self {
            archive: request.archive,
            subscription: resolved.subscription,
            site: resolved.site,
            snapshot: resolved.snapshot,
            target: resolved.target,
        }
    }

    pub fn site_name(&self) -> &str {
        self.target.site_name()
    }
}
