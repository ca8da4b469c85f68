mod arm;

use async_trait::async_trait;
use crate::error::ControlPlaneError;
use crate::target::{ConfigurationSnapshot, RepositoryAccess, SiteBinding, Subscription};

pub use arm::{ArmClient, SITES_API_VERSION, SUBSCRIPTIONS_API_VERSION};

pub type ControlPlaneResult<T> = std::result::Result<T, ControlPlaneError>;

/// Operations the deployment needs from the hosting control plane.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// The subscription the current credentials act on.
    async fn lookup_subscription(&self) -> ControlPlaneResult<Subscription>;

    async fn lookup_site(&self, subscription: &Subscription, site_name: &str) -> ControlPlaneResult<SiteBinding>;

    async fn get_config(&self, site: &SiteBinding) -> ControlPlaneResult<ConfigurationSnapshot>;

    /// Returns the deployment repository endpoint, provisioning the repository
    /// first if the site has none.
    async fn ensure_deployment_uri(&self, site: &SiteBinding) -> ControlPlaneResult<RepositoryAccess>;

    async fn clear_config(&self, site: &SiteBinding, key: &str) -> ControlPlaneResult<()>;

    async fn set_config(&self, site: &SiteBinding, key: &str, value: &str) -> ControlPlaneResult<()>;
}
