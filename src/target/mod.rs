mod resolver;
mod snapshot;
mod types;

pub use resolver::{ResolvedTarget, TargetResolver};
pub use snapshot::ConfigurationSnapshot;
pub use types::{DeploymentTarget, RepositoryAccess, SiteBinding, Subscription};
