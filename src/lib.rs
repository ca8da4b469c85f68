pub mod error;
pub mod config;
pub mod target;
pub mod control_plane;
pub mod flag;
pub mod upload;
pub mod deploy;

pub use error::{KuduUpdateError, ControlPlaneError, UploadError, Result};
pub use config::{DeployConfig, DEFAULT_MANAGEMENT_ENDPOINT};
pub use target::{ConfigurationSnapshot, DeploymentTarget, RepositoryAccess, ResolvedTarget, SiteBinding, Subscription, TargetResolver};
pub use control_plane::{ArmClient, ControlPlane, ControlPlaneResult};
pub use flag::{ConfigurationFinalizer, ConfigurationGuard, GuardOutcome, USE_PRIVATE_KUDU_KEY, USE_PRIVATE_KUDU_ENABLED};
pub use upload::{ArchiveDigest, ArchiveFile, ArchiveUploader, HttpArchiveUploader, UploadReceipt};
pub use deploy::{DeployContext, DeployFailure, DeployReport, DeployRequest, DeployStage, Deployment};
