mod context;
mod orchestrator;
mod stage;

pub use context::{DeployContext, DeployRequest};
pub use orchestrator::Deployment;
pub use stage::{DeployFailure, DeployReport, DeployStage};
