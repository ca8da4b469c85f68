mod finalizer;
mod guard;

pub use finalizer::ConfigurationFinalizer;
pub use guard::{ConfigurationGuard, GuardOutcome};

/// App setting that routes the site to the private Kudu build.
pub const USE_PRIVATE_KUDU_KEY: &str = "USE_PRIVATE_KUDU";

pub const USE_PRIVATE_KUDU_ENABLED: &str = "1";
