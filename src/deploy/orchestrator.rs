use chrono::Utc;
use tracing::{debug, info};

use crate::control_plane::ControlPlane;
use crate::flag::{ConfigurationFinalizer, ConfigurationGuard, USE_PRIVATE_KUDU_ENABLED, USE_PRIVATE_KUDU_KEY};
use crate::target::TargetResolver;
use crate::upload::ArchiveUploader;
use super::context::{DeployContext, DeployRequest};
use super::stage::{DeployFailure, DeployReport, StageTracker};

/// Resolve, guard, upload, finalize. Each stage starts only after the previous
/// one succeeded; the first error ends the run.
pub struct Deployment<'a> {
    control_plane: &'a dyn ControlPlane,
    uploader: &'a dyn ArchiveUploader,
    flag_key: &'a str,
    flag_value: &'a str,
}

impl<'a> Deployment<'a> {
    pub fn new(control_plane: &'a dyn ControlPlane, uploader: &'a dyn ArchiveUploader) -> Self {
        Self {
            control_plane,
            uploader,
            flag_key: USE_PRIVATE_KUDU_KEY,
            flag_value: USE_PRIVATE_KUDU_ENABLED,
        }
    }

    pub async fn run(&self, request: DeployRequest) -> Result<DeployReport, DeployFailure> {
        let started_at = Utc::now();
        let mut tracker = StageTracker::new();

        info!(site = %request.site_name, archive = %request.archive.path().display(), "Starting deployment");

        let resolved = TargetResolver::new(self.control_plane)
            .resolve(&request.site_name)
            .await
            .map_err(|e| tracker.fail(e))?;
        let ctx = DeployContext::new(request, resolved);
        tracker.advance();

        let guard = ConfigurationGuard::new(self.control_plane, self.flag_key)
            .clear_if_present(&ctx.site, &ctx.snapshot)
            .await
            .map_err(|e| tracker.fail(e))?;
        debug!(outcome = ?guard, "Guard stage finished");
        tracker.advance();

        let archive = ctx.archive.inspect().await.map_err(|e| tracker.fail(e))?;
        debug!(bytes = archive.size, sha256 = %archive.sha256, "Archive inspected");
        println!("--> Uploading kudu service zip file - {}", ctx.archive.path().display());
        let upload = self.uploader
            .upload(&ctx.archive, &ctx.target)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance();

        ConfigurationFinalizer::new(self.control_plane, self.flag_key, self.flag_value)
            .set_flag(&ctx.site)
            .await
            .map_err(|e| tracker.fail(e))?;
        tracker.advance();

        let finished_at = Utc::now();
        info!(site = %ctx.site_name(), bytes = upload.bytes_sent, "Deployment complete");

        Ok(DeployReport {
            site_name: ctx.site_name().to_string(),
            subscription_id: ctx.subscription.id,
            completed: tracker.into_completed(),
            guard,
            upload,
            archive,
            started_at,
            finished_at,
        })
    }
}
