use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kudu_update::{
    ArchiveFile, ArmClient, DeployConfig, DeployFailure, DeployReport, DeployRequest, Deployment,
    GuardOutcome, HttpArchiveUploader, KuduUpdateError, DEFAULT_MANAGEMENT_ENDPOINT,
    USE_PRIVATE_KUDU_ENABLED, USE_PRIVATE_KUDU_KEY,
};

const USAGE: &str = "Usage: kudu-update <site-name> <zip-file-path>";

#[derive(Parser)]
#[command(name = "kudu-update")]
#[command(about = "Upload a Kudu service zip to an App Service site and switch it to USE_PRIVATE_KUDU")]
#[command(version)]
struct Cli {
    /// App Service site name
    site_name: String,

    /// Path to the Kudu service zip file
    zip_file_path: PathBuf,

    /// Azure Resource Manager endpoint
    #[arg(long, env = "KUDU_UPDATE_MANAGEMENT_ENDPOINT", default_value = DEFAULT_MANAGEMENT_ENDPOINT)]
    management_endpoint: String,

    /// Bearer token for the management API
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Subscription ID (defaults to the first enabled subscription)
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    subscription: Option<String>,

    /// HTTP timeout in seconds for every request, the upload included
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument | ErrorKind::TooManyValues
        ) =>
        {
            eprintln!("{}", USAGE.red());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    let filter = if cli.verbose {
        EnvFilter::new("kudu_update=debug,info")
    } else {
        EnvFilter::new("kudu_update=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<DeployReport, Box<dyn std::error::Error>> {
    // Checked before any network call.
    let archive = ArchiveFile::open_checked(&cli.zip_file_path)?;

    if cli.site_name.trim().is_empty() {
        return Err(KuduUpdateError::Usage(USAGE.to_string()).into());
    }

    let config = DeployConfig {
        management_endpoint: cli.management_endpoint,
        access_token: cli.access_token,
        subscription_id: cli.subscription,
        timeout: cli.timeout_secs.map(Duration::from_secs),
    };

    let control_plane = ArmClient::new(&config)?;
    let uploader = HttpArchiveUploader::new(&config)?;

    info!(site = %cli.site_name, "Deploying {}", archive.path().display());

    let report = Deployment::new(&control_plane, &uploader)
        .run(DeployRequest::new(cli.site_name, archive))
        .await?;

    Ok(report)
}

fn print_report(report: &DeployReport) {
    if let GuardOutcome::Cleared(token) = &report.guard {
        info!("Cleared existing setting '{}' before upload", token);
    }
    println!(
        "{} Deployed {} in subscription {} ({} bytes, sha256 {}) in {}ms",
        "✓".green(),
        report.site_name,
        report.subscription_id,
        report.upload.bytes_sent,
        report.archive.sha256,
        report.duration_ms()
    );
}

fn print_error(err: Box<dyn std::error::Error>) {
    if let Some(failure) = err.downcast_ref::<DeployFailure>() {
        print_deploy_failure(failure);
        return;
    }

    eprintln!("{}", format!("✗ Error: {}", err).red());
}

fn print_deploy_failure(failure: &DeployFailure) {
    if let KuduUpdateError::Upload(upload) = &failure.error {
        if let Some(status) = upload.status {
            println!("Status code - {}", status);
        }
        if let Some(body) = &upload.body {
            println!("{}", body);
        }
    }

    eprintln!("{}", format!("✗ {}", failure).red());

    if let Some(cp) = failure.error.control_plane() {
        eprintln!("\n{}", format!("Control plane error [{}]", cp.error_code()).red());
        eprintln!("\n{}", "Suggestion:".yellow());
        for line in cp.suggestion().lines() {
            eprintln!("  {}", line);
        }
    }

    if failure.leaves_site_inconsistent() {
        eprintln!(
            "\n{}",
            format!(
                "warning: the archive was uploaded but {key} was not set. \
                 Add the app setting {key}={value} by hand to finish the deployment.",
                key = USE_PRIVATE_KUDU_KEY,
                value = USE_PRIVATE_KUDU_ENABLED,
            )
            .yellow()
        );
    }
    eprintln!();
}
