use anyhow::Context;
use clap::Parser;
use config_backup::backup::run_backup;
use config_backup::config::{parse_level, read_config, BackupConfig};
use config_backup::reconciliation::FailurePolicy;
use config_backup::remote::GiteaClient;
use config_backup::utils::{get_exe_relative_path, CONFIG_FILE_NAME};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Config Backup - push changed configuration files to a Gitea repository
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file.
    /// Defaults to backupUtil.cfg next to the executable.
    #[arg(short, long, env = "BACKUP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides LogLevel from the config
    #[arg(long, env = "BACKUP_LOG_LEVEL", value_parser = parse_level_arg)]
    log_level: Option<Level>,

    /// Keep processing the remaining files after one fails
    #[arg(long)]
    keep_going: bool,
}

fn parse_level_arg(value: &str) -> Result<Level, String> {
    parse_level(value).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = load_config(&args).await;

    let level = args
        .log_level
        .or_else(|| loaded.as_ref().ok().and_then(|c| c.level().ok()))
        .unwrap_or(Level::INFO);

    if let Err(e) = init_logging(level) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let policy = if args.keep_going {
        FailurePolicy::ContinueOnError
    } else {
        FailurePolicy::StopOnFirstError
    };

    match run(&config, policy).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stdout; RUST_LOG takes precedence over `level`
fn init_logging(level: Level) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn load_config(args: &Args) -> anyhow::Result<BackupConfig> {
    let path = match &args.config {
        Some(path) => path.clone(),
        None => get_exe_relative_path(CONFIG_FILE_NAME)
            .context("Failed to determine the configuration file path")?,
    };

    read_config(&path)
        .await
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Run one backup, returning whether every file succeeded
async fn run(config: &BackupConfig, policy: FailurePolicy) -> anyhow::Result<bool> {
    info!("Initializing Gitea client for {}", config.gitea_url);
    let client = GiteaClient::new(
        config.base_url()?,
        config.gitea_token.trim(),
        config.request_timeout(),
    )
    .context("Failed to initialize Gitea client")?;

    let report = run_backup(config, &client, policy)
        .await
        .context("Backup aborted")?;

    if report.is_success() {
        info!("Backup completed successfully");
    } else {
        error!(
            "Backup finished with {} failure(s), {} file(s) not attempted",
            report.failures().len(),
            report.not_attempted.len()
        );
    }

    Ok(report.is_success())
}
