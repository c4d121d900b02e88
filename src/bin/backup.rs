use anyhow::Result;
use clap::Parser;
use hidybot_ops::{backup, OpsConfig};
use std::path::PathBuf;

/// One-shot database backup, meant to be run from cron.
#[derive(Parser)]
#[command(name = "hidybot-backup")]
#[command(about = "Back up the bot database with a timestamped copy", long_about = None)]
struct Cli {
    /// Bot installation directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Deployment config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut cfg = OpsConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.dir {
        cfg.install_dir = dir;
    }

    match backup::backup_database(&cfg).await {
        Some(path) => println!("💾 Database backed up to {}", path.display()),
        None => println!("⚠️  Nothing backed up"),
    }

    Ok(())
}
