use anyhow::Result;
use clap::Parser;
use hidybot_ops::update::{self, UpdateOptions, UpdateOutcome};
use hidybot_ops::OpsConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hidybot-update")]
#[command(about = "Update the bot: stop, back up, pull, migrate, restart", long_about = None)]
struct Cli {
    /// Bot installation directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Branch to pull from
    #[arg(long)]
    branch: Option<String>,

    /// Answer yes to the reinstall prompt
    #[arg(long, short)]
    yes: bool,

    /// Skip crontab registration
    #[arg(long)]
    no_cron: bool,

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
    if let Some(branch) = cli.branch {
        cfg.branch = branch;
    }

    let opts = UpdateOptions {
        assume_yes: cli.yes,
        register_cron: !cli.no_cron,
    };

    match update::run(&cfg, &opts).await? {
        UpdateOutcome::Updated(summary) => {
            println!("{}", "=".repeat(60));
            println!("✅ Update complete");
            println!("   Version:  v{} -> v{}", summary.from, summary.to);
            println!("   PID:      {}", summary.pid);
            match summary.backup {
                Some(path) => println!("   Backup:   {}", path.display()),
                None => println!("   Backup:   skipped"),
            }
            println!("{}", "=".repeat(60));
        }
        UpdateOutcome::Reinstalled(summary) => {
            println!("{}", "=".repeat(60));
            println!("✅ Reinstall complete");
            println!("   Version:  v{}", summary.version);
            println!("   PID:      {}", summary.pid);
            println!("{}", "=".repeat(60));
        }
    }

    Ok(())
}
