use anyhow::Result;
use clap::Parser;
use hidybot_ops::install::{self, InstallOptions};
use hidybot_ops::OpsConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hidybot-install")]
#[command(about = "Install the bot: checkout, dependencies, first start, cron", long_about = None)]
struct Cli {
    /// Bot installation directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Repository to clone from
    #[arg(long)]
    repo: Option<String>,

    /// Branch to install
    #[arg(long)]
    branch: Option<String>,

    /// Re-run the configuration wizard even if a config exists
    #[arg(long)]
    reconfigure: bool,

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
    if let Some(repo) = cli.repo {
        cfg.repo_url = repo;
    }
    if let Some(branch) = cli.branch {
        cfg.branch = branch;
    }

    let opts = InstallOptions {
        reconfigure: cli.reconfigure,
        register_cron: !cli.no_cron,
    };
    let summary = install::run(&cfg, &opts).await?;

    println!("{}", "=".repeat(60));
    println!("✅ Installation complete");
    println!("   Version:  v{}", summary.version);
    println!("   PID:      {}", summary.pid);
    println!(
        "   Source:   {}",
        if summary.fresh_clone {
            "fresh clone"
        } else {
            "existing checkout (pulled)"
        }
    );
    println!("   Location: {}", cfg.install_dir.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
