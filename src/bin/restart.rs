use anyhow::Result;
use clap::{Parser, Subcommand};
use hidybot_ops::process::BotStatus;
use hidybot_ops::OpsConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hidybot-restart")]
#[command(about = "Start, stop and inspect the bot process", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bot installation directory
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Deployment config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the bot and confirm it stays up
    Start,
    /// Stop the bot: PID record first, then a process-table sweep
    Stop,
    /// Stop then start (the default)
    Restart,
    /// Report whether the bot is running
    Status,
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
    let lifecycle = cfg.lifecycle();

    match cli.command.unwrap_or(Commands::Restart) {
        Commands::Start => {
            let pid = lifecycle.start().await?;
            println!("✅ Bot running (PID {pid})");
        }
        Commands::Stop => {
            lifecycle.stop().await?;
            println!("🛑 Bot stopped");
        }
        Commands::Restart => {
            let pid = lifecycle.restart().await?;
            println!("🔄 Bot restarted (PID {pid})");
        }
        Commands::Status => match lifecycle.status().await? {
            BotStatus::Running { pid, tracked: true } => println!("🟢 RUNNING (PID {pid})"),
            BotStatus::Running {
                pid,
                tracked: false,
            } => println!("🟡 RUNNING (PID {pid}), but lifecycle tracking was lost"),
            BotStatus::NotRunning => println!("🔴 NOT RUNNING"),
        },
    }

    Ok(())
}
