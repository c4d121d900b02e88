//! # HidyBot Ops
//!
//! Deployment and lifecycle tooling for the Hiddify Telegram bot:
//! - Process lifecycle controller (PID-record stop, signature sweep, confirmed start)
//! - Install and update pipelines over git and pip
//! - Timestamped database backups
//! - Idempotent crontab registration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use hidybot_ops::OpsConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = OpsConfig::default();
//!     let lifecycle = cfg.lifecycle();
//!
//!     let pid = lifecycle.restart().await?;
//!     println!("Bot running (PID {pid})");
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod cron;
pub mod error;
pub mod exec;
pub mod git;
pub mod host;
pub mod install;
pub mod process;
pub mod update;
pub mod version;

// Re-export primary types
pub use config::OpsConfig;
pub use error::{OpsError, Result};
pub use process::{BotLifecycle, BotStatus, CommandSignature, LaunchSpec, LifecycleTimings, PidFile};
pub use version::Version;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
