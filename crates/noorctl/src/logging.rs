//! Logging setup for noorctl
//!
//! One-shot commands log to stderr. The dashboard owns the terminal, so it
//! logs to a file instead:
//! 1. $NOORCTL_LOG_FILE (explicit override)
//! 2. $XDG_STATE_HOME/noor/noorctl.log
//! 3. ~/.local/state/noor/noorctl.log
//!
//! Filter comes from $NOOR_LOG (EnvFilter syntax).

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Discover log file path with fallback chain
pub fn discover_log_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NOORCTL_LOG_FILE") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg_state).join("noor").join("noorctl.log"));
    }

    dirs::home_dir().map(|home| home.join(".local/state/noor/noorctl.log"))
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env("NOOR_LOG").unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber
pub fn init_logging(target: LogTarget, verbose: bool) -> Result<()> {
    match target {
        LogTarget::Stderr => {
            let default = if verbose { "debug" } else { "warn" };
            tracing_subscriber::fmt()
                .with_env_filter(filter(default))
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;
        }
        LogTarget::File => {
            let default = if verbose { "debug" } else { "info" };
            let Some(path) = discover_log_path() else {
                // Nowhere to write; stay silent rather than draw over the dashboard
                return Ok(());
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter(default))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;
        }
    }
    Ok(())
}

/// Send panic reports to the log instead of the terminal
///
/// Panics that are caught and turned into errors would otherwise print over
/// the dashboard's alternate screen.
pub fn route_panics_to_log() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Panic");
    }));
}
