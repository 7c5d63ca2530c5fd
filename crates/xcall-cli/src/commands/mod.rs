//! Subcommand implementations

pub mod call;
pub mod list;
pub mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use xcall_host::CrossCallMaster;
use xcall_plugin::WorkerPlugin;
use xcall_runtime::{init_logging, RuntimeConfig};

/// Default configuration file looked up in the working directory
const DEFAULT_CONFIG: &str = "xcall.toml";

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub log_level: Option<String>,
    pub color: String,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RuntimeConfig> {
    match path {
        Some(path) => RuntimeConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => RuntimeConfig::from_file(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load {}", DEFAULT_CONFIG)),
        None => Ok(RuntimeConfig::default()),
    }
}

/// Load configuration, install logging and start master plus worker.
pub fn start(global: &GlobalArgs) -> anyhow::Result<CrossCallMaster> {
    let mut config = load_config(global.config.as_deref())?;
    if let Some(level) = &global.log_level {
        config.logging.level = level.clone();
    }
    init_logging(&config.logging).context("failed to initialise logging")?;

    tracing::debug!(?config, "configuration loaded");
    CrossCallMaster::new(config.boundary, Arc::new(WorkerPlugin))
        .context("failed to start the boundary")
}
