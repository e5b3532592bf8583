pub mod cache;
pub mod resolve;

use anyhow::Result;

use crate::config::Config;
use crate::config_discovery;

/// Load configuration from an explicit path or by discovery, falling back to
/// built-in defaults when no file exists.
pub(crate) fn load_config(explicit_path: Option<&str>) -> Result<Config> {
    match config_discovery::load_config_with_discovery(explicit_path)? {
        Some(config) => {
            config.validate()?;
            Ok(config)
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
