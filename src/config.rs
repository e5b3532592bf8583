use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dep::cache::default_cache_root;

/// Complete schmiede configuration (loaded from TOML file)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Echo external commands and pass their output through
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub build: BuildConfig,
}

/// Artifact cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory path, shared across projects and processes
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

/// Default build invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Toolchain program for the default `build -o` invocation
    #[serde(default = "default_build_program")]
    pub program: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_build_program(),
        }
    }
}

fn default_cache_dir() -> String {
    default_cache_root().display().to_string()
}

fn default_build_program() -> String {
    "go".to_string()
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Cache root as a path
    pub fn cache_root(&self) -> PathBuf {
        PathBuf::from(&self.cache.dir)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache.dir.is_empty() {
            anyhow::bail!("cache.dir must be set");
        }

        if self.build.program.is_empty() {
            anyhow::bail!("build.program must be set");
        }

        Ok(())
    }
}
