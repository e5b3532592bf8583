//! Error types for schmiede
//!
//! Library code returns `Result<T>` from this module; the CLI layer wraps
//! these in `anyhow` for presentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the resolve pipeline can produce
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to create cache directory {path}: {source}")]
    CacheRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to check cache entry {path}: {source}")]
    CacheProbe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read cache directory {path}: {source}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove cache entry {path}: {source}")]
    CacheRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create build workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to run command: {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command}, exit code: {code}{}", fmt_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Failed to publish artifact to {path}: {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Build failed: {0}")]
    Build(String),
}

fn fmt_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(", stderr: {stderr}")
    }
}

impl Error {
    /// Create a spawn error for a command that could not be launched
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a failure error for a command that exited non-zero
    pub fn command_failed(
        command: impl Into<String>,
        code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Create a build error from a custom strategy
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }
}
