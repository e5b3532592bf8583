// Library interface for Schmiede
// This allows integration tests and external code to use the resolver modules

pub mod cli_utils;
pub mod config;
pub mod config_discovery;
pub mod dep;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::Config;
pub use config_discovery::{discover_config, load_config_with_discovery};
pub use dep::{
    identity_digest, ArtifactCache, BuildRequest, BuildStrategy, CommandRunner, Resolver,
    ResolverOptions, ToolchainBuild,
};
pub use error::{Error, Result};
