pub mod cache;
pub mod key;
pub mod resolver;
pub mod runner;
pub mod source;
pub mod strategy;
pub mod workspace;

pub use cache::{default_cache_root, ArtifactCache, CacheEntry, CacheStats};
pub use key::identity_digest;
pub use resolver::{BuildRequest, Resolver, ResolverOptions};
pub use runner::CommandRunner;
pub use strategy::{BuildStrategy, ToolchainBuild};
