/// Artifact resolution
///
/// Drives one memoized build: hash the source identity, short-circuit on a
/// cached artifact, otherwise provision a workspace, fetch sources, and hand
/// the cache slot to a build strategy. Synchronous throughout; the first
/// failing step aborts the resolution with no rollback.
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::dep::cache::{default_cache_root, ArtifactCache};
use crate::dep::key::identity_digest;
use crate::dep::runner::CommandRunner;
use crate::dep::source;
use crate::dep::strategy::{BuildStrategy, ToolchainBuild};
use crate::dep::workspace::Workspace;
use crate::error::Result;

/// What to build and from where
///
/// With a repository, sources are cloned fresh and the result is cached by
/// (repository, commit). Without one, the build runs against the workspace
/// directory and nothing is memoized, since the identity digest could not
/// tell such requests apart.
pub struct BuildRequest {
    repository: Option<String>,
    commit: Option<String>,
    workspace: Option<PathBuf>,
    build_args: Vec<String>,
    strategy: Option<Box<dyn BuildStrategy>>,
}

impl BuildRequest {
    /// Request with no source and no workspace override
    pub fn new() -> Self {
        Self {
            repository: None,
            commit: None,
            workspace: None,
            build_args: Vec::new(),
            strategy: None,
        }
    }

    /// Build from a remote repository
    pub fn repository(url: impl Into<String>) -> Self {
        let mut request = Self::new();
        request.repository = Some(url.into());
        request
    }

    /// Build whatever already sits in `dir`
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::new().workspace(dir)
    }

    /// Pin the revision to check out after cloning
    ///
    /// Without a commit the default branch tip is built, and that artifact is
    /// cached under (repository, ""): a later move of the branch does not
    /// invalidate the entry. Pin a commit, or clean the entry, to force a
    /// fresh tip.
    pub fn commit(mut self, rev: impl Into<String>) -> Self {
        self.commit = Some(rev.into());
        self
    }

    /// Directory the build step runs in, replacing the fresh workspace
    pub fn workspace(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace = Some(dir.into());
        self
    }

    /// Extra arguments appended to the default toolchain invocation
    pub fn build_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.build_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the default toolchain invocation entirely
    pub fn strategy(mut self, strategy: impl BuildStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }
}

impl Default for BuildRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a resolver instance
pub struct ResolverOptions {
    pub cache_root: PathBuf,
    pub verbose: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache_root: default_cache_root(),
            verbose: false,
        }
    }
}

/// Memoizing build resolver
///
/// Holds the cache location and verbosity for all resolutions it performs.
/// Two resolvers with distinct roots share nothing.
pub struct Resolver {
    cache: ArtifactCache,
    verbose: bool,
}

impl Resolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            cache: ArtifactCache::new(options.cache_root),
            verbose: options.verbose,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ResolverOptions {
            cache_root: config.cache_root(),
            verbose: config.verbose,
        })
    }

    pub fn cache_root(&self) -> &Path {
        self.cache.root()
    }

    /// Resolve a request to a built artifact path
    ///
    /// Returns the cache entry path. On a hit nothing runs; on a miss the
    /// sources are fetched into a fresh workspace and the strategy builds
    /// into the entry. The path stays valid as long as the cache root does.
    pub fn resolve(&self, request: BuildRequest) -> Result<PathBuf> {
        self.cache.ensure_root()?;

        let BuildRequest {
            repository,
            commit,
            workspace: override_dir,
            build_args,
            strategy,
        } = request;

        // Empty strings carry no more identity than absent fields
        let repository = repository.as_deref().filter(|r| !r.is_empty());
        let commit = commit.as_deref().filter(|c| !c.is_empty());

        let digest = identity_digest(repository.unwrap_or(""), commit.unwrap_or(""));
        let artifact = self.cache.entry_path(&digest);

        if let Some(repository) = repository {
            if self.cache.probe(&artifact)? {
                info!(digest = %digest, "artifact already built");
                if self.verbose {
                    eprintln!("[schmiede] Cache HIT: {}", artifact.display());
                }
                return Ok(artifact);
            }

            if self.verbose {
                eprintln!("[schmiede] Cache MISS: {}", digest);
            }

            let workspace = Workspace::provision(true, override_dir.as_deref())?;
            let runner = CommandRunner::new(workspace.checkout_dir(), self.verbose);
            source::acquire(&runner, repository, commit)?;

            self.build(strategy, build_args, workspace.build_dir(), &artifact)?;
        } else {
            // No repository: the degenerate digest cannot distinguish
            // requests, so the cache is never consulted and a build always
            // runs.
            let workspace = Workspace::provision(false, override_dir.as_deref())?;
            self.build(strategy, build_args, workspace.build_dir(), &artifact)?;
        }

        info!(digest = %digest, artifact = %artifact.display(), "artifact built");
        if self.verbose {
            eprintln!("[schmiede] Built: {}", artifact.display());
        }

        Ok(artifact)
    }

    fn build(
        &self,
        strategy: Option<Box<dyn BuildStrategy>>,
        build_args: Vec<String>,
        build_dir: &Path,
        artifact: &Path,
    ) -> Result<()> {
        let runner = CommandRunner::new(build_dir, self.verbose);
        let strategy: Box<dyn BuildStrategy> = match strategy {
            Some(strategy) => strategy,
            None => Box::new(ToolchainBuild::new(build_args)),
        };
        strategy.build(artifact, &runner)
    }
}
