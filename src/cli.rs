use clap::{Parser, Subcommand};

/// Schmiede - Memoizing builder for git-sourced helper binaries
///
/// Schmiede builds a binary from a git checkout once and serves the cached
/// artifact afterwards, keyed by repository and commit.
#[derive(Parser, Debug)]
#[command(name = "schmiede")]
#[command(author = "Tuist Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Memoizing builder for git-sourced helper binaries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a source to a built artifact, building on a cache miss
    Resolve(ResolveArgs),

    /// Manage the artifact cache
    Cache(CacheArgs),
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Repository URL to clone (omit to build inside --workspace)
    #[arg(long)]
    pub repository: Option<String>,

    /// Revision to check out after cloning (default branch tip if omitted)
    #[arg(long)]
    pub commit: Option<String>,

    /// Directory the build runs in instead of the fresh checkout
    #[arg(long)]
    pub workspace: Option<String>,

    /// Arguments appended to the toolchain invocation (after --)
    #[arg(last = true)]
    pub build_args: Vec<String>,

    /// Toolchain program for the default `build -o` invocation
    #[arg(long, env = "SCHMIEDE_BUILD_PROGRAM")]
    pub build_program: Option<String>,

    /// Echo external commands and pass their output through
    #[arg(short, long, env = "SCHMIEDE_VERBOSE")]
    pub verbose: bool,

    /// Config file path
    #[arg(short = 'c', long, env = "SCHMIEDE_CONFIG")]
    pub config: Option<String>,

    /// Artifact cache directory
    #[arg(long, env = "SCHMIEDE_CACHE_DIR")]
    pub cache_dir: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,

    /// Config file path
    #[arg(short = 'c', long, env = "SCHMIEDE_CONFIG")]
    pub config: Option<String>,

    /// Artifact cache directory
    #[arg(long, env = "SCHMIEDE_CACHE_DIR")]
    pub cache_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Check whether an artifact is cached for a source
    Status {
        /// Repository URL
        #[arg(long)]
        repository: String,

        /// Pinned revision (empty means default branch tip)
        #[arg(long)]
        commit: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all cached artifacts
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show cache statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove cached artifacts
    Clean {
        /// Repository URL of the entry to remove
        #[arg(long, required_unless_present = "all")]
        repository: Option<String>,

        /// Pinned revision of the entry to remove
        #[arg(long)]
        commit: Option<String>,

        /// Remove every cached artifact
        #[arg(long, conflicts_with = "repository")]
        all: bool,
    },
}
