/// `schmiede resolve` command implementation
///
/// Resolves a source to a built artifact and prints the artifact path to
/// stdout, so callers can substitute the invocation for the binary's path.
use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use crate::cli_utils::schmiede_prefix;
use crate::dep::{BuildRequest, Resolver, ToolchainBuild};

pub fn run(args: &ResolveArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;

    // Fold flag overrides into the loaded configuration
    if let Some(dir) = &args.cache_dir {
        config.cache.dir = dir.clone();
    }
    if let Some(program) = &args.build_program {
        config.build.program = program.clone();
    }
    if args.verbose {
        config.verbose = true;
    }

    let resolver = Resolver::from_config(&config);

    if config.verbose {
        eprintln!(
            "{} Cache root: {}",
            schmiede_prefix(),
            resolver.cache_root().display()
        );
    }

    let mut request = match &args.repository {
        Some(url) => BuildRequest::repository(url),
        None => BuildRequest::new(),
    };
    if let Some(commit) = &args.commit {
        request = request.commit(commit);
    }
    if let Some(workspace) = &args.workspace {
        request = request.workspace(workspace);
    }
    request = request.strategy(ToolchainBuild::with_program(
        config.build.program.clone(),
        args.build_args.clone(),
    ));

    let artifact = resolver
        .resolve(request)
        .context("Failed to resolve artifact")?;

    println!("{}", artifact.display());

    Ok(())
}
