/// `schmiede cache` command implementation
///
/// Manages cached artifacts (status, list, stats, clean).
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::{CacheArgs, CacheCommands};
use crate::cli_utils::schmiede_prefix;
use crate::dep::{identity_digest, ArtifactCache};

// JSON output structures
#[derive(Serialize, Deserialize)]
struct StatusOutput {
    digest: String,
    path: String,
    cached: bool,
}

#[derive(Serialize, Deserialize)]
struct StatsOutput {
    total_entries: usize,
    total_size_bytes: u64,
    cache_dir: String,
}

pub fn run(args: &CacheArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    let cache_root = args
        .cache_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.cache_root());
    let cache = ArtifactCache::new(cache_root);

    match &args.command {
        CacheCommands::Status {
            repository,
            commit,
            json,
        } => status(&cache, repository, commit.as_deref(), *json),
        CacheCommands::List { verbose, json } => list(&cache, *verbose, *json),
        CacheCommands::Stats { json } => stats(&cache, *json),
        CacheCommands::Clean {
            repository,
            commit,
            all,
        } => clean(&cache, repository.as_deref(), commit.as_deref(), *all),
    }
}

/// Show cache status for a source
fn status(cache: &ArtifactCache, repository: &str, commit: Option<&str>, json: bool) -> Result<()> {
    let digest = identity_digest(repository, commit.unwrap_or(""));
    let path = cache.entry_path(&digest);
    let cached = cache.probe(&path)?;

    if json {
        let output = StatusOutput {
            digest,
            path: path.display().to_string(),
            cached,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Repository: {}", repository);
        if let Some(commit) = commit {
            println!("Commit: {}", commit);
        }
        println!("Cache key: {}", digest);
        println!("Path: {}", path.display());

        if cached {
            println!("Status: CACHED ✓");
        } else {
            println!("Status: NOT CACHED ✗");
            println!();
            println!(
                "Run `schmiede resolve --repository {}` to build it.",
                repository
            );
        }
    }

    Ok(())
}

/// List all cached artifacts
fn list(cache: &ArtifactCache, verbose: bool, json: bool) -> Result<()> {
    let entries = cache.entries().context("Failed to list cache entries")?;

    if json {
        let entries: Vec<_> = entries
            .iter()
            .map(|entry| {
                if verbose {
                    serde_json::json!({
                        "digest": entry.digest,
                        "size_bytes": entry.size_bytes,
                        "modified": entry.modified.map(|m| m.to_rfc3339()),
                    })
                } else {
                    serde_json::json!({"digest": entry.digest})
                }
            })
            .collect();
        println!("{}", serde_json::to_string(&entries)?);
    } else {
        if entries.is_empty() {
            println!("No cached artifacts.");
            return Ok(());
        }

        println!("Cached artifacts ({} total):", entries.len());
        for entry in entries {
            if verbose {
                let built = entry
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!(
                    "  {} ({:.2} MB, built {})",
                    entry.digest,
                    entry.size_bytes as f64 / 1_000_000.0,
                    built
                );
            } else {
                println!("  {}", entry.digest);
            }
        }
    }

    Ok(())
}

/// Show cache statistics
fn stats(cache: &ArtifactCache, json: bool) -> Result<()> {
    let stats = cache.stats().context("Failed to get cache statistics")?;

    if json {
        let output = StatsOutput {
            total_entries: stats.total_entries,
            total_size_bytes: stats.total_size_bytes,
            cache_dir: stats.cache_root.display().to_string(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Artifact Cache Statistics");
        println!();
        println!("Total artifacts: {}", stats.total_entries);
        println!(
            "Total size: {:.2} MB",
            stats.total_size_bytes as f64 / 1_000_000.0
        );
        println!("Cache directory: {}", stats.cache_root.display());

        if stats.total_entries > 0 {
            println!(
                "Average size per artifact: {:.2} MB",
                (stats.total_size_bytes as f64 / stats.total_entries as f64) / 1_000_000.0
            );
        }
    }

    Ok(())
}

/// Clean one entry or the whole cache
fn clean(
    cache: &ArtifactCache,
    repository: Option<&str>,
    commit: Option<&str>,
    all: bool,
) -> Result<()> {
    if all {
        println!("{} Cleaning all cached artifacts...", schmiede_prefix());
        let removed = cache.clean_all().context("Failed to clean cache")?;
        println!("{} Removed {} artifacts.", schmiede_prefix(), removed);
        return Ok(());
    }

    let Some(repository) = repository else {
        anyhow::bail!("Specify --all to clean everything, or --repository for one entry");
    };

    let digest = identity_digest(repository, commit.unwrap_or(""));

    println!("{} Cleaning cache for: {}", schmiede_prefix(), repository);
    println!("{} Cache key: {}", schmiede_prefix(), digest);

    if cache.remove(&digest)? {
        println!("{} Cache cleaned.", schmiede_prefix());
    } else {
        println!("{} Nothing cached for this source.", schmiede_prefix());
    }

    Ok(())
}
