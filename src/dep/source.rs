/// Source acquisition
///
/// Clones the repository into the workspace in place, then pins the requested
/// revision. The git client does all protocol work; only exit status matters
/// here. No commit means the clone's default branch tip is built as-is.
use tracing::info;

use crate::dep::runner::CommandRunner;
use crate::error::Result;

pub fn acquire(runner: &CommandRunner, repository: &str, commit: Option<&str>) -> Result<()> {
    info!(repository, "cloning repository");
    runner.run("git", &["clone", repository, "."])?;

    if let Some(commit) = commit {
        info!(commit, "checking out revision");
        runner.run("git", &["checkout", commit])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=test",
                "-c",
                "user.email=test@example.com",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    fn init_fixture_repo(dir: &Path) -> String {
        git(dir, &["init", "--initial-branch=main"]);
        std::fs::write(dir.join("main.txt"), "first").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-m", "first"]);
        git(dir, &["rev-parse", "HEAD"])
    }

    #[test]
    fn test_acquire_clones_default_branch() {
        let origin = TempDir::new().unwrap();
        init_fixture_repo(origin.path());

        let checkout = TempDir::new().unwrap();
        let runner = CommandRunner::new(checkout.path(), false);
        acquire(&runner, origin.path().to_str().unwrap(), None).unwrap();

        assert!(checkout.path().join("main.txt").exists());
    }

    #[test]
    fn test_acquire_checks_out_pinned_commit() {
        let origin = TempDir::new().unwrap();
        let first = init_fixture_repo(origin.path());

        // Second commit moves the tip past the one we pin
        std::fs::write(origin.path().join("later.txt"), "second").unwrap();
        git(origin.path(), &["add", "."]);
        git(origin.path(), &["commit", "-m", "second"]);

        let checkout = TempDir::new().unwrap();
        let runner = CommandRunner::new(checkout.path(), false);
        acquire(&runner, origin.path().to_str().unwrap(), Some(&first)).unwrap();

        assert!(checkout.path().join("main.txt").exists());
        assert!(!checkout.path().join("later.txt").exists());
    }

    #[test]
    fn test_acquire_surfaces_clone_failure() {
        let checkout = TempDir::new().unwrap();
        let runner = CommandRunner::new(checkout.path(), false);

        let err = acquire(&runner, "/nonexistent/schmiede-missing-repo", None).unwrap_err();
        match err {
            Error::CommandFailed { command, .. } => assert!(command.starts_with("git clone")),
            other => panic!("expected CommandFailed, got: {other}"),
        }
    }

    #[test]
    fn test_acquire_surfaces_checkout_failure() {
        let origin = TempDir::new().unwrap();
        init_fixture_repo(origin.path());

        let checkout = TempDir::new().unwrap();
        let runner = CommandRunner::new(checkout.path(), false);

        let err = acquire(
            &runner,
            origin.path().to_str().unwrap(),
            Some("0000000000000000000000000000000000000000"),
        )
        .unwrap_err();
        match err {
            Error::CommandFailed { command, .. } => assert!(command.starts_with("git checkout")),
            other => panic!("expected CommandFailed, got: {other}"),
        }
    }
}
