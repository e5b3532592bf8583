/// Build strategies
///
/// How a missing artifact gets produced once sources are in place. The
/// default shells out to a toolchain's `build -o` subcommand; callers with
/// other needs supply a function and take over the whole build step.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dep::runner::CommandRunner;
use crate::error::{Error, Result};

/// Produce the artifact at `dest`, running external commands through `runner`
///
/// The runner's working directory is the build directory for this resolution.
/// Whatever the strategy returns is the outcome of the resolution; nothing is
/// retried.
pub trait BuildStrategy {
    fn build(&self, dest: &Path, runner: &CommandRunner) -> Result<()>;
}

impl<F> BuildStrategy for F
where
    F: Fn(&Path, &CommandRunner) -> Result<()>,
{
    fn build(&self, dest: &Path, runner: &CommandRunner) -> Result<()> {
        self(dest, runner)
    }
}

/// Default strategy: `<program> build -o <dest> <args...>`
///
/// The program defaults to the Go toolchain. The artifact is written to a
/// staging file next to `dest` and renamed into place on success, so a
/// concurrent reader never sees a half-written binary.
pub struct ToolchainBuild {
    program: String,
    args: Vec<String>,
}

impl ToolchainBuild {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            program: "go".to_string(),
            args,
        }
    }

    pub fn with_program(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl BuildStrategy for ToolchainBuild {
    fn build(&self, dest: &Path, runner: &CommandRunner) -> Result<()> {
        let staging = staging_path(dest);
        let staging_arg = staging.display().to_string();

        let mut args: Vec<&str> = vec!["build", "-o", &staging_arg];
        args.extend(self.args.iter().map(String::as_str));

        if let Err(e) = runner.run(&self.program, &args) {
            // Drop whatever the failed build left behind
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        debug!(from = %staging.display(), to = %dest.display(), "publishing artifact");
        fs::rename(&staging, dest).map_err(|source| Error::Publish {
            path: dest.to_path_buf(),
            source,
        })
    }
}

/// Staging path for an artifact: same directory, name suffixed with
/// PID + thread ID so concurrent builders never share a staging file.
fn staging_path(dest: &Path) -> PathBuf {
    let file_name = format!(
        "{}.tmp.{}.{:?}",
        dest.file_name().unwrap().to_str().unwrap(),
        std::process::id(),
        std::thread::current().id()
    );
    dest.parent().unwrap().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, content: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_closure_strategy_receives_dest_verbatim() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("artifact");

        let seen = RefCell::new(None);
        let strategy = |path: &Path, _runner: &CommandRunner| -> Result<()> {
            *seen.borrow_mut() = Some(path.to_path_buf());
            Ok(())
        };

        let runner = CommandRunner::new(temp.path(), false);
        strategy.build(&dest, &runner).unwrap();
        assert_eq!(seen.into_inner(), Some(dest));
    }

    #[test]
    fn test_closure_strategy_error_propagates_verbatim() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("artifact");

        let strategy = |_path: &Path, _runner: &CommandRunner| -> Result<()> {
            Err(Error::build("linker exploded"))
        };

        let runner = CommandRunner::new(temp.path(), false);
        let err = strategy.build(&dest, &runner).unwrap_err();
        assert_eq!(err.to_string(), "Build failed: linker exploded");
    }

    #[test]
    #[cfg(unix)]
    fn test_toolchain_build_publishes_atomically() {
        let scripts = TempDir::new().unwrap();
        let toolchain = write_script(
            scripts.path(),
            "toolchain.sh",
            "#!/bin/bash\n# expects: build -o <dest> [args...]\ndest=\"$3\"\nshift 3\nprintf '%s' \"$*\" > \"$dest\"\n",
        );

        let cache = TempDir::new().unwrap();
        let dest = cache.path().join("artifact");
        let workdir = TempDir::new().unwrap();

        let strategy = ToolchainBuild::with_program(
            toolchain.to_str().unwrap(),
            vec!["alpha".to_string(), "beta".to_string()],
        );
        let runner = CommandRunner::new(workdir.path(), false);
        strategy.build(&dest, &runner).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "alpha beta");

        // No staging leftovers next to the artifact
        let names: Vec<_> = fs::read_dir(cache.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["artifact".to_string()]);
    }

    #[test]
    #[cfg(unix)]
    fn test_toolchain_build_failure_removes_staging() {
        let scripts = TempDir::new().unwrap();
        let toolchain = write_script(
            scripts.path(),
            "broken.sh",
            "#!/bin/bash\ndest=\"$3\"\necho partial > \"$dest\"\necho kaput >&2\nexit 1\n",
        );

        let cache = TempDir::new().unwrap();
        let dest = cache.path().join("artifact");
        let workdir = TempDir::new().unwrap();

        let strategy = ToolchainBuild::with_program(toolchain.to_str().unwrap(), vec![]);
        let runner = CommandRunner::new(workdir.path(), false);
        let err = strategy.build(&dest, &runner).unwrap_err();

        match err {
            Error::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "kaput");
            }
            other => panic!("expected CommandFailed, got: {other}"),
        }

        assert!(!dest.exists());
        assert_eq!(fs::read_dir(cache.path()).unwrap().count(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn test_toolchain_build_runs_in_build_dir() {
        let scripts = TempDir::new().unwrap();
        let toolchain = write_script(
            scripts.path(),
            "pwd.sh",
            "#!/bin/bash\ndest=\"$3\"\npwd > \"$dest\"\n",
        );

        let cache = TempDir::new().unwrap();
        let dest = cache.path().join("artifact");
        let workdir = TempDir::new().unwrap();

        let strategy = ToolchainBuild::with_program(toolchain.to_str().unwrap(), vec![]);
        let runner = CommandRunner::new(workdir.path(), false);
        strategy.build(&dest, &runner).unwrap();

        let recorded = fs::read_to_string(&dest).unwrap();
        let recorded = Path::new(recorded.trim());
        assert_eq!(
            recorded.canonicalize().unwrap(),
            workdir.path().canonicalize().unwrap()
        );
    }
}
