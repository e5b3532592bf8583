/// Subprocess execution for acquisition and build steps
///
/// Runs external tools synchronously in a fixed working directory. Verbose
/// mode echoes each command and lets the child write to the parent's streams;
/// quiet mode captures output and keeps stderr for error reports.
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::{Error, Result};

pub struct CommandRunner {
    workdir: PathBuf,
    verbose: bool,
}

impl CommandRunner {
    pub fn new(workdir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            workdir: workdir.into(),
            verbose,
        }
    }

    /// Working directory every command runs in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Run a command to completion. Success is exit code zero; anything else
    /// is an error carrying the full command line.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let command_line = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };

        debug!(
            command = %command_line,
            workdir = %self.workdir.display(),
            "running command"
        );

        // Resolve the program from PATH, falling back to the name as given
        let program_path = which::which(program).unwrap_or_else(|e| {
            if self.verbose {
                eprintln!(
                    "[schmiede] Warning: Could not find '{}' in PATH: {}. Trying as-is.",
                    program, e
                );
            }
            PathBuf::from(program)
        });

        let mut cmd = Command::new(&program_path);
        cmd.args(args);
        cmd.current_dir(&self.workdir);

        if self.verbose {
            eprintln!(
                "[schmiede] Running: {} (in {})",
                command_line,
                self.workdir.display()
            );
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());

            let status = cmd
                .spawn()
                .map_err(|e| Error::spawn(command_line.clone(), e))?
                .wait()
                .map_err(|e| Error::spawn(command_line.clone(), e))?;

            if !status.success() {
                return Err(Error::command_failed(
                    command_line,
                    status.code().unwrap_or(-1),
                    String::new(),
                ));
            }
        } else {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());

            let output = cmd
                .output()
                .map_err(|e| Error::spawn(command_line.clone(), e))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                return Err(Error::command_failed(
                    command_line,
                    output.status.code().unwrap_or(-1),
                    stderr,
                ));
            }
        }

        Ok(())
    }
}
