/// Build workspace provisioning
///
/// A cache miss needs somewhere to check out and build. Remote sources always
/// get a fresh uniquely named directory under the OS temp root; the directory
/// is intentionally kept afterwards and left to the temp lifecycle, since the
/// built artifact may reference it and cleanup is not this system's job. A
/// caller-supplied directory replaces the checkout dir when there is nothing
/// to fetch, and always wins as the build directory when present.
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Workspace {
    checkout_dir: PathBuf,
    build_dir: PathBuf,
}

impl Workspace {
    /// Provision the directories for one resolution
    ///
    /// `remote` is whether a repository will be cloned; `override_dir` is the
    /// caller's workspace, if any.
    pub fn provision(remote: bool, override_dir: Option<&Path>) -> Result<Self> {
        let checkout_dir = match override_dir {
            Some(dir) if !remote => dir.to_path_buf(),
            _ => fresh_temp_dir()?,
        };

        let build_dir = override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| checkout_dir.clone());

        Ok(Self {
            checkout_dir,
            build_dir,
        })
    }

    /// Where the clone and checkout run
    pub fn checkout_dir(&self) -> &Path {
        &self.checkout_dir
    }

    /// Where the build runs
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}

fn fresh_temp_dir() -> Result<PathBuf> {
    let dir = Builder::new()
        .prefix("schmiede-")
        .tempdir()
        .map_err(Error::Workspace)?;

    // Keep the directory on disk past this scope; the OS owns its lifetime.
    let path = dir.keep();
    debug!(path = %path.display(), "provisioned workspace");
    Ok(path)
}
