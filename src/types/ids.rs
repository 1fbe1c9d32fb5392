//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using an
//! InstallationId where a PrNumber is expected) and make the code more
//! self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A review job identifier.
///
/// Generated fresh for every job. Backed by a random UUID, so ids are
/// collision-resistant across concurrent webhook deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generates a new random review identifier.
    pub fn new_random() -> Self {
        ReviewId(Uuid::new_v4())
    }

    /// Creates a `ReviewId` from an existing UUID (e.g., deserialized from a
    /// queued job).
    pub fn from_uuid(id: Uuid) -> Self {
        ReviewId(id)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pull request number within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrNumber(pub u64);

impl fmt::Display for PrNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PrNumber {
    fn from(n: u64) -> Self {
        PrNumber(n)
    }
}

/// A commit hash as delivered in a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sha(pub String);

impl Sha {
    /// Wraps a commit hash. No format validation; payloads are taken as-is.
    pub fn new(s: impl Into<String>) -> Self {
        Sha(s.into())
    }

    /// The full hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The abbreviated seven-character form, for log lines.
    pub fn short(&self) -> &str {
        // Payload-supplied hashes may be shorter than seven bytes or
        // non-ASCII; slicing with get() never panics on them.
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for Sha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Sha {
    fn from(s: &str) -> Self {
        Sha(s.to_string())
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A GitHub App installation ID.
///
/// Carried on every job so the consumer can authenticate as the installation
/// the webhook was delivered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallationId(pub u64);

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for InstallationId {
    fn from(n: u64) -> Self {
        InstallationId(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_id_display_is_uuid() {
        let id = ReviewId::new_random();
        let shown = id.to_string();
        assert_eq!(shown, id.as_uuid().to_string());
        assert_eq!(shown.len(), 36);
    }

    #[test]
    fn review_id_serde_is_transparent() {
        let id = ReviewId::new_random();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));

        let parsed: ReviewId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn sha_short_truncates_to_seven() {
        let sha = Sha::new("0123456789abcdef0123456789abcdef01234567");
        assert_eq!(sha.short(), "0123456");
    }

    #[test]
    fn sha_short_handles_short_input() {
        let sha = Sha::new("abc");
        assert_eq!(sha.short(), "abc");
    }

    #[test]
    fn repo_id_display() {
        let repo = RepoId::new("octocat", "hello-world");
        assert_eq!(repo.to_string(), "octocat/hello-world");
    }

    #[test]
    fn pr_number_serde_is_transparent() {
        let pr = PrNumber(42);
        assert_eq!(serde_json::to_string(&pr).unwrap(), "42");
    }
}
