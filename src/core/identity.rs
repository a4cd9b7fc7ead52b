//! Match Identity
//!
//! Content-addressed match identifiers. The same `(home, away, date)` always
//! yields the same ID, across processes and restarts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex characters of the digest kept in the identifier
const HASH_PREFIX_LEN: usize = 12;

/// Stable match identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    /// Derive an ID from team names and the raw feed date
    ///
    /// Rendered as `<hash>-<home>-<away>` where `<hash>` is the first 12 hex
    /// characters of SHA-256 over `home|away|date`.
    pub fn derive(home: &str, away: &str, date: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(home.trim().as_bytes());
        hasher.update(b"|");
        hasher.update(away.trim().as_bytes());
        hasher.update(b"|");
        hasher.update(date.trim().as_bytes());
        let digest = hex::encode(hasher.finalize());

        Self(format!(
            "{}-{}-{}",
            &digest[..HASH_PREFIX_LEN],
            home.trim(),
            away.trim()
        ))
    }

    /// Use the upstream fixture ID when it is known
    pub fn from_fixture(fixture_id: u64) -> Self {
        Self(format!("fixture-{}", fixture_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
