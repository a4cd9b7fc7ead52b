//! Bet ledger JSON storage and settlement

use super::LoadError;
use crate::core::identity::MatchId;
use crate::models::{BetRecord, BetStatus, ScoredMatchRecord};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Load a ledger stored as a JSON array of bet records
pub fn load_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<BetRecord>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bets: Vec<BetRecord> = serde_json::from_str(&content)?;

    info!(path = %path.display(), bets = bets.len(), "loaded bet ledger");
    Ok(bets)
}

/// Write a ledger back as pretty-printed JSON
pub fn save_ledger<P: AsRef<Path>>(path: P, bets: &[BetRecord]) -> Result<(), LoadError> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(bets)?;
    fs::write(path, content).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Settle pending bets whose match has a result in the scored feed
///
/// A bet wins when the feed's actual outcome equals the model's pick for
/// that match. Deleted bets and bets on unplayed matches stay pending.
/// Returns the number of bets settled.
pub fn resolve_pending(bets: &mut [BetRecord], records: &[ScoredMatchRecord]) -> usize {
    let played: HashMap<&MatchId, (bool, &str)> = records
        .iter()
        .filter_map(|r| r.actual_outcome.as_deref().map(|outcome| (&r.match_id, (r.is_win(), outcome))))
        .collect();

    let mut settled = 0;
    for bet in bets
        .iter_mut()
        .filter(|b| b.status == BetStatus::Pending && !b.is_deleted)
    {
        let Some(&(won, outcome)) = played.get(&bet.match_id) else {
            continue;
        };
        if bet.settle(won, outcome).is_ok() {
            debug!(match_id = %bet.match_id, status = %bet.status, "settled bet");
            settled += 1;
        }
    }

    info!(settled, "resolved pending bets");
    settled
}
