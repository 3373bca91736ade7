//! Verification progress estimate
//!
//! Work is counted per transaction: 1.0 for each transaction up to the last
//! checkpoint, and SIGCHECK_VERIFICATION_FACTOR for each one after it, since
//! those need full signature checks.

use crate::block_index::BlockIndexNode;
use crate::checker::Checkpoints;
use crate::checkpoint::CheckpointMetadata;
use chrono::Utc;

/// How many times slower we expect transactions after the last checkpoint to
/// verify. A compromise: reindexing from a fast disk on a slow CPU can reach
/// 20, downloading over a slow network on a fast multicore CPU stays near 1.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

pub const SECONDS_PER_DAY: f64 = 86400.0;

impl Checkpoints<'_> {
    /// Fraction in [0, 1] of the verification work done at `node`.
    pub fn guess_verification_progress(&self, node: Option<&BlockIndexNode>) -> f64 {
        let now = Utc::now().timestamp();
        self.progress_at(node, now)
    }

    /// Same as `guess_verification_progress` with a caller-supplied clock.
    pub fn progress_at(&self, node: Option<&BlockIndexNode>, now: i64) -> f64 {
        match node {
            Some(node) => estimate_progress(self.table().metadata(), node, now),
            None => 0.0,
        }
    }
}

/// Expected transactions between `since` and `now` at the table's daily rate.
fn expected_txs(data: &CheckpointMetadata, since: i64, now: i64) -> f64 {
    let elapsed = now.saturating_sub(since).max(0) as f64;
    elapsed / SECONDS_PER_DAY * data.tx_per_day
}

pub fn estimate_progress(data: &CheckpointMetadata, node: &BlockIndexNode, now: i64) -> f64 {
    let (work_before, work_after) = if node.chain_tx <= data.tx_count_at_last_checkpoint {
        let cheap_before = node.chain_tx as f64;
        let cheap_after = (data.tx_count_at_last_checkpoint - node.chain_tx) as f64;
        let expensive_after = expected_txs(data, data.last_checkpoint_time, now);
        (
            cheap_before,
            cheap_after + expensive_after * SIGCHECK_VERIFICATION_FACTOR,
        )
    } else {
        let cheap_before = data.tx_count_at_last_checkpoint as f64;
        let expensive_before = (node.chain_tx - data.tx_count_at_last_checkpoint) as f64;
        // A block past the checkpoint can't predate it
        let since = node.time.max(data.last_checkpoint_time);
        let expensive_after = expected_txs(data, since, now);
        (
            cheap_before + expensive_before * SIGCHECK_VERIFICATION_FACTOR,
            expensive_after * SIGCHECK_VERIFICATION_FACTOR,
        )
    };

    let total = work_before + work_after;
    if total <= 0.0 {
        // Nothing done and nothing left
        return 1.0;
    }
    work_before / total
}
