//! Checkpoint Policy
//!
//! Binds the `checkpoints` switch to the active network's table and answers
//! the questions the rest of the node asks about checkpoints:
//! - Does a block conflict with a checkpoint? (reject the chain if so)
//! - Which is the highest checkpoint we already have? (sync starting point)
//! - How many blocks should we expect at least? (progress bar scale)
//! - Would a reorganization rewrite checkpointed history?
//!
//! With the switch off every check passes and every estimate is empty.

use crate::block_index::{BlockIndex, BlockIndexNode};
use crate::checkpoint::CheckpointTable;
use crate::error::CheckpointError;
use crate::hash::{is_null, short_hex};
use crate::network::Network;
use primitive_types::H256;

#[derive(Debug, Clone, Copy)]
pub struct Checkpoints<'a> {
    enabled: bool,
    table: &'a CheckpointTable,
}

impl Checkpoints<'static> {
    /// Active policy for `network`, using the compiled-in table.
    pub fn for_network(network: Network, enabled: bool) -> Self {
        Checkpoints::new(CheckpointTable::for_network(network), enabled)
    }
}

impl<'a> Checkpoints<'a> {
    pub fn new(table: &'a CheckpointTable, enabled: bool) -> Self {
        Checkpoints { enabled, table }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn table(&self) -> &'a CheckpointTable {
        self.table
    }

    /// Returns false only if `height` is a checkpoint and `hash` differs from
    /// the pinned hash. Such a block must be rejected whatever else
    /// validation says.
    pub fn check_block(&self, height: u64, hash: &H256) -> bool {
        if !self.enabled {
            return true;
        }

        let expected = match self.table.lookup(height) {
            Some(expected) => expected,
            None => return true,
        };

        if is_null(&expected) {
            // Placeholder, hash not pinned yet
            return true;
        }

        if expected != *hash {
            log::error!(
                "CHECKPOINT VIOLATION: Block at height {} has hash {}, but checkpoint requires {}",
                height,
                short_hex(hash),
                short_hex(&expected)
            );
            return false;
        }

        log::debug!("Block matches checkpoint at height {}", height);
        true
    }

    /// Highest checkpoint whose block is already in `index`.
    pub fn last_checkpoint<'i, I>(&self, index: &'i I) -> Option<&'i BlockIndexNode>
    where
        I: BlockIndex + ?Sized,
    {
        if !self.enabled {
            return None;
        }

        for entry in self.table.entries().rev() {
            if is_null(&entry.hash) {
                continue;
            }
            if let Some(node) = index.lookup(&entry.hash) {
                log::info!(
                    "Last known checkpoint: height {} ({})",
                    entry.height,
                    short_hex(&entry.hash)
                );
                return Some(node);
            }
        }
        None
    }

    /// Upper-bound hint for a progress bar: the highest checkpoint height.
    pub fn total_blocks_estimate(&self) -> u64 {
        if !self.enabled {
            return 0;
        }
        self.table.highest_height()
    }

    /// Refuse a reorganization that would replace a checkpointed block the
    /// chain has already reached.
    ///
    /// `current_height - reorg_depth` is the height of the fork point, which
    /// is kept. Only pinned checkpoints at or below `current_height` count.
    pub fn check_reorg(
        &self,
        reorg_depth: u64,
        current_height: u64,
    ) -> Result<(), CheckpointError> {
        if !self.enabled {
            return Ok(());
        }

        let checkpoint = match self
            .table
            .entries()
            .rev()
            .find(|e| e.height <= current_height && !is_null(&e.hash))
        {
            Some(entry) => entry.height,
            None => return Ok(()),
        };
        let target = current_height.saturating_sub(reorg_depth);

        if target < checkpoint {
            log::warn!(
                "Reorganization rejected: depth {} from height {} would go below checkpoint {}",
                reorg_depth,
                current_height,
                checkpoint
            );
            return Err(CheckpointError::ReorgBelowCheckpoint { checkpoint, target });
        }

        Ok(())
    }
}
