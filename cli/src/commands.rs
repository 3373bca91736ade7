use anchor_core::block_index::index_from_nodes;
use anchor_core::{BlockIndexNode, Checkpoints, H256, parse_hash};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Check a block hash against the checkpoint at its height
    Check { height: u64, hash: String },

    /// Print the total blocks estimate (highest checkpoint height)
    Total,

    /// Estimate verification progress for a block with the given totals
    Progress {
        #[arg(long, help = "Cumulative transaction count through the block")]
        tx_count: u64,
        #[arg(long, help = "Block timestamp (unix seconds), defaults to now")]
        time: Option<i64>,
    },

    /// Find the highest checkpoint present in a JSON block index dump
    Last { index: PathBuf },

    /// Evaluate whether a reorganization would cross a checkpoint
    Reorg {
        #[arg(long)]
        depth: u64,
        #[arg(long)]
        height: u64,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    View,
    Set { key: String, value: String },
    Init,
}

pub fn check_block(policy: &Checkpoints, height: u64, hash: &str) -> Result<String> {
    let hash = parse_hash(hash)?;
    if policy.check_block(height, &hash) {
        Ok(format!("accept: block {} at height {}", hex_of(&hash), height))
    } else {
        Ok(format!(
            "reject: block {} conflicts with checkpoint at height {}",
            hex_of(&hash),
            height
        ))
    }
}

pub fn total_blocks(policy: &Checkpoints) -> String {
    policy.total_blocks_estimate().to_string()
}

pub fn progress(policy: &Checkpoints, tx_count: u64, time: Option<i64>) -> String {
    let now = Utc::now().timestamp();
    let node = BlockIndexNode {
        height: 0,
        hash: H256::zero(),
        chain_tx: tx_count,
        time: time.unwrap_or(now),
    };
    format_progress(policy.progress_at(Some(&node), now))
}

/// Load a JSON array of block index nodes.
pub fn load_index(path: &Path) -> Result<Vec<BlockIndexNode>> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    serde_json::from_str(&data).with_context(|| format!("invalid block index dump {:?}", path))
}

pub fn last_checkpoint(policy: &Checkpoints, path: &Path) -> Result<String> {
    let index = index_from_nodes(load_index(path)?);
    let out = match policy.last_checkpoint(&index) {
        Some(node) => {
            let when = Utc
                .timestamp_opt(node.time, 0)
                .single()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| node.time.to_string());
            format!(
                "height {} hash {} time {} progress {}",
                node.height,
                hex_of(&node.hash),
                when,
                format_progress(policy.guess_verification_progress(Some(node)))
            )
        }
        None => "no checkpoint found in index".to_string(),
    };
    Ok(out)
}

pub fn reorg(policy: &Checkpoints, depth: u64, height: u64) -> String {
    match policy.check_reorg(depth, height) {
        Ok(()) => format!("allowed: depth {} from height {}", depth, height),
        Err(e) => format!("rejected: {}", e),
    }
}

fn format_progress(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

fn hex_of(hash: &H256) -> String {
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_core::Network;

    const GENESIS: &str = "0x8c0d74f0126f18dfc3e8651d6dd9da7c54beee28f84dbc1d3b8349fae64a2f8b";

    #[test]
    fn check_reports_accept_and_reject() {
        let policy = Checkpoints::for_network(Network::Main, true);
        assert!(check_block(&policy, 0, GENESIS).unwrap().starts_with("accept"));
        let other = format!("0x{}", "11".repeat(32));
        assert!(check_block(&policy, 0, &other).unwrap().starts_with("reject"));
        assert!(check_block(&policy, 0, "0xnothex").is_err());
    }

    #[test]
    fn total_respects_switch() {
        assert_eq!(total_blocks(&Checkpoints::for_network(Network::Main, true)), "163065");
        assert_eq!(total_blocks(&Checkpoints::for_network(Network::Main, false)), "0");
    }

    #[test]
    fn last_from_index_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let genesis = parse_hash(GENESIS).unwrap();
        let nodes = vec![
            BlockIndexNode {
                height: 0,
                hash: genesis,
                chain_tx: 1,
                time: 1_400_000_000,
            },
            BlockIndexNode {
                height: 1,
                hash: H256::repeat_byte(0x42),
                chain_tx: 2,
                time: 1_400_000_060,
            },
        ];
        fs::write(&path, serde_json::to_string(&nodes).unwrap()).unwrap();

        let policy = Checkpoints::for_network(Network::Main, true);
        let out = last_checkpoint(&policy, &path).unwrap();
        assert!(out.starts_with("height 0 hash 8c0d74f0"), "{}", out);

        let disabled = Checkpoints::for_network(Network::Main, false);
        assert_eq!(
            last_checkpoint(&disabled, &path).unwrap(),
            "no checkpoint found in index"
        );
    }

    #[test]
    fn reorg_message() {
        let policy = Checkpoints::for_network(Network::Main, true);
        assert!(reorg(&policy, 10, 200_000).starts_with("allowed"));
        assert!(reorg(&policy, 100_000, 200_000).starts_with("rejected"));
    }

    #[test]
    fn progress_is_formatted_percent() {
        let policy = Checkpoints::for_network(Network::Main, true);
        // past the checkpoint and timestamped now: nothing left to verify
        assert_eq!(progress(&policy, 60_000, None), "100.00%");
    }
}
