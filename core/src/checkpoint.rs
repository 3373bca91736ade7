//! Hardcoded checkpoint tables
//!
//! A checkpoint is a (height, block hash) pair compiled into the node at
//! release time. Blocks at a checkpoint height must carry exactly that hash.
//!
//! What makes a good checkpoint block:
//! - Surrounded by blocks with reasonable timestamps
//!   (no earlier block with a later timestamp, no later block with an earlier one)
//! - Contains no strange transactions
//!
//! Each table also records statistics about its last checkpoint, used to
//! estimate verification progress.

use crate::error::CheckpointError;
use crate::hash::parse_hash;
use crate::network::Network;
use once_cell::sync::Lazy;
use primitive_types::H256;
use std::collections::BTreeMap;

/// One trusted anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointEntry {
    pub height: u64,
    pub hash: H256,
}

/// Statistics about the highest checkpoint of a table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CheckpointMetadata {
    pub last_checkpoint_time: i64,        // unix timestamp of the last checkpoint block
    pub tx_count_at_last_checkpoint: u64, // total txs between genesis and last checkpoint
    pub tx_per_day: f64,                  // estimated txs per day after the checkpoint
}

/// Immutable height -> hash map plus metadata for one network.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointTable {
    checkpoints: BTreeMap<u64, H256>,
    metadata: CheckpointMetadata,
}

const MAINNET_CHECKPOINTS: &[(u64, &str)] = &[
    (0, "0x8c0d74f0126f18dfc3e8651d6dd9da7c54beee28f84dbc1d3b8349fae64a2f8b"),
    (39, "0x4788cb74e7f487a8a2c801e7f743c4cefb309368acf82c8bd3e187fb11ff9a8d"),
    (156, "0xdb0852c46c2badffeb2f64be69f807df4ce357efad2bdfc15b65c07a5ee58ac4"),
    (297, "0x8f39de1d4a159069b6a3145a7820b2c42e7f896dac5d71e193f9963ea52f775a"),
    (5584, "0x12ae50c13bc15e0901e42ef51dd48823ab8fefa5ee7da3621e7f42559d7af549"),
    (16893, "0xaeba157d21a48ad2eebdd8fda128b67aacfdc32f1986c048480169850b70a3bc"),
    (18269, "0x5c283c5739048c561521bc0c214205b528ee36cbd5fba7ee1e29a4eb966a4b9d"),
    (70065, "0x46839a1fe3f72b774d776b55e11f55c2ad97e3d08efd4f54e5fcf2e0df091920"),
    (110065, "0x4cdc0ed4f589fd3e19020d9cc62f800e450e65bf75c590ac2137554b3e51fa2b"),
    (140065, "0x5ce28f37b259e1e90fba88c3d9b21ac84c65156dd91b789514d621225504f187"),
    (145065, "0xd4913363f5362e3047d89fc9056267f65a8c060ab339e2b06f589f740775c425"),
    (150065, "0xf39ad2902d4e7e5f412eec0dc0fcc9d955864a267bfc1fcd1f7708dc2da8afce"),
    (155065, "0xff9bc46942d0ece1a57b49458a611cbc6e993386aef24a8e74f6c5fc2f0a247f"),
    (155791, "0xe28f06d74bc8fc2b8e62ffccd82fd427d1e96afc75f589cc804ccf025da10af8"),
    (155792, "0xe88b27c26813401ce7cd20f5a500ced38d1ef2e1acf762a603409cba73a3188a"),
    (155793, "0x37f14d5ce04ba53d1b87fc1fabf2ad294062bf40d87772ac89a7de14d1173b90"),
    (155794, "0xc3dab09ec1165fdb867c90e478dc50cc41174ddebbb0b835cbeb284a3cfc9b29"),
    (155795, "0xf7b54d608760623a031082e971bda09e3e956cbbd2182bb97e1597046df3c674"),
    (155800, "0xce1ecc4a3f7815fce68dc0484d3b56a63d483b07b73e79715506210660ebb13e"),
    (156065, "0x716038bb3abf6c41c3a48b9efbb8446df431ba9aa4caf0816daa17c185420616"),
    (157065, "0x9c496e465f317d5ae30cb05c82d0cbdccbccb28e0a91e22bae61df891cba781e"),
    (158065, "0xa8f449593865d7de73380355ff02de4e32d7afbd9be157e06048903ea4175d90"),
    (159065, "0xf510094e798ab81e5988b27f4671f1bd56b5a8f14ac03f10937200055c4f50ad"),
    (160065, "0x79e11550860d9836b42e3c3d171b5ee2d6a2e230cef443b48a5cc9e7b5788ef0"),
    (161065, "0x3c60f96a65aaa206b7efad0a528ae1fb9608b9d5ffb9019b4c803222a220ba65"),
    (162065, "0xef09e9d755c1003831d65e2049e6ee62227eed4aade1a351b3b2e30e7c96973b"),
    (163065, "0x35f8d5d03828ecd123d8b8c7eac6f83c58ec31506cc318cbe82202af4fcd6ec0"),
];

const MAINNET_METADATA: CheckpointMetadata = CheckpointMetadata {
    last_checkpoint_time: 1482794642,
    tx_count_at_last_checkpoint: 50000, // the tx=... number in the SetBestChain log lines
    tx_per_day: 500.0,
};

// Genesis hash is not pinned on testnet yet
const TESTNET_CHECKPOINTS: &[(u64, &str)] = &[(0, "0x")];

const TESTNET_METADATA: CheckpointMetadata = CheckpointMetadata {
    last_checkpoint_time: 0,
    tx_count_at_last_checkpoint: 0,
    tx_per_day: 0.0,
};

static MAINNET: Lazy<CheckpointTable> = Lazy::new(|| {
    CheckpointTable::from_hex(MAINNET_CHECKPOINTS, MAINNET_METADATA)
        .expect("Hard-coded mainnet checkpoint table is valid")
});

static TESTNET: Lazy<CheckpointTable> = Lazy::new(|| {
    CheckpointTable::from_hex(TESTNET_CHECKPOINTS, TESTNET_METADATA)
        .expect("Hard-coded testnet checkpoint table is valid")
});

impl CheckpointTable {
    /// The compiled-in table for `network`, built on first use.
    pub fn for_network(network: Network) -> &'static CheckpointTable {
        match network {
            Network::Main => &*MAINNET,
            Network::Test => &*TESTNET,
        }
    }

    /// Build a table from entries. Heights must be unique.
    pub fn new(
        entries: impl IntoIterator<Item = CheckpointEntry>,
        metadata: CheckpointMetadata,
    ) -> Result<Self, CheckpointError> {
        let mut checkpoints = BTreeMap::new();
        for entry in entries {
            if checkpoints.insert(entry.height, entry.hash).is_some() {
                return Err(CheckpointError::DuplicateHeight(entry.height));
            }
        }
        Ok(CheckpointTable {
            checkpoints,
            metadata,
        })
    }

    /// Build a table from `(height, hex hash)` literals.
    pub fn from_hex(
        entries: &[(u64, &str)],
        metadata: CheckpointMetadata,
    ) -> Result<Self, CheckpointError> {
        let parsed = entries
            .iter()
            .map(|(height, hex)| {
                Ok(CheckpointEntry {
                    height: *height,
                    hash: parse_hash(hex)?,
                })
            })
            .collect::<Result<Vec<_>, CheckpointError>>()?;
        Self::new(parsed, metadata)
    }

    /// Hash pinned at `height`, if that height is a checkpoint.
    pub fn lookup(&self, height: u64) -> Option<H256> {
        self.checkpoints.get(&height).copied()
    }

    pub fn contains(&self, height: u64) -> bool {
        self.checkpoints.contains_key(&height)
    }

    /// Height of the highest checkpoint, or 0 for an empty table.
    ///
    /// A placeholder entry still counts here even though its hash can't
    /// reject anything.
    pub fn highest_height(&self) -> u64 {
        self.checkpoints.keys().next_back().copied().unwrap_or(0)
    }

    pub fn metadata(&self) -> &CheckpointMetadata {
        &self.metadata
    }

    /// Entries in ascending height order
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = CheckpointEntry> + '_ {
        self.checkpoints
            .iter()
            .map(|(height, hash)| CheckpointEntry {
                height: *height,
                hash: *hash,
            })
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::is_null;

    #[test]
    fn mainnet_table_loads() {
        let table = CheckpointTable::for_network(Network::Main);
        assert_eq!(table.len(), 27);
        assert_eq!(table.highest_height(), 163065);
        assert_eq!(
            table.lookup(0).unwrap(),
            parse_hash("8c0d74f0126f18dfc3e8651d6dd9da7c54beee28f84dbc1d3b8349fae64a2f8b")
                .unwrap()
        );
        assert!(table.lookup(1).is_none());
        assert!(table.contains(155800));
        assert_eq!(table.metadata().tx_count_at_last_checkpoint, 50000);
    }

    #[test]
    fn entries_are_strictly_increasing() {
        let table = CheckpointTable::for_network(Network::Main);
        let heights: Vec<u64> = table.entries().map(|e| e.height).collect();
        assert!(heights.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table.entries().next_back().unwrap().height, 163065);
    }

    #[test]
    fn testnet_has_single_placeholder() {
        let table = CheckpointTable::for_network(Network::Test);
        assert_eq!(table.len(), 1);
        assert_eq!(table.highest_height(), 0);
        assert!(is_null(&table.lookup(0).unwrap()));
        assert_eq!(*table.metadata(), CheckpointMetadata::default());
    }

    #[test]
    fn empty_table_highest_is_zero() {
        let table = CheckpointTable::new(vec![], CheckpointMetadata::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.highest_height(), 0);
    }

    #[test]
    fn duplicate_heights_rejected() {
        let entries = vec![
            CheckpointEntry {
                height: 10,
                hash: H256::repeat_byte(1),
            },
            CheckpointEntry {
                height: 10,
                hash: H256::repeat_byte(2),
            },
        ];
        assert_eq!(
            CheckpointTable::new(entries, CheckpointMetadata::default()),
            Err(CheckpointError::DuplicateHeight(10))
        );
    }

    #[test]
    fn bad_literal_rejected() {
        let err = CheckpointTable::from_hex(&[(0, "0x1234")], CheckpointMetadata::default());
        assert!(matches!(err, Err(CheckpointError::InvalidHash(_, _))));
    }
}
