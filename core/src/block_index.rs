use primitive_types::H256;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Read-only view of one entry of the node's block index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockIndexNode {
    pub height: u64,
    pub hash: H256,
    pub chain_tx: u64, // cumulative tx count from genesis through this block
    pub time: i64,     // unix seconds
}

/// Lookup-by-hash capability over the block index.
///
/// The index is owned and synchronized by its owner; implementations only
/// need to answer point queries.
pub trait BlockIndex {
    fn lookup(&self, hash: &H256) -> Option<&BlockIndexNode>;
}

impl BlockIndex for HashMap<H256, BlockIndexNode> {
    fn lookup(&self, hash: &H256) -> Option<&BlockIndexNode> {
        self.get(hash)
    }
}

impl BlockIndex for BTreeMap<H256, BlockIndexNode> {
    fn lookup(&self, hash: &H256) -> Option<&BlockIndexNode> {
        self.get(hash)
    }
}

impl<T: BlockIndex + ?Sized> BlockIndex for &T {
    fn lookup(&self, hash: &H256) -> Option<&BlockIndexNode> {
        (**self).lookup(hash)
    }
}

/// Build a hash-keyed index from a list of nodes (later duplicates win).
pub fn index_from_nodes(
    nodes: impl IntoIterator<Item = BlockIndexNode>,
) -> HashMap<H256, BlockIndexNode> {
    nodes.into_iter().map(|n| (n.hash, n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(height: u64, byte: u8) -> BlockIndexNode {
        BlockIndexNode {
            height,
            hash: H256::repeat_byte(byte),
            chain_tx: height * 2,
            time: 1_400_000_000 + height as i64 * 60,
        }
    }

    #[test]
    fn map_lookup_by_hash() {
        let index = index_from_nodes(vec![node(1, 0x11), node(2, 0x22)]);
        assert_eq!(index.lookup(&H256::repeat_byte(0x22)).unwrap().height, 2);
        assert!(index.lookup(&H256::repeat_byte(0x33)).is_none());

        let by_ref = &index;
        assert_eq!(by_ref.lookup(&H256::repeat_byte(0x11)).unwrap().height, 1);
    }

    #[test]
    fn node_deserializes_from_json() {
        let json = format!(
            r#"{{"height":5,"hash":"0x{}","chain_tx":9,"time":1400000300}}"#,
            "ab".repeat(32)
        );
        let n: BlockIndexNode = serde_json::from_str(&json).unwrap();
        assert_eq!(n.height, 5);
        assert_eq!(n.hash, H256::repeat_byte(0xab));
    }
}
