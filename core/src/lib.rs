pub mod block_index;
pub mod checker;
pub mod checkpoint;
pub mod error;
pub mod hash;
pub mod network;
pub mod progress;

// Explicit re-exports so callers don't have to walk the module tree
pub use block_index::{BlockIndex, BlockIndexNode};
pub use checker::Checkpoints;
pub use checkpoint::{CheckpointEntry, CheckpointMetadata, CheckpointTable};
pub use error::CheckpointError;
pub use hash::{is_null, parse_hash};
pub use network::Network;
pub use primitive_types::H256;
