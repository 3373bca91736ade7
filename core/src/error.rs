use thiserror::Error;

/// Errors raised while building checkpoint tables or applying reorg policy.
///
/// The per-block checks themselves never fail: a rejected block is reported
/// as `false`, not as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("invalid block hash {0:?}: {1}")]
    InvalidHash(String, String),

    #[error("duplicate checkpoint at height {0}")]
    DuplicateHeight(u64),

    #[error(
        "reorg would go below checkpoint at height {checkpoint} (target height: {target})"
    )]
    ReorgBelowCheckpoint { checkpoint: u64, target: u64 },
}
