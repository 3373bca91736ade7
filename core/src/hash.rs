use crate::error::CheckpointError;
use primitive_types::H256;

/// Parse a 256-bit block hash from hex.
///
/// Accepts an optional `0x` prefix. An empty body yields the null hash,
/// which is how unresolved placeholder checkpoints are written.
pub fn parse_hash(s: &str) -> Result<H256, CheckpointError> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    if body.is_empty() {
        return Ok(H256::zero());
    }

    let bytes = hex::decode(body)
        .map_err(|e| CheckpointError::InvalidHash(s.to_string(), e.to_string()))?;
    if bytes.len() != 32 {
        return Err(CheckpointError::InvalidHash(
            s.to_string(),
            format!("expected 32 bytes, got {}", bytes.len()),
        ));
    }
    Ok(H256::from_slice(&bytes))
}

/// True for the all-zero placeholder hash
pub fn is_null(hash: &H256) -> bool {
    hash.is_zero()
}

/// Shortened hex for log lines
pub(crate) fn short_hex(hash: &H256) -> String {
    let full = hex::encode(hash.as_bytes());
    full[..16].to_string()
}
