//! Deterministic identifiers for candidates and topics.
//!
//! Identifiers are derived from a SHA-256 digest of the record's origin and
//! discovery time. A story rediscovered after the dedup window has lapsed is
//! a new discovery and gets its own storage key.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
const ID_HEX_LEN: usize = 16;

/// Compute a candidate ID from its origin URL, title and discovery time.
///
/// Format: `CD-<16 hex chars>`.
pub fn candidate_id(source_url: &str, title: &str, discovered_at_ms: i64) -> String {
    let mut h = Sha256::new();
    // Domain separators prevent field-boundary collisions
    h.update(b"u:");
    h.update(source_url.trim().as_bytes());
    h.update(b"\nt:");
    h.update(title.trim().as_bytes());
    h.update(b"\nd:");
    h.update(discovered_at_ms.to_be_bytes());
    format!("CD-{}", hex::encode_prefix(&h.finalize(), ID_HEX_LEN))
}

/// Compute the topic ID for a promoted candidate.
///
/// Format: `TP-<16 hex chars>`.
pub fn topic_id(candidate_id: &str) -> String {
    let mut h = Sha256::new();
    h.update(b"topic:");
    h.update(candidate_id.as_bytes());
    format!("TP-{}", hex::encode_prefix(&h.finalize(), ID_HEX_LEN))
}

// Inline hex encoding to avoid adding another dependency
mod hex {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    pub fn encode_prefix(bytes: &[u8], len: usize) -> String {
        let mut s = String::with_capacity(len);
        for b in bytes {
            if s.len() >= len {
                break;
            }
            s.push(HEX_CHARS[(b >> 4) as usize] as char);
            s.push(HEX_CHARS[(b & 0x0f) as usize] as char);
        }
        s.truncate(len);
        s
    }
}
