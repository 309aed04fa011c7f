//! Shared utility functions for CLI commands

use sha2::{Digest, Sha256};

/// Format a byte size as a human-readable string
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Hex-encoded SHA256 of `data`
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// First `len` characters of a hex digest
#[must_use]
pub fn short_digest(digest: &str, len: usize) -> &str {
    &digest[..digest.len().min(len)]
}
