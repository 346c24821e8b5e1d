//! Stock Key Derivation - (market, symbol) → stable 32-byte identifier
//!
//! The key is an opaque lookup token: derived once per operation, used to
//! address per-instrument state, never stored with provenance and never
//! reversed. Equal inputs always produce the identical key; the same symbol
//! on two different markets produces two different keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identifier for one instrument on one market.
///
/// Derivation is a pure BLAKE3 digest over `market 0x1F symbol`; the unit
/// separator keeps ("ab", "c") and ("a", "bc") from colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockKey([u8; 32]);

impl StockKey {
    /// Derive the key for a (market code, symbol) pair. Pure, no side effects.
    pub fn derive(market: &str, symbol: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(market.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(symbol.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Raw 32-byte digest
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, used in snapshots and logs
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in self.0 {
            s.push_str(&format!("{:02x}", b));
        }
        s
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = StockKey::derive("tsx", "acb");
        let b = StockKey::derive("tsx", "acb");
        assert_eq!(a, b);
    }

    #[test]
    fn test_market_separates_symbols() {
        // Same symbol on two markets must key different positions
        let tsx = StockKey::derive("tsx", "ry");
        let nyse = StockKey::derive("nyse", "ry");
        assert_ne!(tsx, nyse);
    }

    #[test]
    fn test_boundary_not_ambiguous() {
        // Without a separator these two pairs would hash the same bytes
        let a = StockKey::derive("ts", "xacb");
        let b = StockKey::derive("tsx", "acb");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_display() {
        let key = StockKey::derive("nasdaq", "tsla");
        let hex = key.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
