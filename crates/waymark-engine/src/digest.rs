//! Domain-separated content digests.
//!
//! Digests are computed as `sha256(domain_separator || bytes)` and encoded
//! base64url without padding. Zone receipts and layout entries never carry
//! raw content, only these digests.

use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};

/// Domain separator for literal zone content: `b"waymark:zone:v1\0"`.
const ZONE_DOMAIN_SEPARATOR: &[u8] = b"waymark:zone:v1\0";

/// Domain separator for whole-document text: `b"waymark:text:v1\0"`.
const TEXT_DOMAIN_SEPARATOR: &[u8] = b"waymark:text:v1\0";

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA-256 (the current default).
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + bytes digest, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDigest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    pub b64: String,
}

impl ContentDigest {
    fn compute(domain: &[u8], payload: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        hasher.update(payload);
        let hash_bytes = hasher.finalize();
        use base64::Engine;
        let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash_bytes);
        ContentDigest {
            alg: DigestAlg::Sha256,
            b64,
        }
    }
}

/// Digest of one literal zone's content bytes.
pub fn zone_digest(content: &str) -> ContentDigest {
    ContentDigest::compute(ZONE_DOMAIN_SEPARATOR, content.as_bytes())
}

/// Digest of a whole document text.
pub fn text_digest(text: &str) -> ContentDigest {
    ContentDigest::compute(TEXT_DOMAIN_SEPARATOR, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digests_are_stable_and_domain_separated() {
        let a = zone_digest("hello");
        let b = zone_digest("hello");
        assert_eq!(a, b);
        assert_eq!(a.b64.len(), 43);
        // Same payload, different domain: digests must not collide.
        assert_ne!(zone_digest("hello").b64, text_digest("hello").b64);
        assert_ne!(zone_digest("hello").b64, zone_digest("hello ").b64);
    }

    #[test]
    fn test_digest_serialization_shape() {
        let digest = zone_digest("");
        let json = serde_json::to_value(&digest).unwrap();
        assert_eq!(json["alg"], "sha-256");
        assert_eq!(json["b64"].as_str().unwrap().len(), 43);
    }
}
