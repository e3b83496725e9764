//! EIP-191 personal-message hashing.
//!
//! Prefixing arbitrary data before hashing keeps personal signatures from
//! ever colliding with transaction signatures.

use sha3::{Digest, Keccak256};

/// Compute the EIP-191 personal message digest.
///
/// keccak256 of `"\x19Ethereum Signed Message:\n"` followed by the decimal
/// byte length of `message` and the message itself.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // keccak256("\x19Ethereum Signed Message:\n11hello world")
        let hash = hash_message(b"hello world");
        assert_eq!(
            hex::encode(hash),
            "d9eba16ed0ecae432b71fe008c98cc872bb4cc214d3220a36f365326cf807d68"
        );
    }

    #[test]
    fn empty_message_uses_zero_length() {
        let hash = hash_message(b"");
        assert_eq!(
            hex::encode(hash),
            "5f35dce98ba4fba25530a026ed80b2cecdaa31091ba4958b99b52ea1d068adad"
        );
    }

    #[test]
    fn digest_depends_on_length_prefix() {
        assert_ne!(hash_message(b"ab"), hash_message(b"abc"));
    }
}
