//! Scoped secret type for exported private key material.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A fixed-size secret with automatic zeroization on drop.
///
/// Used for private key bytes leaving the registry via explicit export, so
/// the material does not linger in memory after the caller releases it.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretBytes<const N: usize>([u8; N]);

impl<const N: usize> SecretBytes<N> {
    /// Create from a byte array.
    #[inline]
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Get a reference to the inner bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Consume and return the inner bytes.
    #[inline]
    pub fn into_bytes(self) -> [u8; N] {
        self.0
    }
}

impl<const N: usize> AsRef<[u8]> for SecretBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> core::fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SecretBytes<{}>[REDACTED]", N)
    }
}

impl<const N: usize> ConstantTimeEq for SecretBytes<N> {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.ct_eq(&other.0)
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

/// A 32-byte secret (exported private key).
pub type Secret32 = SecretBytes<32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_contents() {
        let secret = Secret32::new([0xab; 32]);
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("ab"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn equality_is_by_value() {
        let a = Secret32::new([7u8; 32]);
        let b = Secret32::new([7u8; 32]);
        let c = Secret32::new([8u8; 32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
