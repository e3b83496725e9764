//! Deterministic child-key derivation at the wallet's fixed account path.

use bip32::{ChildNumber, DerivationPath, XPrv};
use k256::ecdsa::SigningKey;

use crate::address::Address;
use crate::error::Error;

/// Account-level BIP44 derivation path for Ethereum external addresses.
///
/// See <https://github.com/ethereum/EIPs/issues/85>.
pub const BIP44_PATH: &str = "m/44'/60'/0'/0";

/// A derived keypair: the signing key at some index and its address.
pub struct Keypair {
    /// Child private key (zeroized on drop by k256).
    pub key: SigningKey,
    /// Canonical address of the corresponding public key.
    pub address: Address,
}

/// Derives child keypairs under the account-level extended key.
pub struct AccountDeriver {
    root: XPrv,
}

impl AccountDeriver {
    /// Build a deriver from a master extended private key, descending to
    /// the fixed account path.
    pub fn from_master(master: XPrv) -> Result<Self, Error> {
        let path: DerivationPath = BIP44_PATH
            .parse()
            .map_err(|e| Error::InvalidSeed(format!("bad account path: {e}")))?;

        let mut root = master;
        for child in path.iter() {
            root = root
                .derive_child(child)
                .map_err(|e| Error::InvalidSeed(format!("account path derivation: {e}")))?;
        }
        Ok(Self { root })
    }

    /// Build a deriver from raw seed bytes (16..=64 bytes, typically the
    /// 64-byte BIP39 seed).
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        let path: DerivationPath = BIP44_PATH
            .parse()
            .map_err(|e| Error::InvalidSeed(format!("bad account path: {e}")))?;
        let root = XPrv::derive_from_path(seed, &path)
            .map_err(|e| Error::InvalidSeed(format!("seed derivation: {e}")))?;
        Ok(Self { root })
    }

    /// Derive the keypair at `index` (non-hardened child of the account key).
    ///
    /// Pure function of the account key and index: the same inputs always
    /// yield the same keypair, which is what makes discard-then-regenerate
    /// reproduce identical accounts.
    ///
    /// # Errors
    ///
    /// [`Error::Derivation`] when the candidate child key is invalid (a
    /// derived scalar outside the curve order, vanishingly rare). Callers
    /// recover by skipping to the next index.
    pub fn derive_at(&self, index: u32) -> Result<Keypair, Error> {
        let child = self
            .root
            .derive_child(ChildNumber(index))
            .map_err(|e| Error::Derivation(format!("index {index}: {e}")))?;

        let key = child.private_key().clone();
        let address = Address::from_public_key(key.verifying_key());
        Ok(Keypair { key, address })
    }
}

impl core::fmt::Debug for AccountDeriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountDeriver")
            .field("path", &BIP44_PATH)
            .field("root", &"[REDACTED]")
            .finish()
    }
}
