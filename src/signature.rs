//! Recoverable ECDSA signatures in the 65-byte r‖s‖v personal-sign layout.

use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};

use crate::address::Address;
use crate::eip191;
use crate::error::Error;

/// An ECDSA signature with its recovery parameter.
///
/// `v` carries the legacy personal-sign convention: recovery id offset by 27.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// The r component (32 bytes, big-endian).
    pub r: [u8; 32],
    /// The s component (32 bytes, big-endian).
    pub s: [u8; 32],
    /// Recovery parameter, 27 or 28.
    pub v: u8,
}

impl RecoverableSignature {
    /// Sign a 32-byte digest, producing a recoverable signature.
    pub(crate) fn sign_prehash(key: &SigningKey, hash: &[u8; 32]) -> Result<Self, Error> {
        let (sig, recid) = key
            .sign_prehash_recoverable(hash)
            .map_err(|_| Error::InvalidSignature)?;

        let bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Ok(Self {
            r,
            s,
            v: recid.to_byte() + 27,
        })
    }

    /// Parse from the 65-byte r‖s‖v layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 65 {
            return Err(Error::InvalidSignature);
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| Error::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to the 65-byte r‖s‖v layout.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Serialize to a lowercase `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// The recovery id encoded in `v`, accepting both the bare 0/1 form and
    /// the legacy 27/28 form.
    fn recovery_id(&self) -> Result<RecoveryId, Error> {
        let byte = match self.v {
            0 | 1 => self.v,
            27 | 28 => self.v - 27,
            _ => return Err(Error::InvalidSignature),
        };
        RecoveryId::from_byte(byte).ok_or(Error::InvalidSignature)
    }

    /// Recover the signing public key from a 32-byte digest.
    ///
    /// Other signers may emit high-s signatures; those are normalized to
    /// low-s (with the recovery parity flipped to match) before recovery,
    /// so they recover the same key as their low-s equivalent.
    pub fn recover_from_prehash(&self, hash: &[u8; 32]) -> Result<VerifyingKey, Error> {
        let mut rs = [0u8; 64];
        rs[..32].copy_from_slice(&self.r);
        rs[32..].copy_from_slice(&self.s);

        let sig = k256::ecdsa::Signature::from_slice(&rs).map_err(|_| Error::InvalidSignature)?;
        let recid = self.recovery_id()?;

        // Negating s mirrors R across the x-axis, so the parity bit flips.
        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => {
                let flipped =
                    RecoveryId::from_byte(recid.to_byte() ^ 1).ok_or(Error::InvalidSignature)?;
                (normalized, flipped)
            }
            None => (sig, recid),
        };

        VerifyingKey::recover_from_prehash(hash, &sig, recid).map_err(|_| Error::InvalidSignature)
    }
}

/// Recover the address that personal-signed `message`.
///
/// Pure function of `(signature, message)`: recomputes the EIP-191 digest,
/// recovers the public key, and converts it to its canonical address. Needs
/// no wallet state, so it verifies signatures from any party.
pub fn recover_address(signature: &str, message: &[u8]) -> Result<Address, Error> {
    let sig = RecoverableSignature::from_hex(signature)?;
    let hash = eip191::hash_message(message);
    let public_key = sig.recover_from_prehash(&hash)?;
    Ok(Address::from_public_key(&public_key))
}
