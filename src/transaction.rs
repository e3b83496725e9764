//! Legacy (EIP-155) Ethereum transaction construction and signing.

use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};

use crate::error::Error;
use crate::signature::RecoverableSignature;

/// Parameters for signing a transaction, as supplied by the caller.
///
/// `from` must be an address held by the wallet. A missing `to` signals
/// contract creation; `data` defaults to empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxParams {
    /// Sender address (any accepted textual form).
    pub from: String,
    /// Recipient address; `None` deploys a contract.
    pub to: Option<String>,
    /// Value in wei.
    pub value: u128,
    /// Call data / contract init code.
    pub data: Vec<u8>,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Transaction nonce.
    pub nonce: u64,
    /// EIP-155 chain id the signature is bound to.
    pub chain_id: u64,
}

/// A legacy transaction, unsigned until [`Transaction::sign`] fills v/r/s.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Transaction nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient address (None for contract creation).
    pub to: Option<[u8; 20]>,
    /// Value in wei.
    pub value: u128,
    /// Transaction data.
    pub data: Vec<u8>,
    /// Chain ID (EIP-155).
    pub chain_id: u64,
    /// Signature v component, replay-protected.
    pub v: Option<u64>,
    /// Signature r component.
    pub r: Option<[u8; 32]>,
    /// Signature s component.
    pub s: Option<[u8; 32]>,
}

impl Transaction {
    /// Create an unsigned transaction.
    pub fn new(
        nonce: u64,
        gas_price: u128,
        gas_limit: u64,
        to: Option<[u8; 20]>,
        value: u128,
        data: Vec<u8>,
        chain_id: u64,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            chain_id,
            v: None,
            r: None,
            s: None,
        }
    }

    /// Check whether v/r/s are present.
    pub fn is_signed(&self) -> bool {
        self.v.is_some() && self.r.is_some() && self.s.is_some()
    }

    /// The EIP-155 signing hash: keccak256 of the nine-item unsigned
    /// payload ending in `(chain_id, 0, 0)`.
    pub fn signing_hash(&self) -> [u8; 32] {
        let items = [
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.gas_price),
            rlp_encode_u64(self.gas_limit),
            match &self.to {
                Some(addr) => rlp_encode_bytes(addr),
                None => rlp_encode_bytes(&[]),
            },
            rlp_encode_u128(self.value),
            rlp_encode_bytes(&self.data),
            rlp_encode_u64(self.chain_id),
            rlp_encode_u64(0),
            rlp_encode_u64(0),
        ];

        let mut hasher = Keccak256::new();
        hasher.update(rlp_encode_list(&items));
        hasher.finalize().into()
    }

    /// Sign with the given key, binding the signature to `chain_id` via
    /// `v = chain_id * 2 + 35 + recovery_id`.
    ///
    /// # Errors
    ///
    /// [`Error::ChainIdOutOfRange`] when `chain_id * 2 + 35` does not
    /// fit in a u64.
    pub fn sign(&self, key: &SigningKey) -> Result<Self, Error> {
        let hash = self.signing_hash();
        let sig = RecoverableSignature::sign_prehash(key, &hash)?;

        // sign_prehash encodes v as recid + 27; undo that here.
        let recovery_id = u64::from(sig.v - 27);
        let v = self
            .chain_id
            .checked_mul(2)
            .and_then(|doubled| doubled.checked_add(35 + recovery_id))
            .ok_or(Error::ChainIdOutOfRange(self.chain_id))?;

        Ok(Self {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            chain_id: self.chain_id,
            v: Some(v),
            r: Some(sig.r),
            s: Some(sig.s),
        })
    }

    /// RLP-serialize, including v/r/s when signed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut items = vec![
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.gas_price),
            rlp_encode_u64(self.gas_limit),
            match &self.to {
                Some(addr) => rlp_encode_bytes(addr),
                None => rlp_encode_bytes(&[]),
            },
            rlp_encode_u128(self.value),
            rlp_encode_bytes(&self.data),
        ];

        if let (Some(v), Some(r), Some(s)) = (self.v, &self.r, &self.s) {
            items.push(rlp_encode_u64(v));
            items.push(rlp_encode_bytes(trim_leading_zeros(r)));
            items.push(rlp_encode_bytes(trim_leading_zeros(s)));
        }

        rlp_encode_list(&items)
    }

    /// Serialize to a lowercase `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

/// RLP encode a u64.
fn rlp_encode_u64(value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![0x80];
    }
    let bytes = value.to_be_bytes();
    rlp_encode_bytes(trim_leading_zeros(&bytes))
}

/// RLP encode a u128.
fn rlp_encode_u128(value: u128) -> Vec<u8> {
    if value == 0 {
        return vec![0x80];
    }
    let bytes = value.to_be_bytes();
    rlp_encode_bytes(trim_leading_zeros(&bytes))
}

/// RLP encode a byte string.
fn rlp_encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return vec![0x80];
    }

    if bytes.len() == 1 && bytes[0] < 0x80 {
        return vec![bytes[0]];
    }

    if bytes.len() <= 55 {
        let mut result = Vec::with_capacity(1 + bytes.len());
        result.push(0x80 + bytes.len() as u8);
        result.extend_from_slice(bytes);
        return result;
    }

    let len_bytes = encode_length(bytes.len());
    let mut result = Vec::with_capacity(1 + len_bytes.len() + bytes.len());
    result.push(0xb7 + len_bytes.len() as u8);
    result.extend_from_slice(&len_bytes);
    result.extend_from_slice(bytes);
    result
}

/// RLP encode a list of already-encoded items.
fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let total_len: usize = items.iter().map(|i| i.len()).sum();

    if total_len <= 55 {
        let mut result = Vec::with_capacity(1 + total_len);
        result.push(0xc0 + total_len as u8);
        for item in items {
            result.extend_from_slice(item);
        }
        return result;
    }

    let len_bytes = encode_length(total_len);
    let mut result = Vec::with_capacity(1 + len_bytes.len() + total_len);
    result.push(0xf7 + len_bytes.len() as u8);
    result.extend_from_slice(&len_bytes);
    for item in items {
        result.extend_from_slice(item);
    }
    result
}

/// Encode a payload length as minimal big-endian bytes.
fn encode_length(len: usize) -> Vec<u8> {
    if len <= 0xff {
        vec![len as u8]
    } else if len <= 0xffff {
        (len as u16).to_be_bytes().to_vec()
    } else if len <= 0xff_ffff {
        (len as u32).to_be_bytes()[1..].to_vec()
    } else {
        (len as u32).to_be_bytes().to_vec()
    }
}

/// Trim leading zero bytes.
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rlp_scalar_encoding() {
        assert_eq!(rlp_encode_u64(0), vec![0x80]);
        assert_eq!(rlp_encode_u64(1), vec![0x01]);
        assert_eq!(rlp_encode_u64(127), vec![0x7f]);
        assert_eq!(rlp_encode_u64(128), vec![0x81, 0x80]);
        assert_eq!(rlp_encode_u64(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(rlp_encode_u128(100_000_000_000), vec![0x85, 0x17, 0x48, 0x76, 0xe8, 0x00]);
    }

    #[test]
    fn rlp_byte_string_encoding() {
        assert_eq!(rlp_encode_bytes(&[]), vec![0x80]);
        assert_eq!(rlp_encode_bytes(&[0x00]), vec![0x00]);
        assert_eq!(rlp_encode_bytes(&[0x7f]), vec![0x7f]);
        assert_eq!(rlp_encode_bytes(&[0x80]), vec![0x81, 0x80]);
        // 56 bytes crosses into the long form.
        let long = vec![0xaa; 56];
        let encoded = rlp_encode_bytes(&long);
        assert_eq!(encoded[0], 0xb8);
        assert_eq!(encoded[1], 56);
    }

    #[test]
    fn rlp_list_encoding() {
        assert_eq!(rlp_encode_list(&[]), vec![0xc0]);
        assert_eq!(
            rlp_encode_list(&[vec![0x01], vec![0x02]]),
            vec![0xc2, 0x01, 0x02]
        );
    }

    #[test]
    fn unsigned_serialization_omits_vrs() {
        let tx = Transaction::new(0, 20_000_000_000, 21000, Some([1u8; 20]), 1, Vec::new(), 1);
        assert!(!tx.is_signed());
        let hex = tx.to_hex();
        assert!(hex.starts_with("0x"));
    }

    #[test]
    fn sign_produces_replay_protected_v() {
        let key = SigningKey::from_slice(&hex_literal::hex!(
            "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"
        ))
        .unwrap();

        let tx = Transaction::new(
            0,
            20_000_000_000,
            21000,
            Some([1u8; 20]),
            1_000_000_000_000_000_000,
            Vec::new(),
            1,
        );
        let signed = tx.sign(&key).unwrap();
        assert!(signed.is_signed());
        // EIP-155 for chain 1: v is 37 or 38.
        let v = signed.v.unwrap();
        assert!(v == 37 || v == 38);
    }

    #[test]
    fn rejects_chain_id_overflowing_v() {
        let key = SigningKey::from_slice(&hex_literal::hex!(
            "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d"
        ))
        .unwrap();

        let tx = Transaction::new(0, 1, 21000, Some([1u8; 20]), 1, Vec::new(), u64::MAX);
        assert!(matches!(
            tx.sign(&key),
            Err(Error::ChainIdOutOfRange(id)) if id == u64::MAX
        ));

        // The largest chain id whose v still fits must sign cleanly.
        let max_ok = (u64::MAX - 36) / 2;
        let tx = Transaction::new(0, 1, 21000, Some([1u8; 20]), 1, Vec::new(), max_ok);
        let signed = tx.sign(&key).unwrap();
        assert!(signed.v.unwrap() >= max_ok * 2 + 35);
    }

    #[test]
    fn contract_creation_encodes_empty_to() {
        let tx = Transaction::new(0, 1, 100_000, None, 0, vec![0x60, 0x60], 1);
        // nonce(80) gasPrice(01) gasLimit(830186a0) to(80) value(80) data(826060)
        assert_eq!(tx.to_hex(), "0xcb8001830186a08080826060");
    }
}
