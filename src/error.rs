//! Error types for wallet operations.

use core::fmt;

/// Errors that can occur during wallet operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An address string failed normalization (wrong length or non-hex content).
    MalformedAddress(String),
    /// The requested address is not held by the wallet.
    UnknownAddress(String),
    /// Construction from a malformed extended key or mnemonic phrase.
    InvalidSeed(String),
    /// Child key derivation produced an invalid candidate at some index.
    ///
    /// Recovered internally by retrying the next index; public operations
    /// never return this variant.
    Derivation(String),
    /// A recoverable signature is structurally invalid (wrong length, or
    /// recovery does not yield a curve point).
    InvalidSignature,
    /// A chain id too large to encode into the replay-protected `v`
    /// (`chain_id * 2 + 35` must fit in a u64).
    ChainIdOutOfRange(u64),
    /// `discard_addresses` asked for more accounts than the wallet holds.
    DiscardOutOfRange {
        /// Number of accounts requested for removal.
        requested: usize,
        /// Number of accounts currently held.
        held: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedAddress(addr) => write!(f, "malformed address: {addr}"),
            Self::UnknownAddress(addr) => write!(f, "unknown address: {addr}"),
            Self::InvalidSeed(msg) => write!(f, "invalid seed: {msg}"),
            Self::Derivation(msg) => write!(f, "key derivation error: {msg}"),
            Self::InvalidSignature => write!(f, "invalid signature"),
            Self::ChainIdOutOfRange(id) => {
                write!(f, "chain id {id} cannot be encoded into a replay-protected v")
            }
            Self::DiscardOutOfRange { requested, held } => {
                write!(f, "cannot discard {requested} of {held} held addresses")
            }
        }
    }
}

impl std::error::Error for Error {}
