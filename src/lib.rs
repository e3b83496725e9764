//! Deterministic Ethereum HD wallet.
//!
//! Derives an ordered sequence of keypairs along the fixed BIP44 path
//! `m/44'/60'/0'/0/{index}`, tracks the derived accounts by canonical
//! address, and signs EIP-155 transactions and EIP-191 personal messages
//! with the key owned by a chosen address. Signature-based address
//! recovery needs no wallet state.
//!
//! # Usage
//!
//! ```
//! use eth_hd_wallet::{recover_address, TxParams, Wallet};
//!
//! let mut wallet = Wallet::from_mnemonic(
//!     "radar blur cabbage chef fix engine embark joy scheme fiction master release",
//! )?;
//!
//! let addresses = wallet.generate_addresses(2)?;
//! assert_eq!(
//!     addresses[0].to_string(),
//!     "0xac39b311dceb2a4b2f5d8461c1cdaf756f4f7ae9",
//! );
//!
//! let raw_tx = wallet.sign_transaction(&TxParams {
//!     from: addresses[0].to_string(),
//!     to: Some(addresses[1].to_string()),
//!     value: 1_000_000_000_000_000,
//!     data: Vec::new(),
//!     gas_limit: 21000,
//!     gas_price: 20_000_000_000,
//!     nonce: 0,
//!     chain_id: 1,
//! })?;
//! assert!(raw_tx.starts_with("0x"));
//!
//! let signature = wallet.sign_message(&addresses[0].to_string(), b"hello")?;
//! assert_eq!(recover_address(&signature, b"hello")?, addresses[0]);
//! # Ok::<(), eth_hd_wallet::Error>(())
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod address;
mod deriver;
pub mod eip191;
mod error;
mod signature;
mod transaction;
mod types;
mod wallet;

pub use address::Address;
pub use deriver::{AccountDeriver, Keypair, BIP44_PATH};
pub use error::Error;
pub use signature::{recover_address, RecoverableSignature};
pub use transaction::{Transaction, TxParams};
pub use types::{Secret32, SecretBytes};
pub use wallet::{generate_mnemonic, Wallet};

/// A convenient Result type alias for wallet operations.
pub type Result<T> = core::result::Result<T, Error>;
