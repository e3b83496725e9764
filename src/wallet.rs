//! Deterministic HD wallet: account registry and signing entry points.

use std::collections::HashMap;

use bip32::XPrv;

use crate::address::Address;
use crate::deriver::AccountDeriver;
use crate::eip191;
use crate::error::Error;
use crate::signature::RecoverableSignature;
use crate::transaction::{Transaction, TxParams};
use crate::types::Secret32;

/// Non-hardened child indices occupy the low half of the u32 space.
const MAX_CHILD_INDEX: u32 = 1 << 31;

/// An account held by the wallet: the keypair derived at `index`.
struct Account {
    /// Derivation offset under the account-level key.
    index: u32,
    /// Canonical address, fixed at derivation time.
    address: Address,
    /// Child private key; zeroized on drop, read only for signing/export.
    key: k256::ecdsa::SigningKey,
}

/// A deterministic Ethereum HD wallet.
///
/// Derives an ordered sequence of keypairs under the fixed BIP44 account
/// path, registers them by canonical address, and signs transactions and
/// personal messages with the key owned by a chosen address.
///
/// Registry mutation (`generate_addresses`, `discard_addresses`) takes
/// `&mut self`; everything else borrows shared. Wrap the wallet in a lock
/// to share it across threads.
pub struct Wallet {
    deriver: AccountDeriver,
    /// Held accounts in ascending derivation order.
    accounts: Vec<Account>,
    /// Canonical address to position in `accounts`.
    index_by_address: HashMap<Address, usize>,
    /// Derivation cursor: the next index to attempt.
    next_index: u32,
}

impl Wallet {
    fn new(deriver: AccountDeriver) -> Self {
        Self {
            deriver,
            accounts: Vec::new(),
            index_by_address: HashMap::new(),
            next_index: 0,
        }
    }

    /// Construct from a Base58 master extended private key (`xprv…`).
    ///
    /// The account-level key is derived from it along
    /// [`crate::deriver::BIP44_PATH`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeed`] if the string is not a valid extended key.
    pub fn from_extended_key(xprv: &str) -> Result<Self, Error> {
        let master: XPrv = xprv
            .parse()
            .map_err(|e| Error::InvalidSeed(format!("extended key: {e}")))?;
        Ok(Self::new(AccountDeriver::from_master(master)?))
    }

    /// Construct from raw seed bytes (typically the 64-byte BIP39 seed).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeed`] if the seed length is out of range.
    pub fn from_seed(seed: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(AccountDeriver::from_seed(seed)?))
    }

    /// Construct from a BIP39 mnemonic phrase (empty passphrase).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeed`] if the phrase fails BIP39 validation.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, Error> {
        let mnemonic: bip39::Mnemonic = phrase
            .parse()
            .map_err(|e| Error::InvalidSeed(format!("mnemonic: {e}")))?;
        Self::from_seed(&mnemonic.to_seed(""))
    }

    /// Derive `n` new accounts from the cursor and register them.
    ///
    /// The cursor advances for every attempted index; a candidate whose
    /// derivation fails is skipped without consuming a slot in the returned
    /// set, so exactly `n` fresh addresses come back, in derivation order.
    ///
    /// `n = 0` is accepted and leaves the wallet untouched, returning an
    /// empty set; [`discard_addresses`](Self::discard_addresses), by
    /// contrast, rejects zero.
    ///
    /// # Errors
    ///
    /// [`Error::Derivation`] only if the non-hardened index space is
    /// exhausted.
    pub fn generate_addresses(&mut self, n: usize) -> Result<Vec<Address>, Error> {
        let mut fresh = Vec::with_capacity(n);

        while fresh.len() < n {
            if self.next_index >= MAX_CHILD_INDEX {
                return Err(Error::Derivation(
                    "non-hardened derivation index space exhausted".into(),
                ));
            }
            let index = self.next_index;
            self.next_index += 1;

            // Invalid candidates (Derivation errors) skip the index; the
            // next one is tried instead.
            let keypair = match self.deriver.derive_at(index) {
                Ok(keypair) => keypair,
                Err(_) => continue,
            };

            let previous = self
                .index_by_address
                .insert(keypair.address, self.accounts.len());
            debug_assert!(previous.is_none(), "derived address collision");
            self.accounts.push(Account {
                index,
                address: keypair.address,
                key: keypair.key,
            });
            fresh.push(keypair.address);
        }

        Ok(fresh)
    }

    /// Remove the last `n` accounts, returning their addresses in ascending
    /// derivation order.
    ///
    /// The cursor rewinds to the lowest removed index, so a later
    /// [`generate_addresses`](Self::generate_addresses) re-derives the same
    /// accounts (pure re-derivation; no secret material is cached).
    ///
    /// # Errors
    ///
    /// [`Error::DiscardOutOfRange`] when `n` is zero or exceeds the number
    /// of held accounts. Nothing is mutated on failure.
    pub fn discard_addresses(&mut self, n: usize) -> Result<Vec<Address>, Error> {
        let held = self.accounts.len();
        if n == 0 || n > held {
            return Err(Error::DiscardOutOfRange { requested: n, held });
        }

        let removed = self.accounts.split_off(held - n);
        for account in &removed {
            self.index_by_address.remove(&account.address);
        }
        self.next_index = removed[0].index;

        Ok(removed.into_iter().map(|a| a.address).collect())
    }

    /// Snapshot of all held addresses, oldest first.
    pub fn addresses(&self) -> Vec<Address> {
        self.accounts.iter().map(|a| a.address).collect()
    }

    /// Number of held accounts.
    pub fn address_count(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the wallet holds `addr`. Input is normalized first; malformed
    /// or unknown addresses simply yield `false`.
    pub fn has_address(&self, addr: &str) -> bool {
        match Address::normalize(addr) {
            Ok(address) => self.index_by_address.contains_key(&address),
            Err(_) => false,
        }
    }

    /// Export the private key owning `addr` as a zeroizing secret.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedAddress`] on unparsable input,
    /// [`Error::UnknownAddress`] when the address is not held.
    pub fn private_key(&self, addr: &str) -> Result<Secret32, Error> {
        let account = self.account(addr)?;
        Ok(Secret32::new(account.key.to_bytes().into()))
    }

    /// Sign a transaction from a held address.
    ///
    /// Builds the EIP-155 legacy payload from `params`, signs it with the
    /// key owning `params.from`, and returns the raw signed transaction as
    /// a lowercase `0x`-prefixed hex string. The signature's `v` encodes
    /// `params.chain_id`, binding the transaction to that chain.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedAddress`] / [`Error::UnknownAddress`] for the
    /// address arguments, [`Error::ChainIdOutOfRange`] for a chain id whose
    /// `v` does not fit in a u64. No state is mutated on any failure.
    pub fn sign_transaction(&self, params: &TxParams) -> Result<String, Error> {
        let account = self.account(&params.from)?;
        let to = match &params.to {
            Some(to) => Some(*Address::normalize(to)?.as_bytes()),
            None => None,
        };

        let tx = Transaction::new(
            params.nonce,
            params.gas_price,
            params.gas_limit,
            to,
            params.value,
            params.data.clone(),
            params.chain_id,
        );
        Ok(tx.sign(&account.key)?.to_hex())
    }

    /// Personal-sign arbitrary data with the key owning `addr`.
    ///
    /// Returns the 65-byte r‖s‖v signature (v = recovery id + 27) as a
    /// lowercase `0x`-prefixed hex string. The inverse operation is
    /// [`crate::recover_address`].
    ///
    /// # Errors
    ///
    /// [`Error::MalformedAddress`] / [`Error::UnknownAddress`].
    pub fn sign_message(&self, addr: &str, data: &[u8]) -> Result<String, Error> {
        let account = self.account(addr)?;
        let hash = eip191::hash_message(data);
        let sig = RecoverableSignature::sign_prehash(&account.key, &hash)?;
        Ok(sig.to_hex())
    }

    /// Resolve a held account by any accepted address form.
    fn account(&self, addr: &str) -> Result<&Account, Error> {
        let address = Address::normalize(addr)?;
        self.index_by_address
            .get(&address)
            .map(|&pos| &self.accounts[pos])
            .ok_or_else(|| Error::UnknownAddress(address.to_string()))
    }
}

impl core::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wallet")
            .field("accounts", &self.accounts.len())
            .field("next_index", &self.next_index)
            .finish()
    }
}

/// Generate a 12-word English BIP39 mnemonic phrase.
///
/// The phrase is usable with [`Wallet::from_mnemonic`].
///
/// # Errors
///
/// [`Error::InvalidSeed`] if phrase generation fails.
pub fn generate_mnemonic() -> Result<String, Error> {
    let mnemonic = bip39::Mnemonic::generate(12)
        .map_err(|e| Error::InvalidSeed(format!("mnemonic generation: {e}")))?;
    Ok(mnemonic.to_string())
}
