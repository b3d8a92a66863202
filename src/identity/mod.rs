//! Identity - seed phrases and the accounts derived from them.
//!
//! Every account comes from one BIP39 phrase: account `i` lives at
//! `m/44'/60'/0'/0/i`. Nothing here touches storage or the network.

mod derive;
mod phrase;

pub use derive::{
    address_from_uncompressed, derivation_path, derive_wallet, to_checksum_address,
    DerivedKey, SigningKey,
};
pub use phrase::{generate_seed_phrase, generate_seed_phrase_from_entropy, validate_seed_phrase, word_count};
