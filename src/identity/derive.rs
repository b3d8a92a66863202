//! HD derivation: phrase → BIP32 child at m/44'/60'/0'/0/{index} → Ethereum account
//!
//! The address is the last 20 bytes of Keccak-256 over the uncompressed public
//! key (without the 0x04 tag), rendered with the EIP-55 mixed-case checksum.

use bip39::Mnemonic;
use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::secp256k1::{PublicKey, Secp256k1};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::str::FromStr;
use zeroize::Zeroizing;

use crate::core::paths::derivation::PREFIX;
use crate::error::{Error, Result};

/// Key pair as exposed by the signing key of a derived account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningKey {
    pub private_key: String,
    /// Uncompressed SEC1 point (`0x04…`, 65 bytes)
    pub public_key: String,
    /// Compressed SEC1 point (`0x02…`/`0x03…`, 33 bytes)
    pub compressed_public_key: String,
}

/// Everything a wallet record needs from one derivation.
#[derive(Debug, Clone)]
pub struct DerivedKey {
    pub index: u32,
    pub path: String,
    pub address: String,
    pub private_key: String,
    pub public_key: String,
    pub signing_key: SigningKey,
    pub mnemonic: String,
}

pub fn derivation_path(index: u32) -> String {
    format!("{}/{}", PREFIX, index)
}

/// Derive account `index` from a BIP39 phrase (empty passphrase).
pub fn derive_wallet(phrase: &str, index: u32) -> Result<DerivedKey> {
    let mnemonic = Mnemonic::parse_normalized(phrase).map_err(|e| Error::InvalidPhrase(e.to_string()))?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    let secp = Secp256k1::new();
    let master = Xpriv::new_master(bitcoin::Network::Bitcoin, &seed[..])
        .map_err(|e| Error::Derivation(e.to_string()))?;

    let path_str = derivation_path(index);
    let path = DerivationPath::from_str(&path_str).map_err(|e| Error::Derivation(e.to_string()))?;
    let child = master
        .derive_priv(&secp, &path)
        .map_err(|e| Error::Derivation(e.to_string()))?;

    let secret = Zeroizing::new(child.private_key.secret_bytes());
    let public = PublicKey::from_secret_key(&secp, &child.private_key);
    let uncompressed = public.serialize_uncompressed();
    let compressed = public.serialize();

    let private_key = prefixed_hex(&secret[..]);
    let public_key = prefixed_hex(&compressed);

    Ok(DerivedKey {
        index,
        path: path_str,
        address: address_from_uncompressed(&uncompressed),
        signing_key: SigningKey {
            private_key: private_key.clone(),
            public_key: prefixed_hex(&uncompressed),
            compressed_public_key: public_key.clone(),
        },
        private_key,
        public_key,
        mnemonic: mnemonic.to_string(),
    })
}

/// `uncompressed` is the 65-byte SEC1 encoding.
pub fn address_from_uncompressed(uncompressed: &[u8; 65]) -> String {
    let hash = Keccak256::digest(&uncompressed[1..]);
    let mut raw = [0u8; 20];
    raw.copy_from_slice(&hash[12..]);
    to_checksum_address(&raw)
}

/// EIP-55: uppercase hex letters whose matching hash nibble is >= 8.
pub fn to_checksum_address(raw: &[u8; 20]) -> String {
    let lower = hex::encode(raw);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn prefixed_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn known_vector_index_zero() {
        let key = derive_wallet(TEST_MNEMONIC, 0).unwrap();
        assert_eq!(key.address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(key.private_key, "0x1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727");
        assert_eq!(key.path, "m/44'/60'/0'/0/0");
        assert_eq!(key.mnemonic, TEST_MNEMONIC);
    }

    #[test]
    fn key_encodings_have_expected_shapes() {
        let key = derive_wallet(TEST_MNEMONIC, 3).unwrap();
        assert_eq!(key.private_key.len(), 2 + 64);
        assert_eq!(key.public_key.len(), 2 + 66);
        assert!(key.public_key.starts_with("0x02") || key.public_key.starts_with("0x03"));
        assert_eq!(key.signing_key.public_key.len(), 2 + 130);
        assert!(key.signing_key.public_key.starts_with("0x04"));
        assert_eq!(key.signing_key.compressed_public_key, key.public_key);
        assert_eq!(key.signing_key.private_key, key.private_key);
        assert_eq!(key.address.len(), 2 + 40);
    }

    #[test]
    fn indices_give_distinct_accounts() {
        let a = derive_wallet(TEST_MNEMONIC, 0).unwrap();
        let b = derive_wallet(TEST_MNEMONIC, 1).unwrap();
        assert_ne!(a.address, b.address);
        assert_ne!(a.private_key, b.private_key);
        assert_eq!(b.path, "m/44'/60'/0'/0/1");
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_wallet(TEST_MNEMONIC, 7).unwrap();
        let b = derive_wallet(TEST_MNEMONIC, 7).unwrap();
        assert_eq!(a.address, b.address);
        assert_eq!(a.signing_key, b.signing_key);
    }

    #[test]
    fn hardened_range_index_is_rejected() {
        assert!(matches!(derive_wallet(TEST_MNEMONIC, 1 << 31), Err(Error::Derivation(_))));
    }

    #[test]
    fn invalid_phrase_is_rejected() {
        assert!(matches!(derive_wallet("abandon abandon", 0), Err(Error::InvalidPhrase(_))));
    }

    #[test]
    fn eip55_reference_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let mut raw = [0u8; 20];
            hex::decode_to_slice(&expected[2..].to_lowercase(), &mut raw).unwrap();
            assert_eq!(to_checksum_address(&raw), expected);
        }
    }
}
