//! BIP39 seed phrases
//!
//! Fresh phrases use 128 bits of OS randomness (12 English words).
//! Reference: https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::core::paths::derivation::ENTROPY_BYTES;
use crate::error::{Error, Result};

/// Generate a new 12-word phrase from OS randomness.
pub fn generate_seed_phrase() -> Result<String> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
    OsRng.fill_bytes(&mut entropy[..]);
    generate_seed_phrase_from_entropy(&entropy[..])
}

/// Encode caller-supplied entropy (16..=32 bytes, multiple of 4) as a phrase.
pub fn generate_seed_phrase_from_entropy(entropy: &[u8]) -> Result<String> {
    if !(16..=32).contains(&entropy.len()) || entropy.len() % 4 != 0 {
        return Err(Error::InvalidEntropy(entropy.len()));
    }
    let mnemonic = Mnemonic::from_entropy(entropy).map_err(|e| Error::InvalidPhrase(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Parse a user-supplied phrase, returning it lower-cased and single-spaced.
pub fn validate_seed_phrase(phrase: &str) -> Result<String> {
    let lowered = phrase.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(Error::InvalidPhrase("empty phrase".into()));
    }
    let mnemonic = Mnemonic::parse_normalized(&lowered).map_err(|e| Error::InvalidPhrase(e.to_string()))?;
    Ok(mnemonic.to_string())
}

/// Number of words in an already-validated phrase.
pub fn word_count(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn generated_phrase_has_twelve_valid_words() {
        let phrase = generate_seed_phrase().unwrap();
        assert_eq!(word_count(&phrase), 12);
        assert_eq!(validate_seed_phrase(&phrase).unwrap(), phrase);
    }

    #[test]
    fn generated_phrases_differ() {
        assert_ne!(generate_seed_phrase().unwrap(), generate_seed_phrase().unwrap());
    }

    #[test]
    fn zero_entropy_is_the_abandon_vector() {
        let phrase = generate_seed_phrase_from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(phrase, TEST_MNEMONIC);
    }

    #[test]
    fn entropy_length_is_checked() {
        assert!(matches!(generate_seed_phrase_from_entropy(&[0u8; 15]), Err(Error::InvalidEntropy(15))));
        assert!(matches!(generate_seed_phrase_from_entropy(&[0u8; 18]), Err(Error::InvalidEntropy(18))));
        assert_eq!(word_count(&generate_seed_phrase_from_entropy(&[7u8; 32]).unwrap()), 24);
    }

    #[test]
    fn validate_normalizes_case_and_spacing() {
        let messy = "  ABANDON abandon  abandon abandon abandon abandon\tabandon abandon abandon abandon abandon About ";
        assert_eq!(validate_seed_phrase(messy).unwrap(), TEST_MNEMONIC);
    }

    #[test]
    fn validate_rejects_bad_checksum_and_words() {
        let bad_checksum = TEST_MNEMONIC.replace("about", "abandon");
        assert!(validate_seed_phrase(&bad_checksum).is_err());
        assert!(validate_seed_phrase("not a real phrase at all").is_err());
        assert!(validate_seed_phrase("   ").is_err());
    }
}
