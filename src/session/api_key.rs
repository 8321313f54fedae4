//! API key generation

use rand::Rng;

/// Characters an API key may contain
pub const API_KEY_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of an issued key
pub const DEFAULT_API_KEY_LENGTH: usize = 32;

/// Generate a random key of `length` characters, each drawn uniformly from
/// [`API_KEY_ALPHABET`]
pub fn generate_api_key(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| API_KEY_ALPHABET[rng.random_range(0..API_KEY_ALPHABET.len())] as char)
        .collect()
}
