use rand::{Rng, rng};

/// Characters used by [`random_api_key`].
pub const API_KEY_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters used by [`random_password`]: the API key alphabet plus
/// punctuation.
pub const PASSWORD_ALPHABET: &str =
    "!#$%&()=-~^[{]};+:*_?/><0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const DEFAULT_API_KEY_LENGTH: usize = 64;
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Returns `length` characters drawn uniformly from `alphabet` using the
/// thread-local RNG.
///
/// An empty alphabet yields an empty string.
pub fn random_string(alphabet: &str, length: usize) -> String {
    random_string_with(&mut rng(), alphabet, length)
}

/// Like [`random_string`], but draws from the given RNG.
///
/// # Example
/// ```
/// use shortduid::random_string_with;
///
/// let mut rng = rand::rng();
/// let s = random_string_with(&mut rng, "ab", 8);
/// assert_eq!(s.len(), 8);
/// assert!(s.chars().all(|c| c == 'a' || c == 'b'));
/// ```
pub fn random_string_with<R>(rng: &mut R, alphabet: &str, length: usize) -> String
where
    R: Rng + ?Sized,
{
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    (0..length)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect()
}

/// Generates an alphanumeric API key of `length` characters.
pub fn random_api_key(length: usize) -> String {
    random_string(API_KEY_ALPHABET, length)
}

/// Generates a password of `length` characters, mixing punctuation into the
/// alphanumeric set.
pub fn random_password(length: usize) -> String {
    random_string(PASSWORD_ALPHABET, length)
}
