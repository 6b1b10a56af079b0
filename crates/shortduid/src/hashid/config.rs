/// The 62-character alphabet used when none is configured.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Candidate separator characters, kept only if present in the alphabet.
pub const DEFAULT_SEPARATORS: &str = "cfhistuCFHISTU";

/// Minimum combined size of alphabet and separators. Smaller configurations
/// fall back to [`DEFAULT_ALPHABET`].
pub const MIN_ALPHABET_LENGTH: usize = 16;

/// Construction parameters for a [`HashCodec`].
///
/// Every field has a default, so partial configurations (e.g., from a config
/// file with only a salt) deserialize cleanly when the `serde` feature is on.
///
/// # Example
///
/// ```
/// use shortduid::{HashCodec, HashCodecConfig};
///
/// let config = HashCodecConfig {
///     salt: "this is my salt".into(),
///     ..HashCodecConfig::default()
/// };
/// let codec = HashCodec::from(config);
/// assert_eq!(codec.encode(&[1, 2, 3]), "laHquq");
/// ```
///
/// [`HashCodec`]: crate::HashCodec
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashCodecConfig {
    /// Seeds every permutation. Not a secret.
    pub salt: String,
    /// Codes shorter than this are padded. `0` disables padding.
    pub min_length: usize,
    /// Digit symbols. Duplicates are ignored.
    pub alphabet: String,
}

impl Default for HashCodecConfig {
    fn default() -> Self {
        Self {
            salt: String::new(),
            min_length: 0,
            alphabet: DEFAULT_ALPHABET.to_owned(),
        }
    }
}
