use super::{
    DEFAULT_ALPHABET, DEFAULT_SEPARATORS, HashCodecConfig, MIN_ALPHABET_LENGTH,
    reorder::{from_digits, ord, push_digits, reorder, split},
};
use crate::{Error, Result};
use core::iter;

/// One separator is reserved for roughly every 3.5 alphabet characters.
const SEPARATOR_RATIO_NUM: usize = 2;
const SEPARATOR_RATIO_DEN: usize = 7;

/// One guard is reserved for every 12 alphabet characters (rounded up).
const GUARD_RATIO: usize = 12;

/// A reversible, salted codec between sequences of `u64` and short strings.
///
/// The output follows the hashids algorithm family: for the same salt,
/// alphabet and minimum length, codes are byte-for-byte identical to other
/// implementations of that family.
///
/// The codec is immutable after construction. Every call works on its own
/// copy of the alphabet, so a single instance can be shared across threads
/// without synchronization.
///
/// This is obfuscation, not encryption: the salt only makes codes
/// unguessable to a casual observer.
///
/// # Example
///
/// ```
/// use shortduid::HashCodec;
///
/// let codec = HashCodec::with_salt("this is my salt");
///
/// let code = codec.encode(&[1, 2, 3]);
/// assert_eq!(code, "laHquq");
/// assert_eq!(codec.decode(&code), vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HashCodec {
    salt: String,
    salt_chars: Vec<char>,
    alphabet: Vec<char>,
    separators: Vec<char>,
    guards: Vec<char>,
    min_length: usize,
}

impl Default for HashCodec {
    fn default() -> Self {
        Self::new("", 0, DEFAULT_ALPHABET)
    }
}

impl From<HashCodecConfig> for HashCodec {
    fn from(config: HashCodecConfig) -> Self {
        Self::new(&config.salt, config.min_length, &config.alphabet)
    }
}

impl From<&HashCodecConfig> for HashCodec {
    fn from(config: &HashCodecConfig) -> Self {
        Self::new(&config.salt, config.min_length, &config.alphabet)
    }
}

impl HashCodec {
    /// Builds a codec.
    ///
    /// Construction never fails. Duplicate alphabet characters are dropped,
    /// and an alphabet that leaves fewer than [`MIN_ALPHABET_LENGTH`]
    /// characters (separators included) is replaced by
    /// [`DEFAULT_ALPHABET`].
    ///
    /// The alphabet is then partitioned into three disjoint sets:
    /// - separators, which delimit numbers within one code,
    /// - guards, which pad short codes,
    /// - the remaining digit symbols.
    #[must_use]
    pub fn new(salt: &str, min_length: usize, alphabet: &str) -> Self {
        let salt_chars: Vec<char> = salt.chars().collect();

        let (mut alphabet, mut separators) = partition_separators(alphabet);
        if alphabet.len() + separators.len() < MIN_ALPHABET_LENGTH {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                unique = alphabet.len() + separators.len(),
                minimum = MIN_ALPHABET_LENGTH,
                "alphabet too small, falling back to the default alphabet"
            );
            (alphabet, separators) = partition_separators(DEFAULT_ALPHABET);
        }

        reorder(&mut separators, &salt_chars);

        let min_separators = (alphabet.len() * SEPARATOR_RATIO_NUM).div_ceil(SEPARATOR_RATIO_DEN);
        if separators.len() < min_separators {
            let min_separators = min_separators.max(2);
            let borrow = min_separators - separators.len();
            separators.extend(alphabet.drain(..borrow));
        }

        reorder(&mut alphabet, &salt_chars);

        let num_guards = alphabet.len().div_ceil(GUARD_RATIO);
        let guards: Vec<char> = if alphabet.len() < 3 {
            separators.drain(..num_guards).collect()
        } else {
            alphabet.drain(..num_guards).collect()
        };

        Self {
            salt: salt.to_owned(),
            salt_chars,
            alphabet,
            separators,
            guards,
            min_length,
        }
    }

    /// Builds a codec with `salt`, no minimum length and the default
    /// alphabet.
    #[must_use]
    pub fn with_salt(salt: &str) -> Self {
        Self::new(salt, 0, DEFAULT_ALPHABET)
    }

    /// Returns the configured salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Returns the configured minimum code length.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns the digit symbols left after separators and guards were
    /// carved out, in salted order.
    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Returns the separator characters.
    #[must_use]
    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// Returns the guard characters.
    #[must_use]
    pub fn guards(&self) -> &[char] {
        &self.guards
    }

    /// Returns `true` if `ch` can appear in a code produced by this codec.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.alphabet.contains(&ch) || self.separators.contains(&ch) || self.guards.contains(&ch)
    }

    /// Encodes `numbers` into a single code.
    ///
    /// An empty slice encodes to an empty string. The result is at least
    /// [`Self::min_length`] characters long.
    #[must_use]
    pub fn encode(&self, numbers: &[u64]) -> String {
        if numbers.is_empty() {
            return String::new();
        }

        let mut alphabet = self.alphabet.clone();
        let values_hash = numbers
            .iter()
            .zip(100_u64..)
            .fold(0_u64, |acc, (&number, modulus)| {
                acc.wrapping_add(number % modulus)
            });
        let lottery = alphabet[(values_hash % alphabet.len() as u64) as usize];

        // `ensure_length` grows the buffer when padding is needed
        let mut output = Vec::with_capacity(numbers.len() * 12);
        output.push(lottery);

        let mut step_salt = Vec::with_capacity(alphabet.len());
        for (i, &number) in numbers.iter().enumerate() {
            self.fill_step_salt(lottery, &alphabet, &mut step_salt);
            reorder(&mut alphabet, &step_salt);

            let start = output.len();
            push_digits(number, &alphabet, &mut output);

            // Only a NUL first digit at index 0 yields a zero modulus.
            let modulus = ord(output[start]) + i as u64;
            let number = number.checked_rem(modulus).unwrap_or(number);
            let separator = number % self.separators.len() as u64;
            output.push(self.separators[separator as usize]);
        }
        output.pop();

        if output.len() < self.min_length {
            self.ensure_length(&mut output, &mut alphabet, values_hash);
        }

        output.into_iter().collect()
    }

    /// Decodes a code back into its numbers.
    ///
    /// Empty or guard-only input decodes to an empty vector. Input that this
    /// codec did not produce decodes to arbitrary numbers without signaling
    /// anything; use [`Self::try_decode`] when that must be detected.
    #[must_use]
    pub fn decode(&self, input: &str) -> Vec<u64> {
        let input: Vec<char> = input.chars().collect();
        let parts = split(&input, &self.guards);
        let payload = match parts.as_slice() {
            [] => return Vec::new(),
            [only] => *only,
            [_, second, ..] => *second,
        };
        let Some((&lottery, payload)) = payload.split_first() else {
            return Vec::new();
        };

        let mut alphabet = self.alphabet.clone();
        let mut step_salt = Vec::with_capacity(alphabet.len());
        split(payload, &self.separators)
            .into_iter()
            .map(|digits| {
                self.fill_step_salt(lottery, &alphabet, &mut step_salt);
                reorder(&mut alphabet, &step_salt);
                from_digits(digits, &alphabet)
            })
            .collect()
    }

    /// Decodes a code and verifies that it is exactly what [`Self::encode`]
    /// would produce for the decoded numbers.
    ///
    /// `try_decode("")` returns an empty vector.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCharacter`] if the input contains a character this
    ///   codec never emits.
    /// - [`Error::NonCanonical`] if the decoded numbers do not re-encode to the
    ///   input (different salt or alphabet, corruption, or overflow).
    ///
    /// # Example
    ///
    /// ```
    /// use shortduid::{Error, HashCodec};
    ///
    /// let codec = HashCodec::with_salt("this is my salt");
    /// assert_eq!(codec.try_decode("laHquq"), Ok(vec![1, 2, 3]));
    /// assert_eq!(
    ///     codec.try_decode("laH-quq"),
    ///     Err(Error::InvalidCharacter { ch: '-', index: 3 })
    /// );
    /// ```
    pub fn try_decode(&self, input: &str) -> Result<Vec<u64>> {
        if let Some((index, ch)) = input.chars().enumerate().find(|&(_, ch)| !self.contains(ch)) {
            return Err(Error::InvalidCharacter { ch, index });
        }

        let numbers = self.decode(input);
        if self.encode(&numbers) != input {
            return Err(Error::NonCanonical);
        }
        Ok(numbers)
    }

    /// Fills `buf` with `lottery + salt + alphabet`, truncated to the
    /// alphabet length.
    fn fill_step_salt(&self, lottery: char, alphabet: &[char], buf: &mut Vec<char>) {
        buf.clear();
        buf.extend(
            iter::once(lottery)
                .chain(self.salt_chars.iter().copied())
                .chain(alphabet.iter().copied())
                .take(alphabet.len()),
        );
    }

    /// Pads `output` up to `min_length`: one leading guard, possibly one
    /// trailing guard, then halves of a self-reordered alphabet wrapped
    /// around it until long enough, trimmed evenly from both ends.
    fn ensure_length(&self, output: &mut Vec<char>, alphabet: &mut Vec<char>, values_hash: u64) {
        let guards = self.guards.len() as u64;

        let guard = (values_hash.wrapping_add(ord(output[0])) % guards) as usize;
        output.insert(0, self.guards[guard]);

        if output.len() < self.min_length {
            let guard = (values_hash.wrapping_add(ord(output[2])) % guards) as usize;
            output.push(self.guards[guard]);
        }

        let split_at = alphabet.len() / 2;
        while output.len() < self.min_length {
            let salt = alphabet.clone();
            reorder(alphabet, &salt);

            let mut padded = Vec::with_capacity(alphabet.len() + output.len());
            padded.extend_from_slice(&alphabet[split_at..]);
            padded.extend_from_slice(output);
            padded.extend_from_slice(&alphabet[..split_at]);

            let excess = padded.len().saturating_sub(self.min_length);
            if excess > 0 {
                let from = excess / 2;
                padded.drain(..from);
                padded.truncate(self.min_length);
            }
            *output = padded;
        }
    }
}

/// Dedupes `alphabet` (first occurrence wins) and moves the
/// [`DEFAULT_SEPARATORS`] it contains into a separate set, in candidate
/// order.
fn partition_separators(alphabet: &str) -> (Vec<char>, Vec<char>) {
    let mut unique: Vec<char> = Vec::with_capacity(alphabet.len());
    for ch in alphabet.chars() {
        if !unique.contains(&ch) {
            unique.push(ch);
        }
    }

    let separators: Vec<char> = DEFAULT_SEPARATORS
        .chars()
        .filter(|ch| unique.contains(ch))
        .collect();
    unique.retain(|ch| !separators.contains(ch));
    (unique, separators)
}
