use core::fmt;

/// A result type defaulting to this crate's [`enum@Error`].
///
/// Most `shortduid` APIs are infallible. Only the strict decode path,
/// [`HashCodec::try_decode`], reports errors.
///
/// [`HashCodec::try_decode`]: crate::HashCodec::try_decode
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `shortduid` can emit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The input contains a character that the codec never emits.
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its position, counted in characters.
        index: usize,
    },

    /// The input is made of valid characters, but the decoded numbers do not
    /// encode back to it.
    ///
    /// This happens when the code was produced with a different salt or
    /// alphabet, was corrupted, or encodes a value wider than 64 bits.
    NonCanonical,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { ch, index } => {
                write!(f, "invalid character {ch:?} at index {index}")
            }
            Self::NonCanonical => write!(f, "code does not match this codec configuration"),
        }
    }
}

impl core::error::Error for Error {}
