//! Primitives shared by encoding and decoding.
//!
//! Everything here works on `char` slices. The numeric value of a character is
//! its Unicode scalar value, which coincides with the byte value for ASCII and
//! keeps previously issued codes compatible with other implementations of the
//! same algorithm family.

#[inline]
pub(super) fn ord(c: char) -> u64 {
    u64::from(u32::from(c))
}

/// Deterministically permutes `input` in place, driven by `salt`.
///
/// Walks `i` from the last index down to 1 while a salt cursor `v` advances
/// (mod the salt length) and an accumulator `p` sums every salt value seen so
/// far; slot `i` is swapped with `(salt[v] + v + p) % i`. The accumulator is
/// never reset within a call. An empty salt leaves `input` untouched.
pub(super) fn reorder(input: &mut [char], salt: &[char]) {
    if salt.is_empty() {
        return;
    }

    let mut v = 0;
    let mut p = 0_u64;
    for i in (1..input.len()).rev() {
        v %= salt.len();
        let value = ord(salt[v]);
        p += value;
        let j = (value + v as u64 + p) % i as u64;
        input.swap(i, j as usize);
        v += 1;
    }
}

/// Appends `number` to `out` as positional digits over `alphabet`, most
/// significant first. Zero is a single `alphabet[0]`.
pub(super) fn push_digits(mut number: u64, alphabet: &[char], out: &mut Vec<char>) {
    let base = alphabet.len() as u64;
    let start = out.len();
    loop {
        out.push(alphabet[(number % base) as usize]);
        number /= base;
        if number == 0 {
            break;
        }
    }
    out[start..].reverse();
}

/// Inverse of [`push_digits`].
///
/// A character missing from `alphabet` counts as digit 0, and overflow wraps,
/// so foreign input yields a meaningless number rather than a panic.
pub(super) fn from_digits(digits: &[char], alphabet: &[char]) -> u64 {
    let base = alphabet.len() as u64;
    digits.iter().fold(0_u64, |acc, c| {
        let digit = alphabet.iter().position(|a| a == c).unwrap_or(0) as u64;
        acc.wrapping_mul(base).wrapping_add(digit)
    })
}

/// Splits on any of `splitters`. Empty segments between splitters are kept,
/// but a trailing empty segment is dropped.
pub(super) fn split<'a>(input: &'a [char], splitters: &[char]) -> Vec<&'a [char]> {
    let mut parts: Vec<&[char]> = input.split(|c| splitters.contains(c)).collect();
    if parts.last().is_some_and(|last| last.is_empty()) {
        parts.pop();
    }
    parts
}
