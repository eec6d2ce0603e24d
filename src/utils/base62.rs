//! Base-62 short code encoding.
//!
//! Short codes are derived from the leading 64 bits of a UUID. Only the
//! `length` least-significant base-62 digits of that value are kept so every
//! generated code has exactly the requested length. Dropping the remaining
//! bits means two ids can map to the same code; the store's unique
//! constraint turns such a collision into a conflict.

use uuid::Uuid;

/// Digits in ascending value order: `0-9`, then `a-z`, then `A-Z`.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u128 = 62;

/// Errors returned by [`decode`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Base62Error {
    #[error("Invalid base-62 character: {0:?}")]
    InvalidCharacter(char),

    #[error("Base-62 value does not fit in 128 bits")]
    Overflow,
}

/// Reads the leading 64 bits (the first 16 hex digits) of a UUID.
fn leading_bits(id: &Uuid) -> u64 {
    let (high, _) = id.as_u64_pair();
    high
}

/// Returns the integer that [`encode`] actually represents for `id`.
///
/// This is the leading 64 bits of the id reduced modulo `62^length`.
pub fn retained_value(id: &Uuid, length: usize) -> u128 {
    let value = u128::from(leading_bits(id));

    match u32::try_from(length).ok().and_then(|l| BASE.checked_pow(l)) {
        Some(space) => value % space,
        None => value,
    }
}

/// Encodes `id` as a base-62 string of exactly `length` characters.
///
/// Left-padded with `'0'`; a zero value yields `length` zeros.
pub fn encode(id: &Uuid, length: usize) -> String {
    encode_value(retained_value(id, length), length)
}

fn encode_value(mut value: u128, length: usize) -> String {
    let mut digits = Vec::with_capacity(length);

    while value > 0 {
        digits.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }

    while digits.len() < length {
        digits.push(b'0');
    }

    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

/// Decodes a base-62 string back to its integer value.
///
/// # Errors
///
/// Returns [`Base62Error::InvalidCharacter`] for characters outside
/// [`ALPHABET`] and [`Base62Error::Overflow`] for values above `u128::MAX`.
pub fn decode(code: &str) -> Result<u128, Base62Error> {
    code.chars().try_fold(0u128, |acc, c| {
        let digit = digit_value(c).ok_or(Base62Error::InvalidCharacter(c))?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or(Base62Error::Overflow)
    })
}

/// Returns true if `code` is non-empty and uses only base-62 characters.
pub fn is_valid(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric())
}

fn digit_value(c: char) -> Option<u128> {
    let value = match c {
        '0'..='9' => c as u32 - '0' as u32,
        'a'..='z' => c as u32 - 'a' as u32 + 10,
        'A'..='Z' => c as u32 - 'A' as u32 + 36,
        _ => return None,
    };
    Some(u128::from(value))
}
