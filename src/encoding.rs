// Byte-level helpers shared by the signer and the verifier.
//
// Every multi-item input is a concatenation of fixed-width items in participant
// order. Item boundaries are never inferred: the total length must divide evenly
// and, where the participant count is known, the item count must match it.
use crate::errors::{MusigError, Result};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;

/// Width of a public key, private key, precommitment, commitment or share.
pub const STANDARD_ENCODING_LENGTH: usize = 32;
/// Width of an aggregated signature `R || s`.
pub const AGG_SIG_ENCODING_LENGTH: usize = 64;
/// Seeds are consumed as little-endian 32-bit words.
pub const SEED_WORD_LENGTH: usize = 4;

/// Splits `input` into 32-byte items.
///
/// Returns `length_error` if the input is empty or not a whole number of items,
/// and `count_error` if `expected` is given and the item count differs from it.
pub(crate) fn split_items(
    input: &[u8],
    expected: Option<usize>,
    length_error: MusigError,
    count_error: MusigError,
) -> Result<Vec<[u8; STANDARD_ENCODING_LENGTH]>> {
    if input.is_empty() || input.len() % STANDARD_ENCODING_LENGTH != 0 {
        return Err(length_error);
    }
    let count = input.len() / STANDARD_ENCODING_LENGTH;
    if let Some(expected) = expected {
        if count != expected {
            return Err(count_error);
        }
    }

    Ok(input
        .chunks_exact(STANDARD_ENCODING_LENGTH)
        .map(to_array)
        .collect())
}

/// Copies an exactly 32-byte slice into an array, failing on any other width.
pub(crate) fn fixed_width(
    input: &[u8],
    error: MusigError,
) -> Result<[u8; STANDARD_ENCODING_LENGTH]> {
    if input.len() != STANDARD_ENCODING_LENGTH {
        return Err(error);
    }
    Ok(to_array(input))
}

fn to_array(chunk: &[u8]) -> [u8; STANDARD_ENCODING_LENGTH] {
    let mut item = [0u8; STANDARD_ENCODING_LENGTH];
    item.copy_from_slice(chunk);
    item
}

/// Decompresses a Ristretto encoding. Non-canonical encodings are rejected.
pub(crate) fn decode_point(bytes: &[u8; STANDARD_ENCODING_LENGTH]) -> Option<RistrettoPoint> {
    CompressedRistretto(*bytes).decompress()
}

/// Decodes a canonical little-endian scalar.
pub(crate) fn decode_scalar(bytes: &[u8; STANDARD_ENCODING_LENGTH]) -> Option<Scalar> {
    Option::from(Scalar::from_canonical_bytes(*bytes))
}

/// Concatenates fixed-width protocol items in participant order.
pub fn concat_items<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let mut concatenated = Vec::with_capacity(items.len() * STANDARD_ENCODING_LENGTH);
    for item in items {
        concatenated.extend_from_slice(item.as_ref());
    }
    concatenated
}

/// Encodes a seed given as 32-bit words into little-endian bytes.
pub fn seed_from_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

/// A seed must be non-empty and a whole number of 32-bit words.
pub(crate) fn validate_seed(seed: &[u8]) -> Result<()> {
    if seed.is_empty() || seed.len() % SEED_WORD_LENGTH != 0 {
        return Err(MusigError::InvalidSeed);
    }
    Ok(())
}
