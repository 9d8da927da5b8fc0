// Verification of aggregated signatures.
//
// A signature that does not satisfy sG = R + eX is a normal outcome and is
// reported as `Ok(false)`. Structurally invalid input (wrong widths, keys or
// points that do not decode, non-canonical scalars) is reported as an error.
use super::protocol_messages::{AggregatedPublicKey, AggregatedSignature};
use crate::encoding::{decode_point, decode_scalar, fixed_width};
use crate::errors::{MusigError, Result};
use crate::keys_management::decode_public_key;
use crate::schnorr_musig::key_aggregation::KeyAggregation;
use crate::schnorr_musig::musig_math::{calc_hash_rxm, verify_equation};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use tracing::debug;

/// The key a signature is checked against.
#[derive(Copy, Clone, Debug)]
pub enum VerificationKey<'a> {
    /// A joint key computed once with `aggregate_public_keys`.
    Aggregated(&'a AggregatedPublicKey),
    /// Concatenated participant keys, aggregated on every call.
    PublicKeys(&'a [u8]),
}

impl VerificationKey<'_> {
    fn resolve(&self) -> Result<RistrettoPoint> {
        match self {
            VerificationKey::Aggregated(key) => decode_public_key(key.as_bytes()),
            VerificationKey::PublicKeys(keys) => {
                Ok(*KeyAggregation::from_concatenated(keys)?.aggregated_point())
            }
        }
    }
}

/// Checks `s * G == R + H(R || X || m) * X`.
#[tracing::instrument(
    name = "Verifying the aggregated signature",
    skip_all,
    fields(message_len = message.len())
)]
pub fn verify(
    message: &[u8],
    key: VerificationKey<'_>,
    signature: &AggregatedSignature,
) -> Result<bool> {
    let cap_x = key.resolve()?;
    let cap_r = decode_point(signature.r().as_bytes()).ok_or(MusigError::EncodingError)?;
    let s = decode_scalar(signature.s()).ok_or(MusigError::EncodingError)?;

    let challenge = calc_hash_rxm(
        &CompressedRistretto(*signature.r().as_bytes()),
        &cap_x.compress(),
        message,
    );
    let valid = verify_equation(&cap_x, &cap_r, &challenge, &s);
    debug!(valid, "Signature checked");

    Ok(valid)
}

/// Verifies a 64-byte signature against concatenated participant public keys.
pub fn verify_by_public_keys(message: &[u8], signature: &[u8], public_keys: &[u8]) -> Result<bool> {
    let signature = AggregatedSignature::from_bytes(signature)?;
    verify(message, VerificationKey::PublicKeys(public_keys), &signature)
}

/// Verifies a 64-byte signature against a 32-byte aggregated public key.
pub fn verify_by_aggregated_public_key(
    message: &[u8],
    signature: &[u8],
    aggregated_public_key: &[u8],
) -> Result<bool> {
    let signature = AggregatedSignature::from_bytes(signature)?;
    let key = AggregatedPublicKey(fixed_width(
        aggregated_public_key,
        MusigError::InvalidPubkeyLength,
    )?);
    verify(message, VerificationKey::Aggregated(&key), &signature)
}

/// Like [`verify`], but a failed check is returned as `SignatureVerificationFailed`.
pub fn verify_strict(
    message: &[u8],
    key: VerificationKey<'_>,
    signature: &AggregatedSignature,
) -> Result<()> {
    if verify(message, key, signature)? {
        Ok(())
    } else {
        Err(MusigError::SignatureVerificationFailed)
    }
}
