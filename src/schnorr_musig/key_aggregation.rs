//! Key aggregation.
//!
//! Binds every key to the full ordered key list through `a_i = H(L || P_i)`, so a
//! participant cannot pick its key as a function of the others' keys. The order of
//! the list is part of the binding and must be identical for every participant.

use super::musig_math::{aggregate_points, calc_hash_lxi};
use super::musig_protocol::protocol_messages::{AggregatedPublicKey, PublicKey};
use crate::encoding::{concat_items, split_items, STANDARD_ENCODING_LENGTH};
use crate::errors::{MusigError, Result};
use crate::keys_management::decode_public_key;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;

/// The decoded participant set together with its coefficients and joint key.
#[derive(Clone, Debug)]
pub struct KeyAggregation {
    cap_l: Vec<u8>,
    encoded_keys: Vec<[u8; STANDARD_ENCODING_LENGTH]>,
    public_keys: Vec<RistrettoPoint>,
    coefficients: Vec<Scalar>,
    aggregated: RistrettoPoint,
}

impl KeyAggregation {
    /// Decodes concatenated 32-byte public keys and aggregates them.
    pub fn from_concatenated(encoded_public_keys: &[u8]) -> Result<Self> {
        let encoded_keys = split_items(
            encoded_public_keys,
            None,
            MusigError::InvalidPubkeyLength,
            MusigError::InvalidPubkeyLength,
        )?;

        let public_keys = encoded_keys
            .iter()
            .map(decode_public_key)
            .collect::<Result<Vec<_>>>()?;

        let cap_l = concat_items(&encoded_keys);
        let coefficients: Vec<Scalar> = encoded_keys
            .iter()
            .map(|key| calc_hash_lxi(&cap_l, &CompressedRistretto(*key)))
            .collect();
        let aggregated = checked_aggregate(&public_keys, &coefficients)?;

        Ok(KeyAggregation {
            cap_l,
            encoded_keys,
            public_keys,
            coefficients,
            aggregated,
        })
    }

    pub fn from_public_keys(public_keys: &[PublicKey]) -> Result<Self> {
        Self::from_concatenated(&concat_items(public_keys))
    }

    pub fn len(&self) -> usize {
        self.public_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.public_keys.is_empty()
    }

    /// L: the canonical encoding of the ordered key list.
    pub fn encoded_keys(&self) -> &[u8] {
        &self.cap_l
    }

    pub fn public_key(&self, position: usize) -> Option<PublicKey> {
        self.encoded_keys.get(position).copied().map(PublicKey)
    }

    pub(crate) fn encoded_key(&self, position: usize) -> Option<&[u8; STANDARD_ENCODING_LENGTH]> {
        self.encoded_keys.get(position)
    }

    pub(crate) fn point(&self, position: usize) -> Option<&RistrettoPoint> {
        self.public_keys.get(position)
    }

    /// The coefficient `a_i` of the participant at `position`.
    pub fn coefficient(&self, position: usize) -> Option<&Scalar> {
        self.coefficients.get(position)
    }

    pub(crate) fn aggregated_point(&self) -> &RistrettoPoint {
        &self.aggregated
    }

    pub fn aggregated_public_key(&self) -> AggregatedPublicKey {
        AggregatedPublicKey(self.aggregated.compress().to_bytes())
    }
}

// A joint key equal to the identity would verify any (R, s) with sG = R.
fn checked_aggregate(points: &[RistrettoPoint], coefficients: &[Scalar]) -> Result<RistrettoPoint> {
    let aggregated = aggregate_points(points, coefficients);
    if aggregated.is_identity() {
        return Err(MusigError::InvalidPublicKey);
    }
    Ok(aggregated)
}

/// Computes the aggregated public key of concatenated 32-byte public keys.
///
/// Fails with `InvalidPubkeyLength` when the input is empty or not a whole number
/// of keys, and with `InvalidPublicKey` when any key does not decode.
#[tracing::instrument(
    name = "Aggregating public keys",
    skip_all,
    fields(len = encoded_public_keys.len())
)]
pub fn aggregate_public_keys(encoded_public_keys: &[u8]) -> Result<AggregatedPublicKey> {
    Ok(KeyAggregation::from_concatenated(encoded_public_keys)?.aggregated_public_key())
}
