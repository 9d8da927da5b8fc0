use crate::encoding::{validate_seed, STANDARD_ENCODING_LENGTH};
use crate::errors::{MusigError, Result};
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::RistrettoPoint;
use curve25519_dalek::Scalar;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

const NONCE_DOMAIN: &[u8] = b"musig.nonce";
const PRECOMMITMENT_DOMAIN: &[u8] = b"musig.precommitment";

/// The per-session nonce `r_i` and its public point `R_i = r_i * G`.
///
/// Never serialized. Dropping it zeroizes `r_i`.
pub struct SessionNonce {
    pub r_public: RistrettoPoint,
    pub(crate) r_private: Secret<Scalar>,
}

use std::fmt;
impl fmt::Debug for SessionNonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the SessionNonce struct without including r_private
        write!(f, "SessionNonce {{ r_public: {:?} }}", self.r_public.compress())
    }
}

/// What the nonce of one signer is bound to besides the seed.
pub(crate) struct NonceBinding<'a> {
    pub encoded_keys: &'a [u8],
    pub position: usize,
    pub public_key: &'a [u8; STANDARD_ENCODING_LENGTH],
}

impl SessionNonce {
    /// Derives `r_i` from the seed and the signer's place in the participant set.
    ///
    /// The same `(seed, participants, position)` always gives the same nonce. Co-signers
    /// sharing one seed still get distinct nonces since the position and key differ.
    pub(crate) fn derive(
        seed: &[u8],
        binding: &NonceBinding,
        extra: Option<&[u8]>,
    ) -> Result<Self> {
        validate_seed(seed)?;

        let mut input = Zeroizing::new(Vec::with_capacity(
            NONCE_DOMAIN.len() + seed.len() + binding.encoded_keys.len() + 80,
        ));
        input.extend_from_slice(NONCE_DOMAIN);
        // Length-prefixed so that no other (seed, L) split hashes the same input.
        input.extend_from_slice(&(seed.len() as u64).to_le_bytes());
        input.extend_from_slice(seed);
        input.extend_from_slice(binding.encoded_keys);
        input.extend_from_slice(&(binding.position as u64).to_le_bytes());
        input.extend_from_slice(binding.public_key);
        if let Some(extra) = extra {
            input.extend_from_slice(extra);
        }

        let r_private = Scalar::hash_from_bytes::<Sha512>(&input);
        if r_private == Scalar::ZERO {
            return Err(MusigError::InternalError);
        }
        let r_public: RistrettoPoint = r_private * RISTRETTO_BASEPOINT_POINT;

        Ok(SessionNonce {
            r_public,
            r_private: Secret::new(r_private),
        })
    }

    pub fn commitment_bytes(&self) -> [u8; STANDARD_ENCODING_LENGTH] {
        self.r_public.compress().to_bytes()
    }

    pub fn precommitment(&self) -> [u8; STANDARD_ENCODING_LENGTH] {
        precommit(&self.commitment_bytes())
    }

    pub(crate) fn expose(&self) -> &Scalar {
        self.r_private.expose_secret()
    }
}

/// `H(R_i)`: the hash published in round one before `R_i` is revealed.
pub fn precommit(commitment: &[u8; STANDARD_ENCODING_LENGTH]) -> [u8; STANDARD_ENCODING_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(PRECOMMITMENT_DOMAIN);
    hasher.update(commitment);
    hasher.finalize().into()
}
