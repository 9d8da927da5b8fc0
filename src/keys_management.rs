use crate::encoding::{decode_point, decode_scalar, fixed_width, STANDARD_ENCODING_LENGTH};
use crate::errors::{MusigError, Result};
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use secrecy::{ExposeSecret, Secret};
use zeroize::Zeroizing;

/// A participant's key pair. The private scalar is zeroized when dropped.
pub struct KeyPair {
    pub(crate) private_key: Secret<Scalar>,
    pub public_key: RistrettoPoint,
}

use std::fmt;
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the KeyPair struct without including private_key
        write!(f, "KeyPair {{ public_key: {:?} }}", self.public_key.compress())
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        KeyPair {
            private_key: Secret::new(*self.private_key.expose_secret()),
            public_key: self.public_key,
        }
    }
}

impl KeyPair {
    pub fn create<R>(mut rng: R) -> KeyPair
    where
        R: rand::CryptoRng + rand::RngCore,
    {
        let mut private_key = Scalar::random(&mut rng);
        while private_key == Scalar::ZERO {
            private_key = Scalar::random(&mut rng);
        }
        Self::create_from_private_key(Secret::new(private_key))
    }

    pub fn create_from_private_key(private_key: Secret<Scalar>) -> KeyPair {
        let public_key: RistrettoPoint = private_key.expose_secret() * RISTRETTO_BASEPOINT_POINT;
        KeyPair {
            private_key,
            public_key,
        }
    }

    /// Builds a key pair from a 32-byte canonical private key encoding.
    pub fn from_private_key_bytes(private_key: &[u8]) -> Result<KeyPair> {
        Ok(Self::create_from_private_key(decode_private_key(private_key)?))
    }

    /// The 32-byte compressed public key.
    pub fn public_key_bytes(&self) -> [u8; STANDARD_ENCODING_LENGTH] {
        self.public_key.compress().to_bytes()
    }

    /// The 32-byte private key encoding, wiped when the returned buffer drops.
    pub fn private_key_bytes(&self) -> Zeroizing<[u8; STANDARD_ENCODING_LENGTH]> {
        Zeroizing::new(self.private_key.expose_secret().to_bytes())
    }
}

/// Decodes a private key: exactly 32 bytes, canonical and nonzero.
pub(crate) fn decode_private_key(private_key: &[u8]) -> Result<Secret<Scalar>> {
    let bytes = Zeroizing::new(fixed_width(private_key, MusigError::InvalidInputData)?);
    match decode_scalar(&bytes) {
        Some(scalar) if scalar != Scalar::ZERO => Ok(Secret::new(scalar)),
        _ => Err(MusigError::EncodingError),
    }
}

/// Decodes one 32-byte public key into a group element.
///
/// The identity is rejected: no nonzero private key maps to it.
pub(crate) fn decode_public_key(
    public_key: &[u8; STANDARD_ENCODING_LENGTH],
) -> Result<RistrettoPoint> {
    match decode_point(public_key) {
        Some(point) if !point.is_identity() => Ok(point),
        _ => Err(MusigError::InvalidPublicKey),
    }
}
