// The messages a signer publishes or receives in each round of the protocol.
// Each one is a fixed-width byte encoding; coordination between participants
// (who sends what to whom) is left to the caller.
use crate::encoding::{AGG_SIG_ENCODING_LENGTH, STANDARD_ENCODING_LENGTH};
use crate::errors::{MusigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! fixed_width_message {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) [u8; STANDARD_ENCODING_LENGTH]);

        impl $name {
            pub fn from_bytes(bytes: [u8; STANDARD_ENCODING_LENGTH]) -> Self {
                $name(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; STANDARD_ENCODING_LENGTH] {
                &self.0
            }

            pub fn to_bytes(self) -> [u8; STANDARD_ENCODING_LENGTH] {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = MusigError;

            fn try_from(bytes: &[u8]) -> Result<Self> {
                let bytes = <[u8; STANDARD_ENCODING_LENGTH]>::try_from(bytes)
                    .map_err(|_| MusigError::InvalidInputData)?;
                Ok($name(bytes))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for byte in &self.0 {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, ")")
            }
        }
    };
}

fixed_width_message!(
    /// A participant's compressed public key.
    PublicKey
);
fixed_width_message!(
    /// The joint key `X = sum(a_i * P_i)`.
    AggregatedPublicKey
);
fixed_width_message!(
    /// Round one: `H(R_i)`.
    Precommitment
);
fixed_width_message!(
    /// Round two: the revealed nonce point `R_i`.
    Commitment
);
fixed_width_message!(
    /// The joint nonce point `R = sum(R_i)`.
    AggregatedCommitment
);
fixed_width_message!(
    /// Round three: `s_i = r_i + e * a_i * x_i`.
    SignatureShare
);

/// The final signature `R || s`.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct AggregatedSignature {
    pub(crate) signature_r: AggregatedCommitment,
    pub(crate) signature_s: [u8; STANDARD_ENCODING_LENGTH],
}

impl AggregatedSignature {
    pub fn r(&self) -> &AggregatedCommitment {
        &self.signature_r
    }

    pub fn s(&self) -> &[u8; STANDARD_ENCODING_LENGTH] {
        &self.signature_s
    }

    pub fn to_bytes(&self) -> [u8; AGG_SIG_ENCODING_LENGTH] {
        let mut bytes = [0u8; AGG_SIG_ENCODING_LENGTH];
        bytes[..STANDARD_ENCODING_LENGTH].copy_from_slice(self.signature_r.as_bytes());
        bytes[STANDARD_ENCODING_LENGTH..].copy_from_slice(&self.signature_s);
        bytes
    }

    /// Splits a 64-byte encoding. Only the width is checked here; point and
    /// scalar validity are checked on verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != AGG_SIG_ENCODING_LENGTH {
            return Err(MusigError::InvalidInputData);
        }
        let (r, s) = bytes.split_at(STANDARD_ENCODING_LENGTH);
        Ok(AggregatedSignature {
            signature_r: AggregatedCommitment::try_from(r)?,
            signature_s: <[u8; STANDARD_ENCODING_LENGTH]>::try_from(s)
                .map_err(|_| MusigError::InvalidInputData)?,
        })
    }
}

impl TryFrom<&[u8]> for AggregatedSignature {
    type Error = MusigError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        AggregatedSignature::from_bytes(bytes)
    }
}
