//! # Schnorr MuSig Library
//!
//! This Rust library implements MuSig, a multi-party Schnorr signature protocol, on the
//! Ristretto group of the curve25519_dalek library. N participants, each holding an
//! independent key pair, jointly produce one signature that verifies against one
//! aggregated public key, exactly like a signature produced by a single key.
//!
//! ## Overview
//!
//! - n participants have private keys x1, x2, …, xn with corresponding public keys
//!   X1, X2, …, Xn.
//! - L is the concatenation of X1, X2, …, Xn in an order every participant agrees on.
//! - H() represents a hash function.
//! - The aggregated public key is X = sum(H(L, Xi) * Xi). The coefficient a_i = H(L, Xi)
//!   binds every key to the whole set, which defeats rogue-key attacks.
//!
//! ## Algorithm Steps
//!
//! Every participant runs its own [`Signer`] through four rounds:
//!
//! 1. Precommitment: the signer derives its nonce ri from a seed, computes Ri = ri * G and
//!    publishes only H(Ri).
//! 2. Commitment: once all N precommitments are known, the signer reveals Ri. Each signer
//!    checks every Ri against its precommitment and computes R = sum(Ri). Committing before
//!    revealing keeps the last participant from choosing its nonce as a function of the others.
//! 3. Signing: the signer computes e = H(R, X, m) and its share si = ri + e * a_i * xi.
//! 4. Aggregation: s = sum(si), and the signature is (R, s).
//!
//! Verification of the signature is performed using the equation s * G = R + H(R, X, m) * X.
//!
//! Moving messages between participants is the caller's job. Every round input is the
//! concatenation of N fixed-width items in participant order.
//!
//! ## Nonces
//!
//! The nonce is a deterministic function of the seed, the participant set and the position,
//! which makes sessions reproducible. A real session must use a fresh, unpredictable seed (or
//! [`Signer::compute_precommitment_with_rng`]): signing two messages with one nonce leaks the
//! private key.

pub mod encoding;
pub mod errors;
pub mod keys_management;
pub mod rand_nonce;
pub mod schnorr_musig;

#[cfg(feature = "tracing")]
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use crate::encoding::{concat_items, seed_from_words};
pub use crate::errors::{MusigError, Result};
pub use crate::keys_management::KeyPair;
pub use crate::schnorr_musig::key_aggregation::{aggregate_public_keys, KeyAggregation};
pub use crate::schnorr_musig::musig_protocol::protocol_messages;
pub use crate::schnorr_musig::musig_protocol::signer::{Signer, SignerPhase};
pub use crate::schnorr_musig::musig_protocol::verifier::{
    verify, verify_by_aggregated_public_key, verify_by_public_keys, verify_strict, VerificationKey,
};
