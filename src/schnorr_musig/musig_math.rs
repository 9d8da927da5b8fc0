use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use sha2::Sha512;

// Computes the aggregation coefficient a_i = H(L||Xi)
//
// Inputs:
// - cap_l: L, the concatenation of all compressed public keys in participant order
// - cap_xi: Public key Xi, compressed
//
// Returns:
// - H(L||Xi) as a Scalar
pub fn calc_hash_lxi(cap_l: &[u8], cap_xi: &CompressedRistretto) -> Scalar {
    let mut concatenated_bytes = Vec::with_capacity(cap_l.len() + 32);
    concatenated_bytes.extend_from_slice(cap_l);
    concatenated_bytes.extend_from_slice(cap_xi.as_bytes());

    Scalar::hash_from_bytes::<Sha512>(&concatenated_bytes)
}

// Computes the Fiat-Shamir challenge e = H(R||X||m)
//
// Inputs:
// - cap_r: Aggregated nonce R, compressed
// - cap_x: Aggregated public key X, compressed
// - message: Message m being signed
//
// Returns:
// - H(R||X||m) as a Scalar
pub fn calc_hash_rxm(
    cap_r: &CompressedRistretto,
    cap_x: &CompressedRistretto,
    message: &[u8],
) -> Scalar {
    let mut concatenated_bytes = Vec::with_capacity(64 + message.len());
    concatenated_bytes.extend_from_slice(cap_r.as_bytes());
    concatenated_bytes.extend_from_slice(cap_x.as_bytes());
    concatenated_bytes.extend_from_slice(message);

    Scalar::hash_from_bytes::<Sha512>(&concatenated_bytes)
}

// Aggregates public keys into X = sum of all a_i * Xi
pub fn aggregate_points(public_keys: &[RistrettoPoint], coefficients: &[Scalar]) -> RistrettoPoint {
    public_keys
        .iter()
        .zip(coefficients)
        .map(|(cap_xi, a_i)| a_i * cap_xi)
        .sum()
}

// Sums the nonce points (Ri) into the common nonce R
pub fn aggregate_nonces(nonces: &[RistrettoPoint]) -> RistrettoPoint {
    nonces.iter().sum()
}

// Computes a signature share
// si = ri + e * a_i * xi
pub fn partial_signature(
    r_private: &Scalar,
    challenge: &Scalar,
    coefficient: &Scalar,
    private_key: &Scalar,
) -> Scalar {
    r_private + challenge * coefficient * private_key
}

// Sums the shares into the full signature s, order does not matter
pub fn aggregate_s(partial_signatures: &[Scalar]) -> Scalar {
    partial_signatures.iter().sum()
}

// Checks the Schnorr equation sG = R + eX
//
// Works for a full signature (R, X aggregated) and for a single share, where R is
// the signer's Ri and X is a_i * Xi.
pub fn verify_equation(
    cap_x: &RistrettoPoint,
    cap_r: &RistrettoPoint,
    challenge: &Scalar,
    s: &Scalar,
) -> bool {
    let left = s * RISTRETTO_BASEPOINT_POINT;
    let right = cap_r + challenge * cap_x;

    left == right
}
