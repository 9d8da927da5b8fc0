#![no_main]

use libfuzzer_sys::fuzz_target;

use curve25519_dalek::scalar::Scalar;
use schnorr_musig::{verify_by_public_keys, KeyPair, Signer};
use secrecy::Secret;
use sha2::Sha512;

fuzz_target!(|data: &[u8]| {
    // Message to be signed
    let message = b"Hello world";

    let private_key = Scalar::hash_from_bytes::<Sha512>(data);
    let keys = KeyPair::create_from_private_key(Secret::new(private_key));
    let public_key = keys.public_key_bytes();

    let mut signer = Signer::from_single_key(&public_key).expect("Error");
    let precommitment = signer.compute_precommitment(&[1, 2, 3, 4]).expect("Error");
    let commitment = signer
        .receive_precommitments(precommitment.as_bytes())
        .expect("Error");
    signer.receive_commitments(commitment.as_bytes()).expect("Error");

    // Raw fuzz bytes as a private key must be rejected cleanly unless they are this key
    let _ = signer.sign(data, message);

    if signer.signature_share().is_none() {
        let share = signer
            .sign(keys.private_key_bytes().as_slice(), message)
            .expect("Error");
        let signature = signer.aggregate_signature(share.as_bytes()).expect("Error");
        assert!(verify_by_public_keys(message, &signature.to_bytes(), &public_key).expect("Error"));
    }
});
