use rand_core::OsRng;
use schnorr_musig::protocol_messages::{Commitment, Precommitment, SignatureShare};
use schnorr_musig::telemetry::{init_from_config, TelemetryConfig};
use schnorr_musig::{
    aggregate_public_keys, concat_items, verify_by_aggregated_public_key, KeyPair, Signer,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_config(&TelemetryConfig {
        name: "musig_session".to_string(),
        verbosity: 1,
    })?;

    // Message to be signed
    let message = b"Hello World";
    let parties = 5;

    // Every party owns a key pair; the ordered public keys are known to all
    let key_pairs: Vec<KeyPair> = (0..parties).map(|_| KeyPair::create(OsRng)).collect();
    let public_keys: Vec<[u8; 32]> = key_pairs.iter().map(KeyPair::public_key_bytes).collect();
    let encoded_keys = concat_items(&public_keys);

    let mut signers = (0..parties)
        .map(|position| Signer::new(&encoded_keys, position))
        .collect::<Result<Vec<_>, _>>()?;

    // The first round: precommitments
    let mut precommitments: Vec<Precommitment> = Vec::new();
    for signer in signers.iter_mut() {
        let seed: [u8; 16] = rand::random();
        precommitments.push(signer.compute_precommitment_with_rng(&seed, OsRng)?);
    }
    let precommitments = concat_items(&precommitments);

    // The second round: commitments, checked against the precommitments
    let mut commitments: Vec<Commitment> = Vec::new();
    for signer in signers.iter_mut() {
        commitments.push(signer.receive_precommitments(&precommitments)?);
    }
    let commitments = concat_items(&commitments);
    for signer in signers.iter_mut() {
        signer.receive_commitments(&commitments)?;
    }

    // The third round: signature shares
    let mut shares: Vec<SignatureShare> = Vec::new();
    for (signer, keys) in signers.iter_mut().zip(&key_pairs) {
        shares.push(signer.sign(keys.private_key_bytes().as_slice(), message)?);
    }
    let shares = concat_items(&shares);

    let signature = signers[0].aggregate_signature(&shares)?;
    let aggregated_key = aggregate_public_keys(&encoded_keys)?;
    let result = verify_by_aggregated_public_key(
        message,
        &signature.to_bytes(),
        aggregated_key.as_bytes(),
    )?;

    for signer in signers.iter_mut() {
        signer.revoke();
    }

    println!("Verification result: {:?}", result);
    assert!(result);
    Ok(())
}
