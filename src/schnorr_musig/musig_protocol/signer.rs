/// This module defines the Signer, one participant's view of a MuSig signing
/// session. A signer moves through the rounds in a fixed order: precommitment,
/// commitment exchange, partial signing and share aggregation. Each round's
/// secret and public state lives in the variant of the current phase, so a
/// nonce only exists while it can still be used.
use super::protocol_messages::*;
use crate::encoding::{decode_point, decode_scalar, split_items, STANDARD_ENCODING_LENGTH};
use crate::errors::{MusigError, Result};
use crate::keys_management::decode_private_key;
use crate::rand_nonce::{precommit, NonceBinding, SessionNonce};
use crate::schnorr_musig::key_aggregation::KeyAggregation;
use crate::schnorr_musig::musig_math::*;
use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// The observable phase of a signer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignerPhase {
    Created,
    PrecommitComputed,
    PrecommitmentsReceived,
    CommitmentsAggregated,
    Signed,
    SignatureAggregated,
    Revoked,
}

/// Public data fixed once this signer has produced its share.
#[derive(Debug)]
struct SigningSession {
    commitments: Vec<RistrettoPoint>,
    cap_r: RistrettoPoint,
    challenge: Scalar,
    share: SignatureShare,
}

#[derive(Debug)]
enum SignerState {
    Created,
    PrecommitComputed {
        nonce: SessionNonce,
    },
    PrecommitmentsReceived {
        nonce: SessionNonce,
        precommitments: Vec<Precommitment>,
    },
    CommitmentsAggregated {
        nonce: SessionNonce,
        commitments: Vec<RistrettoPoint>,
        cap_r: RistrettoPoint,
    },
    Signed(SigningSession),
    SignatureAggregated {
        session: SigningSession,
        signature: AggregatedSignature,
    },
    Revoked,
}

impl SignerState {
    fn phase(&self) -> SignerPhase {
        match self {
            SignerState::Created => SignerPhase::Created,
            SignerState::PrecommitComputed { .. } => SignerPhase::PrecommitComputed,
            SignerState::PrecommitmentsReceived { .. } => SignerPhase::PrecommitmentsReceived,
            SignerState::CommitmentsAggregated { .. } => SignerPhase::CommitmentsAggregated,
            SignerState::Signed(_) => SignerPhase::Signed,
            SignerState::SignatureAggregated { .. } => SignerPhase::SignatureAggregated,
            SignerState::Revoked => SignerPhase::Revoked,
        }
    }

    /// The signing session, once this signer has signed.
    fn session(&self) -> Result<&SigningSession> {
        match self {
            SignerState::Signed(session) | SignerState::SignatureAggregated { session, .. } => {
                Ok(session)
            }
            SignerState::CommitmentsAggregated { .. } => Err(MusigError::ChallengeNotGenerated),
            SignerState::Revoked => Err(MusigError::InvalidInputData),
            _ => Err(MusigError::AggregatedNonceCommitmentNotComputed),
        }
    }
}

/// One participant in a signing session.
///
/// A signer lives for exactly one session. Its nonce is zeroized as soon as the
/// share is computed, when the signer is revoked, or when it is dropped.
#[derive(Debug)]
pub struct Signer {
    participants: KeyAggregation,
    position: usize,
    own_key: [u8; STANDARD_ENCODING_LENGTH],
    state: SignerState,
}

impl Signer {
    /// Create a signer from the concatenated public keys of all participants and
    /// this signer's position among them.
    ///
    /// Fails with `InvalidPubkeyLength` or `InvalidPublicKey` on malformed keys, and
    /// with `InvalidParticipantPosition` if `position` is out of range.
    #[tracing::instrument(name = "Creating a MuSig signer", skip(encoded_public_keys))]
    pub fn new(encoded_public_keys: &[u8], position: usize) -> Result<Signer> {
        let participants = KeyAggregation::from_concatenated(encoded_public_keys)?;
        Self::with_participants(participants, position)
    }

    pub fn from_public_keys(public_keys: &[PublicKey], position: usize) -> Result<Signer> {
        Self::with_participants(KeyAggregation::from_public_keys(public_keys)?, position)
    }

    /// A signer that is the only participant of its session.
    pub fn from_single_key(public_key: &[u8]) -> Result<Signer> {
        Self::new(public_key, 0)
    }

    fn with_participants(participants: KeyAggregation, position: usize) -> Result<Signer> {
        let own_key = *participants
            .encoded_key(position)
            .ok_or(MusigError::InvalidParticipantPosition)?;
        debug!(participants = participants.len(), position, "Signer created");
        Ok(Signer {
            participants,
            position,
            own_key,
            state: SignerState::Created,
        })
    }

    pub fn phase(&self) -> SignerPhase {
        self.state.phase()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn participants(&self) -> &KeyAggregation {
        &self.participants
    }

    pub fn participants_count(&self) -> usize {
        self.participants.len()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.own_key)
    }

    pub fn aggregated_public_key(&self) -> AggregatedPublicKey {
        self.participants.aggregated_public_key()
    }

    /// The joint nonce point, once commitments have been aggregated.
    pub fn aggregated_commitment(&self) -> Option<AggregatedCommitment> {
        match &self.state {
            SignerState::CommitmentsAggregated { cap_r, .. } => {
                Some(AggregatedCommitment(cap_r.compress().to_bytes()))
            }
            SignerState::Signed(session) | SignerState::SignatureAggregated { session, .. } => {
                Some(AggregatedCommitment(session.cap_r.compress().to_bytes()))
            }
            _ => None,
        }
    }

    fn nonce_binding(&self) -> NonceBinding<'_> {
        NonceBinding {
            encoded_keys: self.participants.encoded_keys(),
            position: self.position,
            public_key: &self.own_key,
        }
    }

    /// Round one: derive this session's nonce from `seed` and return `H(R_i)`.
    ///
    /// The seed must be unique and unpredictable for every real session: signing two
    /// different messages with the same nonce reveals the private key.
    #[tracing::instrument(
        name = "Computing nonce precommitment",
        skip_all,
        fields(position = self.position)
    )]
    pub fn compute_precommitment(&mut self, seed: &[u8]) -> Result<Precommitment> {
        self.precommit_with(seed, None)
    }

    /// Like [`Signer::compute_precommitment`], additionally mixing 32 bytes from `rng`
    /// into the nonce derivation.
    #[tracing::instrument(
        name = "Computing randomized nonce precommitment",
        skip_all,
        fields(position = self.position)
    )]
    pub fn compute_precommitment_with_rng<R>(
        &mut self,
        seed: &[u8],
        mut rng: R,
    ) -> Result<Precommitment>
    where
        R: rand::CryptoRng + rand::RngCore,
    {
        let mut extra = Zeroizing::new([0u8; 32]);
        rng.fill_bytes(&mut extra[..]);
        self.precommit_with(seed, Some(&extra[..]))
    }

    fn precommit_with(&mut self, seed: &[u8], extra: Option<&[u8]>) -> Result<Precommitment> {
        if !matches!(self.state, SignerState::Created) {
            warn!(phase = ?self.phase(), "Precommitment requested twice in one session");
            return Err(MusigError::InvalidInputData);
        }

        let nonce = SessionNonce::derive(seed, &self.nonce_binding(), extra)?;
        let precommitment = Precommitment(nonce.precommitment());
        self.state = SignerState::PrecommitComputed { nonce };
        debug!("Nonce precommitment computed");

        Ok(precommitment)
    }

    /// Round two: store everyone's precommitments and reveal this signer's commitment.
    ///
    /// `precommitments` is the concatenation of all N precommitments in participant order.
    #[tracing::instrument(
        name = "Receiving nonce precommitments",
        skip_all,
        fields(position = self.position)
    )]
    pub fn receive_precommitments(&mut self, precommitments: &[u8]) -> Result<Commitment> {
        let nonce = match &self.state {
            SignerState::PrecommitComputed { nonce } => nonce,
            SignerState::Created => return Err(MusigError::NonceCommitmentNotGenerated),
            _ => return Err(MusigError::InvalidInputData),
        };

        let precommitments: Vec<Precommitment> = split_items(
            precommitments,
            Some(self.participants.len()),
            MusigError::NoncePrecommitmentsAndParticipantsNotMatch,
            MusigError::NoncePrecommitmentsAndParticipantsNotMatch,
        )?
        .into_iter()
        .map(Precommitment)
        .collect();

        if precommitments[self.position] != Precommitment(nonce.precommitment()) {
            warn!("Own precommitment is not at this signer's position");
            return Err(MusigError::NoncePrecommitmentsAndParticipantsNotMatch);
        }
        let commitment = Commitment(nonce.commitment_bytes());

        if let SignerState::PrecommitComputed { nonce } =
            std::mem::replace(&mut self.state, SignerState::Revoked)
        {
            self.state = SignerState::PrecommitmentsReceived {
                nonce,
                precommitments,
            };
        }
        debug!("Nonce precommitments received");

        Ok(commitment)
    }

    /// Round two, second half: check every revealed commitment against its
    /// precommitment and compute the joint nonce `R`.
    ///
    /// A rejected commitment leaves the signer unchanged, so the round can be retried
    /// with corrected input.
    #[tracing::instrument(
        name = "Receiving nonce commitments",
        skip_all,
        fields(position = self.position)
    )]
    pub fn receive_commitments(&mut self, commitments: &[u8]) -> Result<AggregatedCommitment> {
        let precommitments = match &self.state {
            SignerState::PrecommitmentsReceived { precommitments, .. } => precommitments,
            SignerState::Created | SignerState::PrecommitComputed { .. } => {
                return Err(MusigError::NoncePrecommitmentsNotReceived)
            }
            _ => return Err(MusigError::InvalidInputData),
        };

        let encoded = split_items(
            commitments,
            Some(self.participants.len()),
            MusigError::NonceCommitmentsAndParticipantsNotMatch,
            MusigError::NonceCommitmentsAndParticipantsNotMatch,
        )?;

        let mut points = Vec::with_capacity(encoded.len());
        for (index, (commitment, precommitment)) in encoded.iter().zip(precommitments).enumerate() {
            let point = match decode_point(commitment) {
                Some(point) => point,
                None => {
                    warn!(participant = index, "Commitment is not a valid group element");
                    return Err(MusigError::CommitmentIsNotInCorrectSubgroup);
                }
            };
            if !bool::from(precommit(commitment).ct_eq(precommitment.as_bytes())) {
                warn!(participant = index, "Commitment does not open its precommitment");
                return Err(MusigError::InvalidCommitment);
            }
            points.push(point);
        }

        let cap_r = aggregate_nonces(&points);
        let aggregated = AggregatedCommitment(cap_r.compress().to_bytes());

        if let SignerState::PrecommitmentsReceived { nonce, .. } =
            std::mem::replace(&mut self.state, SignerState::Revoked)
        {
            self.state = SignerState::CommitmentsAggregated {
                nonce,
                commitments: points,
                cap_r,
            };
        }
        debug!("Nonce commitments aggregated");

        Ok(aggregated)
    }

    /// Round three: compute this signer's share `s_i = r_i + e * a_i * x_i`.
    ///
    /// `private_key` must be the 32-byte canonical scalar behind this signer's public
    /// key. The nonce is wiped once the share is computed, so a session signs exactly
    /// one message.
    #[tracing::instrument(
        name = "Computing signature share",
        skip_all,
        fields(position = self.position)
    )]
    pub fn sign(&mut self, private_key: &[u8], message: &[u8]) -> Result<SignatureShare> {
        let (nonce, cap_r) = match &self.state {
            SignerState::CommitmentsAggregated { nonce, cap_r, .. } => (nonce, cap_r),
            SignerState::Created
            | SignerState::PrecommitComputed { .. }
            | SignerState::PrecommitmentsReceived { .. } => {
                return Err(MusigError::AggregatedNonceCommitmentNotComputed)
            }
            _ => return Err(MusigError::InvalidInputData),
        };

        let private_key = decode_private_key(private_key)?;
        let own_point = self
            .participants
            .point(self.position)
            .ok_or(MusigError::InternalError)?;
        if private_key.expose_secret() * RISTRETTO_BASEPOINT_POINT != *own_point {
            warn!("Private key does not belong to this signer's position");
            return Err(MusigError::InvalidInputData);
        }
        let coefficient = self
            .participants
            .coefficient(self.position)
            .ok_or(MusigError::InternalError)?;

        let challenge = calc_hash_rxm(
            &cap_r.compress(),
            &self.participants.aggregated_point().compress(),
            message,
        );
        let s_i = partial_signature(
            nonce.expose(),
            &challenge,
            coefficient,
            private_key.expose_secret(),
        );
        let share = SignatureShare(s_i.to_bytes());

        if let SignerState::CommitmentsAggregated {
            commitments, cap_r, ..
        } = std::mem::replace(&mut self.state, SignerState::Revoked)
        {
            self.state = SignerState::Signed(SigningSession {
                commitments,
                cap_r,
                challenge,
                share,
            });
        }
        debug!("Signature share computed");

        Ok(share)
    }

    /// Round four: sum all N shares into the final signature `R || s`.
    ///
    /// Shares may come in any order; only their count must equal N. Calling it again
    /// with the same shares returns the same signature.
    #[tracing::instrument(
        name = "Aggregating signature shares",
        skip_all,
        fields(position = self.position)
    )]
    pub fn aggregate_signature(&mut self, shares: &[u8]) -> Result<AggregatedSignature> {
        let session = self.state.session()?;

        let shares = split_items(
            shares,
            Some(self.participants.len()),
            MusigError::SignatureShareAndParticipantsNotMatch,
            MusigError::SignatureShareAndParticipantsNotMatch,
        )?
        .iter()
        .map(|share| decode_scalar(share).ok_or(MusigError::InvalidSignatureShare))
        .collect::<Result<Vec<Scalar>>>()?;

        let s = aggregate_s(&shares);
        let signature = AggregatedSignature {
            signature_r: AggregatedCommitment(session.cap_r.compress().to_bytes()),
            signature_s: s.to_bytes(),
        };
        debug!(
            valid = verify_equation(
                self.participants.aggregated_point(),
                &session.cap_r,
                &session.challenge,
                &s
            ),
            "Signature shares aggregated"
        );

        self.state = match std::mem::replace(&mut self.state, SignerState::Revoked) {
            SignerState::Signed(session) | SignerState::SignatureAggregated { session, .. } => {
                SignerState::SignatureAggregated { session, signature }
            }
            other => other,
        };

        Ok(signature)
    }

    /// Checks one co-signer's share against `s_j * G == R_j + e * a_j * P_j`.
    ///
    /// Available once this signer has signed. Returns `false` for a share that
    /// decodes but does not verify.
    pub fn verify_signature_share(&self, position: usize, share: &SignatureShare) -> Result<bool> {
        let session = self.state.session()?;
        let (point, coefficient, cap_r_j) = match (
            self.participants.point(position),
            self.participants.coefficient(position),
            session.commitments.get(position),
        ) {
            (Some(point), Some(coefficient), Some(cap_r_j)) => (point, coefficient, cap_r_j),
            _ => return Err(MusigError::InvalidParticipantPosition),
        };
        let s_j = decode_scalar(share.as_bytes()).ok_or(MusigError::InvalidSignatureShare)?;

        let valid = verify_equation(&(coefficient * point), cap_r_j, &session.challenge, &s_j);
        if !valid {
            warn!(participant = position, "Signature share does not verify");
        }
        Ok(valid)
    }

    /// This signer's own share, once computed.
    pub fn signature_share(&self) -> Option<SignatureShare> {
        self.state.session().ok().map(|session| session.share)
    }

    /// Ends the session: the nonce and all round state are dropped and zeroized.
    /// Every later call on this signer fails.
    pub fn revoke(&mut self) {
        if self.phase() != SignerPhase::Revoked {
            debug!(position = self.position, phase = ?self.phase(), "Signer revoked");
        }
        self.state = SignerState::Revoked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::concat_items;
    use crate::keys_management::KeyPair;
    use crate::schnorr_musig::key_aggregation::aggregate_public_keys;
    use crate::schnorr_musig::musig_protocol::verifier::{
        verify_by_aggregated_public_key, verify_by_public_keys,
    };
    use crate::test_fixtures::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Session {
        keys: Vec<KeyPair>,
        encoded_keys: Vec<u8>,
        signers: Vec<Signer>,
    }

    impl Session {
        fn new(n: usize) -> Session {
            let keys: Vec<KeyPair> = key_pairs().into_iter().take(n).collect();
            let encoded_keys = concatenated_public_keys(&keys);
            let signers = (0..n)
                .map(|position| Signer::new(&encoded_keys, position).unwrap())
                .collect();
            Session {
                keys,
                encoded_keys,
                signers,
            }
        }

        fn precommit(&mut self) -> Vec<u8> {
            let precommitments: Vec<Precommitment> = self
                .signers
                .iter_mut()
                .map(|signer| signer.compute_precommitment(&seed()).unwrap())
                .collect();
            concat_items(&precommitments)
        }

        fn commit(&mut self) -> Vec<u8> {
            let precommitments = self.precommit();
            let commitments: Vec<Commitment> = self
                .signers
                .iter_mut()
                .map(|signer| signer.receive_precommitments(&precommitments).unwrap())
                .collect();
            concat_items(&commitments)
        }

        fn sign(&mut self) -> Vec<SignatureShare> {
            let commitments = self.commit();
            for signer in self.signers.iter_mut() {
                signer.receive_commitments(&commitments).unwrap();
            }
            self.signers
                .iter_mut()
                .zip(&self.keys)
                .map(|(signer, keys)| {
                    signer
                        .sign(keys.private_key_bytes().as_slice(), MESSAGE)
                        .unwrap()
                })
                .collect()
        }
    }

    #[test]
    fn test_single_signer_session() {
        let keys = key_pairs().remove(0);
        let public_key = keys.public_key_bytes();
        let mut signer = Signer::from_single_key(&public_key).unwrap();

        let precommitment = signer.compute_precommitment(&seed()).unwrap();
        let commitment = signer.receive_precommitments(precommitment.as_bytes()).unwrap();
        let aggregated_commitment = signer.receive_commitments(commitment.as_bytes()).unwrap();
        assert_eq!(aggregated_commitment.as_bytes(), commitment.as_bytes());

        let share = signer.sign(keys.private_key_bytes().as_slice(), MESSAGE).unwrap();
        let signature = signer.aggregate_signature(share.as_bytes()).unwrap();

        assert_eq!(signature.r().as_bytes(), commitment.as_bytes());
        assert_eq!(signature.s(), share.as_bytes());
        assert_eq!(signer.phase(), SignerPhase::SignatureAggregated);
        assert!(verify_by_public_keys(MESSAGE, &signature.to_bytes(), &public_key).unwrap());
    }

    #[test]
    fn test_session_is_deterministic() {
        let mut first = Session::new(3);
        let mut second = Session::new(3);
        assert_eq!(first.precommit(), second.precommit());

        let mut first = Session::new(3);
        let mut second = Session::new(3);
        assert_eq!(first.commit(), second.commit());

        let mut first = Session::new(3);
        let mut second = Session::new(3);
        assert_eq!(first.sign(), second.sign());
    }

    #[test]
    fn test_shared_seed_gives_distinct_nonces() {
        let mut session = Session::new(5);
        let commitments = session.commit();
        let items: Vec<&[u8]> = commitments.chunks(32).collect();
        for i in 0..items.len() {
            for j in i + 1..items.len() {
                assert_ne!(items[i], items[j]);
            }
        }
    }

    #[test]
    fn test_five_signers_agree_on_signature() {
        let mut session = Session::new(5);
        let shares = concat_items(&session.sign());

        let signatures: Vec<AggregatedSignature> = session
            .signers
            .iter_mut()
            .map(|signer| signer.aggregate_signature(&shares).unwrap())
            .collect();
        for signature in &signatures {
            assert_eq!(signature.to_bytes(), signatures[0].to_bytes());
        }

        let signature = signatures[0].to_bytes();
        assert!(verify_by_public_keys(MESSAGE, &signature, &session.encoded_keys).unwrap());

        let aggregated_key = aggregate_public_keys(&session.encoded_keys).unwrap();
        assert_eq!(aggregated_key, session.signers[0].aggregated_public_key());
        let key = aggregated_key.as_bytes();
        assert!(verify_by_aggregated_public_key(MESSAGE, &signature, key).unwrap());
        assert!(!verify_by_aggregated_public_key(b"hellp", &signature, key).unwrap());
    }

    #[test]
    fn test_share_order_does_not_matter() {
        let mut session = Session::new(5);
        let mut shares = session.sign();
        let in_order = session.signers[0]
            .aggregate_signature(&concat_items(&shares))
            .unwrap();

        shares.reverse();
        shares.swap(1, 3);
        let permuted = session.signers[0]
            .aggregate_signature(&concat_items(&shares))
            .unwrap();
        assert_eq!(in_order, permuted);
    }

    #[test]
    fn test_commitment_must_open_precommitment() {
        let mut session = Session::new(3);
        let commitments = session.commit();

        // Another participant's valid commitment in the wrong slot.
        let mut swapped = commitments.clone();
        swapped[32..64].copy_from_slice(&commitments[64..96]);
        swapped[64..96].copy_from_slice(&commitments[32..64]);

        let signer = &mut session.signers[0];
        assert_eq!(
            signer.receive_commitments(&swapped),
            Err(MusigError::InvalidCommitment)
        );
        assert_eq!(signer.phase(), SignerPhase::PrecommitmentsReceived);

        // The round can be retried with the right input.
        assert!(signer.receive_commitments(&commitments).is_ok());
        assert_eq!(signer.phase(), SignerPhase::CommitmentsAggregated);
    }

    #[test]
    fn test_commitment_must_be_group_element() {
        let mut session = Session::new(2);
        let mut commitments = session.commit();
        commitments[32..64].copy_from_slice(&[0xff; 32]);

        assert_eq!(
            session.signers[0].receive_commitments(&commitments),
            Err(MusigError::CommitmentIsNotInCorrectSubgroup)
        );
        assert_eq!(session.signers[0].phase(), SignerPhase::PrecommitmentsReceived);
    }

    #[test]
    fn test_round_counts_are_enforced() {
        let mut session = Session::new(3);
        let precommitments = session.precommit();
        let signer = &mut session.signers[0];

        assert_eq!(
            signer.receive_precommitments(&precommitments[..64]),
            Err(MusigError::NoncePrecommitmentsAndParticipantsNotMatch)
        );
        let mut too_many = precommitments.clone();
        too_many.extend_from_slice(&precommitments[..32]);
        assert_eq!(
            signer.receive_precommitments(&too_many),
            Err(MusigError::NoncePrecommitmentsAndParticipantsNotMatch)
        );
        assert_eq!(
            signer.receive_precommitments(&precommitments[..70]),
            Err(MusigError::NoncePrecommitmentsAndParticipantsNotMatch)
        );

        let mut session = Session::new(3);
        let commitments = session.commit();
        let signer = &mut session.signers[0];
        assert_eq!(
            signer.receive_commitments(&commitments[..32]),
            Err(MusigError::NonceCommitmentsAndParticipantsNotMatch)
        );
        assert_eq!(
            signer.receive_commitments(&[commitments.as_slice(), &commitments[..32]].concat()),
            Err(MusigError::NonceCommitmentsAndParticipantsNotMatch)
        );

        let mut session = Session::new(3);
        let shares = concat_items(&session.sign());
        let signer = &mut session.signers[0];
        assert_eq!(
            signer.aggregate_signature(&shares[..64]),
            Err(MusigError::SignatureShareAndParticipantsNotMatch)
        );
        assert_eq!(
            signer.aggregate_signature(&[shares.as_slice(), &shares[..32]].concat()),
            Err(MusigError::SignatureShareAndParticipantsNotMatch)
        );
        assert_eq!(signer.phase(), SignerPhase::Signed);
    }

    #[test]
    fn test_own_precommitment_must_be_at_own_position() {
        let mut session = Session::new(2);
        let precommitments = session.precommit();
        let mut swapped = precommitments[32..].to_vec();
        swapped.extend_from_slice(&precommitments[..32]);

        assert_eq!(
            session.signers[0].receive_precommitments(&swapped),
            Err(MusigError::NoncePrecommitmentsAndParticipantsNotMatch)
        );
        assert_eq!(session.signers[0].phase(), SignerPhase::PrecommitComputed);
    }

    #[test]
    fn test_position_bound() {
        let keys = concatenated_public_keys(&key_pairs());
        assert_eq!(
            Signer::new(&keys, 5).unwrap_err(),
            MusigError::InvalidParticipantPosition
        );
        assert!(Signer::new(&keys, 4).is_ok());
    }

    #[test]
    fn test_malformed_keys_are_rejected() {
        let keys = concatenated_public_keys(&key_pairs());
        assert_eq!(
            Signer::new(&keys[..100], 0).unwrap_err(),
            MusigError::InvalidPubkeyLength
        );
        let mut bad = keys.clone();
        bad[..32].copy_from_slice(&[0xff; 32]);
        assert_eq!(Signer::new(&bad, 0).unwrap_err(), MusigError::InvalidPublicKey);
    }

    #[test]
    fn test_identity_key_is_rejected() {
        assert_eq!(
            Signer::new(&[0u8; 32], 0).unwrap_err(),
            MusigError::InvalidPublicKey
        );
        assert_eq!(
            Signer::from_single_key(&[0u8; 32]).unwrap_err(),
            MusigError::InvalidPublicKey
        );
        let mut keys = concatenated_public_keys(&key_pairs());
        keys[32..64].copy_from_slice(&[0u8; 32]);
        assert_eq!(Signer::new(&keys, 0).unwrap_err(), MusigError::InvalidPublicKey);
    }

    #[test]
    fn test_out_of_order_calls_fail() {
        let mut session = Session::new(2);
        let signer = &mut session.signers[0];
        let private_key = session.keys[0].private_key_bytes();

        assert_eq!(
            signer.receive_precommitments(&[0u8; 64]),
            Err(MusigError::NonceCommitmentNotGenerated)
        );
        assert_eq!(
            signer.receive_commitments(&[0u8; 64]),
            Err(MusigError::NoncePrecommitmentsNotReceived)
        );
        assert_eq!(
            signer.sign(private_key.as_slice(), MESSAGE),
            Err(MusigError::AggregatedNonceCommitmentNotComputed)
        );
        assert_eq!(
            signer.aggregate_signature(&[0u8; 64]),
            Err(MusigError::AggregatedNonceCommitmentNotComputed)
        );
        assert_eq!(signer.phase(), SignerPhase::Created);

        signer.compute_precommitment(&seed()).unwrap();
        assert_eq!(
            signer.receive_commitments(&[0u8; 64]),
            Err(MusigError::NoncePrecommitmentsNotReceived)
        );
    }

    #[test]
    fn test_aggregation_requires_own_share() {
        let mut session = Session::new(2);
        let commitments = session.commit();
        let signer = &mut session.signers[0];
        signer.receive_commitments(&commitments).unwrap();

        assert_eq!(
            signer.aggregate_signature(&[0u8; 64]),
            Err(MusigError::ChallengeNotGenerated)
        );
        assert_eq!(
            signer.verify_signature_share(1, &SignatureShare([0u8; 32])),
            Err(MusigError::ChallengeNotGenerated)
        );
    }

    #[test]
    fn test_reentry_is_rejected() {
        let mut session = Session::new(2);
        session.sign();
        let signer = &mut session.signers[0];

        assert_eq!(
            signer.compute_precommitment(&seed()),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(
            signer.sign(session.keys[0].private_key_bytes().as_slice(), b"another message"),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(signer.phase(), SignerPhase::Signed);
    }

    #[test]
    fn test_invalid_seed() {
        let mut session = Session::new(1);
        let signer = &mut session.signers[0];
        assert_eq!(signer.compute_precommitment(&[]), Err(MusigError::InvalidSeed));
        assert_eq!(
            signer.compute_precommitment(&[1, 2, 3]),
            Err(MusigError::InvalidSeed)
        );
        assert_eq!(signer.phase(), SignerPhase::Created);
    }

    #[test]
    fn test_revoke_is_terminal() {
        let mut session = Session::new(2);
        let precommitments = session.precommit();
        let signer = &mut session.signers[0];

        signer.revoke();
        assert_eq!(signer.phase(), SignerPhase::Revoked);
        assert_eq!(
            signer.receive_precommitments(&precommitments),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(
            signer.compute_precommitment(&seed()),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(
            signer.aggregate_signature(&[0u8; 64]),
            Err(MusigError::InvalidInputData)
        );
        assert!(signer.aggregated_commitment().is_none());

        signer.revoke();
        assert_eq!(signer.phase(), SignerPhase::Revoked);
    }

    #[test]
    fn test_sign_checks_private_key() {
        let mut session = Session::new(2);
        let commitments = session.commit();
        let other_key = session.keys[1].private_key_bytes();
        let signer = &mut session.signers[0];
        signer.receive_commitments(&commitments).unwrap();

        assert_eq!(
            signer.sign(&[1u8; 31], MESSAGE),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(signer.sign(&[0xff; 32], MESSAGE), Err(MusigError::EncodingError));
        assert_eq!(
            signer.sign(other_key.as_slice(), MESSAGE),
            Err(MusigError::InvalidInputData)
        );
        assert_eq!(signer.phase(), SignerPhase::CommitmentsAggregated);
    }

    #[test]
    fn test_verify_signature_share_finds_bad_share() {
        let mut session = Session::new(3);
        let shares = session.sign();
        let signer = &session.signers[0];

        for (position, share) in shares.iter().enumerate() {
            assert!(signer.verify_signature_share(position, share).unwrap());
        }
        assert!(!signer.verify_signature_share(1, &shares[2]).unwrap());
        assert_eq!(
            signer.verify_signature_share(3, &shares[0]),
            Err(MusigError::InvalidParticipantPosition)
        );
        assert_eq!(
            signer.verify_signature_share(0, &SignatureShare([0xff; 32])),
            Err(MusigError::InvalidSignatureShare)
        );
        assert_eq!(signer.signature_share(), Some(shares[0]));
    }

    #[test]
    fn test_malformed_share_is_rejected() {
        let mut session = Session::new(2);
        let mut shares = concat_items(&session.sign());
        shares[32..].copy_from_slice(&[0xff; 32]);
        assert_eq!(
            session.signers[0].aggregate_signature(&shares),
            Err(MusigError::InvalidSignatureShare)
        );
    }

    #[test]
    fn test_randomized_nonce_still_signs() {
        let keys = key_pairs().remove(0);
        let public_key = keys.public_key_bytes();
        let mut plain = Signer::from_single_key(&public_key).unwrap();
        let mut randomized = Signer::from_single_key(&public_key).unwrap();

        let plain_precommitment = plain.compute_precommitment(&seed()).unwrap();
        let precommitment = randomized
            .compute_precommitment_with_rng(&seed(), StdRng::seed_from_u64(99))
            .unwrap();
        assert_ne!(plain_precommitment, precommitment);

        let commitment = randomized.receive_precommitments(precommitment.as_bytes()).unwrap();
        randomized.receive_commitments(commitment.as_bytes()).unwrap();
        let share = randomized.sign(keys.private_key_bytes().as_slice(), MESSAGE).unwrap();
        let signature = randomized.aggregate_signature(share.as_bytes()).unwrap();
        assert!(verify_by_public_keys(MESSAGE, &signature.to_bytes(), &public_key).unwrap());
    }

    #[test]
    fn test_typed_constructor_matches_concatenated() {
        let keys = key_pairs();
        let typed: Vec<PublicKey> = keys
            .iter()
            .map(|keys| PublicKey::from_bytes(keys.public_key_bytes()))
            .collect();
        let signer = Signer::from_public_keys(&typed, 2).unwrap();
        assert_eq!(signer.public_key(), typed[2]);
        assert_eq!(signer.participants_count(), 5);
        assert_eq!(
            signer.aggregated_public_key(),
            Signer::new(&concatenated_public_keys(&keys), 0)
                .unwrap()
                .aggregated_public_key()
        );
    }
}
