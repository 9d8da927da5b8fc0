//! Errors returned by key aggregation, the signer state machine and verification.
//!
//! Every variant has a stable numeric code so that a caller on the other side of
//! a process boundary can map codes back to kinds.

use thiserror::Error;

/// Result type alias for MuSig operations
pub type Result<T> = std::result::Result<T, MusigError>;

#[derive(Error, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MusigError {
    /// Input is structurally wrong, or the call is not allowed for this session.
    #[error("Invalid input data")]
    InvalidInputData,

    /// A point or scalar could not be decoded.
    #[error("Encoding error")]
    EncodingError,

    /// The verification equation was not satisfied.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    #[error("Internal error")]
    InternalError,

    /// Concatenated public keys are not a whole number of encodings.
    #[error("Public keys length is not a multiple of the encoding length")]
    InvalidPubkeyLength,

    #[error("Nonce commitment has not been generated")]
    NonceCommitmentNotGenerated,

    #[error("Nonce precommitments have not been received")]
    NoncePrecommitmentsNotReceived,

    #[error("Number of nonce precommitments does not match number of participants")]
    NoncePrecommitmentsAndParticipantsNotMatch,

    #[error("Nonce commitments have not been received")]
    NonceCommitmentsNotReceived,

    #[error("Number of nonce commitments does not match number of participants")]
    NonceCommitmentsAndParticipantsNotMatch,

    #[error("Number of signature shares does not match number of participants")]
    SignatureShareAndParticipantsNotMatch,

    /// A revealed nonce point is not a valid element of the prime-order group.
    #[error("Commitment is not in the correct subgroup")]
    CommitmentIsNotInCorrectSubgroup,

    /// A revealed nonce point does not open its precommitment.
    #[error("Commitment does not match its precommitment")]
    InvalidCommitment,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Participant position is out of range")]
    InvalidParticipantPosition,

    #[error("Aggregated nonce commitment has not been computed")]
    AggregatedNonceCommitmentNotComputed,

    #[error("Challenge has not been generated")]
    ChallengeNotGenerated,

    #[error("Invalid signature share")]
    InvalidSignatureShare,

    #[error("Invalid seed")]
    InvalidSeed,
}

const ALL_ERRORS: [MusigError; 19] = [
    MusigError::InvalidInputData,
    MusigError::EncodingError,
    MusigError::SignatureVerificationFailed,
    MusigError::InternalError,
    MusigError::InvalidPubkeyLength,
    MusigError::NonceCommitmentNotGenerated,
    MusigError::NoncePrecommitmentsNotReceived,
    MusigError::NoncePrecommitmentsAndParticipantsNotMatch,
    MusigError::NonceCommitmentsNotReceived,
    MusigError::NonceCommitmentsAndParticipantsNotMatch,
    MusigError::SignatureShareAndParticipantsNotMatch,
    MusigError::CommitmentIsNotInCorrectSubgroup,
    MusigError::InvalidCommitment,
    MusigError::InvalidPublicKey,
    MusigError::InvalidParticipantPosition,
    MusigError::AggregatedNonceCommitmentNotComputed,
    MusigError::ChallengeNotGenerated,
    MusigError::InvalidSignatureShare,
    MusigError::InvalidSeed,
];

impl MusigError {
    /// Stable numeric code of this error kind. Zero is reserved for success.
    pub fn code(&self) -> u32 {
        match self {
            MusigError::InvalidInputData => 1,
            MusigError::EncodingError => 2,
            MusigError::SignatureVerificationFailed => 3,
            MusigError::InternalError => 4,
            MusigError::InvalidPubkeyLength => 100,
            MusigError::NonceCommitmentNotGenerated => 101,
            MusigError::NoncePrecommitmentsNotReceived => 102,
            MusigError::NoncePrecommitmentsAndParticipantsNotMatch => 103,
            MusigError::NonceCommitmentsNotReceived => 104,
            MusigError::NonceCommitmentsAndParticipantsNotMatch => 105,
            MusigError::SignatureShareAndParticipantsNotMatch => 106,
            MusigError::InvalidCommitment => 107,
            MusigError::InvalidPublicKey => 108,
            MusigError::InvalidParticipantPosition => 109,
            MusigError::AggregatedNonceCommitmentNotComputed => 110,
            MusigError::ChallengeNotGenerated => 111,
            MusigError::InvalidSignatureShare => 112,
            MusigError::InvalidSeed => 113,
            MusigError::CommitmentIsNotInCorrectSubgroup => 114,
        }
    }

    /// Maps a numeric code back to its error kind.
    pub fn from_code(code: u32) -> Option<MusigError> {
        ALL_ERRORS.iter().copied().find(|error| error.code() == code)
    }
}
