pub mod protocol_messages;
pub mod signer;
pub mod verifier;
