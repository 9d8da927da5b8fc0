// Shared fixtures for the protocol tests.
use crate::encoding::{concat_items, seed_from_words};
use crate::keys_management::KeyPair;
use curve25519_dalek::scalar::Scalar;
use secrecy::Secret;
use sha2::Sha512;

pub const MESSAGE: &[u8] = b"hello";

pub const SEED_WORDS: [u32; 4] = [16807, 282475249, 1622650073, 984943658];

const KEY_MATERIAL: [&str; 5] = [
    "011f5b99084c5c2e2d5e63488e0f7168d599a5c01fe9fec4c99605743da5e85c",
    "05befa1dc5beb8aa74c348966f5254702bc0a9613e519eb3ef2fe8c444f40d33",
    "03cd8947a90f73a875623574f8e0e3d3c6abd8f9367ba54433ed02b7a62533d9",
    "02556c232cfb6c8274ac7e2e55fe1f87b6dee119bf62a3c784102de6c25c2512",
    "01791089b53bee682147ecbc5e26325329a21c894a6205876c58798d1c268ae4",
];

pub fn seed() -> Vec<u8> {
    seed_from_words(&SEED_WORDS)
}

/// Five fixed key pairs, the private scalars hashed from fixed key material.
pub fn key_pairs() -> Vec<KeyPair> {
    KEY_MATERIAL
        .iter()
        .map(|material| {
            let bytes = hex::decode(material).unwrap();
            KeyPair::create_from_private_key(Secret::new(Scalar::hash_from_bytes::<Sha512>(&bytes)))
        })
        .collect()
}

pub fn concatenated_public_keys(key_pairs: &[KeyPair]) -> Vec<u8> {
    let keys: Vec<[u8; 32]> = key_pairs.iter().map(KeyPair::public_key_bytes).collect();
    concat_items(&keys)
}
