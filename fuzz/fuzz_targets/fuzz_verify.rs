#![no_main]

use libfuzzer_sys::fuzz_target;
use schnorr_musig::{verify_by_aggregated_public_key, verify_by_public_keys};

// Arbitrary keys and signatures must produce Ok or Err, never a panic.
fuzz_target!(|data: &[u8]| {
    if data.len() < 64 {
        return;
    }
    let (signature, keys) = data.split_at(64);
    let _ = verify_by_public_keys(b"Hello world", signature, keys);
    let _ = verify_by_aggregated_public_key(b"Hello world", signature, keys);
});
