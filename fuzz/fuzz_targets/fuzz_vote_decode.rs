#![no_main]

use libfuzzer_sys::fuzz_target;

use tally_types::Vote;

// Decoding arbitrary bytes as a vote must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(vote) = bincode::deserialize::<Vote>(data) {
        let _ = vote.to_string();
    }
});
