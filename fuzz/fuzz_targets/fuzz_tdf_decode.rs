#![no_main]

use blaze_protocol::core::tdf;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz the recursive TDF decoder - test for panics, stack exhaustion,
    // infinite loops
    if let Ok(values) = tdf::decode_all(data) {
        // Whatever decoded must re-encode without panicking.
        let _ = tdf::encode_all(&values);
    }
});
