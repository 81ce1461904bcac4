#![no_main]

use blaze_protocol::PacketReassembler;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz stream reassembly + packet framing - test for panics, crashes,
    // runaway allocation from hostile headers
    let mut reassembler = PacketReassembler::with_max_content_length(1 << 20);
    for chunk in data.chunks(7) {
        if reassembler.push(chunk).is_err() {
            break;
        }
    }
});
