#![no_main]

use crush::block::BlockDecoder;
use crush::Decoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decompressed: Vec<u8> = Vec::new();
    {
        let mut decoder = BlockDecoder::new(data, &mut decompressed);
        decoder.set_expected_len(1 << 16);
        let _ = decoder.decode();
    }
});
