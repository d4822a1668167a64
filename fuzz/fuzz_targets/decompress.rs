#![no_main]

use crush::{decompress_with_limit, ErrorKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Err(err) = decompress_with_limit(data, 1 << 24) {
        assert_ne!(err.kind(), ErrorKind::Io);
    }
});
