#![no_main]

use crush::{compress, decompress};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first byte selects the level.
    let Some((&level, input)) = data.split_first() else {
        return;
    };
    let compressed = compress(input, (level % 10) as i32).unwrap();
    let decompressed = decompress(&compressed).unwrap();
    assert_eq!(decompressed, input);
});
