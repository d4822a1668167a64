//! A collection of utilities for handling numbers and signatures.

/// Signatures and layout constants of the compressed format.
pub mod signatures {
    /// The first byte of every compressed buffer.
    pub const FORMAT_TAG: u8 = 0xC7;
    /// The second byte of every compressed buffer.
    pub const FORMAT_VERSION: u8 = 1;
    /// Mode byte: the payload holds the raw input.
    pub const MODE_STORED: u8 = 0;
    /// Mode byte: the payload holds an entropy coded token stream.
    pub const MODE_CODED: u8 = 1;
    /// Tag + version + 64bit length + mode.
    pub const HEADER_SIZE: usize = 11;
    /// The file extension used by the command line tool.
    pub const FILE_EXTENSION: &str = ".cr";

    /// Return True if 'input' starts with the format tag and version.
    pub fn match_signature(input: &[u8]) -> bool {
        input.starts_with(&[FORMAT_TAG, FORMAT_VERSION])
    }
}

/// Implements encoding and decoding of regular numbers.
pub mod number_encoding {
    pub fn encode64(num: u64, stream: &mut Vec<u8>) -> usize {
        stream.extend_from_slice(&num.to_be_bytes());
        8
    }

    pub fn decode64(stream: &[u8]) -> Option<(usize, u64)> {
        let bytes: [u8; 8] = stream.get(0..8)?.try_into().ok()?;
        Some((8, u64::from_be_bytes(bytes)))
    }
}

/// Encodes numbers as a code and extra bits. This is useful when there is a
/// sharp distribution of values, with few high-bit numbers. The code is the
/// position of the highest set bit, and the extra bits hold the rest of the
/// number. The representation of the value is (1 << code) + bits - 1. The
/// numbers are shifted by +1, to allow the encoding of zero.
/// Reference:
/// <https://github.com/facebook/zstd/blob/dev/doc/zstd_compression_format.md#offset-codes>
pub mod split_encoding {
    /// Split 'val' into (code, extra_bits, num_extra_bits).
    pub fn split32(val: u32) -> (u32, u32, usize) {
        let val = val as u64 + 1;
        let code = 63 - val.leading_zeros();
        let extra = val - (1 << code);
        (code, extra as u32, code as usize)
    }

    /// Rebuild a value from the code and its extra bits.
    pub fn join32(code: u32, extra: u32) -> u64 {
        (1u64 << code) + extra as u64 - 1
    }

    #[test]
    fn test_split_encoding_simple() {
        let (code, extra, bits) = split32(7);
        assert_eq!(code, 3);
        assert_eq!(bits, 3);
        assert_eq!(join32(code, extra), 7);
    }

    #[test]
    fn test_split_encoding_many() {
        let vals = [
            0, 1, 2, 3, 5, 16, 37, 1121, 3512, 17824, 69481, 32768, 41910,
            65535, 65536, 65537, 192151, u32::MAX,
        ];
        for val in vals {
            let (code, extra, bits) = split32(val);
            assert!(bits == 32 || extra < (1 << bits));
            assert_eq!(join32(code, extra), val as u64);
        }
        assert_eq!(split32(0).0, 0);
        assert_eq!(split32(u32::MAX).0, 32);
    }
}
