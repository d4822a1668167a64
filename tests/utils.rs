use crush::utils::number_encoding::{decode64, encode64};
use crush::utils::signatures::{match_signature, FORMAT_TAG, FORMAT_VERSION};
use crush::utils::split_encoding::{join32, split32};

#[test]
fn test_number_encoding() {
    fn test_round_trip64(num: u64) {
        let mut buffer = Vec::new();
        let wrote = encode64(num, &mut buffer);
        assert_eq!(buffer.len(), wrote);
        let (read, val) = decode64(&buffer).unwrap();
        assert_eq!(wrote, read);
        assert_eq!(val, num);
    }

    test_round_trip64(0);
    test_round_trip64(1);
    test_round_trip64(65535);
    test_round_trip64(1 << 40);
    test_round_trip64(u64::MAX);

    // The length is stored big-endian.
    let mut buffer = Vec::new();
    let _ = encode64(0x0102, &mut buffer);
    assert_eq!(buffer, [0, 0, 0, 0, 0, 0, 1, 2]);

    assert!(decode64(&[1, 2, 3]).is_none());
}

#[test]
fn test_signature() {
    assert!(match_signature(&[FORMAT_TAG, FORMAT_VERSION, 0, 0]));
    assert!(!match_signature(&[FORMAT_TAG, FORMAT_VERSION + 1]));
    assert!(!match_signature(&[0, FORMAT_VERSION]));
    assert!(!match_signature(&[FORMAT_TAG]));
    assert!(!match_signature(&[]));
}

#[test]
fn test_split_encoding() {
    for val in 0..5000 {
        let (code, extra, bits) = split32(val);
        assert_eq!(code as usize, bits);
        assert_eq!(join32(code, extra), val as u64);
    }
    assert_eq!(split32(0), (0, 0, 0));
    assert_eq!(split32(1), (1, 0, 1));
    assert_eq!(split32(2), (1, 1, 1));
    assert_eq!(split32(3), (2, 0, 2));
}
