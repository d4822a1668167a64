use crush::block::{encode_token_stream, replay, BlockDecoder, BlockEncoder};
use crush::lz::Token;
use crush::stored::{StoredDecoder, StoredEncoder};
use crush::{Context, Decoder, Encoder, ErrorKind};

fn decode_block(compressed: &[u8], len: usize) -> crush::Result<Vec<u8>> {
    let mut decompressed: Vec<u8> = Vec::new();
    let mut decoder = BlockDecoder::new(compressed, &mut decompressed);
    decoder.set_expected_len(len);
    let (consumed, written) = decoder.decode()?;
    assert_eq!(consumed, compressed.len());
    assert_eq!(written, len);
    Ok(decompressed)
}

#[test]
fn test_block_round_trip() {
    fn round_trip(input: &[u8]) {
        for level in [1, 6, 9] {
            let mut compressed: Vec<u8> = Vec::new();
            let ctx = Context::new(level, 1 << 20);
            {
                let mut encoder = BlockEncoder::new(input, &mut compressed, ctx);
                let written = encoder.encode().unwrap();
                assert_eq!(written, compressed.len());
            }
            assert_eq!(decode_block(&compressed, input.len()).unwrap(), input);
        }
    }

    {
        round_trip(&[]);
        round_trip(&[1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 0, 0, 0, 0]);
        round_trip(&[1, 0, 0, 1, 0, 0, 0, 0, 2, 2, 2, 2, 0, 0, 0, 0]);
        round_trip(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 5, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
    }
    {
        let test_str = "123456789abcd&ef&gh&ijk&lm7no*aaaa aaaa aaaaaaaa";
        round_trip(test_str.as_bytes());
    }
    {
        let input: Vec<u8> = (0..100_000u64).map(|i| (i * i % 7919) as u8).collect();
        round_trip(&input);
    }
}

#[test]
fn test_overlap_copy() {
    // 50 repeats of one byte, written as a literal followed by an overlapping
    // match.
    let tokens = [
        Token::Literal(b'z'),
        Token::Match {
            distance: 1,
            length: 49,
        },
    ];
    let expected = vec![b'z'; 50];
    assert_eq!(replay(&tokens, 50).unwrap(), expected);

    let mut compressed = Vec::new();
    let _ = encode_token_stream(&tokens, 16, &mut compressed).unwrap();
    assert_eq!(decode_block(&compressed, 50).unwrap(), expected);

    // A repeating pattern that is shorter than the match.
    let tokens = [
        Token::Literal(b'a'),
        Token::Literal(b'b'),
        Token::Literal(b'c'),
        Token::Match {
            distance: 3,
            length: 7,
        },
    ];
    assert_eq!(replay(&tokens, 10).unwrap(), b"abcabcabca");
}

#[test]
fn test_invalid_token_streams() {
    fn kind(tokens: &[Token], len: usize) -> ErrorKind {
        replay(tokens, len).unwrap_err().kind()
    }

    // The match reaches before the start of the output.
    let tokens = [
        Token::Literal(1),
        Token::Match {
            distance: 2,
            length: 3,
        },
    ];
    assert_eq!(kind(&tokens, 4), ErrorKind::CorruptStream);

    // The tokens produce more than the declared length.
    let tokens = [
        Token::Literal(1),
        Token::Match {
            distance: 1,
            length: 10,
        },
    ];
    assert_eq!(kind(&tokens, 5), ErrorKind::CorruptStream);

    // The tokens produce less than the declared length.
    assert_eq!(kind(&tokens, 20), ErrorKind::CorruptStream);
    assert_eq!(replay(&tokens, 11).unwrap(), vec![1; 11]);
}

#[test]
fn test_invalid_blocks() {
    let tokens = [
        Token::Literal(b'q'),
        Token::Match {
            distance: 1,
            length: 2000,
        },
        Token::Literal(b'r'),
        Token::Match {
            distance: 1500,
            length: 10,
        },
    ];
    let len = 2012;

    // The distance does not fit in the declared window.
    let mut compressed = Vec::new();
    let _ = encode_token_stream(&tokens, 10, &mut compressed).unwrap();
    let err = decode_block(&compressed, len).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptStream);

    let mut compressed = Vec::new();
    let _ = encode_token_stream(&tokens, 11, &mut compressed).unwrap();
    assert!(decode_block(&compressed, len).is_ok());

    // Bad window size.
    let mut bad = compressed.clone();
    bad[0] = 5;
    assert!(decode_block(&bad, len).is_err());
    bad[0] = 30;
    assert!(decode_block(&bad, len).is_err());

    // Trailing data after the last token.
    let mut bad = compressed.clone();
    bad.push(0);
    assert!(decode_block(&bad, len).is_err());

    // Truncated payloads.
    for cut in 0..compressed.len() {
        let err = decode_block(&compressed[..cut], len).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }

    // A declared length that ends inside of the last match.
    assert!(decode_block(&compressed, len - 1).is_err());
}

#[test]
fn test_stored_round_trip() {
    let input = b"stored payloads are copied verbatim";
    let mut encoded = Vec::new();
    let ctx = Context::default();
    let written = StoredEncoder::new(input, &mut encoded, ctx).encode().unwrap();
    assert_eq!(written, input.len());
    assert_eq!(encoded, input);

    let mut decoded = Vec::new();
    let mut decoder = StoredDecoder::new(&encoded, &mut decoded);
    decoder.set_expected_len(input.len());
    assert_eq!(decoder.decode().unwrap(), (input.len(), input.len()));
    assert_eq!(decoded, input);

    // The payload must hold exactly the declared length.
    for len in [0, input.len() - 1, input.len() + 1] {
        let mut decoded = Vec::new();
        let mut decoder = StoredDecoder::new(&encoded, &mut decoded);
        decoder.set_expected_len(len);
        let err = decoder.decode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStream);
    }
}
