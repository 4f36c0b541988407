#![no_main]
use libfuzzer_sys::fuzz_target;
use wirecore::{
    DecodeStrategy,
    varint::{self, Decoded, MAX_VARINT_LEN},
};

/// Decodes a varint at every offset of `data` with every strategy and checks
/// them against the byte-at-a-time decoder.
fn cross_check(data: &[u8]) {
    for start in 0..data.len() {
        let rest = &data[start..];
        let expected = varint::decode_guarded(rest);
        for strategy in DecodeStrategy::ALL {
            assert_eq!(strategy.decode(rest), expected, "{strategy:?} at {start}");
        }

        if let Ok(Decoded { value, len }) = expected {
            assert!((1..=MAX_VARINT_LEN).contains(&len));
            // Only canonical encodings round-trip byte for byte.
            if len == varint::encoded_len(value) && (len < MAX_VARINT_LEN || rest[9] == 1) {
                let mut window = [0u8; MAX_VARINT_LEN];
                let written = varint::encode(value, &mut window);
                assert_eq!(&window[..written], &rest[..len]);
            }
        }
    }
}

fuzz_target!(|data: &[u8]| cross_check(data));
