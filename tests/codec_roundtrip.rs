mod common;

use pforlib::{codec_by_name, CodecToSlice, Delta, PforError};

/// Encodes and decodes `data` with every registered codec, checking exact
/// reconstruction and matching lengths.
fn assert_roundtrip(name: &str, codec: &mut pforlib::Codec, data: &[u32]) {
    let mut compressed = vec![0u32; codec.max_compressed_words(data.len())];
    let compressed_len = codec
        .compress_to_slice(data, &mut compressed)
        .unwrap_or_else(|e| panic!("[{name}] encode failed for len {}: {e}", data.len()))
        .len();

    let mut decoded = vec![0u32; data.len()];
    let decoded_len = codec
        .decompress_to_slice(&compressed[..compressed_len], &mut decoded)
        .unwrap_or_else(|e| panic!("[{name}] decode failed for len {}: {e}", data.len()))
        .len();

    assert_eq!(decoded_len, data.len(), "[{name}] length mismatch");
    assert_eq!(&decoded[..decoded_len], data, "[{name}] data mismatch");
}

#[test]
fn roundtrip_random_data_every_codec() {
    common::init_logging();
    for length in [0usize, 1, 31, 32, 33, 128, 10000] {
        let data = common::random_data(length, 0xC0DEC + length as u64);
        for (name, mut codec) in common::all_codecs() {
            assert_roundtrip(name, &mut codec, &data);
        }
    }
}

#[test]
fn roundtrip_structured_data_every_codec() {
    common::init_logging();
    for n in [256usize, 1000] {
        for case in common::get_test_cases(n) {
            for (name, mut codec) in common::all_codecs() {
                assert_roundtrip(name, &mut codec, &case);
            }
        }
    }
}

#[test]
fn roundtrip_under_delta_transform() {
    for length in [0usize, 1, 2, 3, 4, 5, 1000] {
        let original = common::random_data(length, 42 + length as u64);

        let mut data = original.clone();
        Delta::forward1(&mut data);
        Delta::inverse1(&mut data);
        assert_eq!(data, original, "lane-1 delta, len {length}");

        let mut data = original.clone();
        Delta::forward4(&mut data);
        Delta::inverse4(&mut data);
        assert_eq!(data, original, "lane-4 delta, len {length}");
    }
}

#[test]
fn delta_improves_monotonic_compression() {
    common::init_logging();
    // Strictly increasing sequence, as in a sorted posting list
    let mut acc = 0u32;
    let raw: Vec<u32> = common::random_data(10000, 7)
        .into_iter()
        .map(|v| {
            acc = acc.wrapping_add(v % 50 + 1);
            acc
        })
        .collect();

    let mut deltas = raw.clone();
    Delta::forward1(&mut deltas);

    let mut codec = codec_by_name("fastpfor256").unwrap();
    let mut buf = vec![0u32; codec.max_compressed_words(raw.len())];
    let raw_len = codec.compress_to_slice(&raw, &mut buf).unwrap().len();
    let delta_len = codec.compress_to_slice(&deltas, &mut buf).unwrap().len();

    assert!(
        delta_len <= raw_len,
        "delta encoding must not hurt: {delta_len} > {raw_len}"
    );
}

#[test]
fn zero_capacity_output_is_rejected() {
    let data = [1u32, 2, 3];
    for (name, mut codec) in common::all_codecs() {
        let err = codec
            .compress_to_slice(&data, &mut [])
            .expect_err(&format!("[{name}] accepted a zero-capacity output"));
        assert!(
            matches!(err, PforError::InsufficientOutputCapacity { capacity: 0, .. }),
            "[{name}] wrong error: {err}"
        );
    }
}

#[test]
fn short_decode_buffer_is_rejected() {
    let data: Vec<u32> = (0..512u32).collect();
    for (name, mut codec) in common::all_codecs() {
        let mut compressed = vec![0u32; codec.max_compressed_words(data.len())];
        let compressed_len = codec.compress_to_slice(&data, &mut compressed).unwrap().len();

        let mut decoded = vec![0u32; 64];
        let err = codec
            .decompress_to_slice(&compressed[..compressed_len], &mut decoded)
            .expect_err(&format!("[{name}] accepted a short decode buffer"));
        assert!(
            matches!(err, PforError::InsufficientOutputCapacity { .. }),
            "[{name}] wrong error: {err}"
        );
    }
}

#[test]
fn monotonic_block_compresses_below_input_size() {
    // The concrete scenario: 0..=255 through a scalar PFOR variant
    let data: Vec<u32> = (0..256u32).collect();
    let mut codec = codec_by_name("fastpfor256").unwrap();
    let mut compressed = vec![0u32; codec.max_compressed_words(data.len())];
    let compressed_len = codec.compress_to_slice(&data, &mut compressed).unwrap().len();
    assert!(
        compressed_len < 256,
        "monotonic input did not compress: {compressed_len} words"
    );

    let mut decoded = vec![0u32; 256];
    let decoded = codec
        .decompress_to_slice(&compressed[..compressed_len], &mut decoded)
        .unwrap();
    assert_eq!(decoded, &data[..]);
}

#[test]
fn scalar_and_interleaved_layouts_agree_on_decode() {
    // Different wire formats, identical observable semantics
    let data = common::random_data(4096, 99)
        .into_iter()
        .map(|v| v % 100_000)
        .collect::<Vec<u32>>();
    for (scalar, interleaved) in [
        ("fastpfor128", "simdfastpfor128"),
        ("fastpfor256", "simdfastpfor256"),
        ("bp32", "simdbinarypacking"),
    ] {
        let mut a = codec_by_name(scalar).unwrap();
        let mut b = codec_by_name(interleaved).unwrap();
        assert_roundtrip(scalar, &mut a, &data);
        assert_roundtrip(interleaved, &mut b, &data);
    }
}
