// Unit tests for the block encoder and the worst-case bound.
//
// Tests verify:
//   - max_compressed_size() covers every stream the encoder emits
//   - compress() round-trips through decompress() for a spread of shapes
//   - the mid-stream literal-run gate (runs of 1–3 are never emitted)
//   - error paths return Err(LzoError::OutputOverrun) without overwriting
//   - match-family coverage: M2 short, M3 plain and extended, M4 offsets

use lzo1z::{compress, decompress, max_compressed_size, LzoError};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compress into a bound-sized buffer and return the compressed bytes.
fn pack(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; max_compressed_size(src.len())];
    let n = compress(src, &mut dst).expect("bound-sized buffer must suffice");
    dst.truncate(n);
    dst
}

/// Decompress expecting exactly `expect`.
fn unpack_and_check(compressed: &[u8], expect: &[u8]) {
    let mut dst = vec![0u8; expect.len() + 100];
    let n = decompress(compressed, &mut dst).expect("decompress");
    assert_eq!(&dst[..n], expect, "round-trip mismatch");
}

/// Multiplicative xor-rotate PRNG for deterministic pseudo-random corpora.
fn next_rand(state: &mut u32, range: u32) -> u32 {
    const PRIME1: u32 = 2_654_435_761;
    const PRIME2: u32 = 2_246_822_519;
    let mut r = *state;
    r = r.wrapping_mul(PRIME1);
    r ^= PRIME2;
    r = r.rotate_left(13);
    *state = r;
    ((r as u64 * range as u64) >> 32) as u32
}

fn random_bytes(seed: u32, len: usize, range: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len).map(|_| next_rand(&mut state, range) as u8).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip table
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_table() {
    let sequential: Vec<u8> = (0u8..=255).collect();
    let alternating: Vec<u8> = (0..500).map(|i| if i % 2 == 0 { 0x00 } else { 0xff }).collect();

    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("empty", vec![]),
        ("single_byte", b"A".to_vec()),
        ("two_bytes", b"AB".to_vec()),
        ("three_bytes", b"ABC".to_vec()),
        ("hello", b"Hello, World!".to_vec()),
        ("repeated_a", vec![b'A'; 40]),
        ("repeated_b", vec![b'B'; 100]),
        ("repeated_abcd", b"ABCD".repeat(100)),
        ("sequential", sequential),
        ("hello_x3", b"Hello, World! Hello, World! Hello, World!".to_vec()),
        ("sentence", b"The quick brown fox jumps over the lazy dog. ".repeat(50)),
        ("zeros", vec![0u8; 1000]),
        ("ones", vec![0xff; 1000]),
        ("alternating", alternating),
        ("large_16kb", b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(300)),
    ];

    for (name, input) in &cases {
        let compressed = pack(input);
        assert!(
            compressed.len() <= max_compressed_size(input.len()),
            "{name}: compressed {} > bound {}",
            compressed.len(),
            max_compressed_size(input.len())
        );
        if input.is_empty() {
            assert!(compressed.is_empty(), "{name}: empty input must emit nothing");
            continue;
        }
        unpack_and_check(&compressed, input);
    }
}

#[test]
fn roundtrip_pseudo_random() {
    for &len in &[5usize, 6, 7, 17, 19, 64, 300, 4096] {
        // Full byte range: essentially incompressible.
        let noisy = random_bytes(0x1234 + len as u32, len, 256);
        unpack_and_check(&pack(&noisy), &noisy);
        // Four-symbol alphabet: dense short matches.
        let matchy: Vec<u8> =
            random_bytes(0x9876 + len as u32, len, 4).iter().map(|b| b + b'A').collect();
        unpack_and_check(&pack(&matchy), &matchy);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Degenerate inputs
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_emits_no_stream() {
    let mut dst = [0u8; 8];
    assert_eq!(compress(&[], &mut dst), Ok(0));
    // ...and decompressing nothing yields nothing.
    assert_eq!(decompress(&[], &mut dst), Ok(0));
}

#[test]
fn two_byte_input_wire_bytes() {
    // "AB": opening short-form literal run (0x13 = 2 + 17) then EOF.
    assert_eq!(pack(b"AB"), vec![0x13, 0x41, 0x42, 0x11, 0x00, 0x00]);
}

#[test]
fn short_inputs_are_literals_plus_eof() {
    for len in 1..=3usize {
        let input = vec![b'Q'; len];
        let compressed = pack(&input);
        assert_eq!(compressed.len(), 1 + len + 3);
        assert_eq!(compressed[0], (len + 17) as u8);
        unpack_and_check(&compressed, &input);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Worst-case bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bound_formula() {
    assert_eq!(max_compressed_size(0), 3);
    assert_eq!(max_compressed_size(16), 16 + 1 + 64 + 3);
    assert_eq!(max_compressed_size(1000), 1000 + 62 + 64 + 3);
}

#[test]
fn bound_minus_one_never_overwrites() {
    // With one byte less than the bound the encoder must either still fit or
    // fail cleanly with OutputOverrun — bytes past the buffer stay untouched
    // by construction (safe slices), so only the result kind is at issue.
    for input in [
        random_bytes(7, 200, 256),
        vec![b'A'; 200],
        b"ABCD".repeat(64),
    ] {
        let mut dst = vec![0u8; max_compressed_size(input.len()) - 1];
        match compress(&input, &mut dst) {
            Ok(n) => {
                let mut out = vec![0u8; input.len() + 10];
                let m = decompress(&dst[..n], &mut out).unwrap();
                assert_eq!(&out[..m], &input[..]);
            }
            Err(e) => assert_eq!(e, LzoError::OutputOverrun),
        }
    }
}

#[test]
fn undersized_output_is_an_error() {
    let mut dst = [0u8; 5];
    assert_eq!(
        compress(b"Hello, World!", &mut dst),
        Err(LzoError::OutputOverrun)
    );
    let mut dst = [0u8; 4];
    assert_eq!(compress(b"AAAA", &mut dst), Err(LzoError::OutputOverrun));
}

// ─────────────────────────────────────────────────────────────────────────────
// The literal-run gate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn gate_refuses_stranding_trailing_bytes() {
    // Each input would leave 1–3 bytes after an obvious match; the encoder
    // must fold them into the literal run instead.
    for tail in [&b"1"[..], &b"12"[..], &b"123"[..]] {
        let mut input = b"AAAABBBB".to_vec();
        input.extend_from_slice(tail);
        unpack_and_check(&pack(&input), &input);
    }
}

#[test]
fn gate_refuses_short_mid_stream_runs() {
    // Matches separated by 1–3 unmatched bytes: the second match must be
    // skipped or deferred, never preceded by a 1–3 byte literal run.
    let input = b"ABCXABCYABCZABC".repeat(20);
    unpack_and_check(&pack(&input), &input);
    // Decode must never hit a mid-stream run prefix below 4: verified
    // indirectly — a violating stream would desynchronise and fail above.
}

// ─────────────────────────────────────────────────────────────────────────────
// Match families
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn long_match_uses_extended_length() {
    // 500 identical bytes: one literal + one extended-length match group.
    let input = vec![b'X'; 500];
    let compressed = pack(&input);
    assert!(compressed.len() < 50, "got {}", compressed.len());
    unpack_and_check(&compressed, &input);
}

#[test]
fn medium_offset_match_is_m3() {
    // A repeat at distance ~8000, inside the M3 window.
    let mut input = vec![0u8; 10_000];
    let pattern = b"ABCD".repeat(25);
    input[..100].copy_from_slice(&pattern);
    for (i, b) in input.iter_mut().enumerate().take(8000).skip(100) {
        *b = (i % 251) as u8;
    }
    input[8000..8100].copy_from_slice(&pattern);
    for i in 8100..10_000 {
        input[i] = (i % 253) as u8;
    }
    unpack_and_check(&pack(&input), &input);
}

#[test]
fn far_offset_match_is_m4() {
    // A repeat at distance > 16384 lands in the M4 band.
    let mut state = 0xbeef;
    let mut input = b"LONGMATCH!".to_vec();
    input.extend(random_bytes(state, 17_000, 256));
    state = next_rand(&mut state, 1 << 30);
    input.extend_from_slice(b"LONGMATCH!");
    input.extend(random_bytes(state, 490, 256));
    let compressed = pack(&input);
    unpack_and_check(&compressed, &input);
}

#[test]
fn incompressible_input_is_one_literal_run() {
    // Sequential bytes have no 3-byte repeats: a single extended literal
    // run (0x00 prefix, base-255 chain) plus the EOF marker.
    let input: Vec<u8> = (0u8..=255).collect();
    let compressed = pack(&input);
    assert_eq!(compressed.len(), 2 + 256 + 3);
    assert_eq!(compressed[0], 0x00);
    assert_eq!(compressed[1], 238); // 256 - 18
    assert_eq!(&compressed[258..], &[0x11, 0x00, 0x00]);
    unpack_and_check(&compressed, &input);
}
