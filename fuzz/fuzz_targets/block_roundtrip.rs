#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Compress with the Vec-returning convenience helper (handles bound calculation).
    let compressed = lzo1z::compress_block_to_vec(data);

    // An empty compressed Vec for non-empty input would mean the bound-sized
    // buffer overflowed — that must never happen.
    if !data.is_empty() {
        assert!(
            !compressed.is_empty(),
            "compression failed for {} input bytes",
            data.len()
        );
    }

    // Decompress back, supplying the exact original length as the capacity.
    let recovered = lzo1z::decompress_block_to_vec(&compressed, data.len());

    assert_eq!(
        recovered, data,
        "block round-trip mismatch: {} bytes compressed to {} came back as {}",
        data.len(),
        compressed.len(),
        recovered.len()
    );
});
