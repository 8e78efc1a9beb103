//! LZO1Z block compression and decompression.
//!
//! This module contains the core LZO1Z engine: the greedy one-pass encoder,
//! the seven-state decoder, and the opcode emitters they share.

pub mod compress;
pub mod decompress;
pub mod types;

pub(crate) mod emit;

// Re-export the most important public API items at the module level.
pub use compress::{compress, max_compressed_size};
pub use decompress::decompress;
pub use types::{LzoError, M2_MAX_OFFSET, M4_MAX_OFFSET, MAX_OFFSET};

/// Compress `src` into a freshly-allocated `Vec` sized from
/// [`max_compressed_size`].
///
/// Returns an empty `Vec` if compression fails (which cannot happen with a
/// bound-sized buffer, but the signature stays honest for callers that treat
/// emptiness as failure, e.g. the fuzz harness).
pub fn compress_block_to_vec(src: &[u8]) -> Vec<u8> {
    let mut dst = vec![0u8; max_compressed_size(src.len())];
    match compress(src, &mut dst) {
        Ok(n) => {
            dst.truncate(n);
            dst
        }
        Err(_) => Vec::new(),
    }
}

/// Decompress `src` into a freshly-allocated `Vec` of capacity
/// `max_output_len`.
///
/// Returns an empty `Vec` on any decode error.
pub fn decompress_block_to_vec(src: &[u8], max_output_len: usize) -> Vec<u8> {
    let mut dst = vec![0u8; max_output_len];
    match decompress(src, &mut dst) {
        Ok(n) => {
            dst.truncate(n);
            dst
        }
        Err(_) => Vec::new(),
    }
}
