//! `lzo1z` — a pure-Rust implementation of the LZO1Z compression algorithm.
//!
//! LZO1Z is a variant of LZO1X (from the LZO family by Markus F. X. J.
//! Oberhumer) distinguished by a different bit-layout of match offsets, a
//! smaller M2 offset window (0x0700 instead of 0x0800), and a last-match-
//! offset reuse shortcut on the M2 opcode.  It is used by real-time data
//! feeds and embedded systems.
//!
//! # Crate layout
//!
//! | Module  | Contents |
//! |---------|----------|
//! | `block` | One-shot block compression and decompression (the whole codec). |
//!
//! # Wire format
//!
//! A compressed stream is headerless and trailer-only: a sequence of opcodes
//! terminated by the three-byte EOF marker `0x11 0x00 0x00`.  There is no
//! magic number, length prefix, or checksum; length bookkeeping belongs to
//! the caller.  The decoder accepts any stream produced by a conforming
//! LZO1Z encoder, including `lzo1z_999_compress` from liblzo2.
//!
//! # Quick start
//!
//! ```
//! let input = b"Hello, World! Hello, World! Hello, World!";
//!
//! let mut compressed = vec![0u8; lzo1z::max_compressed_size(input.len())];
//! let n = lzo1z::compress(input, &mut compressed).unwrap();
//!
//! let mut recovered = vec![0u8; input.len()];
//! let m = lzo1z::decompress(&compressed[..n], &mut recovered).unwrap();
//! assert_eq!(&recovered[..m], input);
//! ```

pub mod block;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::compress::{compress, max_compressed_size};
pub use block::decompress::decompress;
pub use block::types::{LzoError, M2_MAX_OFFSET, M4_MAX_OFFSET, MAX_OFFSET};
pub use block::{compress_block_to_vec, decompress_block_to_vec};
