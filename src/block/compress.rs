//! LZO1Z block compression — the one-shot greedy encoder.
//!
//! The encoder makes a single pass over the input, driven by a fixed-size
//! hash table of candidate positions.  At each position it either extends
//! the pending literal run by one byte or emits the run followed by a match
//! opcode.  It finishes with the tail literal run and the three-byte EOF
//! marker.
//!
//! Two constraints force the encoder to *refuse* otherwise-valid matches so
//! the produced stream stays decodable (see [`decompress`]'s state machine):
//! a non-initial literal run must be empty or at least 4 bytes, both
//! mid-stream and at end-of-input.  The tag range that would encode a 1–3
//! byte mid-stream run belongs to the M1 opcodes.
//!
//! The match search favours speed over ratio: one candidate per position,
//! greedy extension, no lazy matching.  Ratio parity with
//! `lzo1z_999_compress` is explicitly not a goal; decodability by any
//! conforming decoder is.
//!
//! [`decompress`]: super::decompress::decompress

use super::emit::{emit_literals, emit_match};
use super::types::{
    hash4, read_le32, LzoError, EOF_MARKER, HASH_SIZE, MAX_MATCH_LEN, MAX_OFFSET, MIN_MATCH,
};

/// Worst-case compressed size for `input_len` bytes of input.
///
/// `compress` never writes more than this many bytes; size the destination
/// buffer from it.  A zero-length input compresses to zero bytes, but the
/// bound stays large enough for the EOF marker so callers may reuse the
/// buffer for framed variants.
#[inline]
pub fn max_compressed_size(input_len: usize) -> usize {
    if input_len == 0 {
        EOF_MARKER.len()
    } else {
        input_len + input_len / 16 + 64 + EOF_MARKER.len()
    }
}

/// Compress `src` into `dst` and return the number of bytes written.
///
/// The output is a headerless LZO1Z stream terminated by the EOF marker,
/// decodable by any conforming LZO1Z decoder.  An empty `src` produces zero
/// output bytes and no EOF marker.
///
/// Returns `Err(LzoError::OutputOverrun)` when `dst` is too small; a buffer
/// of [`max_compressed_size`]`(src.len())` bytes always suffices.
pub fn compress(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    if src.is_empty() {
        return Ok(0);
    }
    // The main loop needs a 4-byte hash window; shorter inputs are a single
    // literal run.
    if src.len() <= MIN_MATCH {
        return compress_literals_only(src, dst);
    }

    let in_len = src.len();
    let out_len = dst.len();

    // Candidate positions per 4-byte-window hash.  Seeded to -MAX_OFFSET so
    // an unwritten slot can never pass the offset-window test against any
    // real position.
    let mut hash_table = [-(MAX_OFFSET as i64); HASH_SIZE];

    let mut ip = 0usize; // input cursor
    let mut op = 0usize; // output cursor
    let mut lit_start = 0usize; // start of the pending literal run
    let mut is_first_output = true; // selects the opening literal-run encoding

    while ip < in_len - MIN_MATCH {
        let h = hash4(read_le32(src, ip));
        let candidate = hash_table[h];
        hash_table[h] = ip as i64;

        if candidate >= 0 {
            let pos = candidate as usize;
            let offset = ip - pos;
            if offset <= MAX_OFFSET
                && src[pos] == src[ip]
                && src[pos + 1] == src[ip + 1]
                && src[pos + 2] == src[ip + 2]
            {
                let max_len = (in_len - ip).min(MAX_MATCH_LEN);
                let mut m_len = MIN_MATCH;
                while m_len < max_len && src[pos + m_len] == src[ip + m_len] {
                    m_len += 1;
                }

                // A 1–3 byte mid-stream literal run has no encoding; fold
                // this byte into the run instead of taking the match.
                let lit_len = ip - lit_start;
                if !is_first_output && lit_len > 0 && lit_len < 4 {
                    ip += 1;
                    continue;
                }
                // Same constraint at end-of-input: never strand 1–3 bytes
                // after the final match.
                let remaining = in_len - (ip + m_len);
                if remaining > 0 && remaining < 4 {
                    ip += 1;
                    continue;
                }

                if lit_len > 0 {
                    op += emit_literals(&src[lit_start..ip], &mut dst[op..], is_first_output)?;
                }
                op += emit_match(&mut dst[op..], offset, m_len)?;
                is_first_output = false;

                ip += m_len;
                lit_start = ip;

                // Refresh hash entries for the positions the match skipped,
                // so their 4-byte windows stay findable.
                for q in (ip - m_len + 1)..ip.min(in_len - 4) {
                    hash_table[hash4(read_le32(src, q))] = q as i64;
                }
                continue;
            }
        }

        ip += 1;
    }

    // Tail literal run.
    let lit_len = in_len - lit_start;
    if lit_len > 0 {
        op += emit_literals(&src[lit_start..], &mut dst[op..], is_first_output)?;
    }

    if op + EOF_MARKER.len() > out_len {
        return Err(LzoError::OutputOverrun);
    }
    dst[op..op + EOF_MARKER.len()].copy_from_slice(&EOF_MARKER);
    op += EOF_MARKER.len();

    Ok(op)
}

/// Short-input path: a single literal run plus the EOF marker.
fn compress_literals_only(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    let mut op = emit_literals(src, dst, true)?;
    if op + EOF_MARKER.len() > dst.len() {
        return Err(LzoError::OutputOverrun);
    }
    dst[op..op + EOF_MARKER.len()].copy_from_slice(&EOF_MARKER);
    op += EOF_MARKER.len();
    Ok(op)
}
