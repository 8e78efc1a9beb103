//! LZO1Z block decompression — the seven-state opcode parser.
//!
//! # Security boundary
//!
//! This module is the security-critical decompression path.  It consumes
//! untrusted bytes, so every read from `src`, every write to `dst`, and
//! every lookbehind distance is checked before use.  Malformed or truncated
//! input must return an error — it must never panic, read or write out of
//! bounds, or loop forever.  The fuzz target
//! `fuzz_targets/decompress_block_arbitrary.rs` hammers exactly this
//! contract.
//!
//! # State machine
//!
//! The decoder is a straight transcription of the LZO1Z opcode grammar into
//! a tagged state, one state per parsing context:
//!
//! | State             | Meaning |
//! |-------------------|---------|
//! | `Start`           | Very first byte; an opening literal run may use the `t > 17` short form. |
//! | `LiteralRun`      | Expect a literal-run length byte (or an opcode, which is put back). |
//! | `FirstLiteralRun` | Just after the opening literals; tags < 16 are M1 matches here. |
//! | `Match`           | Expect a match opcode (M1/M2/M3/M4 by tag range). |
//! | `MatchDone`       | Copy the trailing literals packed into the last offset byte. |
//! | `MatchNext`       | A short literal gap was inlined; the next byte is a match opcode. |
//! | `Eof`             | The M4-with-raw-offset-zero marker was consumed. |
//!
//! Keeping the states explicit (rather than a nest of loops) makes the
//! overrun and lookbehind invariants checkable at every transition: at each
//! opcode boundary `ip <= src.len()`, `op <= dst.len()`, and every byte of
//! `dst[..op]` is final.

use super::types::{lookbehind_copy, LzoError, M2_MAX_OFFSET, M4_MAX_OFFSET};

/// Decoder parsing context.  See the module docs for the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    LiteralRun,
    FirstLiteralRun,
    Match,
    MatchDone,
    MatchNext,
    Eof,
}

/// Decompress the LZO1Z stream in `src` into `dst` and return the number of
/// bytes written.
///
/// `src` must contain a complete stream up to and including the EOF marker;
/// the decoder stops there and ignores nothing before it.  An empty `src`
/// returns `Ok(0)` without looking for a marker.
///
/// Accepts any conforming encoder's output, including `lzo1z_999_compress`
/// streams with their M1 opcodes, M2 offset reuse, and inline trailing
/// literals — none of which [`compress`] itself produces.
///
/// # Errors
///
/// - [`LzoError::InputOverrun`] — `src` ended inside an opcode, extension
///   chain, offset, or literal payload.
/// - [`LzoError::OutputOverrun`] — `dst` is too small for the decoded data.
/// - [`LzoError::LookbehindOverrun`] — a match referenced data before the
///   start of the output, or M2 offset reuse appeared before any
///   offset-carrying match.
///
/// [`compress`]: super::compress::compress
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    if src.is_empty() {
        return Ok(0);
    }

    let in_len = src.len();

    let mut ip = 0usize; // input cursor
    let mut op = 0usize; // output cursor
    let mut last_m_off = 0usize; // most recent match offset, for M2 reuse
    let mut state = State::Start;

    loop {
        match state {
            // ── Opening byte ─────────────────────────────────────────────────
            State::Start => {
                if ip >= in_len {
                    return Err(LzoError::InputOverrun);
                }
                let t = src[ip] as usize;
                if t > 17 {
                    // Short-form opening literal run of t - 17 bytes.
                    ip += 1;
                    let run = t - 17;
                    copy_literals(src, dst, &mut ip, &mut op, run)?;
                    // A run under 4 bytes must be followed directly by a
                    // match opcode; longer runs re-enter the literal grammar.
                    state = if run < 4 {
                        State::MatchNext
                    } else {
                        State::FirstLiteralRun
                    };
                } else {
                    // The byte is a literal-run length; leave it for
                    // LiteralRun to consume.
                    state = State::LiteralRun;
                }
            }

            // ── Literal run between matches ──────────────────────────────────
            State::LiteralRun => {
                if ip >= in_len {
                    return Err(LzoError::InputOverrun);
                }
                let mut t = src[ip] as usize;
                ip += 1;
                if t >= 0x10 {
                    // Not a run length after all: put the opcode back.
                    ip -= 1;
                    state = State::Match;
                    continue;
                }
                if t == 0 {
                    t = read_extended_length(src, &mut ip, 15)?;
                }
                copy_literals(src, dst, &mut ip, &mut op, t + 3)?;
                state = State::FirstLiteralRun;
            }

            // ── Byte after the opening literals ──────────────────────────────
            State::FirstLiteralRun => {
                if ip >= in_len {
                    return Err(LzoError::InputOverrun);
                }
                let t = src[ip] as usize;
                ip += 1;
                if t >= 0x10 {
                    ip -= 1;
                    state = State::Match;
                    continue;
                }
                // M1 after the opening literal run: a 3-byte copy from the
                // band just past the M2 window.
                if ip >= in_len {
                    return Err(LzoError::InputOverrun);
                }
                let m_off = (1 + M2_MAX_OFFSET) + (t << 6) + (src[ip] >> 2) as usize;
                ip += 1;
                last_m_off = m_off;
                copy_match(dst, &mut op, m_off, 3)?;
                state = State::MatchDone;
            }

            // ── Match opcode dispatch ────────────────────────────────────────
            State::Match => {
                if ip >= in_len {
                    return Err(LzoError::InputOverrun);
                }
                let t = src[ip] as usize;
                ip += 1;

                if t >= 0x40 {
                    // M2: length 3–8 in bits 5..7, offset in the tag's low 5
                    // bits plus one extra byte — or the previous offset when
                    // the low bits reach the reuse range.
                    let off_bits = t & 0x1f;
                    let m_off = if off_bits >= 0x1c {
                        if last_m_off == 0 {
                            // Reuse before any offset-carrying match.
                            return Err(LzoError::LookbehindOverrun);
                        }
                        last_m_off
                    } else {
                        if ip >= in_len {
                            return Err(LzoError::InputOverrun);
                        }
                        let m = 1 + (off_bits << 6) + (src[ip] >> 2) as usize;
                        ip += 1;
                        last_m_off = m;
                        m
                    };
                    let m_len = (t >> 5) + 1;
                    copy_match(dst, &mut op, m_off, m_len)?;
                } else if t >= 0x20 {
                    // M3: 5-bit length (0 = extended), 2-byte offset.
                    let mut m_len = t & 0x1f;
                    if m_len == 0 {
                        m_len = read_extended_length(src, &mut ip, 31)?;
                    }
                    if ip + 2 > in_len {
                        return Err(LzoError::InputOverrun);
                    }
                    let m_off = 1 + ((src[ip] as usize) << 6) + (src[ip + 1] >> 2) as usize;
                    ip += 2;
                    last_m_off = m_off;
                    copy_match(dst, &mut op, m_off, m_len + 2)?;
                } else if t >= 0x10 {
                    // M4: 3-bit length (0 = extended), 2-byte offset biased by
                    // M4_MAX_OFFSET, 15th offset bit in the tag.  A raw
                    // offset of zero is the EOF marker.
                    let mut m_len = t & 0x07;
                    if m_len == 0 {
                        m_len = read_extended_length(src, &mut ip, 7)?;
                    }
                    if ip + 2 > in_len {
                        return Err(LzoError::InputOverrun);
                    }
                    let raw =
                        ((t & 0x08) << 11) + ((src[ip] as usize) << 6) + (src[ip + 1] >> 2) as usize;
                    ip += 2;
                    if raw == 0 {
                        state = State::Eof;
                        continue;
                    }
                    let m_off = raw + M4_MAX_OFFSET;
                    last_m_off = m_off;
                    copy_match(dst, &mut op, m_off, m_len + 2)?;
                } else {
                    // M1 between matches: a 2-byte copy at short range.
                    if ip >= in_len {
                        return Err(LzoError::InputOverrun);
                    }
                    let m_off = 1 + (t << 6) + (src[ip] >> 2) as usize;
                    ip += 1;
                    last_m_off = m_off;
                    copy_match(dst, &mut op, m_off, 2)?;
                }
                state = State::MatchDone;
            }

            // ── Trailing literals packed into the last offset byte ───────────
            State::MatchDone => {
                // Uniform rule: inspect the low two bits of the last byte
                // consumed, whatever it was.  After a reuse-M2 that byte is
                // the tag itself, whose low bits are offset bits — so
                // reuse-M2s cannot carry trailing literals.  The reference
                // decoder behaves identically; do not special-case reuse.
                let t = (src[ip - 1] & 3) as usize;
                if t == 0 {
                    state = State::LiteralRun;
                } else {
                    copy_literals(src, dst, &mut ip, &mut op, t)?;
                    state = State::MatchNext;
                }
            }

            // ── Forced match after an inline literal gap ─────────────────────
            State::MatchNext => {
                // The short gap lived inside the previous opcode; a fresh
                // literal-run prefix is not allowed here.
                state = State::Match;
            }

            State::Eof => break,
        }
    }

    Ok(op)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a base-255 extended length: `0x00` bytes add 255 each, then one
/// non-zero byte adds `base + byte`.
///
/// Used by the literal-run (base 15), M3 (base 31), and M4 (base 7)
/// families.  The accumulated value is bounded by `255 * src.len()`, so a
/// `usize` cannot overflow on any real input.
#[inline]
fn read_extended_length(src: &[u8], ip: &mut usize, base: usize) -> Result<usize, LzoError> {
    let mut len = 0usize;
    while *ip < src.len() && src[*ip] == 0 {
        len += 255;
        *ip += 1;
    }
    if *ip >= src.len() {
        return Err(LzoError::InputOverrun);
    }
    len += base + src[*ip] as usize;
    *ip += 1;
    Ok(len)
}

/// Copy `len` literal bytes from `src` to `dst`, advancing both cursors.
#[inline(always)]
fn copy_literals(
    src: &[u8],
    dst: &mut [u8],
    ip: &mut usize,
    op: &mut usize,
    len: usize,
) -> Result<(), LzoError> {
    if *op + len > dst.len() {
        return Err(LzoError::OutputOverrun);
    }
    if *ip + len > src.len() {
        return Err(LzoError::InputOverrun);
    }
    dst[*op..*op + len].copy_from_slice(&src[*ip..*ip + len]);
    *op += len;
    *ip += len;
    Ok(())
}

/// Validate a lookbehind reference and copy `m_len` bytes forward from
/// `op - m_off`.
#[inline(always)]
fn copy_match(dst: &mut [u8], op: &mut usize, m_off: usize, m_len: usize) -> Result<(), LzoError> {
    if m_off > *op {
        return Err(LzoError::LookbehindOverrun);
    }
    if *op + m_len > dst.len() {
        return Err(LzoError::OutputOverrun);
    }
    lookbehind_copy(dst, *op, m_off, m_len);
    *op += m_len;
    Ok(())
}
