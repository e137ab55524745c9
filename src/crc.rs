//! CRC-24 parity engine for Mode S messages.
//!
//! ICAO standard polynomial: x^24 + x^23 + x^22 + ... + x^10 + x^3 + 1
//! Generator: 0xFFF409 (25-bit polynomial 0x1FFF409 with the implicit
//! leading bit dropped).
//!
//! Encoders append the 24-bit remainder of the 88 payload bits as the frame
//! trailer; a received frame is valid when the remainder over all 112 bits
//! is zero. Pure functions, no state.

const GENERATOR: u32 = 0xFFF409;

// ---------------------------------------------------------------------------
// CRC lookup table (compile-time)
// ---------------------------------------------------------------------------

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 16;
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x800000 != 0 {
                crc = (crc << 1) ^ GENERATOR;
            } else {
                crc <<= 1;
            }
            crc &= 0xFFFFFF;
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = build_crc_table();

// ---------------------------------------------------------------------------
// Core CRC functions
// ---------------------------------------------------------------------------

/// CRC-24 remainder of the given payload bytes.
///
/// For the 11-byte head of an extended squitter this is the value written
/// into the 3-byte parity trailer.
pub fn crc24(payload: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in payload {
        crc = ((crc << 8) ^ CRC_TABLE[((crc >> 16) ^ byte as u32) as usize & 0xFF]) & 0xFFFFFF;
    }
    crc
}

/// Remainder over a full frame: CRC of all bytes except the last 3, XOR'd
/// with the trailer. Zero for an intact frame.
pub fn remainder(frame: &[u8]) -> u32 {
    if frame.len() <= 3 {
        let mut val = 0u32;
        for &b in frame {
            val = (val << 8) | b as u32;
        }
        return val & 0xFFFFFF;
    }
    let payload_len = frame.len() - 3;
    crc24(&frame[..payload_len])
        ^ ((frame[payload_len] as u32) << 16
            | (frame[payload_len + 1] as u32) << 8
            | frame[payload_len + 2] as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
