//! Fixed 14-byte extended squitter frame buffer.
//!
//! Layout (112 bits):
//! - byte 0:      DF (5 bits) << 3 | CA (3 bits)
//! - bytes 1-3:   24-bit ICAO address
//! - bytes 4-10:  56-bit ME field; TC in the top 5 bits of byte 4
//! - bytes 11-13: CRC-24 parity
//!
//! Encoders build a frame byte-by-byte through `push_byte` and finish with
//! `make_crc`. Decoders populate one wholesale from demodulated bytes
//! (`from_bytes` / `from_hex`) and must pass `check_crc` before any field
//! is trusted. The capture timestamp is the only field mutable after
//! construction; the position pair decoder uses it to pick the newer frame.

use crate::crc;
use crate::types::{AdsbError, Icao, Result, FRAME_LEN};

/// One 112-bit Mode S extended squitter frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: [u8; FRAME_LEN],
    cursor: usize,
    timestamp: f64,
}

impl Frame {
    /// Empty frame with the write cursor at byte 0.
    pub fn new() -> Self {
        Frame {
            data: [0; FRAME_LEN],
            cursor: 0,
            timestamp: 0.0,
        }
    }

    /// Frame populated wholesale from demodulated bytes.
    pub fn from_bytes(data: [u8; FRAME_LEN], timestamp: f64) -> Self {
        Frame {
            data,
            cursor: FRAME_LEN,
            timestamp,
        }
    }

    /// Parse a 28-char hex string into a frame. `None` on bad length or
    /// non-hex characters.
    pub fn from_hex(hex: &str, timestamp: f64) -> Option<Self> {
        let bytes = crate::types::hex_decode(hex)?;
        let data: [u8; FRAME_LEN] = bytes.try_into().ok()?;
        Some(Frame::from_bytes(data, timestamp))
    }

    /// Reset storage and cursor. The timestamp is cleared too.
    pub fn clear(&mut self) {
        self.data = [0; FRAME_LEN];
        self.cursor = 0;
        self.timestamp = 0.0;
    }

    /// Append one byte at the cursor.
    ///
    /// Unlike the silent drop some receivers do, appending to a full frame
    /// is a caller error and returns `FrameOverflow`.
    pub fn push_byte(&mut self, b: u8) -> Result<()> {
        if self.cursor >= FRAME_LEN {
            return Err(AdsbError::FrameOverflow);
        }
        self.data[self.cursor] = b;
        self.cursor += 1;
        Ok(())
    }

    /// Compute the CRC-24 over bytes 0-10 and write it into bytes 11-13.
    /// Final step of every encoder.
    pub fn make_crc(&mut self) {
        let parity = crc::crc24(&self.data[..11]);
        self.data[11] = (parity >> 16) as u8;
        self.data[12] = (parity >> 8) as u8;
        self.data[13] = parity as u8;
        self.cursor = FRAME_LEN;
    }

    /// Recompute the CRC-24 and compare against the trailer.
    pub fn check_crc(&self) -> bool {
        crc::remainder(&self.data) == 0
    }

    // -- field accessors ----------------------------------------------------

    /// Downlink Format, first 5 bits.
    pub fn df(&self) -> u8 {
        (self.data[0] >> 3) & 0x1F
    }

    /// Capability field, low 3 bits of byte 0.
    pub fn ca(&self) -> u8 {
        self.data[0] & 0x07
    }

    /// 24-bit ICAO address from bytes 1-3.
    pub fn icao(&self) -> Icao {
        [self.data[1], self.data[2], self.data[3]]
    }

    /// ADS-B Type Code, top 5 bits of the ME field. `None` for non-DF17.
    pub fn type_code(&self) -> Option<u8> {
        if self.df() != crate::types::DF_ADSB {
            return None;
        }
        Some((self.data[4] >> 3) & 0x1F)
    }

    /// 56-bit ME field (bytes 4-10).
    pub fn me(&self) -> &[u8] {
        &self.data[4..11]
    }

    /// ME field as a u64 in the low 56 bits, for bit extraction.
    pub fn me_bits(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf[1..8].copy_from_slice(self.me());
        u64::from_be_bytes(buf)
    }

    /// Raw frame bytes.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.data
    }

    /// Capture timestamp, seconds. Set by the receive path.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: f64) {
        self.timestamp = timestamp;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
