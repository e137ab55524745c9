//! Shared types, error enum, and decoded report types for adsb-squitter.

use serde::Serialize;
use thiserror::Error;

/// Total frame length of an extended squitter, in bytes (112 bits).
pub const FRAME_LEN: usize = 14;

/// All errors produced by adsb-squitter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdsbError {
    #[error("frame overflow: append beyond {FRAME_LEN} bytes")]
    FrameOverflow,
    #[error("CRC-24 mismatch: frame is corrupt")]
    CrcMismatch,
    #[error("unexpected downlink format: expected {expected}, got {actual}")]
    WrongDownlinkFormat { expected: u8, actual: u8 },
    #[error("unexpected type code: {0}")]
    WrongTypeCode(u8),
    #[error("unsupported velocity subtype: {0}")]
    UnsupportedSubtype(u8),
    #[error("invalid squawk code: {0} (digits must be octal, 0000-7777)")]
    InvalidSquawk(u16),
    #[error("frame pair must be one even and one odd CPR frame")]
    ParityMismatch,
}

pub type Result<T> = std::result::Result<T, AdsbError>;

// ---------------------------------------------------------------------------
// Downlink Format / Type Code constants
// ---------------------------------------------------------------------------

/// DF 17: ADS-B extended squitter.
pub const DF_ADSB: u8 = 17;
/// DF 21: Comm-B identity reply.
pub const DF_COMM_B_IDENTITY: u8 = 21;

/// TC 4: aircraft identification.
pub const TC_IDENT: u8 = 4;
/// TC 11: airborne position, barometric altitude.
pub const TC_AIRBORNE_POS: u8 = 11;
/// TC 19: airborne velocity.
pub const TC_AIRBORNE_VELO: u8 = 19;

// ---------------------------------------------------------------------------
// ICAO address helpers
// ---------------------------------------------------------------------------

/// 3-byte ICAO address. Stored as raw bytes to avoid per-frame String allocation.
pub type Icao = [u8; 3];

/// Format ICAO address as 6-char uppercase hex string.
pub fn icao_to_string(icao: &Icao) -> String {
    format!("{:02X}{:02X}{:02X}", icao[0], icao[1], icao[2])
}

/// Convert ICAO bytes to u32 for numeric comparisons.
pub fn icao_to_u32(icao: &Icao) -> u32 {
    ((icao[0] as u32) << 16) | ((icao[1] as u32) << 8) | (icao[2] as u32)
}

/// Build ICAO from a 24-bit integer.
pub fn icao_from_u32(val: u32) -> Icao {
    [
        ((val >> 16) & 0xFF) as u8,
        ((val >> 8) & 0xFF) as u8,
        (val & 0xFF) as u8,
    ]
}

// ---------------------------------------------------------------------------
// Hex utilities
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes. Case-insensitive, must be even length.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let high = hex_digit(chunk[0])?;
        let low = hex_digit(chunk[1])?;
        bytes.push((high << 4) | low);
    }
    Some(bytes)
}

/// Encode bytes as uppercase hex string.
pub fn hex_encode(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    s
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ADS-B callsign character set
// ---------------------------------------------------------------------------

/// ADS-B character set for callsign encoding (6 bits per character).
/// '#' marks codes with no assigned character.
pub const CALLSIGN_CHARSET: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

/// 6-bit code for the space character.
pub const CHAR_SPACE: u8 = 32;

/// 6-bit code for an ASCII character. Characters outside the alphabet
/// (including '#', which is a placeholder, not a real member) map to space.
pub fn charset_code(c: u8) -> u8 {
    if c == b'#' {
        return CHAR_SPACE;
    }
    CALLSIGN_CHARSET
        .iter()
        .position(|&e| e == c)
        .map(|p| p as u8)
        .unwrap_or(CHAR_SPACE)
}

/// ASCII character for a 6-bit code. Unassigned codes map to space.
pub fn charset_char(code: u8) -> char {
    let c = CALLSIGN_CHARSET[(code & 0x3F) as usize];
    if c == b'#' {
        ' '
    } else {
        c as char
    }
}

// ---------------------------------------------------------------------------
// Decoded report types
// ---------------------------------------------------------------------------

/// TC 1-4: aircraft identification (callsign).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    pub icao: Icao,
    /// Always exactly 8 characters; trailing spaces are not trimmed.
    pub callsign: String,
    pub category: u8,
    pub timestamp: f64,
}

/// Resolved position from a matched even/odd CPR frame pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFix {
    pub icao: Icao,
    pub latitude: f64,
    pub longitude: f64,
    /// Present only when the newer frame's Q-bit marks 25-ft encoding.
    pub altitude_ft: Option<i32>,
    pub timestamp: f64,
}

/// Raw per-frame view of a TC 9-18 airborne position message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCodes {
    pub icao: Icao,
    /// CPR frame parity: false = even, true = odd.
    pub cpr_odd: bool,
    /// 17-bit quantized latitude code.
    pub cpr_lat: u32,
    /// 17-bit quantized longitude code.
    pub cpr_lon: u32,
    pub altitude_ft: Option<i32>,
    pub timestamp: f64,
}

/// TC 19: airborne velocity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Velocity {
    pub icao: Icao,
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
    pub vertical_rate_fpm: Option<i32>,
    pub speed_type: SpeedType,
    pub timestamp: f64,
}

/// Speed type for velocity messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedType {
    Ground,
    IAS,
    TAS,
}

impl std::fmt::Display for SpeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedType::Ground => write!(f, "ground"),
            SpeedType::IAS => write!(f, "IAS"),
            SpeedType::TAS => write!(f, "TAS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
