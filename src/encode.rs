//! Frame encoders for the transmit path.
//!
//! Each encoder fills a `Frame` byte-by-byte in wire order and finishes
//! with `make_crc()`:
//! - TC 4:  aircraft identification (callsign)
//! - TC 11: airborne position (CPR + 25-ft altitude)
//! - TC 19: airborne velocity (ground speed, subsonic subtype)
//! - DF 21: Comm-B identity reply (squawk) — encode only, there is no
//!   frame-level decoder for this path (demo feature, canned MB payload)

use crate::cpr;
use crate::frame::Frame;
use crate::types::{
    charset_code, AdsbError, Result, CHAR_SPACE, DF_ADSB, DF_COMM_B_IDENTITY, TC_AIRBORNE_POS,
    TC_AIRBORNE_VELO, TC_IDENT,
};

/// Capability value sent in every DF17 header: level 2+ transponder, airborne.
const CA_AIRBORNE: u8 = 5;

/// Canned BDS 1,0 datalink capability report used as the MB field of the
/// identity reply. Not derived from any avionics state.
const IDENTITY_MB_EXAMPLE: [u8; 7] = [0x10, 0x03, 0x0A, 0x80, 0xE5, 0x00, 0x00];

/// DF17 header: DF|CA byte plus the 24-bit ICAO address.
fn adsb_header(frame: &mut Frame, icao: u32) -> Result<()> {
    frame.clear();
    frame.push_byte((DF_ADSB << 3) | CA_AIRBORNE)?;
    frame.push_byte((icao >> 16) as u8)?;
    frame.push_byte((icao >> 8) as u8)?;
    frame.push_byte(icao as u8)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// TC 4: identification
// ---------------------------------------------------------------------------

/// Encode an identification message (TC 4).
///
/// The callsign is padded or cut to 8 characters; characters outside the
/// 6-bit alphabet are transmitted as spaces.
pub fn encode_identification(frame: &mut Frame, icao: u32, callsign: &str) -> Result<()> {
    adsb_header(frame, icao)?;
    frame.push_byte(TC_IDENT << 3)?; // category A, subtype 0

    // 8 characters, 6 bits each, MSB-first into 48 bits
    let chars = callsign.as_bytes();
    let mut bits: u64 = 0;
    for i in 0..8 {
        let code = chars
            .get(i)
            .map(|&c| charset_code(c))
            .unwrap_or(CHAR_SPACE);
        bits = (bits << 6) | code as u64;
    }
    for shift in (0..48).step_by(8).rev() {
        frame.push_byte((bits >> shift) as u8)?;
    }

    frame.make_crc();
    Ok(())
}

// ---------------------------------------------------------------------------
// TC 11: airborne position
// ---------------------------------------------------------------------------

/// Encode an airborne position message (TC 11) with the given CPR parity.
///
/// A full position needs two calls: one even (`odd = false`) and one odd
/// frame. Altitude is encoded in 25-ft units with the Q-bit set; the T bit
/// is fixed to 0.
pub fn encode_airborne_position(
    frame: &mut Frame,
    icao: u32,
    altitude_ft: i32,
    lat: f64,
    lon: f64,
    odd: bool,
) -> Result<()> {
    adsb_header(frame, icao)?;

    // 12-bit altitude field: 11-bit 25-ft count with the Q-bit spliced in
    // at bit 4
    let n = (((altitude_ft + 1000).max(0) / 25) as u32) & 0x7FF;
    let alt_coded = ((n & 0x7F0) << 1) | 0x10 | (n & 0x0F);

    let (yz, xz) = cpr::encode(lat, lon, odd);

    frame.push_byte(TC_AIRBORNE_POS << 3)?; // SS = 0, NIC supplement = 0
    frame.push_byte((alt_coded >> 4) as u8)?;
    frame.push_byte((((alt_coded & 0x0F) << 4) as u8) | ((odd as u8) << 2) | (yz >> 15) as u8)?;
    frame.push_byte((yz >> 7) as u8)?;
    frame.push_byte(((yz << 1) as u8) | (xz >> 16) as u8)?;
    frame.push_byte((xz >> 8) as u8)?;
    frame.push_byte(xz as u8)?;

    frame.make_crc();
    Ok(())
}

// ---------------------------------------------------------------------------
// TC 19: airborne velocity
// ---------------------------------------------------------------------------

/// Encode an airborne velocity message (TC 19, subtype 1: ground speed,
/// subsonic).
///
/// Speed and bearing are decomposed into East-West/North-South components;
/// each is sent as a sign bit plus |component| + 1 in 10 bits (the +1
/// offset keeps 0 free to mean "unavailable"). Vertical rate is a sign bit
/// plus |rate|/64 + 1 in 9 bits.
pub fn encode_airborne_velocity(
    frame: &mut Frame,
    icao: u32,
    speed_kt: u32,
    bearing_deg: f64,
    vertical_rate_fpm: i32,
) -> Result<()> {
    let bearing = bearing_deg.to_radians();
    let velo_ew = (bearing.sin() * speed_kt as f64).round() as i32;
    let velo_ns = ((std::f64::consts::FRAC_PI_2 - bearing).sin() * speed_kt as f64).round() as i32;

    let ew_abs = (velo_ew.unsigned_abs() + 1).min(0x3FF);
    let ns_abs = (velo_ns.unsigned_abs() + 1).min(0x3FF);
    let vr_abs = (vertical_rate_fpm.unsigned_abs() / 64 + 1).min(0x1FF);

    adsb_header(frame, icao)?;
    frame.push_byte((TC_AIRBORNE_VELO << 3) | 1)?;
    frame.push_byte((((velo_ew < 0) as u8) << 2) | (ew_abs >> 8) as u8)?;
    frame.push_byte(ew_abs as u8)?;
    frame.push_byte((((velo_ns < 0) as u8) << 7) | (ns_abs >> 3) as u8)?;
    frame.push_byte(
        ((ns_abs << 5) as u8)
            | (((vertical_rate_fpm < 0) as u8) << 3)
            | (vr_abs >> 6) as u8,
    )?;
    frame.push_byte((vr_abs << 2) as u8)?;
    frame.push_byte(0)?;

    frame.make_crc();
    Ok(())
}

// ---------------------------------------------------------------------------
// DF 21: Comm-B identity reply
// ---------------------------------------------------------------------------

/// Encode a Comm-B identity reply (DF 21) carrying a 4-digit octal squawk.
///
/// Squawks with a decimal digit of 8 or 9 are not valid octal codes and
/// are rejected rather than mangled by the weight-bit packing. FS, DR and
/// UM are all zero; the MB field is a canned example payload.
pub fn encode_identity_reply(frame: &mut Frame, squawk: u16) -> Result<()> {
    if squawk > 7777
        || (squawk / 1000) % 10 > 7
        || (squawk / 100) % 10 > 7
        || (squawk / 10) % 10 > 7
        || squawk % 10 > 7
    {
        return Err(AdsbError::InvalidSquawk(squawk));
    }
    let id13 = identity_from_squawk(squawk);

    frame.clear();
    frame.push_byte(DF_COMM_B_IDENTITY << 3)?; // FS = 0
    frame.push_byte(0)?; // DR = 0, UM[5:3] = 0
    frame.push_byte((id13 >> 8) as u8)?; // UM[2:0] = 0, identity[12:8]
    frame.push_byte(id13 as u8)?;
    for b in IDENTITY_MB_EXAMPLE {
        frame.push_byte(b)?;
    }

    frame.make_crc();
    Ok(())
}

/// Pack a 4-digit octal squawk into the 13-bit interleaved identity field.
///
/// Bit order (MSB first): C1 A1 C2 A2 C4 A4 0 B1 D1 B2 D2 B4 D4, where
/// each octal digit contributes its weight-1/2/4 bits.
pub fn identity_from_squawk(squawk: u16) -> u16 {
    let a = (squawk / 1000) % 10;
    let b = (squawk / 100) % 10;
    let c = (squawk / 10) % 10;
    let d = squawk % 10;

    ((c & 1) << 12)
        | ((a & 1) << 11)
        | (((c >> 1) & 1) << 10)
        | (((a >> 1) & 1) << 9)
        | (((c >> 2) & 1) << 8)
        | (((a >> 2) & 1) << 7)
        | ((b & 1) << 5)
        | ((d & 1) << 4)
        | (((b >> 1) & 1) << 3)
        | (((d >> 1) & 1) << 2)
        | (((b >> 2) & 1) << 1)
        | ((d >> 2) & 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
