//! Frame decoders for the receive path.
//!
//! - TC 1-4:  aircraft identification (callsign)
//! - TC 9-18: airborne position — per-frame CPR codes, plus even/odd pair
//!   resolution into an absolute position
//! - TC 19:   airborne velocity (ground speed and airspeed subtypes)
//!
//! Every decoder verifies the CRC before reading any field and returns
//! `CrcMismatch` on a corrupt frame. There is deliberately no decoder for
//! the DF21 identity reply (the encode-only demo path); only the 13-bit
//! identity unpacking helper lives here so the interleaving is testable.

use crate::cpr;
use crate::frame::Frame;
use crate::types::{
    charset_char, AdsbError, Icao, Identification, PositionCodes, PositionFix, Result, SpeedType,
    Velocity, DF_ADSB, TC_AIRBORNE_VELO,
};

fn ensure_crc(frame: &Frame) -> Result<()> {
    if frame.check_crc() {
        Ok(())
    } else {
        Err(AdsbError::CrcMismatch)
    }
}

/// Type code of a CRC-valid DF17 frame.
fn require_adsb(frame: &Frame) -> Result<u8> {
    frame.type_code().ok_or(AdsbError::WrongDownlinkFormat {
        expected: DF_ADSB,
        actual: frame.df(),
    })
}

// ---------------------------------------------------------------------------
// TC 1-4: identification
// ---------------------------------------------------------------------------

/// Decode an identification message (TC 1-4).
///
/// Always yields exactly 8 characters; trailing spaces are kept and
/// unassigned 6-bit codes come out as spaces.
pub fn decode_identification(frame: &Frame) -> Result<Identification> {
    ensure_crc(frame)?;
    let tc = require_adsb(frame)?;
    if !(1..=4).contains(&tc) {
        return Err(AdsbError::WrongTypeCode(tc));
    }

    let category = frame.me()[0] & 0x07;
    let bits = frame.me_bits();
    let mut callsign = String::with_capacity(8);
    for i in 0..8 {
        let code = ((bits >> (42 - i * 6)) & 0x3F) as u8;
        callsign.push(charset_char(code));
    }

    Ok(Identification {
        icao: frame.icao(),
        callsign,
        category,
        timestamp: frame.timestamp(),
    })
}

// ---------------------------------------------------------------------------
// TC 9-18: airborne position
// ---------------------------------------------------------------------------

/// Decode the 12-bit altitude field of an airborne position message.
///
/// Only the Q-bit (25-ft) encoding is handled; `None` for the 100-ft
/// Gillham gray coding and for the all-zero "unavailable" field.
pub fn decode_altitude(alt_code: u32) -> Option<i32> {
    if alt_code == 0 || (alt_code >> 4) & 1 == 0 {
        return None;
    }
    // Splice out the Q-bit to recover the 11-bit 25-ft count
    let n = ((alt_code >> 5) << 4) | (alt_code & 0x0F);
    Some(n as i32 * 25 - 1000)
}

/// Per-frame view of an airborne position message (TC 9-18): raw 17-bit
/// CPR codes, parity flag, and altitude.
pub fn decode_position(frame: &Frame) -> Result<PositionCodes> {
    ensure_crc(frame)?;
    let tc = require_adsb(frame)?;
    if !(9..=18).contains(&tc) {
        return Err(AdsbError::WrongTypeCode(tc));
    }

    let bits = frame.me_bits();
    Ok(PositionCodes {
        icao: frame.icao(),
        cpr_odd: (bits >> 34) & 1 == 1,
        cpr_lat: ((bits >> 17) & 0x1FFFF) as u32,
        cpr_lon: (bits & 0x1FFFF) as u32,
        altitude_ft: decode_altitude(((bits >> 36) & 0x0FFF) as u32),
        timestamp: frame.timestamp(),
    })
}

/// Resolve an absolute position from a matched even/odd frame pair of the
/// same aircraft.
///
/// `Ok(None)` is the normal "wait for the next pair" outcome (latitude zone
/// straddle or stale pair). Altitude comes from the newer frame and is
/// absent when that frame does not use the 25-ft Q-bit encoding. Callers
/// are responsible for pairing frames from a single aircraft.
pub fn decode_position_pair(even: &Frame, odd: &Frame) -> Result<Option<PositionFix>> {
    let e = decode_position(even)?;
    let o = decode_position(odd)?;
    if e.cpr_odd || !o.cpr_odd {
        return Err(AdsbError::ParityMismatch);
    }

    let Some((latitude, longitude)) = cpr::global_decode(
        e.cpr_lat,
        e.cpr_lon,
        o.cpr_lat,
        o.cpr_lon,
        e.timestamp,
        o.timestamp,
    ) else {
        return Ok(None);
    };

    let newer = if e.timestamp >= o.timestamp { &e } else { &o };
    Ok(Some(PositionFix {
        icao: newer.icao,
        latitude,
        longitude,
        altitude_ft: newer.altitude_ft,
        timestamp: newer.timestamp,
    }))
}

// ---------------------------------------------------------------------------
// TC 19: airborne velocity
// ---------------------------------------------------------------------------

/// Decode an airborne velocity message (TC 19), dispatching on subtype.
pub fn decode_velocity(frame: &Frame) -> Result<Velocity> {
    ensure_crc(frame)?;
    let tc = require_adsb(frame)?;
    if tc != TC_AIRBORNE_VELO {
        return Err(AdsbError::WrongTypeCode(tc));
    }

    let bits = frame.me_bits();
    let subtype = ((bits >> 48) & 0x07) as u8;
    match subtype {
        1 | 2 => Ok(decode_ground_velocity(frame.icao(), bits, subtype, frame.timestamp())),
        3 | 4 => Ok(decode_airspeed(frame.icao(), bits, subtype, frame.timestamp())),
        st => Err(AdsbError::UnsupportedSubtype(st)),
    }
}

/// Vertical rate field, identical position for all subtypes 1-4:
/// sign bit plus (count - 1) * 64 ft/min; count 0 means unavailable.
fn decode_vertical_rate(bits: u64) -> Option<i32> {
    let sign = (bits >> 19) & 1;
    let val = ((bits >> 10) & 0x1FF) as i32 - 1;
    if val < 0 {
        return None;
    }
    let rate = val * 64;
    Some(if sign == 1 { -rate } else { rate })
}

fn decode_ground_velocity(icao: Icao, bits: u64, subtype: u8, timestamp: f64) -> Velocity {
    // Supersonic subtype carries 4-kt units
    let mult = if subtype == 2 { 4 } else { 1 };

    let ew_dir = (bits >> 42) & 1; // 0 = East, 1 = West
    let ew_vel = ((bits >> 32) & 0x3FF) as i32 - 1;
    let ns_dir = (bits >> 31) & 1; // 0 = North, 1 = South
    let ns_vel = ((bits >> 21) & 0x3FF) as i32 - 1;

    let (speed, heading) = if ew_vel >= 0 && ns_vel >= 0 {
        let vx = (if ew_dir == 1 { -ew_vel } else { ew_vel } * mult) as f64;
        let vy = (if ns_dir == 1 { -ns_vel } else { ns_vel } * mult) as f64;
        // Integer-knot magnitude, matching the component quantization
        let spd = (vx * vx + vy * vy).sqrt().round();
        let hdg = vx.atan2(vy).to_degrees().rem_euclid(360.0);
        (Some(spd), Some(hdg))
    } else {
        (None, None)
    };

    Velocity {
        icao,
        speed_kts: speed,
        heading_deg: heading,
        vertical_rate_fpm: decode_vertical_rate(bits),
        speed_type: SpeedType::Ground,
        timestamp,
    }
}

fn decode_airspeed(icao: Icao, bits: u64, subtype: u8, timestamp: f64) -> Velocity {
    let mult = if subtype == 4 { 4 } else { 1 };

    let hdg_available = (bits >> 42) & 1;
    let hdg_raw = ((bits >> 32) & 0x3FF) as u32;
    let airspeed_type = (bits >> 31) & 1; // 0 = IAS, 1 = TAS
    let speed_raw = ((bits >> 21) & 0x3FF) as i32;

    let heading = if hdg_available == 1 {
        Some(hdg_raw as f64 * 360.0 / 1024.0)
    } else {
        None
    };
    let speed = if speed_raw > 0 {
        Some(((speed_raw - 1) * mult) as f64)
    } else {
        None
    };

    Velocity {
        icao,
        speed_kts: speed,
        heading_deg: heading,
        vertical_rate_fpm: decode_vertical_rate(bits),
        speed_type: if airspeed_type == 1 {
            SpeedType::TAS
        } else {
            SpeedType::IAS
        },
        timestamp,
    }
}

// ---------------------------------------------------------------------------
// 13-bit identity field
// ---------------------------------------------------------------------------

/// Unpack the 13-bit interleaved identity field into a 4-digit octal
/// squawk. Inverse of `encode::identity_from_squawk`.
pub fn squawk_from_identity(id_code: u16) -> u16 {
    let c1 = (id_code >> 12) & 1;
    let a1 = (id_code >> 11) & 1;
    let c2 = (id_code >> 10) & 1;
    let a2 = (id_code >> 9) & 1;
    let c4 = (id_code >> 8) & 1;
    let a4 = (id_code >> 7) & 1;
    // bit 6 is spare
    let b1 = (id_code >> 5) & 1;
    let d1 = (id_code >> 4) & 1;
    let b2 = (id_code >> 3) & 1;
    let d2 = (id_code >> 2) & 1;
    let b4 = (id_code >> 1) & 1;
    let d4 = id_code & 1;

    let a = a4 * 4 + a2 * 2 + a1;
    let b = b4 * 4 + b2 * 2 + b1;
    let c = c4 * 4 + c2 * 2 + c1;
    let d = d4 * 4 + d2 * 2 + d1;

    a * 1000 + b * 100 + c * 10 + d
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{
        encode_airborne_position, encode_airborne_velocity, encode_identification,
        encode_identity_reply, identity_from_squawk,
    };
    use crate::types::icao_to_string;

    fn parse(hex: &str, timestamp: f64) -> Frame {
        Frame::from_hex(hex, timestamp).expect("valid frame")
    }

    // -- identification --

    #[test]
    fn test_decode_identification_klm() {
        let frame = parse("8D4840D6202CC371C32CE0576098", 1.0);
        let msg = decode_identification(&frame).unwrap();
        assert_eq!(msg.callsign, "KLM1023 ");
        assert_eq!(icao_to_string(&msg.icao), "4840D6");
    }

    #[test]
    fn test_decode_identification_ezy() {
        let frame = parse("8D406B902015A678D4D220AA4BDA", 1.0);
        let msg = decode_identification(&frame).unwrap();
        assert_eq!(msg.callsign, "EZY85MH ");
    }

    #[test]
    fn test_identification_roundtrip() {
        let mut frame = Frame::new();
        encode_identification(&mut frame, 0xABCDEF, "ABCDEFGH").unwrap();
        let msg = decode_identification(&frame).unwrap();
        assert_eq!(msg.callsign, "ABCDEFGH");
        assert_eq!(msg.icao, [0xAB, 0xCD, 0xEF]);
    }

    #[test]
    fn test_identification_unknown_chars_become_spaces() {
        let mut frame = Frame::new();
        encode_identification(&mut frame, 0xABCDEF, "a!C-4*Z?").unwrap();
        let msg = decode_identification(&frame).unwrap();
        assert_eq!(msg.callsign, "  C 4 Z ");
    }

    #[test]
    fn test_identification_corrupt_frame_rejected() {
        let mut frame = Frame::new();
        encode_identification(&mut frame, 0xABCDEF, "TEST1234").unwrap();
        let mut bytes = *frame.as_bytes();
        bytes[6] ^= 0x40;
        let corrupted = Frame::from_bytes(bytes, 0.0);
        assert_eq!(
            decode_identification(&corrupted),
            Err(AdsbError::CrcMismatch)
        );
    }

    // -- position --

    #[test]
    fn test_decode_position_even_odd_fields() {
        let even = parse("8D40621D58C382D690C8AC2863A7", 0.0);
        let msg = decode_position(&even).unwrap();
        assert!(!msg.cpr_odd);
        assert_eq!(msg.cpr_lat, 93000);
        assert_eq!(msg.cpr_lon, 51372);
        assert_eq!(msg.altitude_ft, Some(38000));

        let odd = parse("8D40621D58C386435CC412692AD6", 1.0);
        let msg = decode_position(&odd).unwrap();
        assert!(msg.cpr_odd);
        assert_eq!(msg.cpr_lat, 74158);
        assert_eq!(msg.cpr_lon, 50194);
    }

    #[test]
    fn test_decode_position_pair_known_frames() {
        let even = parse("8D40621D58C382D690C8AC2863A7", 1.0);
        let odd = parse("8D40621D58C386435CC412692AD6", 0.0);
        let fix = decode_position_pair(&even, &odd).unwrap().unwrap();
        assert!((fix.latitude - 52.2572).abs() < 0.01, "lat {}", fix.latitude);
        assert!((fix.longitude - 3.9194).abs() < 0.01, "lon {}", fix.longitude);
        assert_eq!(fix.altitude_ft, Some(38000));
        assert_eq!(icao_to_string(&fix.icao), "40621D");
    }

    #[test]
    fn test_position_roundtrip() {
        let step = 360.0 / 131072.0;
        let mut even = Frame::new();
        let mut odd = Frame::new();
        encode_airborne_position(&mut even, 0x40621D, 38000, 52.2572, 3.9194, false).unwrap();
        encode_airborne_position(&mut odd, 0x40621D, 38000, 52.2572, 3.9194, true).unwrap();
        even.set_timestamp(1.0);
        odd.set_timestamp(2.0);
        let fix = decode_position_pair(&even, &odd).unwrap().unwrap();
        assert!((fix.latitude - 52.2572).abs() < step);
        assert!((fix.longitude - 3.9194).abs() < step);
        assert_eq!(fix.altitude_ft, Some(38000));
    }

    #[test]
    fn test_position_pair_wrong_parity() {
        let mut a = Frame::new();
        let mut b = Frame::new();
        encode_airborne_position(&mut a, 0x40621D, 5000, 40.0, -75.0, true).unwrap();
        encode_airborne_position(&mut b, 0x40621D, 5000, 40.0, -75.0, false).unwrap();
        assert_eq!(
            decode_position_pair(&a, &b),
            Err(AdsbError::ParityMismatch)
        );
    }

    #[test]
    fn test_position_pair_zone_straddle_is_none() {
        let mut even = Frame::new();
        let mut odd = Frame::new();
        // Straddles the 10.47047° NL boundary
        encode_airborne_position(&mut even, 0x40621D, 5000, 10.46, 5.0, false).unwrap();
        encode_airborne_position(&mut odd, 0x40621D, 5000, 10.48, 5.0, true).unwrap();
        assert_eq!(decode_position_pair(&even, &odd), Ok(None));
    }

    #[test]
    fn test_position_pair_corrupt_frame_rejected() {
        let even = parse("8D40621D58C382D690C8AC2863A7", 1.0);
        let mut bytes = *parse("8D40621D58C386435CC412692AD6", 0.0).as_bytes();
        bytes[8] ^= 0x01;
        let odd = Frame::from_bytes(bytes, 0.0);
        assert_eq!(
            decode_position_pair(&even, &odd),
            Err(AdsbError::CrcMismatch)
        );
    }

    #[test]
    fn test_decode_altitude_q_bit() {
        assert_eq!(decode_altitude(0xC38), Some(38000));
        assert_eq!(decode_altitude(0), None);
        // Q-bit clear: Gillham coding, not handled
        assert_eq!(decode_altitude(0x1800), None);
    }

    // -- velocity --

    #[test]
    fn test_decode_velocity_known_frame() {
        let frame = parse("8D485020994409940838175B284F", 1.0);
        let msg = decode_velocity(&frame).unwrap();
        assert_eq!(msg.speed_type, SpeedType::Ground);
        // Magnitude is reported in whole knots
        assert_eq!(msg.speed_kts, Some(159.0));
        let heading = msg.heading_deg.unwrap();
        assert!((heading - 182.88).abs() < 0.1, "heading {heading}");
        assert_eq!(msg.vertical_rate_fpm, Some(-832));
    }

    #[test]
    fn test_velocity_roundtrip() {
        let mut frame = Frame::new();
        encode_airborne_velocity(&mut frame, 0x485020, 250, 90.0, 500).unwrap();
        let msg = decode_velocity(&frame).unwrap();
        assert_eq!(msg.speed_type, SpeedType::Ground);
        assert!((msg.speed_kts.unwrap() - 250.0).abs() <= 1.0);
        assert!((msg.heading_deg.unwrap() - 90.0).abs() <= 1.0);
        assert!((msg.vertical_rate_fpm.unwrap() - 500).abs() <= 64);
    }

    #[test]
    fn test_velocity_roundtrip_quadrants() {
        for (speed, bearing, vrate) in [
            (120u32, 0.0, 0),
            (300, 45.0, 1280),
            (80, 200.0, -640),
            (500, 359.0, 64),
        ] {
            let mut frame = Frame::new();
            encode_airborne_velocity(&mut frame, 0x123456, speed, bearing, vrate).unwrap();
            let msg = decode_velocity(&frame).unwrap();
            assert!(
                (msg.speed_kts.unwrap() - speed as f64).abs() <= 1.5,
                "speed at bearing {bearing}"
            );
            let mut hdg_err = (msg.heading_deg.unwrap() - bearing).abs();
            if hdg_err > 180.0 {
                hdg_err = 360.0 - hdg_err;
            }
            assert!(hdg_err <= 1.0, "heading error {hdg_err} at bearing {bearing}");
            assert!(
                (msg.vertical_rate_fpm.unwrap() - vrate).abs() <= 64,
                "vrate at bearing {bearing}"
            );
        }
    }

    #[test]
    fn test_velocity_corrupt_frame_rejected() {
        let mut bytes = *parse("8D485020994409940838175B284F", 1.0).as_bytes();
        bytes[5] ^= 0x01;
        let frame = Frame::from_bytes(bytes, 1.0);
        assert_eq!(decode_velocity(&frame), Err(AdsbError::CrcMismatch));
    }

    #[test]
    fn test_velocity_wrong_type_code() {
        let frame = parse("8D4840D6202CC371C32CE0576098", 1.0); // TC 4
        assert_eq!(decode_velocity(&frame), Err(AdsbError::WrongTypeCode(4)));
    }

    #[test]
    fn test_velocity_airspeed_subtype() {
        // Hand-built subtype 3 ME: heading available, 10-bit heading 256
        // (90°), IAS 180 kt, vertical rate 7 * 64 climbing
        let mut frame = Frame::new();
        let icao = 0x485020u32;
        frame.push_byte((17 << 3) | 5).unwrap();
        frame.push_byte((icao >> 16) as u8).unwrap();
        frame.push_byte((icao >> 8) as u8).unwrap();
        frame.push_byte(icao as u8).unwrap();
        let heading_raw = 256u16; // 90° in 360/1024 steps
        let speed_raw = 181u16; // 180 kt + 1 offset
        let vr_raw = 8u16; // 7 * 64 ft/min + 1 offset
        frame.push_byte((19 << 3) | 3).unwrap();
        frame
            .push_byte((1u8 << 2) | (heading_raw >> 8) as u8)
            .unwrap();
        frame.push_byte(heading_raw as u8).unwrap();
        frame.push_byte((speed_raw >> 3) as u8).unwrap(); // IAS flag 0
        frame
            .push_byte(((speed_raw << 5) as u8) | (vr_raw >> 6) as u8)
            .unwrap();
        frame.push_byte((vr_raw << 2) as u8).unwrap();
        frame.push_byte(0).unwrap();
        frame.make_crc();

        let msg = decode_velocity(&frame).unwrap();
        assert_eq!(msg.speed_type, SpeedType::IAS);
        assert_eq!(msg.speed_kts, Some(180.0));
        assert_eq!(msg.heading_deg, Some(90.0));
        assert_eq!(msg.vertical_rate_fpm, Some(448));
    }

    // -- identity field --

    #[test]
    fn test_squawk_identity_roundtrip() {
        for squawk in [0u16, 1200, 1337, 7000, 7500, 7600, 7700, 7777] {
            assert_eq!(squawk_from_identity(identity_from_squawk(squawk)), squawk);
        }
    }

    #[test]
    fn test_squawk_field_from_encoded_reply() {
        let mut frame = Frame::new();
        encode_identity_reply(&mut frame, 7600).unwrap();
        let bytes = frame.as_bytes();
        let id13 = ((bytes[2] as u16 & 0x1F) << 8) | bytes[3] as u16;
        assert_eq!(squawk_from_identity(id13), 7600);
    }
}
