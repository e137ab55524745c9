//! Compact Position Reporting — 17-bit-per-axis geodetic quantization.
//!
//! Latitude is divided into bands whose count differs between frames tagged
//! even (parity 0) and odd (parity 1); a matched even/odd pair pins down
//! the global cell unambiguously.
//!
//! Key constants:
//! - NZ = 15 (latitude zones per hemisphere for even frames)
//! - Nb = 17 (bits per coordinate)
//! - Dlat_even = 360 / (4 * NZ) = 6.0 degrees
//! - Dlat_odd = 360 / (4 * NZ - 1) ≈ 6.1017 degrees
//!
//! Two NL implementations are provided: the closed-form trigonometric one
//! (the correctness oracle, used by encode/decode) and a lookup over the 58
//! standard latitude breakpoints. Tests hold them in exact agreement.

/// Number of latitude zones per hemisphere.
const NZ: f64 = 15.0;

/// Bits per CPR coordinate.
const NB: u32 = 17;

/// Maximum CPR value (2^17 = 131072).
const CPR_MAX: f64 = (1u32 << NB) as f64;

/// Maximum time between even/odd frames for global decode (seconds).
pub const MAX_PAIR_AGE: f64 = 10.0;

// ---------------------------------------------------------------------------
// NL: longitude zone count
// ---------------------------------------------------------------------------

/// Number of longitude zones at a given latitude (closed form).
///
/// Ranges from 59 at the equator down to 1 near the poles.
pub fn nl(lat: f64) -> i32 {
    if lat.abs() >= 87.0 {
        return 1;
    }

    let a = 1.0 - (std::f64::consts::PI / (2.0 * NZ)).cos();
    let b = (std::f64::consts::PI / 180.0 * lat.abs()).cos().powi(2);
    let nl_val = (2.0 * std::f64::consts::PI / (1.0 - a / b).acos()).floor() as i32;
    nl_val.max(1)
}

/// Standard NL transition latitudes. Entry `i` is the upper bound (exclusive)
/// of the band where NL = 59 - i; above the last entry NL = 1.
const NL_BOUNDARIES: [f64; 58] = [
    10.47047130,
    14.82817437,
    18.18626357,
    21.02939493,
    23.54504487,
    25.82924707,
    27.93898710,
    29.91135686,
    31.77209708,
    33.53993436,
    35.22899598,
    36.85025108,
    38.41241892,
    39.92256684,
    41.38651832,
    42.80914012,
    44.19454951,
    45.54626723,
    46.86733252,
    48.16039128,
    49.42776439,
    50.67150166,
    51.89342469,
    53.09516153,
    54.27817472,
    55.44378444,
    56.59318756,
    57.72747354,
    58.84763776,
    59.95459277,
    61.04917774,
    62.13216659,
    63.20427479,
    64.26616523,
    65.31845310,
    66.36171008,
    67.39646774,
    68.42322022,
    69.44242631,
    70.45451075,
    71.45986473,
    72.45884545,
    73.45177442,
    74.43893416,
    75.42056257,
    76.39684391,
    77.36789461,
    78.33374083,
    79.29428225,
    80.24923213,
    81.19801349,
    82.13956981,
    83.07199445,
    83.99173563,
    84.89166191,
    85.75541621,
    86.53536998,
    87.00000000,
];

/// Number of longitude zones via the breakpoint table.
///
/// Faster than the closed form on targets without an FPU; must agree with
/// `nl` everywhere before being substituted for it.
pub fn nl_lookup(lat: f64) -> i32 {
    let lat = lat.abs();
    for (i, &bound) in NL_BOUNDARIES.iter().enumerate() {
        if lat < bound {
            return 59 - i as i32;
        }
    }
    1
}

/// Longitude zone count for a frame of the given parity, never below 1.
fn n(lat: f64, odd: bool) -> i32 {
    (nl(lat) - odd as i32).max(1)
}

/// Modulo that always returns a non-negative result.
fn modulo(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Quantize a position into 17-bit CPR codes for a frame of the given parity.
///
/// Returns `(yz, xz)`: the latitude and longitude codes. The longitude zone
/// width is derived from the latitude recomputed out of `yz`, so the decoder
/// reconstructs the same zone the encoder used.
pub fn encode(lat: f64, lon: f64, odd: bool) -> (u32, u32) {
    let i = odd as i32 as f64;
    let dlat = 360.0 / (4.0 * NZ - i);

    let yz = (CPR_MAX * modulo(lat, dlat) / dlat + 0.5).floor();
    let rlat = dlat * (yz / CPR_MAX + (lat / dlat).floor());

    let dlon = 360.0 / n(rlat, odd) as f64;
    let xz = (CPR_MAX * modulo(lon, dlon) / dlon + 0.5).floor();

    (
        modulo(yz, CPR_MAX) as u32,
        modulo(xz, CPR_MAX) as u32,
    )
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Global CPR decode from an even/odd code pair.
///
/// Returns `(latitude, longitude)` in degrees. `None` is the normal
/// "insufficient data" outcome: the pair straddles a latitude zone boundary
/// (NL disagreement) or is older than `MAX_PAIR_AGE`. The newer frame's
/// timestamp decides which parity fixes the longitude zone count.
pub fn global_decode(
    lat_even: u32,
    lon_even: u32,
    lat_odd: u32,
    lon_odd: u32,
    t_even: f64,
    t_odd: f64,
) -> Option<(f64, f64)> {
    if (t_even - t_odd).abs() > MAX_PAIR_AGE {
        return None;
    }

    let dlat_even = 360.0 / (4.0 * NZ); // 6.0
    let dlat_odd = 360.0 / (4.0 * NZ - 1.0); // ~6.1017

    let lat_even_cpr = lat_even as f64 / CPR_MAX;
    let lon_even_cpr = lon_even as f64 / CPR_MAX;
    let lat_odd_cpr = lat_odd as f64 / CPR_MAX;
    let lon_odd_cpr = lon_odd as f64 / CPR_MAX;

    // Combined latitude zone index
    let j = (59.0 * lat_even_cpr - 60.0 * lat_odd_cpr + 0.5).floor();

    let mut lat_e = dlat_even * (modulo(j, 60.0) + lat_even_cpr);
    let mut lat_o = dlat_odd * (modulo(j, 59.0) + lat_odd_cpr);

    // Normalize to [-90, 90]
    if lat_e >= 270.0 {
        lat_e -= 360.0;
    }
    if lat_o >= 270.0 {
        lat_o -= 360.0;
    }

    // Both latitudes must fall in the same longitude zone band
    if nl(lat_e) != nl(lat_o) {
        return None;
    }

    let (lat, lon) = if t_even >= t_odd {
        let nl_val = nl(lat_e);
        let n_lon = nl_val.max(1);
        let dlon = 360.0 / n_lon as f64;
        let m = (lon_even_cpr * (nl_val - 1) as f64 - lon_odd_cpr * nl_val as f64 + 0.5).floor();
        let lon = dlon * (modulo(m, n_lon as f64) + lon_even_cpr);
        (lat_e, lon)
    } else {
        let nl_val = nl(lat_o);
        let n_lon = (nl_val - 1).max(1);
        let dlon = 360.0 / n_lon as f64;
        let m = (lon_even_cpr * (nl_val - 1) as f64 - lon_odd_cpr * nl_val as f64 + 0.5).floor();
        let lon = dlon * (modulo(m, n_lon as f64) + lon_odd_cpr);
        (lat_o, lon)
    };

    // Normalize longitude to [-180, 180)
    let lon = if lon >= 180.0 { lon - 360.0 } else { lon };

    Some((lat, lon))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
