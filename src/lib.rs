//! adsb-squitter: Mode S extended squitter codec for the 1090 MHz
//! transmit/receive pipeline.
//!
//! No async, no I/O — just bit-exact frame construction and decoding:
//! CRC-24 parity, CPR geodetic quantization with even/odd pair resolution,
//! the 6-bit callsign alphabet, polar-to-Cartesian velocity encoding, and
//! interleaved squawk packing. Callers own the `Frame` buffers; the codec
//! keeps no state beyond read-only constant tables, so it is safe to call
//! from any number of threads.

pub mod cpr;
pub mod crc;
pub mod decode;
pub mod encode;
pub mod frame;
pub mod types;

// Re-export commonly used items at crate root
pub use decode::{decode_identification, decode_position, decode_position_pair, decode_velocity};
pub use encode::{
    encode_airborne_position, encode_airborne_velocity, encode_identification,
    encode_identity_reply,
};
pub use frame::Frame;
pub use types::*;
