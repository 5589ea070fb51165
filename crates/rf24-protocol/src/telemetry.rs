//! Motor telemetry frame.
//!
//! The remote robot reports its motor state as a fixed 16-byte frame,
//! little-endian, no header:
//!
//! ```text
//! +--------+--------+--------+--------+--------+--------+
//! | speedA | speedB | powerA | powerB | targA  | targB  |
//! |  f32   |  f32   |  i16   |  i16   |  i16   |  i16   |
//! +--------+--------+--------+--------+--------+--------+
//!   0        4        8        10       12       14
//! ```

use std::fmt;

use bytes::{Buf, BufMut};

/// Size of an encoded telemetry frame in bytes.
pub const TELEMETRY_SIZE: usize = 16;

/// One decoded telemetry frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    /// Measured speed of motor A.
    pub speed_motor_a: f32,
    /// Measured speed of motor B.
    pub speed_motor_b: f32,
    /// Drive power applied to motor A.
    pub power_motor_a: i16,
    /// Drive power applied to motor B.
    pub power_motor_b: i16,
    /// Target speed of motor A.
    pub target_speed_motor_a: i16,
    /// Target speed of motor B.
    pub target_speed_motor_b: i16,
}

impl Telemetry {
    /// Size of an encoded frame in bytes.
    pub const SIZE: usize = TELEMETRY_SIZE;

    /// Decode a frame.
    pub fn decode(data: &[u8; TELEMETRY_SIZE]) -> Telemetry {
        let mut buf = &data[..];
        Telemetry {
            speed_motor_a: buf.get_f32_le(),
            speed_motor_b: buf.get_f32_le(),
            power_motor_a: buf.get_i16_le(),
            power_motor_b: buf.get_i16_le(),
            target_speed_motor_a: buf.get_i16_le(),
            target_speed_motor_b: buf.get_i16_le(),
        }
    }

    /// Decode a frame from a slice of exactly [`Telemetry::SIZE`] bytes.
    pub fn from_slice(data: &[u8]) -> Option<Telemetry> {
        let frame: &[u8; TELEMETRY_SIZE] = data.try_into().ok()?;
        Some(Self::decode(frame))
    }

    /// Encode the frame.
    pub fn encode(&self) -> [u8; TELEMETRY_SIZE] {
        let mut out = [0u8; TELEMETRY_SIZE];
        let mut buf = &mut out[..];
        buf.put_f32_le(self.speed_motor_a);
        buf.put_f32_le(self.speed_motor_b);
        buf.put_i16_le(self.power_motor_a);
        buf.put_i16_le(self.power_motor_b);
        buf.put_i16_le(self.target_speed_motor_a);
        buf.put_i16_le(self.target_speed_motor_b);
        out
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "speed-A: {:.6}, speed-B: {:.6}, power-A: {}, power-B: {}, target-A: {}, target-B: {}",
            self.speed_motor_a,
            self.speed_motor_b,
            self.power_motor_a,
            self.power_motor_b,
            self.target_speed_motor_a,
            self.target_speed_motor_b
        )
    }
}
