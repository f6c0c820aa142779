//! Value transforms between raw field bits and domain values
//!
//! The chip needs exactly four transforms, so the set is a closed enum
//! rather than open-ended dynamic dispatch: schema tables stay
//! const-constructible and every match is exhaustive.

use fugit::MicrosDurationU64;

use crate::regmap::Value;
use crate::Error;

/// Largest tick count the 3-byte time registers can hold
const MAX_TICKS: u64 = 0xFF_FFFF;

/// Bidirectional transform between a raw unsigned integer and a domain value
///
/// The round-trip law `encode(decode(x)) == x` holds for every valid raw `x`.
/// The one documented exception: [`Adapter::FixedPointTime`] clamps
/// sub-tick durations to raw 0, so out-of-range inputs do not round-trip.
#[derive(Debug, Clone, Copy)]
pub enum Adapter {
    /// Raw bits pass through unchanged
    Identity,
    /// Closed bidirectional mapping between symbolic names and raw values
    Lookup(&'static [(&'static str, u64)]),
    /// 16-bit value whose two bytes are delivered swapped relative to
    /// natural order; self-inverse
    ByteSwap16,
    /// 3-byte tick count at the 1 MHz reference clock, in the chip's
    /// rearranged byte order (see below)
    FixedPointTime,
}

impl Adapter {
    /// Transform a mask-extracted raw value into a domain value
    ///
    /// A lookup raw with no symbol mapping is [`Error::InvalidValue`], never
    /// silently defaulted.
    pub fn decode<E>(&self, raw: u64) -> Result<Value, Error<E>> {
        match self {
            Adapter::Identity => Ok(Value::Uint(raw)),
            Adapter::Lookup(table) => table
                .iter()
                .find(|(_, v)| *v == raw)
                .map(|(s, _)| Value::Symbol(s))
                .ok_or(Error::InvalidValue),
            Adapter::ByteSwap16 => {
                if raw > 0xFFFF {
                    return Err(Error::InvalidValue);
                }
                Ok(Value::Uint(swap16(raw)))
            }
            Adapter::FixedPointTime => {
                if raw > MAX_TICKS {
                    return Err(Error::InvalidValue);
                }
                // Raw 0 is one tick: the hardware counts n + 1 ticks.
                let ticks = unscramble(raw) + 1;
                Ok(Value::Duration(MicrosDurationU64::from_ticks(ticks)))
            }
        }
    }

    /// Transform a domain value into the raw bits to place under the mask
    ///
    /// An unrecognized lookup symbol, a wrongly-typed value, or a number that
    /// does not fit the transform's range is [`Error::InvalidValue`].
    pub fn encode<E>(&self, value: &Value) -> Result<u64, Error<E>> {
        match (self, value) {
            (Adapter::Identity, Value::Uint(v)) => Ok(*v),
            (Adapter::Lookup(table), Value::Symbol(symbol)) => table
                .iter()
                .find(|(s, _)| s == symbol)
                .map(|(_, v)| *v)
                .ok_or(Error::InvalidValue),
            (Adapter::ByteSwap16, Value::Uint(v)) => {
                if *v > 0xFFFF {
                    return Err(Error::InvalidValue);
                }
                Ok(swap16(*v))
            }
            (Adapter::FixedPointTime, Value::Duration(duration)) => {
                // Anything below one tick clamps to raw 0, not an error.
                let ticks = duration.ticks().saturating_sub(1);
                if ticks > MAX_TICKS {
                    return Err(Error::InvalidValue);
                }
                Ok(scramble(ticks))
            }
            _ => Err(Error::InvalidValue),
        }
    }
}

const fn swap16(v: u64) -> u64 {
    ((v & 0xFF) << 8) | ((v >> 8) & 0xFF)
}

// The time registers store a 3-byte tick count with the bytes rearranged:
// the lowest-address byte (most significant in the register image) holds the
// count's low byte, the middle byte is in place, and the highest-address
// byte holds the count's high byte.

const fn scramble(ticks: u64) -> u64 {
    let low = ticks & 0xFF;
    let mid = (ticks >> 8) & 0xFF;
    let high = (ticks >> 16) & 0xFF;
    (low << 16) | (mid << 8) | high
}

const fn unscramble(raw: u64) -> u64 {
    let low = (raw >> 16) & 0xFF;
    let mid = (raw >> 8) & 0xFF;
    let high = raw & 0xFF;
    (high << 16) | (mid << 8) | low
}
