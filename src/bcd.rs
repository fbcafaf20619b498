//! Packed binary-coded-decimal conversions.
//!
//! Every DS3231 time, date, and alarm value register stores its value as
//! packed BCD: tens digit in the high nibble, ones digit in the low nibble.

/// Converts a packed BCD byte to its decimal value.
pub(crate) fn decode(raw: u8) -> u8 {
    (raw >> 4) * 10 + (raw & 0x0F)
}

/// Converts a decimal value to its packed BCD byte.
///
/// Returns `None` for values above 99, which have no two-digit encoding.
pub(crate) fn encode(value: u8) -> Option<u8> {
    if value > 99 {
        return None;
    }
    Some((value / 10) << 4 | (value % 10))
}
