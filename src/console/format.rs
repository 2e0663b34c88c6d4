//! Word rendering for the memory dump commands

use core::fmt::Write;

use super::error::ConsoleError;

/// Parse a dump address of the form `0x` + exactly 8 hex digits.
///
/// The two failure modes stay distinct: a wrong prefix or length is a
/// format error, a bad digit inside the 8 is a conversion error. Neither
/// is ever folded into a zero address.
pub fn parse_hex_address(arg: &str) -> Result<u32, ConsoleError> {
    let digits = arg
        .strip_prefix("0x")
        .ok_or(ConsoleError::BadAddressFormat)?;

    if digits.len() != 8 {
        return Err(ConsoleError::BadAddressFormat);
    }

    let mut value: u32 = 0;
    for byte in digits.bytes() {
        let nibble = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(ConsoleError::BadHexDigit),
        };
        value = (value << 4) | nibble as u32;
    }
    Ok(value)
}

/// Render a word as `0x` + 8 uppercase hex digits.
pub fn write_hex_word(out: &mut dyn Write, word: u32) -> core::fmt::Result {
    write!(out, "0x{:08X}", word)
}

const RULE: &str = " -----------------------------------------------";

/// Render a word as the framed two-row binary table.
///
/// Bits 31..16 on the first row, 15..0 on the second, one bit character
/// per cell, numeric column headers, bounded by rule lines.
pub fn write_binary_table(out: &mut dyn Write, word: u32) -> core::fmt::Result {
    let bit = |i: u32| if word & (1 << i) != 0 { '1' } else { '0' };

    write!(out, "{}\r\n", RULE)?;
    for i in (16..=31u32).rev() {
        if i == 31 {
            write!(out, "|")?;
        }
        write!(out, "{}|", i)?;
    }
    write!(out, "\r\n")?;
    for i in (16..=31u32).rev() {
        if i == 31 {
            write!(out, "| ")?;
        }
        write!(out, "{}| ", bit(i))?;
    }
    write!(out, "\r\n{}\r\n", RULE)?;
    for i in (0..=15u32).rev() {
        if i == 15 {
            write!(out, "|")?;
        }
        write!(out, "{}", i)?;
        // Single-digit headers get a pad space to track the cell width
        if i < 11 {
            write!(out, "| ")?;
        } else {
            write!(out, "|")?;
        }
    }
    write!(out, "\r\n")?;
    for i in (0..=15u32).rev() {
        if i == 15 {
            write!(out, "| ")?;
        }
        write!(out, "{}| ", bit(i))?;
    }
    write!(out, "\r\n{}", RULE)?;
    Ok(())
}
