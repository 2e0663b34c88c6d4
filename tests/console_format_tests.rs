//! Formatting tests for the memory dump renderers

use blinky_repl::console::format::{parse_hex_address, write_binary_table, write_hex_word};
use blinky_repl::console::ConsoleError;

#[test]
fn test_parse_valid_address() {
    assert_eq!(parse_hex_address("0x50000000"), Ok(0x5000_0000));
    assert_eq!(parse_hex_address("0xDEADBEEF"), Ok(0xDEAD_BEEF));
    assert_eq!(parse_hex_address("0x00000000"), Ok(0));
    assert_eq!(parse_hex_address("0xFFFFFFFF"), Ok(u32::MAX));
}

#[test]
fn test_parse_accepts_lowercase_digits() {
    assert_eq!(parse_hex_address("0xdeadbeef"), Ok(0xDEAD_BEEF));
}

#[test]
fn test_parse_rejects_missing_prefix() {
    assert_eq!(
        parse_hex_address("50000000"),
        Err(ConsoleError::BadAddressFormat)
    );
}

#[test]
fn test_parse_rejects_uppercase_prefix() {
    assert_eq!(
        parse_hex_address("0X50000000"),
        Err(ConsoleError::BadAddressFormat)
    );
}

#[test]
fn test_parse_rejects_wrong_length() {
    assert_eq!(parse_hex_address("0x1234"), Err(ConsoleError::BadAddressFormat));
    assert_eq!(
        parse_hex_address("0x123456789"),
        Err(ConsoleError::BadAddressFormat)
    );
}

#[test]
fn test_parse_reports_bad_digit_distinctly() {
    // A bad digit inside an otherwise well-formed address is a
    // conversion error, never silently parsed as zero
    assert_eq!(
        parse_hex_address("0x1234ZZ78"),
        Err(ConsoleError::BadHexDigit)
    );
    assert_eq!(
        parse_hex_address("0x1234ZZ78").map_err(|e| e.message()),
        Err("Error: Could not convert hex to decimal")
    );
}

#[test]
fn test_hex_word_renders_uppercase_padded() {
    let mut out = String::new();
    write_hex_word(&mut out, 0xDEAD_BEEF).unwrap();
    assert_eq!(out, "0xDEADBEEF");

    out.clear();
    write_hex_word(&mut out, 0x1F).unwrap();
    assert_eq!(out, "0x0000001F");
}

#[test]
fn test_binary_table_structure() {
    let mut out = String::new();
    write_binary_table(&mut out, 0x8000_0001).unwrap();

    let lines: Vec<&str> = out.split("\r\n").collect();
    // Rule, header, bits for the high half; same again for the low half
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], " -----------------------------------------------");
    assert_eq!(lines[3], lines[0]);
    assert_eq!(lines[6], lines[0]);
}

#[test]
fn test_binary_table_headers() {
    let mut out = String::new();
    write_binary_table(&mut out, 0).unwrap();

    let lines: Vec<&str> = out.split("\r\n").collect();
    assert_eq!(lines[1], "|31|30|29|28|27|26|25|24|23|22|21|20|19|18|17|16|");
    // Single-digit headers carry a pad space to hold the cell width
    assert_eq!(lines[4], "|15|14|13|12|11|10| 9| 8| 7| 6| 5| 4| 3| 2| 1| 0| ");
}

#[test]
fn test_binary_table_bit_rows() {
    let mut out = String::new();
    write_binary_table(&mut out, 0x8000_000F).unwrap();

    let lines: Vec<&str> = out.split("\r\n").collect();
    assert_eq!(lines[2], "| 1| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| ");
    assert_eq!(lines[5], "| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 0| 1| 1| 1| 1| ");
}
