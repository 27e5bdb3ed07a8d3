// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Text form of a counter: ASCII decimal with an optional leading `-`,
//! newline-terminated when read.

use std::io::{Cursor, Write};

use vfs::{Error, Result};

/// Scratch buffer capacity for both directions.
pub const TMPSIZE: usize = 20;

/// Render `value` as `"<decimal>\n"` into `tmp`, returning its length.
///
/// The longest `i32` rendering is 12 bytes, so running out of room here is
/// a bug rather than a runtime condition.
pub fn render(value: i32, tmp: &mut [u8; TMPSIZE]) -> Result<usize> {
    let mut cursor = Cursor::new(&mut tmp[..]);
    writeln!(cursor, "{}", value).map_err(|_| Error::io("counter text exceeds scratch buffer"))?;
    Ok(cursor.position() as usize)
}

/// Parse base-10 text the way `simple_strtol` does.
///
/// An optional `-`, then digits up to the first non-digit. No whitespace
/// is skipped and text without digits parses as 0. Overflow wraps and the
/// result keeps the low 32 bits.
pub fn parse_decimal(buf: &[u8]) -> i32 {
    let (negative, digits) = match buf.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, buf),
    };
    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u64, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'))
        });
    let value = if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    value as i32
}
