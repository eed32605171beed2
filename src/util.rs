// Copyright 2023 Datafuse Labs.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::constants::*;
use super::error::ParseErrorCode;

#[allow(clippy::zero_prefixed_literal)]
static HEX: [u8; 256] = {
    const __: u8 = 255; // not a hex digit
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 0
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 1
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 2
        00, 01, 02, 03, 04, 05, 06, 07, 08, 09, __, __, __, __, __, __, // 3
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, 10, 11, 12, 13, 14, 15, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 7
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 8
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 9
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // A
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // B
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // C
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // D
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // E
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // F
    ]
};

/// Decodes the letter following a backslash into the byte it stands for.
/// `u` is not handled here, see [`unescape_unicode`].
#[inline]
pub(crate) fn decode_short_escape(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(QU),
        b'\\' => Some(BS),
        b'/' => Some(SD),
        b'b' => Some(BB),
        b'f' => Some(FF),
        b'n' => Some(NN),
        b'r' => Some(RR),
        b't' => Some(TT),
        _ => None,
    }
}

#[inline]
fn decode_hex_val(val: u8) -> Option<u16> {
    let n = HEX[val as usize] as u16;
    if n == 255 {
        None
    } else {
        Some(n)
    }
}

/// Decodes the four hex digits of a `\uXXXX` escape into a UTF-16 code unit,
/// which may be one half of a surrogate pair.
///
/// `Err(UnterminatedString)` means the input ended before four digits were
/// seen; any non-hex byte among the available digits is
/// `Err(InvalidCodepointEscape)`.
#[inline]
pub(crate) fn decode_unicode_escape(digits: &[u8]) -> Result<u16, ParseErrorCode> {
    let mut n = 0;
    for (i, digit) in digits.iter().take(UNICODE_LEN).enumerate() {
        match decode_hex_val(*digit) {
            Some(hex) => n = (n << 4) + hex,
            None => return Err(ParseErrorCode::InvalidCodepointEscape),
        }
        if i + 1 == UNICODE_LEN {
            return Ok(n);
        }
    }
    Err(ParseErrorCode::UnterminatedString)
}

#[inline]
pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combines a high and a low surrogate into the code point they encode.
#[inline]
pub(crate) fn combine_surrogate_pair(high: u16, low: u16) -> Option<u32> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    #[allow(clippy::precedence)]
    let n = (((high - 0xD800) as u32) << 10 | (low - 0xDC00) as u32) + 0x1_0000;
    Some(n)
}

/// Writes the UTF-8 encoding of `code_point` to the front of `out` and
/// returns the number of bytes written. Surrogates and values above U+10FFFF
/// are rejected. `out` must hold at least four bytes, or as many as the
/// encoding needs.
#[inline]
pub(crate) fn encode_utf8(code_point: u32, out: &mut [u8]) -> Option<usize> {
    let ch = char::from_u32(code_point)?;
    if out.len() < ch.len_utf8() {
        return None;
    }
    Some(ch.encode_utf8(out).len())
}

/// Decodes the `\uXXXX` escape, or `\uXXXX\uXXXX` surrogate pair, whose
/// backslash sits at `buf[at]`.
///
/// Returns the code point and the number of source bytes consumed (6 or 12).
pub(crate) fn unescape_unicode(buf: &[u8], at: usize) -> Result<(u32, usize), ParseErrorCode> {
    debug_assert!(buf[at..].starts_with(b"\\u"));
    let first = decode_unicode_escape(&buf[at + 2..])?;
    if is_low_surrogate(first) {
        return Err(ParseErrorCode::InvalidCodepointEscape);
    }
    if !is_high_surrogate(first) {
        return Ok((first as u32, 2 + UNICODE_LEN));
    }

    // A high surrogate must be followed directly by a low surrogate escape.
    let next = at + 2 + UNICODE_LEN;
    match buf.get(next..next + 2) {
        Some(b"\\u") => {}
        Some(_) => return Err(ParseErrorCode::InvalidCodepointEscape),
        None => {
            return match buf.get(next) {
                None | Some(b'\\') => Err(ParseErrorCode::UnterminatedString),
                Some(_) => Err(ParseErrorCode::InvalidCodepointEscape),
            }
        }
    }
    let second = decode_unicode_escape(&buf[next + 2..])?;
    match combine_surrogate_pair(first, second) {
        Some(cp) => Ok((cp, 2 * (2 + UNICODE_LEN))),
        None => Err(ParseErrorCode::InvalidCodepointEscape),
    }
}
