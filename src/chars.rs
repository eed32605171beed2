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

//! Byte classification for the decoder.
//!
//! Every byte value maps to a small bit set. A byte is either *plain* string
//! content or *special* (quote, backslash, control byte), never both; the
//! *whitespace* and *digit* bits are independent of that split.

pub(crate) const PLAIN: u8 = 0b0001;
pub(crate) const SPECIAL: u8 = 0b0010;
pub(crate) const WHITESPACE: u8 = 0b0100;
pub(crate) const DIGIT: u8 = 0b1000;

static CLASS: [u8; 256] = build_class_table();

const fn build_class_table() -> [u8; 256] {
    let mut table = [PLAIN; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        let mut class = if b < 0x20 || b == 0x7F || b == b'"' || b == b'\\' {
            SPECIAL
        } else {
            PLAIN
        };
        if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
            class |= WHITESPACE;
        }
        if b.is_ascii_digit() {
            class |= DIGIT;
        }
        table[i] = class;
        i += 1;
    }
    table
}

#[inline]
pub(crate) fn class_of(b: u8) -> u8 {
    CLASS[b as usize]
}

#[inline]
pub(crate) fn is_special(b: u8) -> bool {
    class_of(b) & SPECIAL != 0
}

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    class_of(b) & WHITESPACE != 0
}

#[inline]
pub(crate) fn is_digit(b: u8) -> bool {
    class_of(b) & DIGIT != 0
}

/// Raw control bytes may not appear unescaped inside a string.
#[inline]
pub(crate) fn is_control(b: u8) -> bool {
    b < 0x20 || b == 0x7F
}

/// Returns the index of the first special byte at or after `from`,
/// or `buf.len()` if the rest of the buffer is plain.
#[inline]
pub(crate) fn skip_plain(buf: &[u8], from: usize) -> usize {
    buf[from..]
        .iter()
        .position(|&b| is_special(b))
        .map_or(buf.len(), |n| from + n)
}

#[inline]
pub(crate) fn skip_whitespace(buf: &[u8], from: usize) -> usize {
    buf[from..]
        .iter()
        .position(|&b| !is_whitespace(b))
        .map_or(buf.len(), |n| from + n)
}

#[inline]
pub(crate) fn skip_digits(buf: &[u8], from: usize) -> usize {
    buf[from..]
        .iter()
        .position(|&b| !is_digit(b))
        .map_or(buf.len(), |n| from + n)
}
