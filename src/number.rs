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

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use ordered_float::OrderedFloat;
use serde::de;
use serde::de::Deserialize;
use serde::de::Deserializer;
use serde::de::Visitor;
use serde::ser::Serialize;
use serde::ser::Serializer;

use crate::chars::skip_digits;
use crate::error::ParseErrorCode;
use crate::node::NumberKind;

/// Scans an RFC 8259 number literal starting at `buf[start]` and returns the
/// offset one past its last byte.
///
/// Only the grammar is checked. Magnitude is never looked at, so a literal
/// of any length is accepted here and only fails later, in a conversion.
pub(crate) fn scan_number(buf: &[u8], start: usize) -> Result<usize, (ParseErrorCode, usize)> {
    let mut idx = start;
    if buf.get(idx) == Some(&b'-') {
        idx += 1;
    }

    // Integer part: a single `0`, or a non-zero digit followed by digits.
    match buf.get(idx) {
        Some(b'0') => idx += 1,
        Some(b'1'..=b'9') => idx = skip_digits(buf, idx + 1),
        _ => return Err(digit_error(buf, idx)),
    }

    // Fraction
    if buf.get(idx) == Some(&b'.') {
        idx = expect_digits(buf, idx + 1)?;
    }

    // Exponent
    if matches!(buf.get(idx), Some(b'e' | b'E')) {
        idx += 1;
        if matches!(buf.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        idx = expect_digits(buf, idx)?;
    }
    Ok(idx)
}

#[inline]
fn expect_digits(buf: &[u8], idx: usize) -> Result<usize, (ParseErrorCode, usize)> {
    let end = skip_digits(buf, idx);
    if end == idx {
        return Err(digit_error(buf, idx));
    }
    Ok(end)
}

#[inline]
fn digit_error(buf: &[u8], idx: usize) -> (ParseErrorCode, usize) {
    if idx >= buf.len() {
        (ParseErrorCode::UnexpectedEndOfInput, idx)
    } else {
        (ParseErrorCode::InvalidNumberLiteral, idx)
    }
}

/// Checks whether the whole of `text` is a JSON number literal.
pub fn is_number(text: &[u8]) -> bool {
    !text.is_empty() && scan_number(text, 0) == Ok(text.len())
}

/// Checks whether the whole of `text` is a JSON number without fraction or exponent.
pub fn is_integral(text: &[u8]) -> bool {
    is_number(text) && NumberKind::classify(text) != NumberKind::FloatingPoint
}

/// Checks whether the whole of `text` is a JSON number with a fraction or an exponent.
pub fn is_floating_point(text: &[u8]) -> bool {
    is_number(text) && NumberKind::classify(text) == NumberKind::FloatingPoint
}

/// A JSON number converted out of its literal text.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// 64-bit signed integer, for negative whole numbers
    Int64(i64),
    /// 64-bit unsigned integer, for non-negative whole numbers
    UInt64(u64),
    /// 64-bit floating-point, for fractions, exponents and integers too large for 64 bits
    Float64(f64),
}

impl Number {
    /// Converts a literal that passed [`scan_number`].
    ///
    /// Integral literals become `UInt64` or `Int64` when they fit and fall
    /// back to `Float64` otherwise. Literals beyond the `f64` range yield
    /// `None`.
    pub(crate) fn from_literal(literal: &str) -> Option<Number> {
        let int = match NumberKind::classify(literal.as_bytes()) {
            NumberKind::UnsignedIntegral => literal.parse::<u64>().ok().map(Number::UInt64),
            NumberKind::SignedIntegral => literal.parse::<i64>().ok().map(Number::Int64),
            NumberKind::FloatingPoint => None,
        };
        int.or_else(|| {
            fast_float2::parse::<f64, _>(literal)
                .ok()
                .filter(|v| v.is_finite())
                .map(Number::Float64)
        })
    }

    /// Returns the i64 representation of the number, if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int64(v) => Some(*v),
            Number::UInt64(v) => i64::try_from(*v).ok(),
            Number::Float64(_) => None,
        }
    }

    /// Returns the u64 representation of the number, if possible.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int64(v) => u64::try_from(*v).ok(),
            Number::UInt64(v) => Some(*v),
            Number::Float64(_) => None,
        }
    }

    /// Returns the f64 representation of the number.
    ///
    /// This may lose precision for very large integers.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int64(v) => *v as f64,
            Number::UInt64(v) => *v as f64,
            Number::Float64(v) => *v,
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl Visitor<'_> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number (int64, uint64, or float64)")
            }

            fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Int64(v))
            }

            fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::UInt64(v))
            }

            fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Number::Float64(v))
            }
        }
        deserializer.deserialize_any(NumberVisitor)
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Number::Int64(v) => serializer.serialize_i64(*v),
            Number::UInt64(v) => serializer.serialize_u64(*v),
            Number::Float64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl Default for Number {
    #[inline]
    fn default() -> Self {
        Number::UInt64(0)
    }
}

impl PartialEq for Number {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    /// Integers compare exactly across signedness; anything involving a
    /// float compares as `f64`, with NaN ordered by `OrderedFloat`.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int64(l), Number::Int64(r)) => l.cmp(r),
            (Number::UInt64(l), Number::UInt64(r)) => l.cmp(r),
            (Number::Int64(l), Number::UInt64(r)) => {
                if *l < 0 {
                    Ordering::Less
                } else {
                    (*l as u64).cmp(r)
                }
            }
            (Number::UInt64(l), Number::Int64(r)) => {
                if *r < 0 {
                    Ordering::Greater
                } else {
                    l.cmp(&(*r as u64))
                }
            }
            (_, _) => OrderedFloat(self.as_f64()).cmp(&OrderedFloat(other.as_f64())),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Number::Int64(v) => {
                let mut buffer = itoa::Buffer::new();
                let s = buffer.format(*v);
                write!(f, "{}", s)
            }
            Number::UInt64(v) => {
                let mut buffer = itoa::Buffer::new();
                let s = buffer.format(*v);
                write!(f, "{}", s)
            }
            Number::Float64(v) => {
                let mut buffer = ryu::Buffer::new();
                let s = buffer.format(*v);
                write!(f, "{}", s)
            }
        }
    }
}
