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

//! `json_inplace` is a strict RFC 8259 `JSON` decoder that works inside the caller's buffer.
//!
//! Decoding builds a flat tree of fixed-size nodes that point back into the input. String
//! escapes are rewritten in place, so a string's decoded text is a plain slice of the buffer and
//! no string or number is ever copied out.
//!
//! ## Features
//!
//! - Zero-copy: the only allocation is the node array, one entry per value and per object key.
//! - Strict: no comments, no trailing commas, no leading `+` or `0`, no raw control bytes.
//! - Bounded: depth and node limits turn hostile input into errors instead of stack or memory exhaustion.
//! - Precise errors: every failure carries a code and the byte offset where it was detected.
//!
//! ## Tree layout
//!
//! Nodes are stored in pre-order. Every container links to its first child and every child to
//! its next sibling. An object's children are its *key* nodes, and each key has exactly one
//! child, the value.
//!
//! ```text
//! {"a": [1, true]}
//!
//! 0  object            children: 1
//! 1  key "a"           child: 2
//! 2  array             children: 3, 4
//! 3  number "1"
//! 4  true
//! ```
//!
//! ## Example
//!
//! ```
//! use json_inplace::decode_inplace;
//!
//! let mut buf = br#"{"One": 1, "Two": {"Three": "\ud83d\udc19"}}"#.to_vec();
//! let doc = decode_inplace(&mut buf).unwrap();
//! let root = doc.root();
//!
//! assert_eq!(root.get("One").to_u64(), Some(1));
//! assert_eq!(root.get("Two").get("Three").as_bytes(), b"\xF0\x9F\x90\x99");
//! assert!(root.get("Missing").get("Anything").is_empty());
//! ```

#![allow(clippy::uninlined_format_args)]

mod chars;
mod constants;
mod document;
mod error;
mod node;
mod number;
mod options;
mod parser;
mod util;

pub use constants::DEFAULT_DEPTH_LIMIT;
pub use constants::DEFAULT_NODE_LIMIT;
pub use document::Children;
pub use document::Document;
pub use document::Entries;
pub use document::Index;
pub use document::NodeRef;
pub use error::Error;
pub use error::ParseErrorCode;
pub use error::Result;
pub use node::NodeKind;
pub use node::NumberKind;
pub use number::is_floating_point;
pub use number::is_integral;
pub use number::is_number;
pub use number::Number;
pub use options::DecoderOptions;
pub use parser::decode_inplace;
pub use parser::is_valid;
pub use parser::is_valid_with;
pub use parser::Decoder;
