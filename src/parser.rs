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

use tracing::debug;
use tracing::trace;

use super::chars;
use super::constants::*;
use super::document::Document;
use super::error::Error;
use super::error::ParseErrorCode;
use super::error::Result;
use super::node::Node;
use super::node::NodeArena;
use super::node::NodeIndex;
use super::node::NodeKind;
use super::number::scan_number;
use super::options::DecoderOptions;
use super::util::decode_short_escape;
use super::util::encode_utf8;
use super::util::unescape_unicode;

/// Decodes JSON text in place with the default limits.
///
/// String escapes are rewritten inside `buf`, so the buffer holds
/// unspecified bytes after a failed decode and must not be decoded again.
pub fn decode_inplace(buf: &mut [u8]) -> Result<Document<'_>> {
    Decoder::new().decode_inplace(buf)
}

/// Checks whether `text` is a single valid JSON value under the default
/// limits. The input is copied, so it is never modified.
pub fn is_valid<T: AsRef<[u8]>>(text: T) -> bool {
    is_valid_with(text, DEFAULT_DEPTH_LIMIT, DEFAULT_NODE_LIMIT)
}

/// Like [`is_valid`], with explicit depth and node limits.
pub fn is_valid_with<T: AsRef<[u8]>>(text: T, depth_limit: u16, node_limit: u32) -> bool {
    let mut scratch = text.as_ref().to_vec();
    Decoder::new()
        .set_depth_limit(depth_limit)
        .set_node_limit(node_limit)
        .decode_inplace(&mut scratch)
        .is_ok()
}

/// A reusable JSON decoder.
///
/// The decoder carries its [`DecoderOptions`] from one decode to the next.
/// After each call [`byte_position`](Decoder::byte_position) reports where
/// it stopped: one past the consumed text on success, the error offset on
/// failure.
///
/// ```
/// use json_inplace::Decoder;
///
/// let mut buf = r#"{"name": "café", "tags": [1, 2]}"#.as_bytes().to_vec();
/// let mut decoder = Decoder::new();
/// decoder.set_depth_limit(8);
/// let doc = decoder.decode_inplace(&mut buf).unwrap();
/// let root = doc.root();
/// assert_eq!(root.get("name").as_str(), Some("café"));
/// assert_eq!(root.get("tags").len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: DecoderOptions,
    position: usize,
}

impl Decoder {
    pub fn new() -> Decoder {
        Decoder::default()
    }

    pub fn with_options(options: DecoderOptions) -> Decoder {
        Decoder {
            options,
            position: 0,
        }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Sets the deepest nesting level. See [`DecoderOptions::depth_limit`]
    /// for the stack it needs.
    pub fn set_depth_limit(&mut self, depth_limit: u16) -> &mut Self {
        self.options.depth_limit = depth_limit;
        self
    }

    pub fn set_node_limit(&mut self, node_limit: u32) -> &mut Self {
        self.options.node_limit = node_limit;
        self
    }

    pub fn set_validate_utf8(&mut self, validate_utf8: bool) -> &mut Self {
        self.options.validate_utf8 = validate_utf8;
        self
    }

    pub fn depth_limit(&self) -> u16 {
        self.options.depth_limit
    }

    pub fn node_limit(&self) -> u32 {
        self.options.node_limit
    }

    /// Offset reached by the last decode, or 0 before the first one.
    pub fn byte_position(&self) -> usize {
        self.position
    }

    /// Decodes the JSON text in `buf`, rewriting escaped strings in place.
    ///
    /// On success the returned [`Document`] borrows `buf` until it is
    /// dropped. On failure `buf` holds unspecified bytes.
    pub fn decode_inplace<'a>(&mut self, buf: &'a mut [u8]) -> Result<Document<'a>> {
        trace!(
            len = buf.len(),
            depth_limit = self.options.depth_limit,
            node_limit = self.options.node_limit,
            "decode start"
        );
        let mut parser = Parser::new(buf, &self.options);
        match parser.parse() {
            Ok(()) => {
                self.position = parser.idx;
                let (source, arena) = parser.into_parts();
                trace!(node_count = arena.len(), "decode finished");
                Ok(Document::new(source, arena))
            }
            Err(err) => {
                self.position = err.position().unwrap_or(parser.idx);
                debug!(error = %err, "decode failed");
                Err(err)
            }
        }
    }
}

// Recursive descent over a mutable buffer.
// Inspired by `https://github.com/jorgecarleitao/json-deserializer`
struct Parser<'a, 'o> {
    buf: &'a mut [u8],
    idx: usize,
    arena: NodeArena,
    options: &'o DecoderOptions,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn new(buf: &'a mut [u8], options: &'o DecoderOptions) -> Parser<'a, 'o> {
        Self {
            buf,
            idx: 0,
            arena: NodeArena::new(),
            options,
        }
    }

    fn into_parts(self) -> (&'a [u8], NodeArena) {
        (self.buf, self.arena)
    }

    fn parse(&mut self) -> Result<()> {
        self.parse_json_value(0)?;
        self.skip_whitespace();
        if self.idx < self.buf.len() {
            return Err(self.error(ParseErrorCode::TrailingCharacters));
        }
        Ok(())
    }

    fn parse_json_value(&mut self, depth: u32) -> Result<NodeIndex> {
        self.skip_whitespace();
        if depth > self.options.depth_limit as u32 {
            debug!(depth, pos = self.idx, "depth limit exceeded");
            return Err(self.error(ParseErrorCode::DepthLimitExceeded));
        }
        let c = self.next()?;
        match c {
            b'n' => self.parse_json_literal(LITERAL_NULL, NodeKind::Null),
            b't' => self.parse_json_literal(LITERAL_TRUE, NodeKind::True),
            b'f' => self.parse_json_literal(LITERAL_FALSE, NodeKind::False),
            b'0'..=b'9' | b'-' => self.parse_json_number(),
            b'"' => self.parse_json_string(false),
            b'[' => self.parse_json_array(depth),
            b'{' => self.parse_json_object(depth),
            _ => Err(self.error(ParseErrorCode::UnexpectedCharacter)),
        }
    }

    #[inline]
    fn next(&self) -> Result<u8> {
        match self.buf.get(self.idx) {
            Some(c) => Ok(*c),
            None => Err(self.error(ParseErrorCode::UnexpectedEndOfInput)),
        }
    }

    #[inline]
    fn must_is(&mut self, c: u8) -> Result<()> {
        if self.next()? != c {
            return Err(self.error(ParseErrorCode::UnexpectedCharacter));
        }
        self.step();
        Ok(())
    }

    #[inline]
    fn step(&mut self) {
        self.idx += 1;
    }

    fn error(&self, code: ParseErrorCode) -> Error {
        Error::Syntax(code, self.idx)
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        self.idx = chars::skip_whitespace(self.buf, self.idx);
    }

    /// Appends a node unless the arena is full. `pos` is the offset reported
    /// if it is.
    fn make_node(&mut self, node: Node, pos: usize) -> Result<NodeIndex> {
        if self.arena.len() >= self.options.node_limit as usize {
            debug!(node_limit = self.options.node_limit, pos, "node limit exceeded");
            return Err(Error::Syntax(ParseErrorCode::NodeLimitExceeded, pos));
        }
        Ok(self.arena.append(node))
    }

    fn parse_json_literal(&mut self, literal: &[u8], kind: NodeKind) -> Result<NodeIndex> {
        let start = self.idx;
        for c in literal {
            self.must_is(*c)?;
        }
        self.make_node(Node::new(kind, start, literal.len()), start)
    }

    /// Numbers keep their raw literal; conversion happens on access.
    fn parse_json_number(&mut self) -> Result<NodeIndex> {
        let start = self.idx;
        let end =
            scan_number(self.buf, start).map_err(|(code, pos)| Error::Syntax(code, pos))?;
        self.idx = end;
        self.make_node(Node::new(NodeKind::Number, start, end - start), start)
    }

    /// Parses a string starting at its opening quote.
    ///
    /// The decoded payload is written back over the source starting right
    /// after the opening quote. `write` never passes `read`, because every
    /// escape decodes to fewer bytes than its source: two bytes become one,
    /// six become at most three, and twelve become four.
    fn parse_json_string(&mut self, is_key: bool) -> Result<NodeIndex> {
        let quote = self.idx;
        let start = quote + 1;
        let mut read = chars::skip_plain(self.buf, start);
        let mut write = read;

        loop {
            let Some(&c) = self.buf.get(read) else {
                return Err(Error::Syntax(
                    ParseErrorCode::UnterminatedString,
                    self.buf.len(),
                ));
            };
            match c {
                b'"' => break,
                b'\\' => {
                    let Some(&escaped) = self.buf.get(read + 1) else {
                        return Err(Error::Syntax(
                            ParseErrorCode::UnterminatedString,
                            self.buf.len(),
                        ));
                    };
                    if escaped == b'u' {
                        let (code_point, consumed) =
                            unescape_unicode(self.buf, read).map_err(|code| match code {
                                ParseErrorCode::UnterminatedString => {
                                    Error::Syntax(code, self.buf.len())
                                }
                                _ => Error::Syntax(code, read),
                            })?;
                        let written = encode_utf8(code_point, &mut self.buf[write..read + consumed])
                            .ok_or(Error::Syntax(ParseErrorCode::InvalidCodepointEscape, read))?;
                        write += written;
                        read += consumed;
                    } else {
                        let byte = decode_short_escape(escaped).ok_or(Error::Syntax(
                            ParseErrorCode::UnexpectedCharacter,
                            read + 1,
                        ))?;
                        self.buf[write] = byte;
                        write += 1;
                        read += 2;
                    }
                }
                _ => {
                    debug_assert!(chars::is_control(c));
                    return Err(Error::Syntax(ParseErrorCode::UnexpectedCharacter, read));
                }
            }

            let end = chars::skip_plain(self.buf, read);
            if write != read {
                self.buf.copy_within(read..end, write);
            }
            write += end - read;
            read = end;
        }
        self.idx = read + 1;

        if self.options.validate_utf8 && std::str::from_utf8(&self.buf[start..write]).is_err() {
            return Err(Error::Syntax(ParseErrorCode::InvalidUtf8, quote));
        }
        let node = if is_key {
            Node::key(start, write - start)
        } else {
            Node::new(NodeKind::String, start, write - start)
        };
        self.make_node(node, quote)
    }

    fn parse_json_array(&mut self, depth: u32) -> Result<NodeIndex> {
        let start = self.idx;
        let array = self.make_node(Node::new(NodeKind::Array, start, 0), start)?;
        self.step();
        self.skip_whitespace();
        if self.next()? == b']' {
            self.step();
            return Ok(array);
        }

        let mut prev = None;
        loop {
            let value = self.parse_json_value(depth + 1)?;
            self.arena.link_child(array, prev, value);
            prev = Some(value);

            self.skip_whitespace();
            match self.next()? {
                b',' => self.step(),
                b']' => {
                    self.step();
                    return Ok(array);
                }
                _ => return Err(self.error(ParseErrorCode::UnexpectedCharacter)),
            }
        }
    }

    /// Each member becomes a key node whose only child is the value.
    fn parse_json_object(&mut self, depth: u32) -> Result<NodeIndex> {
        let start = self.idx;
        let object = self.make_node(Node::new(NodeKind::Object, start, 0), start)?;
        self.step();
        self.skip_whitespace();
        if self.next()? == b'}' {
            self.step();
            return Ok(object);
        }

        let mut prev = None;
        loop {
            if self.next()? != b'"' {
                return Err(self.error(ParseErrorCode::UnexpectedCharacter));
            }
            let key = self.parse_json_string(true)?;

            self.skip_whitespace();
            self.must_is(b':')?;

            let value = self.parse_json_value(depth + 1)?;
            self.arena.link_child(key, None, value);
            self.arena.link_child(object, prev, key);
            prev = Some(key);

            self.skip_whitespace();
            match self.next()? {
                b',' => {
                    self.step();
                    self.skip_whitespace();
                }
                b'}' => {
                    self.step();
                    return Ok(object);
                }
                _ => return Err(self.error(ParseErrorCode::UnexpectedCharacter)),
            }
        }
    }
}
