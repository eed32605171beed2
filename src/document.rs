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

use std::fmt::Debug;
use std::fmt::Formatter;
use std::iter::FusedIterator;

use num_traits::PrimInt;

use crate::node::Node;
use crate::node::NodeArena;
use crate::node::NodeIndex;
use crate::node::NodeKind;
use crate::node::NumberKind;
use crate::number::Number;

/// The result of a successful decode.
///
/// A `Document` borrows the buffer it was decoded from. String nodes point at
/// their unescaped bytes, which the decoder wrote over the original escape
/// sequences, and number nodes point at the untouched literal. The buffer
/// stays borrowed until the `Document` is dropped, so node text can never be
/// observed after the buffer changes.
#[derive(Clone)]
pub struct Document<'a> {
    source: &'a [u8],
    arena: NodeArena,
}

impl<'a> Document<'a> {
    pub(crate) fn new(source: &'a [u8], arena: NodeArena) -> Document<'a> {
        debug_assert!(!arena.is_empty());
        Document { source, arena }
    }

    /// The top-level value.
    pub fn root(&self) -> NodeRef<'_, 'a> {
        NodeRef {
            doc: self,
            index: Some(0),
        }
    }

    /// Children of the root, in document order.
    pub fn iter(&self) -> Children<'_, 'a> {
        self.root().children()
    }

    /// Every node of the tree in pre-order, keys included.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeRef<'_, 'a>> + '_ {
        (0..self.arena.len() as NodeIndex).map(move |index| NodeRef {
            doc: self,
            index: Some(index),
        })
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// The decoded buffer. Escaped strings were compacted in place, so bytes
    /// between a string's decoded end and its closing quote are leftovers of
    /// the original escape sequences.
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    #[inline]
    fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.arena.get(index)
    }
}

impl PartialEq for Document<'_> {
    /// Two documents are equal when their trees are structurally equal,
    /// regardless of where in their buffers the text lives.
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl Eq for Document<'_> {}

impl Debug for Document<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("node_count", &self.node_count())
            .field("root", &self.root())
            .finish()
    }
}

impl<'d, 'a> IntoIterator for &'d Document<'a> {
    type Item = NodeRef<'d, 'a>;
    type IntoIter = Children<'d, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A lightweight handle to one node of a [`Document`].
///
/// A handle either refers to a node or is *empty*: the value returned for a
/// missing key or an out-of-range index. Empty is distinct from a present
/// JSON `null`, and every accessor on an empty handle yields another empty
/// handle or `None`, so lookups can be chained without checks.
#[derive(Clone, Copy)]
pub struct NodeRef<'d, 'a> {
    doc: &'d Document<'a>,
    index: Option<NodeIndex>,
}

impl<'d, 'a> NodeRef<'d, 'a> {
    #[inline]
    fn with(&self, index: Option<NodeIndex>) -> NodeRef<'d, 'a> {
        NodeRef {
            doc: self.doc,
            index,
        }
    }

    #[inline]
    fn node(&self) -> Option<&'d Node> {
        self.doc.node(self.index?)
    }

    /// The JSON type, or `None` for the empty handle.
    pub fn kind(&self) -> Option<NodeKind> {
        self.node().map(|node| node.kind)
    }

    /// Classifies a number node from its literal; `None` for every other kind.
    pub fn number_kind(&self) -> Option<NumberKind> {
        if self.is_number() {
            Some(NumberKind::classify(self.as_bytes()))
        } else {
            None
        }
    }

    /// True for the handle of a missing key or index.
    pub fn is_empty(&self) -> bool {
        self.node().is_none()
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Some(NodeKind::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind(), Some(NodeKind::True | NodeKind::False))
    }

    pub fn is_true(&self) -> bool {
        self.kind() == Some(NodeKind::True)
    }

    pub fn is_false(&self) -> bool {
        self.kind() == Some(NodeKind::False)
    }

    /// True for string values and object keys alike.
    pub fn is_string(&self) -> bool {
        self.kind() == Some(NodeKind::String)
    }

    /// True for the key nodes that are the direct children of an object.
    pub fn is_key(&self) -> bool {
        self.node().is_some_and(|node| node.is_key)
    }

    pub fn is_number(&self) -> bool {
        self.kind() == Some(NodeKind::Number)
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self.number_kind(),
            Some(NumberKind::SignedIntegral | NumberKind::UnsignedIntegral)
        )
    }

    pub fn is_signed_integral(&self) -> bool {
        self.number_kind() == Some(NumberKind::SignedIntegral)
    }

    pub fn is_unsigned_integral(&self) -> bool {
        self.number_kind() == Some(NumberKind::UnsignedIntegral)
    }

    pub fn is_floating_point(&self) -> bool {
        self.number_kind() == Some(NumberKind::FloatingPoint)
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Some(NodeKind::Array)
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Some(NodeKind::Object)
    }

    /// Number of immediate children. For an object this counts keys.
    pub fn len(&self) -> usize {
        self.node().map_or(0, |node| node.child_count as usize)
    }

    pub fn has_children(&self) -> bool {
        self.len() > 0
    }

    /// Looks up a child by position (`usize`) or by key (`&str`).
    ///
    /// On an array `get(i)` is the i-th element. On an object `get(i)` is the
    /// i-th *key* node, whose [`child`](Self::child) is the value, while
    /// `get("name")` goes straight to the value of the first key that
    /// matches. Keys are compared as decoded bytes with a linear scan.
    pub fn get<I: Index>(&self, index: I) -> NodeRef<'d, 'a> {
        index.index_into(*self)
    }

    /// The first child: the value of a key node, or the first element of a
    /// container.
    pub fn child(&self) -> NodeRef<'d, 'a> {
        self.with(self.node().and_then(Node::first_child))
    }

    /// Iterates over the immediate children in document order.
    pub fn children(&self) -> Children<'d, 'a> {
        Children {
            doc: self.doc,
            next: self.node().and_then(Node::first_child),
            remaining: self.len(),
        }
    }

    /// Iterates over `(key, value)` pairs of an object. Yields nothing for
    /// any other kind.
    pub fn entries(&self) -> Entries<'d, 'a> {
        let children = if self.is_object() {
            self.children()
        } else {
            self.with(None).children()
        };
        Entries { children }
    }

    /// The node's text: decoded bytes for strings and keys, the raw literal
    /// for numbers, `true` / `false` / `null` for literals, and nothing for
    /// containers and the empty handle.
    pub fn as_bytes(&self) -> &'a [u8] {
        let source: &'a [u8] = self.doc.source;
        match self.node() {
            Some(node) => &source[node.start..node.start + node.len],
            None => &[],
        }
    }

    /// The node's text as UTF-8, or `None` if it is not valid UTF-8 or the
    /// handle is empty.
    pub fn as_str(&self) -> Option<&'a str> {
        if self.is_empty() {
            return None;
        }
        std::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind()? {
            NodeKind::True => Some(true),
            NodeKind::False => Some(false),
            _ => None,
        }
    }

    /// Converts an integral number node to any primitive integer type.
    /// Returns `None` if the node is not integral or the value does not fit.
    /// `-0` is zero, so it converts to unsigned types too.
    pub fn to_integer<T: PrimInt>(&self) -> Option<T> {
        if !self.is_integral() {
            return None;
        }
        match self.as_str()? {
            "-0" => Some(T::zero()),
            literal => T::from_str_radix(literal, 10).ok(),
        }
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.to_integer()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer()
    }

    /// Converts any number node to `f64`. Literals whose magnitude is out of
    /// the `f64` range yield `None`.
    pub fn to_f64(&self) -> Option<f64> {
        if !self.is_number() {
            return None;
        }
        fast_float2::parse::<f64, _>(self.as_bytes())
            .ok()
            .filter(|v| v.is_finite())
    }

    pub fn to_number(&self) -> Option<Number> {
        if !self.is_number() {
            return None;
        }
        Number::from_literal(self.as_str()?)
    }
}

impl PartialEq for NodeRef<'_, '_> {
    /// Structural equality: kind, key flag, text and children, recursively.
    fn eq(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (None, None) => true,
            (Some(l), Some(r)) => {
                l.kind == r.kind
                    && l.is_key == r.is_key
                    && l.child_count == r.child_count
                    && self.as_bytes() == other.as_bytes()
                    && self.children().zip(other.children()).all(|(l, r)| l == r)
            }
            _ => false,
        }
    }
}

impl Eq for NodeRef<'_, '_> {}

impl Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Some(node) = self.node() else {
            return f.write_str("Empty");
        };
        match node.kind {
            NodeKind::Array => f.debug_list().entries(self.children()).finish(),
            NodeKind::Object => f
                .debug_map()
                .entries(
                    self.entries()
                        .map(|(key, value)| (String::from_utf8_lossy(key), value)),
                )
                .finish(),
            NodeKind::String => write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes())),
            _ => f.write_str(&String::from_utf8_lossy(self.as_bytes())),
        }
    }
}

impl<'d, 'a> IntoIterator for NodeRef<'d, 'a> {
    type Item = NodeRef<'d, 'a>;
    type IntoIter = Children<'d, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.children()
    }
}

/// Iterator over the immediate children of a node, following the sibling
/// links.
#[derive(Clone)]
pub struct Children<'d, 'a> {
    doc: &'d Document<'a>,
    next: Option<NodeIndex>,
    remaining: usize,
}

impl<'d, 'a> Iterator for Children<'d, 'a> {
    type Item = NodeRef<'d, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.doc.node(index).and_then(Node::next_sibling);
        self.remaining = self.remaining.saturating_sub(1);
        Some(NodeRef {
            doc: self.doc,
            index: Some(index),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Children<'_, '_> {}

impl FusedIterator for Children<'_, '_> {}

/// Iterator over the `(key, value)` pairs of an object.
#[derive(Clone)]
pub struct Entries<'d, 'a> {
    children: Children<'d, 'a>,
}

impl<'d, 'a> Iterator for Entries<'d, 'a> {
    type Item = (&'a [u8], NodeRef<'d, 'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.children.next()?;
        Some((key.as_bytes(), key.child()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_, '_> {}

/// Types that can select a child with [`NodeRef::get`].
///
/// Implemented for positions (`usize`) and keys (`str`, `String`).
pub trait Index: private::Sealed {
    #[doc(hidden)]
    fn index_into<'d, 'a>(&self, node: NodeRef<'d, 'a>) -> NodeRef<'d, 'a>;
}

impl Index for usize {
    fn index_into<'d, 'a>(&self, node: NodeRef<'d, 'a>) -> NodeRef<'d, 'a> {
        let index = node
            .index
            .and_then(|parent| node.doc.arena.child_at(parent, *self));
        node.with(index)
    }
}

impl Index for str {
    fn index_into<'d, 'a>(&self, node: NodeRef<'d, 'a>) -> NodeRef<'d, 'a> {
        node.entries()
            .find(|(key, _)| *key == self.as_bytes())
            .map_or(node.with(None), |(_, value)| value)
    }
}

impl Index for String {
    fn index_into<'d, 'a>(&self, node: NodeRef<'d, 'a>) -> NodeRef<'d, 'a> {
        self.as_str().index_into(node)
    }
}

impl<T> Index for &T
where
    T: ?Sized + Index,
{
    fn index_into<'d, 'a>(&self, node: NodeRef<'d, 'a>) -> NodeRef<'d, 'a> {
        (**self).index_into(node)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for usize {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl<T> Sealed for &T where T: ?Sized + Sealed {}
}
