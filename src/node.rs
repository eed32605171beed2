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

use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroU32;

use crate::constants::*;

/// The JSON type of a decoded node.
///
/// Object keys are `String` nodes flagged as keys, see [`NodeRef::is_key`](crate::NodeRef::is_key).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    True,
    False,
    String,
    Number,
    Array,
    Object,
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Null => TYPE_NULL,
            NodeKind::True | NodeKind::False => TYPE_BOOLEAN,
            NodeKind::String => TYPE_STRING,
            NodeKind::Number => TYPE_NUMBER,
            NodeKind::Array => TYPE_ARRAY,
            NodeKind::Object => TYPE_OBJECT,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, NodeKind::Array | NodeKind::Object)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Sub-classification of a number literal, derived from its characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// An integer literal with a leading `-`.
    SignedIntegral,
    /// An integer literal without sign.
    UnsignedIntegral,
    /// A literal with a fraction or an exponent.
    FloatingPoint,
}

impl NumberKind {
    /// Classifies a literal that already passed the number grammar.
    pub(crate) fn classify(literal: &[u8]) -> NumberKind {
        if literal.iter().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            NumberKind::FloatingPoint
        } else if literal.first() == Some(&b'-') {
            NumberKind::SignedIntegral
        } else {
            NumberKind::UnsignedIntegral
        }
    }
}

/// Index of a node inside its [`NodeArena`]. The root is always at 0.
pub(crate) type NodeIndex = u32;

/// Link to a child or sibling. The root can never be a child or a sibling,
/// so index 0 doubles as "none" and the link stays four bytes wide.
pub(crate) type NodeLink = Option<NonZeroU32>;

#[inline]
fn link_index(link: NodeLink) -> Option<NodeIndex> {
    link.map(NonZeroU32::get)
}

/// One fixed-size record of the flat tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) is_key: bool,
    /// Byte range of the decoded text inside the source buffer.
    pub(crate) start: usize,
    pub(crate) len: usize,
    pub(crate) child_count: u32,
    pub(crate) first_child: NodeLink,
    pub(crate) next_sibling: NodeLink,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, start: usize, len: usize) -> Node {
        Node {
            kind,
            is_key: false,
            start,
            len,
            child_count: 0,
            first_child: None,
            next_sibling: None,
        }
    }

    pub(crate) fn key(start: usize, len: usize) -> Node {
        Node {
            is_key: true,
            ..Node::new(NodeKind::String, start, len)
        }
    }

    #[inline]
    pub(crate) fn first_child(&self) -> Option<NodeIndex> {
        link_index(self.first_child)
    }

    #[inline]
    pub(crate) fn next_sibling(&self) -> Option<NodeIndex> {
        link_index(self.next_sibling)
    }
}

/// Append-only store of [`Node`]s. Nodes are never moved or removed, so an
/// index stays valid for as long as the arena lives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub(crate) fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node and returns its index. Callers bound the arena by the
    /// decoder's node limit, which is a `u32`.
    #[inline]
    pub(crate) fn append(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as NodeIndex;
        self.nodes.push(node);
        index
    }

    #[inline]
    pub(crate) fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index as usize)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index as usize)
    }

    /// Links `child` as the last child of `parent`. `prev` is the previously
    /// linked child of `parent`, if any.
    pub(crate) fn link_child(
        &mut self,
        parent: NodeIndex,
        prev: Option<NodeIndex>,
        child: NodeIndex,
    ) {
        let link = NonZeroU32::new(child);
        debug_assert!(link.is_some(), "the root cannot be a child");
        match prev.and_then(|prev| self.get_mut(prev)) {
            Some(prev) => prev.next_sibling = link,
            None => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.first_child = link;
                }
            }
        }
        if let Some(parent) = self.get_mut(parent) {
            parent.child_count += 1;
        }
    }

    /// Returns the `n`-th child of `parent`, walking the sibling chain.
    pub(crate) fn child_at(&self, parent: NodeIndex, n: usize) -> Option<NodeIndex> {
        let node = self.get(parent)?;
        if n >= node.child_count as usize {
            return None;
        }
        let mut current = node.first_child()?;
        for _ in 0..n {
            current = self.sibling_after(current)?;
        }
        Some(current)
    }

    #[inline]
    pub(crate) fn sibling_after(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get(index)?.next_sibling()
    }
}
