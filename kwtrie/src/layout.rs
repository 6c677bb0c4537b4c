use crate::builder::{IndexId, NodeId, TrieBuilder};
use crate::errors::{KwTrieError, Result};
use crate::format::{index_block_len, MAX_OFFSET, MAX_SIBLINGS, VALUE_LEN};
use crate::num::U23;

/// A step of the pre-order walk over a trie.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Visit {
    /// Entering an index level, before any of its siblings.
    Index { index_id: IndexId, depth: usize },

    /// A node, visited before its whole subtree and its next sibling.
    Node { node_id: NodeId, depth: usize },
}

/// Pre-order depth-first walk over a trie.
///
/// Both the layout and the serialization consume this walk, so that every
/// node is emitted exactly at the offset computed for it.
pub(crate) struct Preorder<'a> {
    trie: &'a TrieBuilder,
    // (index, position of the next sibling)
    stack: Vec<(IndexId, usize)>,
    pending: Option<IndexId>,
}

impl<'a> Preorder<'a> {
    pub(crate) fn new(trie: &'a TrieBuilder) -> Self {
        Self {
            trie,
            stack: vec![],
            pending: Some(IndexId::ROOT),
        }
    }
}

impl Iterator for Preorder<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        if let Some(index_id) = self.pending.take() {
            self.stack.push((index_id, 0));
            return Some(Visit::Index {
                index_id,
                depth: self.stack.len() - 1,
            });
        }
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let (index_id, pos) = self.stack.last_mut()?;
            let siblings = self.trie.edge_index(*index_id).nodes();
            if let Some(&node_id) = siblings.get(*pos) {
                *pos += 1;
                self.pending = self.trie.node(node_id).down();
                return Some(Visit::Node { node_id, depth });
            }
            self.stack.pop();
        }
    }
}

/// Byte offsets of all nodes in the compiled stream.
pub(crate) struct Layout {
    offsets: Vec<U23>,
    len: usize,
}

impl Layout {
    /// Computes the offset of every node tail by walking the trie in pre-order.
    ///
    /// An index block is reserved as soon as its level is entered, before any
    /// of its siblings gets a position.
    pub(crate) fn assign(trie: &TrieBuilder) -> Result<Self> {
        let mut offsets = vec![];
        offsets.try_reserve_exact(trie.num_nodes())?;
        offsets.resize(trie.num_nodes(), U23::default());

        let mut pos = 0;
        for visit in Preorder::new(trie) {
            match visit {
                Visit::Index { index_id, .. } => {
                    let num_siblings = trie.edge_index(index_id).nodes().len();
                    if num_siblings > MAX_SIBLINGS {
                        return Err(KwTrieError::format_overflow(
                            "number of siblings",
                            num_siblings,
                            MAX_SIBLINGS,
                        ));
                    }
                    pos += index_block_len(num_siblings);
                }
                Visit::Node { node_id, .. } => {
                    let offset = u32::try_from(pos)
                        .ok()
                        .and_then(U23::new)
                        .ok_or_else(|| {
                            KwTrieError::format_overflow("node offset", pos, MAX_OFFSET)
                        })?;
                    offsets[node_id.index()] = offset;
                    let node = trie.node(node_id);
                    pos += node.tail().len();
                    if node.value().is_some() {
                        pos += VALUE_LEN;
                    }
                }
            }
        }
        Ok(Self { offsets, len: pos })
    }

    #[inline(always)]
    pub(crate) fn offset(&self, node_id: NodeId) -> U23 {
        self.offsets[node_id.index()]
    }

    /// Gets the total length of the stream.
    #[inline(always)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }
}
