use crate::errors::{KwTrieError, Result};
use crate::format::{MAX_KEYWORD_LEN, MAX_SIBLINGS};
use crate::layout::{Layout, Preorder, Visit};
use crate::literal::{LiteralStyle, LiteralWriter};
use crate::serializer::Serializer;
use crate::stream::CompiledStream;

/// Handle of an [`EdgeNode`] in the arena of [`TrieBuilder`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of an [`EdgeIndex`] in the arena of [`TrieBuilder`].
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct IndexId(u32);

impl IndexId {
    pub(crate) const ROOT: Self = Self(0);

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A path-compressed edge of the trie.
#[derive(Debug)]
pub(crate) struct EdgeNode {
    label: Vec<u8>,
    value: Option<u16>,
    down: Option<IndexId>,
}

impl EdgeNode {
    #[inline(always)]
    pub(crate) fn label(&self) -> &[u8] {
        &self.label
    }

    /// Gets the label without its leading byte, which is kept in the index entry.
    #[inline(always)]
    pub(crate) fn tail(&self) -> &[u8] {
        &self.label[1..]
    }

    #[inline(always)]
    pub(crate) const fn value(&self) -> Option<u16> {
        self.value
    }

    #[inline(always)]
    pub(crate) const fn down(&self) -> Option<IndexId> {
        self.down
    }
}

/// Siblings under one parent path, sorted by the leading bytes of their labels.
#[derive(Debug, Default)]
pub(crate) struct EdgeIndex {
    nodes: Vec<NodeId>,
}

impl EdgeIndex {
    #[inline(always)]
    pub(crate) fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }
}

/// Builder of a keyword trie.
///
/// Keywords are inserted one at a time into a path-compressed trie, splitting
/// edges as needed. [`TrieBuilder::build()`] then lays the trie out and
/// serializes it into a [`CompiledStream`].
#[derive(Debug)]
pub struct TrieBuilder {
    nodes: Vec<EdgeNode>,
    indices: Vec<EdgeIndex>,
    num_keywords: usize,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieBuilder {
    /// Creates a builder holding only an empty root index.
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            indices: vec![EdgeIndex::default()],
            num_keywords: 0,
        }
    }

    /// Creates a builder from `(keyword, value)` records, inserted in the given order.
    ///
    /// # Errors
    ///
    /// The first error returned by [`TrieBuilder::insert()`] aborts the whole build.
    pub fn from_records<I, K>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: AsRef<[u8]>,
    {
        let mut builder = Self::new();
        for (keyword, value) in records {
            builder.insert(keyword, value)?;
        }
        Ok(builder)
    }

    /// Inserts a keyword with its value.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when
    ///  - `keyword` is empty,
    ///  - `value` or the keyword length does not fit in the stream layout,
    ///  - a level would hold more siblings than an index block can count,
    ///  - `keyword` is already in the trie (the first value is kept), or
    ///  - the arena cannot grow.
    ///
    /// The trie is not modified when an error is returned.
    pub fn insert<K>(&mut self, keyword: K, value: u32) -> Result<()>
    where
        K: AsRef<[u8]>,
    {
        let keyword = keyword.as_ref();
        if keyword.is_empty() {
            return Err(KwTrieError::invalid_argument(
                "keyword",
                "keyword must not be empty.",
            ));
        }
        let value = u16::try_from(value).map_err(|_| {
            KwTrieError::format_overflow("value", value as usize, usize::from(u16::MAX))
        })?;
        if keyword.len() > MAX_KEYWORD_LEN {
            return Err(KwTrieError::format_overflow(
                "keyword length",
                keyword.len(),
                MAX_KEYWORD_LEN,
            ));
        }

        // One insertion creates at most two nodes and one index.
        self.nodes.try_reserve(2)?;
        self.indices.try_reserve(1)?;

        let mut index_id = IndexId::ROOT;
        let mut matched = 0;
        loop {
            let rest = &keyword[matched..];
            let pos = match self.find(index_id, rest[0]) {
                Ok(pos) => pos,
                Err(pos) => {
                    let num_siblings = self.indices[index_id.index()].nodes.len();
                    if num_siblings >= MAX_SIBLINGS {
                        return Err(KwTrieError::format_overflow(
                            "number of siblings",
                            num_siblings + 1,
                            MAX_SIBLINGS,
                        ));
                    }
                    let leaf = self.push_node(rest, Some(value), None);
                    self.indices[index_id.index()].nodes.insert(pos, leaf);
                    break;
                }
            };

            let node_id = self.indices[index_id.index()].nodes[pos];
            let node = &self.nodes[node_id.index()];
            let label_len = node.label.len();
            let node_down = node.down;
            let match_len = common_prefix_len(rest, &node.label);

            if match_len == rest.len() && match_len == label_len {
                let node = &mut self.nodes[node_id.index()];
                if node.value.is_some() {
                    return Err(KwTrieError::duplicate_key(keyword));
                }
                node.value = Some(value);
                break;
            }

            if match_len == rest.len() {
                self.split(node_id, match_len);
                self.nodes[node_id.index()].value = Some(value);
                break;
            }

            matched += match_len;

            if match_len == label_len {
                if let Some(down) = node_down {
                    index_id = down;
                    continue;
                }
                let leaf = self.push_node(&keyword[matched..], Some(value), None);
                let down = self.push_index(vec![leaf]);
                self.nodes[node_id.index()].down = Some(down);
                break;
            }

            let down = self.split(node_id, match_len);
            let rest = &keyword[matched..];
            let (Ok(pos) | Err(pos)) = self.find(down, rest[0]);
            let leaf = self.push_node(rest, Some(value), None);
            self.indices[down.index()].nodes.insert(pos, leaf);
            break;
        }

        self.num_keywords += 1;
        Ok(())
    }

    /// Lays the trie out and serializes it into a compiled stream.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when a node offset does not fit in the
    /// stream layout.
    pub fn build(&self) -> Result<CompiledStream> {
        let layout = Layout::assign(self)?;
        let mut data = vec![];
        data.try_reserve_exact(layout.len())?;
        Serializer::new(self, &layout).emit(&mut data)?;
        debug_assert_eq!(data.len(), layout.len());
        Ok(CompiledStream::new_unchecked(data))
    }

    /// Serializes the trie as a source literal of a byte array named `name`.
    ///
    /// The emitted bytes are identical to those of [`TrieBuilder::build()`].
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when
    ///  - `name` is not a valid identifier,
    ///  - a node offset does not fit in the stream layout, or
    ///  - writing to `wtr` fails.
    pub fn write_literal<W>(&self, wtr: W, style: LiteralStyle, name: &str) -> Result<usize>
    where
        W: std::io::Write,
    {
        let layout = Layout::assign(self)?;
        let mut lit = LiteralWriter::new(wtr, style, name, layout.len())?;
        Serializer::new(self, &layout).emit(&mut lit)?;
        lit.finish()
    }

    /// Gets the number of inserted keywords.
    #[inline(always)]
    pub fn num_keywords(&self) -> usize {
        self.num_keywords
    }

    /// Gets the number of edge nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Gets the number of index levels, including the root index.
    #[inline(always)]
    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// Gets the maximum number of index levels on a path from the root.
    pub fn max_depth(&self) -> usize {
        Preorder::new(self)
            .filter_map(|visit| match visit {
                Visit::Index { depth, .. } => Some(depth + 1),
                Visit::Node { .. } => None,
            })
            .max()
            .unwrap_or(1)
    }

    #[inline(always)]
    pub(crate) fn node(&self, node_id: NodeId) -> &EdgeNode {
        &self.nodes[node_id.index()]
    }

    #[inline(always)]
    pub(crate) fn edge_index(&self, index_id: IndexId) -> &EdgeIndex {
        &self.indices[index_id.index()]
    }

    /// Searches the siblings of `index_id` for the one starting with `lead`.
    ///
    /// Returns the position of the sibling, or the position at which a new
    /// sibling starting with `lead` keeps the order.
    fn find(&self, index_id: IndexId, lead: u8) -> std::result::Result<usize, usize> {
        self.indices[index_id.index()]
            .nodes
            .binary_search_by_key(&lead, |&node_id| self.nodes[node_id.index()].label[0])
    }

    /// Splits the label of `node_id` at `at`.
    ///
    /// The node keeps the prefix and loses its value and child index, which
    /// move to a new node with the suffix, placed in a new child index.
    fn split(&mut self, node_id: NodeId, at: usize) -> IndexId {
        debug_assert!(0 < at && at < self.nodes[node_id.index()].label.len());
        let node = &mut self.nodes[node_id.index()];
        let suffix = node.label.split_off(at);
        let value = node.value.take();
        let down = node.down.take();
        let child = self.push_node_owned(suffix, value, down);
        let child_index = self.push_index(vec![child]);
        self.nodes[node_id.index()].down = Some(child_index);
        child_index
    }

    fn push_node(&mut self, label: &[u8], value: Option<u16>, down: Option<IndexId>) -> NodeId {
        self.push_node_owned(label.to_vec(), value, down)
    }

    fn push_node_owned(
        &mut self,
        label: Vec<u8>,
        value: Option<u16>,
        down: Option<IndexId>,
    ) -> NodeId {
        debug_assert!(!label.is_empty());
        // The number of nodes is bounded by the total length of the keywords.
        let node_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(EdgeNode { label, value, down });
        node_id
    }

    fn push_index(&mut self, nodes: Vec<NodeId>) -> IndexId {
        let index_id = IndexId(self.indices.len() as u32);
        self.indices.push(EdgeIndex { nodes });
        index_id
    }
}

/// Gets the length of the common prefix of `a` and `b`, whose leading bytes
/// are already known to match.
#[inline(always)]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    debug_assert_eq!(a[0], b[0]);
    1 + a[1..]
        .iter()
        .zip(&b[1..])
        .take_while(|(x, y)| x == y)
        .count()
}
