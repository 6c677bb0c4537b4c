use crate::builder::TrieBuilder;
use crate::errors::Result;
use crate::format::IndexEntry;
use crate::layout::{Layout, Preorder, Visit};
use crate::num::U15;

/// Role of an emitted byte, used to render source literals readably.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ByteKind {
    /// A byte of an edge label.
    Label,

    /// A count, offset, length, or value byte.
    Numeric,
}

/// Destination of the serialized bytes.
pub(crate) trait ByteSink {
    fn put(&mut self, byte: u8, kind: ByteKind) -> Result<()>;

    fn put_all(&mut self, bytes: &[u8], kind: ByteKind) -> Result<()> {
        for &b in bytes {
            self.put(b, kind)?;
        }
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    #[inline(always)]
    fn put(&mut self, byte: u8, _kind: ByteKind) -> Result<()> {
        self.push(byte);
        Ok(())
    }

    #[inline(always)]
    fn put_all(&mut self, bytes: &[u8], _kind: ByteKind) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Replays the walk of [`Layout::assign()`] and emits the stream.
pub(crate) struct Serializer<'a> {
    trie: &'a TrieBuilder,
    layout: &'a Layout,
}

impl<'a> Serializer<'a> {
    pub(crate) const fn new(trie: &'a TrieBuilder, layout: &'a Layout) -> Self {
        Self { trie, layout }
    }

    pub(crate) fn emit<S>(&self, sink: &mut S) -> Result<()>
    where
        S: ByteSink,
    {
        for visit in Preorder::new(self.trie) {
            match visit {
                Visit::Index { index_id, .. } => {
                    let siblings = self.trie.edge_index(index_id).nodes();
                    // Checked by the layout.
                    sink.put(siblings.len() as u8, ByteKind::Numeric)?;
                    for &node_id in siblings {
                        let node = self.trie.node(node_id);
                        // Keywords longer than a label tail can hold are rejected on insertion.
                        let tail_len = U15::truncate(node.tail().len() as u16);
                        let entry = IndexEntry::from_parts(
                            node.label()[0],
                            self.layout.offset(node_id),
                            tail_len,
                            node.value().is_some(),
                            node.down().is_some(),
                        );
                        let raw = entry.encode();
                        sink.put(raw[0], ByteKind::Label)?;
                        sink.put_all(&raw[1..], ByteKind::Numeric)?;
                    }
                }
                Visit::Node { node_id, .. } => {
                    let node = self.trie.node(node_id);
                    sink.put_all(node.tail(), ByteKind::Label)?;
                    if let Some(value) = node.value() {
                        sink.put_all(&value.to_be_bytes(), ByteKind::Numeric)?;
                    }
                }
            }
        }
        Ok(())
    }
}
