//! Textual dump of a trie for debugging.
use std::fmt;

use crate::builder::TrieBuilder;
use crate::errors::Result;
use crate::layout::{Layout, Preorder, Visit};

/// Indented listing of the levels and nodes of a trie, with the offset each
/// node takes in the compiled stream.
///
/// Created by [`TrieBuilder::dump()`].
pub struct TrieDump<'a> {
    trie: &'a TrieBuilder,
    layout: Layout,
}

impl TrieBuilder {
    /// Creates a textual dump of the trie.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`](crate::errors::KwTrieError) is returned when a node
    /// offset does not fit in the stream layout.
    pub fn dump(&self) -> Result<TrieDump<'_>> {
        Ok(TrieDump {
            trie: self,
            layout: Layout::assign(self)?,
        })
    }
}

impl fmt::Display for TrieDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for visit in Preorder::new(self.trie) {
            match visit {
                Visit::Index { index_id, depth } => {
                    write!(f, "{:indent$}Level {depth} index: ", "", indent = depth * 2)?;
                    let siblings = self.trie.edge_index(index_id).nodes();
                    if siblings.is_empty() {
                        write!(f, "(empty)")?;
                    }
                    for &node_id in siblings {
                        let lead = self.trie.node(node_id).label()[0];
                        write!(f, "{}", std::ascii::escape_default(lead))?;
                    }
                    writeln!(f)?;
                }
                Visit::Node { node_id, depth } => {
                    let node = self.trie.node(node_id);
                    write!(
                        f,
                        "{:indent$}Level {depth} node: {} byte offset: {}",
                        "",
                        node.label().escape_ascii(),
                        self.layout.offset(node_id).get(),
                        indent = depth * 2,
                    )?;
                    match node.value() {
                        Some(value) => write!(f, " value: {value}")?,
                        None => write!(f, " value: NONE")?,
                    }
                    if node.down().is_some() {
                        write!(f, " D")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
