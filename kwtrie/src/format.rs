//! Layout of the compiled stream.
//!
//! A stream is a sequence of index blocks and node tails. The root index
//! block is at offset 0.
//!
//! An index block consists of a one-byte sibling count followed by one
//! [`ENTRY_LEN`]-byte entry per sibling, ascending by leading byte:
//!
//! | bytes | field |
//! |---|---|
//! | 1 | leading byte of the edge label |
//! | 3 (big-endian) | 23-bit offset of the node tail; the top bit is set iff the node has a value |
//! | 2 (big-endian) | 15-bit label length minus one; the top bit is set iff the node has a child index |
//!
//! A node tail, placed at its offset, is the label without its leading byte,
//! then the big-endian 16-bit value if flagged, then the child index block if
//! flagged.

use crate::num::{U15, U23};

/// Length of the sibling count at the head of an index block.
pub const INDEX_HEADER_LEN: usize = 1;

/// Length of an index entry.
pub const ENTRY_LEN: usize = 6;

/// Length of a value stored after a node tail.
pub const VALUE_LEN: usize = 2;

/// Maximum number of siblings in an index block.
pub const MAX_SIBLINGS: usize = u8::MAX as usize;

/// Maximum length of a label tail, i.e., the label length minus one.
pub const MAX_TAIL_LEN: usize = U15::MAX.get() as usize;

/// Maximum length of a keyword.
pub const MAX_KEYWORD_LEN: usize = MAX_TAIL_LEN + 1;

/// Maximum offset of a node tail.
///
/// The top bit of the 24-bit offset field is the value flag.
pub const MAX_OFFSET: usize = U23::MAX.get() as usize;

const VALUE_FLAG: u8 = 0x80;
const CHILD_FLAG: u8 = 0x80;

/// Gets the number of bytes an index block with `num_siblings` entries occupies.
#[inline(always)]
pub const fn index_block_len(num_siblings: usize) -> usize {
    INDEX_HEADER_LEN + ENTRY_LEN * num_siblings
}

/// A decoded entry of an index block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexEntry {
    lead: u8,
    offset: U23,
    tail_len: U15,
    has_value: bool,
    has_child: bool,
}

impl IndexEntry {
    /// Creates a new entry, or `None` if `offset` or `tail_len` is out of range.
    pub const fn new(
        lead: u8,
        offset: u32,
        tail_len: u16,
        has_value: bool,
        has_child: bool,
    ) -> Option<Self> {
        let offset = match U23::new(offset) {
            Some(x) => x,
            None => return None,
        };
        let tail_len = match U15::new(tail_len) {
            Some(x) => x,
            None => return None,
        };
        Some(Self {
            lead,
            offset,
            tail_len,
            has_value,
            has_child,
        })
    }

    pub(crate) const fn from_parts(
        lead: u8,
        offset: U23,
        tail_len: U15,
        has_value: bool,
        has_child: bool,
    ) -> Self {
        Self {
            lead,
            offset,
            tail_len,
            has_value,
            has_child,
        }
    }

    /// Decodes an entry.
    #[inline(always)]
    pub const fn decode(raw: [u8; ENTRY_LEN]) -> Self {
        let offset = u32::from_be_bytes([0, raw[1], raw[2], raw[3]]);
        let tail_len = u16::from_be_bytes([raw[4], raw[5]]);
        Self {
            lead: raw[0],
            offset: U23::truncate(offset),
            tail_len: U15::truncate(tail_len),
            has_value: raw[1] & VALUE_FLAG != 0,
            has_child: raw[4] & CHILD_FLAG != 0,
        }
    }

    /// Encodes the entry.
    #[inline(always)]
    pub const fn encode(&self) -> [u8; ENTRY_LEN] {
        let offset = self.offset.get().to_be_bytes();
        let tail_len = self.tail_len.get().to_be_bytes();
        let value_flag = if self.has_value { VALUE_FLAG } else { 0 };
        let child_flag = if self.has_child { CHILD_FLAG } else { 0 };
        [
            self.lead,
            offset[1] | value_flag,
            offset[2],
            offset[3],
            tail_len[0] | child_flag,
            tail_len[1],
        ]
    }

    /// Gets the leading byte of the edge label.
    #[inline(always)]
    pub const fn lead(&self) -> u8 {
        self.lead
    }

    /// Gets the offset of the node tail.
    #[inline(always)]
    pub const fn offset(&self) -> usize {
        self.offset.get() as usize
    }

    /// Gets the length of the label without its leading byte.
    #[inline(always)]
    pub const fn tail_len(&self) -> usize {
        self.tail_len.get() as usize
    }

    /// Checks if the node has a value.
    #[inline(always)]
    pub const fn has_value(&self) -> bool {
        self.has_value
    }

    /// Checks if the node has a child index.
    #[inline(always)]
    pub const fn has_child(&self) -> bool {
        self.has_child
    }

    /// Gets the offset just after the tail and the value, where the child
    /// index block starts if the node has one.
    #[inline(always)]
    pub const fn child_offset(&self) -> usize {
        let end = self.offset() + self.tail_len();
        if self.has_value {
            end + VALUE_LEN
        } else {
            end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_entry() {
        let entry = IndexEntry::new(b'c', 0x01_0203, 0x0405, true, false).unwrap();
        assert_eq!(entry.encode(), [b'c', 0x81, 0x02, 0x03, 0x04, 0x05]);
        let entry = IndexEntry::new(b'c', 7, 1, false, true).unwrap();
        assert_eq!(entry.encode(), [b'c', 0x00, 0x00, 0x07, 0x80, 0x01]);
    }

    #[test]
    fn test_decode_entry() {
        let entry = IndexEntry::decode([b'x', 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(entry.lead(), b'x');
        assert_eq!(entry.offset(), MAX_OFFSET);
        assert_eq!(entry.tail_len(), MAX_TAIL_LEN);
        assert!(entry.has_value());
        assert!(entry.has_child());
        assert_eq!(entry.child_offset(), MAX_OFFSET + MAX_TAIL_LEN + VALUE_LEN);
    }

    #[test]
    fn test_out_of_range_entry() {
        assert_eq!(IndexEntry::new(b'a', 0x0080_0000, 0, true, false), None);
        assert_eq!(IndexEntry::new(b'a', 0, 0x8000, true, false), None);
    }

    #[test]
    fn test_index_block_len() {
        assert_eq!(index_block_len(0), 1);
        assert_eq!(index_block_len(2), 13);
    }
}
