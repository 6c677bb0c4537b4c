use std::cmp::Ordering;

use crate::format::{IndexEntry, ENTRY_LEN, INDEX_HEADER_LEN, VALUE_LEN};

/// Looks up `query` in a compiled stream and returns its value.
///
/// The stream is searched in place: this function neither allocates nor
/// decodes anything beyond the index entries on the path of `query`.
/// Since the stream is only read, any number of threads can search the same
/// stream at once.
///
/// `None` is returned when `query` is not a keyword of the stream. An empty
/// `query` is never a keyword. Reads are bounds-checked, so a corrupted
/// stream yields `None` or a wrong value, but never a panic.
///
/// # Examples
///
/// ```
/// // The stream of {"a": 1}.
/// let stream = [1, b'a', 0x80, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01];
/// assert_eq!(kwtrie::lookup(&stream, b"a"), Some(1));
/// assert_eq!(kwtrie::lookup(&stream, b"b"), None);
/// ```
pub fn lookup(stream: &[u8], query: &[u8]) -> Option<u16> {
    if query.is_empty() {
        return None;
    }
    let mut pos = 0;
    let mut matched = 0;
    loop {
        let entry = find_entry(stream, pos, query[matched])?;
        matched += 1;
        let rest = &query[matched..];
        let tail_len = entry.tail_len();
        let tail_start = entry.offset();

        match rest.len().cmp(&tail_len) {
            Ordering::Less => return None,
            Ordering::Equal => {
                if !entry.has_value() {
                    return None;
                }
                let tail = stream.get(tail_start..tail_start + tail_len)?;
                if tail != rest {
                    return None;
                }
                let value_start = tail_start + tail_len;
                let value = stream.get(value_start..value_start + VALUE_LEN)?;
                return Some(u16::from_be_bytes([value[0], value[1]]));
            }
            Ordering::Greater => {
                if !entry.has_child() {
                    return None;
                }
                let tail = stream.get(tail_start..tail_start + tail_len)?;
                if tail != &rest[..tail_len] {
                    return None;
                }
                matched += tail_len;
                pos = entry.child_offset();
            }
        }
    }
}

/// Scans the index block at `pos` for the entry whose leading byte is `lead`.
///
/// Entries are sorted, so the scan stops at the first larger leading byte.
#[inline(always)]
fn find_entry(stream: &[u8], pos: usize, lead: u8) -> Option<IndexEntry> {
    let count = usize::from(*stream.get(pos)?);
    let start = pos + INDEX_HEADER_LEN;
    let entries = stream.get(start..start + count * ENTRY_LEN)?;
    for raw in entries.chunks_exact(ENTRY_LEN) {
        match lead.cmp(&raw[0]) {
            Ordering::Less => return None,
            Ordering::Equal => {
                let raw = <[u8; ENTRY_LEN]>::try_from(raw).ok()?;
                return Some(IndexEntry::decode(raw));
            }
            Ordering::Greater => {}
        }
    }
    None
}
