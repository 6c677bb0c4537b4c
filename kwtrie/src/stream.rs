use std::io::{Read, Write};

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};

use crate::errors::{KwTrieError, Result};
use crate::format::{IndexEntry, ENTRY_LEN, INDEX_HEADER_LEN, VALUE_LEN};
use crate::lookup::lookup;

/// Immutable byte stream of a compiled trie.
///
/// The bytes can be written to a file as they are and searched later, possibly
/// by another process, with [`lookup()`](crate::lookup()).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompiledStream {
    data: Vec<u8>,
}

impl CompiledStream {
    pub(crate) const fn new_unchecked(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Creates a stream from raw bytes.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when `data` is not a well-formed stream.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        verify(&data)?;
        Ok(Self { data })
    }

    /// Reads a stream written by [`CompiledStream::write()`].
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when reading fails or the read bytes are not
    /// a well-formed stream.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut data = vec![];
        rdr.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Writes the raw bytes of the stream, returning the number of written bytes.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when writing fails.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(&self.data)?;
        Ok(self.data.len())
    }

    /// Looks up `query` and returns its value.
    #[inline(always)]
    pub fn lookup<Q>(&self, query: Q) -> Option<u16>
    where
        Q: AsRef<[u8]>,
    {
        lookup(&self.data, query.as_ref())
    }

    /// Gets the raw bytes.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Unwraps the raw bytes.
    #[inline(always)]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Gets the number of bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the stream has no bytes, which never holds for a built stream.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for CompiledStream {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Encode for CompiledStream {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.data, encoder)?;
        Ok(())
    }
}

impl Decode for CompiledStream {
    fn decode<D: Decoder>(decoder: &mut D) -> Result<Self, DecodeError> {
        let data: Vec<u8> = Decode::decode(decoder)?;
        verify(&data).map_err(|e| DecodeError::OtherString(e.to_string()))?;
        Ok(Self { data })
    }
}

bincode::impl_borrow_decode!(CompiledStream);

/// Checks that `data` is a well-formed stream.
///
/// Every index block reachable from the root must lie inside `data`, list its
/// entries in strictly ascending order of leading bytes, and flag every entry
/// with a value, a child index, or both. Every tail and value must lie inside
/// `data` after the index block referring to it, and a child index must start
/// right after the tail and value. No index block is reachable twice.
pub(crate) fn verify(data: &[u8]) -> Result<()> {
    let mut reached = vec![false; data.len()];
    let mut blocks = vec![0];
    while let Some(pos) = blocks.pop() {
        match reached.get_mut(pos) {
            Some(true) => {
                let msg = format!("index block at {pos} is shared");
                return Err(KwTrieError::invalid_format("stream", msg));
            }
            Some(r) => *r = true,
            None => {}
        }
        let count = usize::from(*data.get(pos).ok_or_else(|| {
            KwTrieError::invalid_format("stream", format!("index block at {pos} is out of bounds"))
        })?);
        let start = pos + INDEX_HEADER_LEN;
        let entries = data.get(start..start + count * ENTRY_LEN).ok_or_else(|| {
            KwTrieError::invalid_format("stream", format!("index block at {pos} is truncated"))
        })?;

        let mut prev_lead = None;
        for raw in entries.chunks_exact(ENTRY_LEN) {
            let raw = <[u8; ENTRY_LEN]>::try_from(raw)
                .map_err(|e| KwTrieError::invalid_format("stream", e.to_string()))?;
            let entry = IndexEntry::decode(raw);
            if prev_lead.map_or(false, |prev| prev >= entry.lead()) {
                let msg = format!("index block at {pos} is not sorted by leading bytes");
                return Err(KwTrieError::invalid_format("stream", msg));
            }
            prev_lead = Some(entry.lead());

            if !entry.has_value() && !entry.has_child() {
                let msg = format!("entry in index block at {pos} has neither value nor child");
                return Err(KwTrieError::invalid_format("stream", msg));
            }
            if entry.offset() < start + entries.len() {
                let msg = format!("tail at {} overlaps its index block", entry.offset());
                return Err(KwTrieError::invalid_format("stream", msg));
            }
            let mut end = entry.offset() + entry.tail_len();
            if entry.has_value() {
                end += VALUE_LEN;
            }
            if end > data.len() {
                let msg = format!("tail at {} is out of bounds", entry.offset());
                return Err(KwTrieError::invalid_format("stream", msg));
            }
            if entry.has_child() {
                blocks.push(entry.child_offset());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::common;

    #[test]
    fn test_from_bytes() {
        let stream =
            CompiledStream::from_bytes(vec![1, b'a', 0x80, 0x00, 0x07, 0x00, 0x00, 0x00, 0x01])
                .unwrap();
        assert_eq!(stream.lookup("a"), Some(1));
        assert_eq!(stream.len(), 9);
    }

    #[test]
    fn test_empty_stream() {
        let stream = CompiledStream::from_bytes(vec![0]).unwrap();
        assert_eq!(stream.lookup("a"), None);
        assert!(CompiledStream::from_bytes(vec![]).is_err());
    }

    #[test]
    fn test_truncated_stream() {
        assert!(matches!(
            CompiledStream::from_bytes(vec![1, b'a', 0x80, 0x00, 0x07, 0x00, 0x00, 0x00]),
            Err(KwTrieError::InvalidFormat(_))
        ));
        assert!(matches!(
            CompiledStream::from_bytes(vec![1, b'a', 0x80, 0x00]),
            Err(KwTrieError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unsorted_stream() {
        #[rustfmt::skip]
        let data = vec![
            2,
            b'b', 0x80, 0x00, 0x0d, 0x00, 0x00,
            b'a', 0x80, 0x00, 0x0f, 0x00, 0x00,
            0x00, 0x01,
            0x00, 0x02,
        ];
        assert!(matches!(
            CompiledStream::from_bytes(data),
            Err(KwTrieError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_flagless_entry() {
        assert!(CompiledStream::from_bytes(vec![1, b'a', 0x00, 0x00, 0x07, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_cyclic_stream() {
        // The child index of "a" points back to the root.
        assert!(CompiledStream::from_bytes(vec![1, b'a', 0x00, 0x00, 0x00, 0x80, 0x00]).is_err());
        #[rustfmt::skip]
        let data = vec![
            1, b'a', 0x00, 0x00, 0x07, 0x80, 0x00,
            2,
            b'a', 0x00, 0x00, 0x14, 0x80, 0x00,
            b'b', 0x00, 0x00, 0x14, 0x80, 0x00,
            1, b'c', 0x80, 0x00, 0x1b, 0x00, 0x00,
            0x00, 0x01,
        ];
        assert!(matches!(
            CompiledStream::from_bytes(data),
            Err(KwTrieError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_read_write() {
        let stream = crate::compile([("key", 7)]).unwrap();
        let mut buf = vec![];
        let num_bytes = stream.write(&mut buf).unwrap();
        assert_eq!(num_bytes, stream.len());
        let other = CompiledStream::read(buf.as_slice()).unwrap();
        assert_eq!(other, stream);
    }

    #[test]
    fn test_bincode_rejects_malformed() {
        let data = vec![3u8, 0, 0];
        let encoded = bincode::encode_to_vec(&data, common::bincode_config()).unwrap();
        let decoded: Result<(CompiledStream, usize), _> =
            bincode::decode_from_slice(&encoded, common::bincode_config());
        assert!(decoded.is_err());
    }

    #[test]
    fn test_bincode_embedding() {
        let stream = crate::compile([("key", 7), ("keys", 8)]).unwrap();
        let encoded =
            bincode::encode_to_vec(("header", &stream), common::bincode_config()).unwrap();
        let ((header, decoded), _): ((String, CompiledStream), usize) =
            bincode::decode_from_slice(&encoded, common::bincode_config()).unwrap();
        assert_eq!(header, "header");
        assert_eq!(decoded.lookup("keys"), Some(8));
    }
}
