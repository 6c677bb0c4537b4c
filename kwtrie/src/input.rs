//! Loader of keyword lists.
//!
//! A keyword list is line-oriented text. Blank lines are skipped, and every
//! other line holds a keyword, optionally followed by its value, separated by
//! whitespace:
//!
//! ```text
//! select 1
//! from   2
//! where  3
//! ```
//!
//! Either all lines have values or none has. In the latter case, the keywords
//! are numbered from 1 in the order of appearance.
use std::io::{BufRead, BufReader, Read};

use crate::errors::{KwTrieError, Result};

/// Ordered `(keyword, value)` records loaded from a keyword list.
///
/// Duplicates are kept as they are; they are detected by
/// [`TrieBuilder`](crate::TrieBuilder).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InputSet {
    records: Vec<(Vec<u8>, u32)>,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum LineFormat {
    KeywordOnly,
    KeywordValue,
}

impl InputSet {
    /// Loads records from a reader of a keyword list.
    ///
    /// # Errors
    ///
    /// [`KwTrieError`] is returned when
    ///  - reading fails,
    ///  - a line has more than two fields,
    ///  - a value is not an unsigned 32-bit integer, or
    ///  - lines with and without values are mixed.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut records = vec![];
        let mut format = None;
        let mut next_value: u32 = 0;

        for (i, line) in BufReader::new(rdr).split(b'\n').enumerate() {
            let line = line?;
            let mut fields = line
                .split(|b| b.is_ascii_whitespace())
                .filter(|f| !f.is_empty());
            let Some(keyword) = fields.next() else {
                continue;
            };
            let value = fields.next();
            if fields.next().is_some() {
                let msg = format!("line {} has more than two fields", i + 1);
                return Err(KwTrieError::invalid_format("keyword list", msg));
            }

            let line_format = if value.is_some() {
                LineFormat::KeywordValue
            } else {
                LineFormat::KeywordOnly
            };
            if *format.get_or_insert(line_format) != line_format {
                let msg = format!(
                    "line {} changes the format; either all lines or none must have a value",
                    i + 1
                );
                return Err(KwTrieError::invalid_format("keyword list", msg));
            }

            let value = match value {
                Some(value) => std::str::from_utf8(value)
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| {
                        let msg = format!(
                            "line {} has a value that is not an unsigned 32-bit integer: {}",
                            i + 1,
                            value.escape_ascii()
                        );
                        KwTrieError::invalid_format("keyword list", msg)
                    })?,
                None => {
                    next_value += 1;
                    next_value
                }
            };
            records.push((keyword.to_vec(), value));
        }

        Ok(Self { records })
    }

    /// Gets the records in the order of appearance.
    #[inline(always)]
    pub fn records(&self) -> &[(Vec<u8>, u32)] {
        &self.records
    }

    /// Iterates over the records in the order of appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u32)> + '_ {
        self.records.iter().map(|(k, v)| (k.as_slice(), *v))
    }

    /// Gets the number of records.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if there is no record.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<K> FromIterator<(K, u32)> for InputSet
where
    K: Into<Vec<u8>>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
    {
        Self {
            records: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_value() {
        let data = "select 1\n\n  from\t2\r\n   \nwhere 65536\n";
        let input = InputSet::from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            input.records(),
            &[
                (b"select".to_vec(), 1),
                (b"from".to_vec(), 2),
                (b"where".to_vec(), 65536),
            ]
        );
    }

    #[test]
    fn test_keyword_only() {
        let data = "select\nfrom\n\nwhere";
        let input = InputSet::from_reader(data.as_bytes()).unwrap();
        let records: Vec<_> = input.iter().collect();
        assert_eq!(
            records,
            vec![(&b"select"[..], 1), (&b"from"[..], 2), (&b"where"[..], 3)]
        );
    }

    #[test]
    fn test_non_utf8_keyword() {
        let data = b"\xe3\x81\x82 1\n\xff 2\n";
        let input = InputSet::from_reader(&data[..]).unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input.records()[1], (vec![0xff], 2));
    }

    #[test]
    fn test_keeps_duplicates() {
        let input = InputSet::from_reader("a 1\na 2\n".as_bytes()).unwrap();
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let input = InputSet::from_reader("\n \n".as_bytes()).unwrap();
        assert!(input.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_mixed_format() {
        InputSet::from_reader("a 1\nb\n".as_bytes()).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_too_many_fields() {
        InputSet::from_reader("a 1 2\n".as_bytes()).unwrap();
    }

    #[test]
    fn test_negative_value() {
        let result = InputSet::from_reader("a 1\nb -1\n".as_bytes());
        assert!(matches!(result, Err(KwTrieError::InvalidFormat(_))));
    }

    #[test]
    fn test_too_large_value() {
        let err = InputSet::from_reader("a 1\nb 2\nc 4294967296\n".as_bytes()).unwrap_err();
        assert!(matches!(err, KwTrieError::InvalidFormat(_)));
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_non_utf8_value() {
        let err = InputSet::from_reader(&b"a \xff1\n"[..]).unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn test_from_iter() {
        let input: InputSet = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(input.records()[1], (b"b".to_vec(), 2));
    }
}
