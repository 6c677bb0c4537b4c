//! # Kwtrie
//!
//! Kwtrie compiles a static set of keywords, each paired with a 16-bit value,
//! into a compact byte stream that encodes a path-compressed trie.
//! The stream is self-contained and position-independent, so it can be stored
//! in a file or embedded in a program as a constant byte table, and searched
//! directly by [`lookup()`] without decoding it into an object graph.
//!
//! ## Examples
//!
//! ```
//! use kwtrie::TrieBuilder;
//!
//! let mut builder = TrieBuilder::new();
//! builder.insert("cat", 10).unwrap();
//! builder.insert("car", 20).unwrap();
//! builder.insert("care", 30).unwrap();
//! let stream = builder.build().unwrap();
//!
//! assert_eq!(kwtrie::lookup(stream.as_bytes(), b"car"), Some(20));
//! assert_eq!(kwtrie::lookup(stream.as_bytes(), b"ca"), None);
//! ```
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

mod builder;
pub mod common;
pub mod dump;
pub mod errors;
pub mod format;
pub mod input;
mod layout;
pub mod literal;
mod lookup;
mod num;
mod serializer;
mod stream;

#[cfg(test)]
mod test_utils;

pub use builder::TrieBuilder;
pub use input::InputSet;
pub use literal::LiteralStyle;
pub use lookup::lookup;
pub use stream::CompiledStream;

use errors::Result;

/// Compiles `(keyword, value)` records into a [`CompiledStream`].
///
/// This is a shorthand for [`TrieBuilder::from_records()`] followed by
/// [`TrieBuilder::build()`].
///
/// # Errors
///
/// See [`TrieBuilder::insert()`] and [`TrieBuilder::build()`].
pub fn compile<I, K>(records: I) -> Result<CompiledStream>
where
    I: IntoIterator<Item = (K, u32)>,
    K: AsRef<[u8]>,
{
    TrieBuilder::from_records(records)?.build()
}
