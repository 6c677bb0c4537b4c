//! Definition of errors.

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt;

/// A specialized Result type for Kwtrie.
pub type Result<T, E = KwTrieError> = std::result::Result<T, E>;

/// The error type for Kwtrie.
#[derive(Debug)]
pub enum KwTrieError {
    /// The error variant for [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`DuplicateKeyError`].
    DuplicateKey(DuplicateKeyError),

    /// The error variant for [`FormatOverflowError`].
    FormatOverflow(FormatOverflowError),

    /// The error variant for [`TryReserveError`].
    Resource(TryReserveError),

    /// The error variant for [`std::io::Error`].
    StdIo(std::io::Error),
}

impl KwTrieError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn duplicate_key(keyword: &[u8]) -> Self {
        Self::DuplicateKey(DuplicateKeyError {
            keyword: keyword.to_vec(),
        })
    }

    pub(crate) const fn format_overflow(what: &'static str, value: usize, limit: usize) -> Self {
        Self::FormatOverflow(FormatOverflowError { what, value, limit })
    }
}

impl fmt::Display for KwTrieError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::DuplicateKey(e) => e.fmt(f),
            Self::FormatOverflow(e) => e.fmt(f),
            Self::Resource(e) => e.fmt(f),
            Self::StdIo(e) => e.fmt(f),
        }
    }
}

impl Error for KwTrieError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when the input format is invalid.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the input.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// Error used when a keyword is inserted twice.
///
/// The value stored by the first insertion is kept.
#[derive(Debug)]
pub struct DuplicateKeyError {
    /// The rejected keyword.
    pub(crate) keyword: Vec<u8>,
}

impl DuplicateKeyError {
    /// Gets the rejected keyword.
    pub fn keyword(&self) -> &[u8] {
        &self.keyword
    }
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DuplicateKeyError: {} is already in the trie",
            self.keyword.escape_ascii()
        )
    }
}

impl Error for DuplicateKeyError {}

/// Error used when a quantity does not fit in its field of the stream layout.
#[derive(Debug)]
pub struct FormatOverflowError {
    /// What overflowed.
    pub(crate) what: &'static str,

    /// The offending quantity.
    pub(crate) value: usize,

    /// The largest representable quantity.
    pub(crate) limit: usize,
}

impl FormatOverflowError {
    /// Gets the name of the overflowed quantity.
    pub const fn what(&self) -> &'static str {
        self.what
    }

    /// Gets the offending quantity.
    pub const fn value(&self) -> usize {
        self.value
    }

    /// Gets the largest representable quantity.
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

impl fmt::Display for FormatOverflowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "FormatOverflowError: {} is {}, but must be at most {}",
            self.what, self.value, self.limit
        )
    }
}

impl Error for FormatOverflowError {}

impl From<TryReserveError> for KwTrieError {
    fn from(error: TryReserveError) -> Self {
        Self::Resource(error)
    }
}

impl From<std::io::Error> for KwTrieError {
    fn from(error: std::io::Error) -> Self {
        Self::StdIo(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        fn read_all() -> crate::errors::Result<Vec<u8>> {
            let mut buf = vec![];
            let mut f = std::fs::File::open("/nonexistent/kwtrie")?;
            std::io::Read::read_to_end(&mut f, &mut buf)?;
            Ok(buf)
        }
        assert!(matches!(read_all(), Err(KwTrieError::StdIo(_))));
    }

    #[test]
    fn test_reserve_error_conversion() {
        fn reserve() -> crate::errors::Result<()> {
            let mut v: Vec<u8> = vec![];
            v.try_reserve(usize::MAX)?;
            Ok(())
        }
        assert!(matches!(reserve(), Err(KwTrieError::Resource(_))));
    }

    #[test]
    fn test_format_overflow_message() {
        let e = KwTrieError::format_overflow("value", 65536, 65535);
        assert_eq!(
            e.to_string(),
            "FormatOverflowError: value is 65536, but must be at most 65535"
        );
    }
}
