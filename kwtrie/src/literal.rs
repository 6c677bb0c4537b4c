//! Rendering of a compiled stream as a source literal.
//!
//! The literal holds exactly the bytes of the compiled stream, so a program
//! can embed the trie as a constant table and search it with
//! [`lookup()`](crate::lookup()).

use std::io::Write;

use crate::errors::{KwTrieError, Result};
use crate::serializer::{ByteKind, ByteSink};

const BYTES_PER_LINE: usize = 16;

/// Language of a source literal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LiteralStyle {
    /// A C array, `static const unsigned char NAME[N] = {...};`.
    C,

    /// A Rust array, `pub static NAME: [u8; N] = [...];`.
    Rust,
}

impl LiteralStyle {
    fn open(self, name: &str, len: usize) -> String {
        match self {
            Self::C => format!("static const unsigned char {name}[{len}] = {{\n"),
            Self::Rust => format!("pub static {name}: [u8; {len}] = [\n"),
        }
    }

    const fn close(self) -> &'static str {
        match self {
            Self::C => "\n};\n",
            Self::Rust => "\n];\n",
        }
    }

    fn render<W>(self, wtr: &mut W, byte: u8, kind: ByteKind) -> std::io::Result<()>
    where
        W: Write,
    {
        let printable = (0x20..0x7f).contains(&byte) && byte != b'\'' && byte != b'\\';
        if kind == ByteKind::Label && printable {
            match self {
                Self::C => write!(wtr, "'{}'", char::from(byte)),
                Self::Rust => write!(wtr, "b'{}'", char::from(byte)),
            }
        } else {
            write!(wtr, "0x{byte:02X}")
        }
    }
}

/// Writer of a source literal, fed by the serializer.
pub(crate) struct LiteralWriter<W>
where
    W: Write,
{
    wtr: W,
    style: LiteralStyle,
    num_bytes: usize,
}

impl<W> LiteralWriter<W>
where
    W: Write,
{
    /// Starts a literal of `len` bytes named `name`.
    pub(crate) fn new(mut wtr: W, style: LiteralStyle, name: &str, len: usize) -> Result<Self> {
        if !is_identifier(name) {
            let msg = format!("{name:?} is not a valid identifier.");
            return Err(KwTrieError::invalid_argument("name", msg));
        }
        wtr.write_all(style.open(name, len).as_bytes())?;
        Ok(Self {
            wtr,
            style,
            num_bytes: 0,
        })
    }

    /// Closes the literal and returns the number of rendered bytes.
    pub(crate) fn finish(mut self) -> Result<usize> {
        self.wtr.write_all(self.style.close().as_bytes())?;
        self.wtr.flush()?;
        Ok(self.num_bytes)
    }
}

impl<W> ByteSink for LiteralWriter<W>
where
    W: Write,
{
    fn put(&mut self, byte: u8, kind: ByteKind) -> Result<()> {
        let sep = if self.num_bytes == 0 {
            "  "
        } else if self.num_bytes % BYTES_PER_LINE == 0 {
            ",\n  "
        } else {
            ","
        };
        self.wtr.write_all(sep.as_bytes())?;
        self.style.render(&mut self.wtr, byte, kind)?;
        self.num_bytes += 1;
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
