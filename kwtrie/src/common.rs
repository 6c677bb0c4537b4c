//! Common settings in Kwtrie.

use bincode::config::{self, Fixint, LittleEndian};

/// Gets the bincode configuration used to embed a
/// [`CompiledStream`](crate::CompiledStream) in other bincode data.
pub fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}
