//! Source adapters.

pub mod embedded;
pub mod file;

pub use embedded::EmbeddedGenesisSource;
pub use file::FileGenesisSource;
