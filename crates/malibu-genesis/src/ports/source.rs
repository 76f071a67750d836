//! Genesis document source port.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the genesis document at all, before any parsing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read genesis document from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the raw genesis JSON comes from.
///
/// The chain originally ships the document as an embedded string literal;
/// deployments may also read it from disk. Either way the bootstrap only
/// sees the raw text.
pub trait GenesisSource {
    fn fetch(&self) -> Result<String, SourceError>;
}
