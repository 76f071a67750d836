use crate::ports::source::{GenesisSource, SourceError};

/// In-memory genesis source.
///
/// Mirrors how the chain's front-end tooling ships the genesis block: as a
/// string literal bundled into the artifact. Also convenient in tests.
pub struct EmbeddedGenesisSource {
    document: String,
}

impl EmbeddedGenesisSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl GenesisSource for EmbeddedGenesisSource {
    fn fetch(&self) -> Result<String, SourceError> {
        Ok(self.document.clone())
    }
}
