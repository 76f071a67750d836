use std::path::{Path, PathBuf};

use crate::ports::source::{GenesisSource, SourceError};

/// File-backed genesis source.
///
/// Reads the genesis JSON document from disk once at startup. The file is
/// on the order of a few hundred kilobytes, so it is read whole.
pub struct FileGenesisSource {
    path: PathBuf,
}

impl FileGenesisSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GenesisSource for FileGenesisSource {
    fn fetch(&self) -> Result<String, SourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            "[genesis] 📄 Read genesis document: {} ({} bytes)",
            self.path.display(),
            raw.len()
        );
        Ok(raw)
    }
}
