//! Directory-backed point-set store: id `abc` lives at `<root>/abc.bin`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use triangulator::pipeline::{PointSetSource, SourceError};

pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` for ids that would escape the root.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let plain = !id.is_empty()
            && !id.starts_with('.')
            && !id.contains(['/', '\\'])
            && !id.contains('\0');
        plain.then(|| self.root.join(format!("{id}.bin")))
    }
}

impl PointSetSource for DirSource {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, SourceError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        tracing::debug!(path = %path.display(), "reading point set");
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(id.to_string()),
            ErrorKind::TimedOut => SourceError::Timeout(format!("{}: {e}", path.display())),
            _ => SourceError::Unavailable(format!("{}: {e}", path.display())),
        })
    }
}
