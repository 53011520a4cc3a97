use crate::domain::ports::SnapshotStore;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Snapshot files on the local filesystem, rooted at the data directory.
#[derive(Debug, Clone)]
pub struct LocalSnapshots {
    base_path: String,
}

impl LocalSnapshots {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl SnapshotStore for LocalSnapshots {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}
