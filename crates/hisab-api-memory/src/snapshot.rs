//! JSON snapshots of the in-memory data set.

use hisab_model::{Group, Member};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read data file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything the in-memory service knows, in a stable order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Snapshot {
    /// Load a snapshot. A missing file is an empty data set.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(SnapshotError::Read(e)),
        }
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = Snapshot::load_from(dir.path().join("data.json")).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let snapshot = Snapshot {
            users: vec![Member::new("u1", "Asha").with_email("asha@example.com")],
            groups: vec![],
        };
        snapshot.save_to(&path).unwrap();

        assert_eq!(Snapshot::load_from(&path).unwrap(), snapshot);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Snapshot::load_from(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }
}
