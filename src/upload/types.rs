use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Opaque identifier of a tracked file, unique for the life of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A file offered to the widget, before or after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub path: Option<PathBuf>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            path: None,
        }
    }

    /// Reads name and size from the filesystem.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Uploading,
    Completed,
    /// Reserved for a real transfer; the simulated driver never produces it.
    Error(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadStatus::Uploading)
    }
}

#[derive(Debug, Clone)]
pub struct TrackedFile {
    pub id: FileId,
    pub file: Arc<CandidateFile>,
    pub progress: f32,
    pub status: UploadStatus,
}

impl TrackedFile {
    pub(crate) fn new(file: Arc<CandidateFile>) -> Self {
        Self {
            id: FileId::new(),
            file,
            progress: 0.0,
            status: UploadStatus::Uploading,
        }
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn is_completed(&self) -> bool {
        self.status == UploadStatus::Completed
    }
}

/// Where a batch of candidates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    Drop,
    Picker,
}

impl fmt::Display for BatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSource::Drop => write!(f, "drop"),
            BatchSource::Picker => write!(f, "picker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ids_are_unique() {
        let a = FileId::new();
        let b = FileId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 32);
    }

    #[test]
    fn new_entries_start_uploading() {
        let tracked = TrackedFile::new(Arc::new(CandidateFile::new("notes.pdf", 10)));
        assert_eq!(tracked.progress, 0.0);
        assert_eq!(tracked.status, UploadStatus::Uploading);
        assert!(!tracked.status.is_terminal());
        assert_eq!(tracked.name(), "notes.pdf");
    }

    #[test]
    fn terminal_statuses() {
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Error("aborted".into()).is_terminal());
    }

    #[test]
    fn candidate_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("syllabus.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let candidate = CandidateFile::from_path(&path).unwrap();
        assert_eq!(candidate.name, "syllabus.pdf");
        assert_eq!(candidate.size, 2048);
        assert_eq!(candidate.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn candidate_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CandidateFile::from_path(&dir.path().join("gone.pdf")).is_err());
    }
}
