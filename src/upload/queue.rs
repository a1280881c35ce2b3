use crate::upload::types::{CandidateFile, FileId, TrackedFile, UploadStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const COMPLETE: f32 = 100.0;

/// Result of applying one progress tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Progressed(f32),
    Completed,
    /// The entry already reached a terminal status.
    Terminal,
    /// The entry was removed.
    Missing,
}

impl Advance {
    /// Whether the driver should keep ticking.
    pub fn is_running(&self) -> bool {
        matches!(self, Advance::Progressed(_))
    }
}

/// Ordered list of tracked files shared between the UI and the progress
/// drivers. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct IntakeQueue {
    entries: Arc<Mutex<Vec<TrackedFile>>>,
}

impl IntakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TrackedFile>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn accept(&self, file: Arc<CandidateFile>) -> FileId {
        let tracked = TrackedFile::new(file);
        let id = tracked.id;
        self.lock().push(tracked);
        id
    }

    /// Appends every file under one lock so a batch lands contiguously.
    pub fn accept_batch(&self, files: &[Arc<CandidateFile>]) -> Vec<FileId> {
        let mut entries = self.lock();
        files
            .iter()
            .map(|file| {
                let tracked = TrackedFile::new(Arc::clone(file));
                let id = tracked.id;
                entries.push(tracked);
                id
            })
            .collect()
    }

    /// Returns false when the id was not queued.
    pub fn remove(&self, id: FileId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn snapshot(&self) -> Vec<TrackedFile> {
        self.lock().clone()
    }

    pub fn get(&self, id: FileId) -> Option<TrackedFile> {
        self.lock().iter().find(|entry| entry.id == id).cloned()
    }

    /// Adds `increment` to the entry's progress. Progress and status change
    /// together; crossing 100 clamps and completes the entry.
    pub fn advance(&self, id: FileId, increment: f32) -> Advance {
        let increment = if increment.is_finite() && increment > 0.0 {
            increment
        } else {
            0.0
        };

        let mut entries = self.lock();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return Advance::Missing;
        };
        if entry.status.is_terminal() {
            return Advance::Terminal;
        }

        let progress = entry.progress + increment;
        if progress >= COMPLETE {
            entry.progress = COMPLETE;
            entry.status = UploadStatus::Completed;
            Advance::Completed
        } else {
            entry.progress = progress;
            Advance::Progressed(progress)
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn has_active(&self) -> bool {
        self.lock()
            .iter()
            .any(|entry| entry.status == UploadStatus::Uploading)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
