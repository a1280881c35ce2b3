use crate::upload::{CandidateFile, TrackedFile, UploadStatus};
use crate::utils::FileSizeUtils;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropZoneState {
    #[default]
    Idle,
    DragActive,
    Disabled,
}

impl DropZoneState {
    pub fn resolve(disabled: bool, files_hovering: bool) -> Self {
        if disabled {
            Self::Disabled
        } else if files_hovering {
            Self::DragActive
        } else {
            Self::Idle
        }
    }
}

/// Per-status counts over one queue snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub total: usize,
    pub uploading: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueSummary {
    pub fn from_snapshot(entries: &[TrackedFile]) -> Self {
        entries.iter().fold(Self::default(), |mut summary, entry| {
            summary.total += 1;
            match entry.status {
                UploadStatus::Uploading => summary.uploading += 1,
                UploadStatus::Completed => summary.completed += 1,
                UploadStatus::Error(_) => summary.failed += 1,
            }
            summary
        })
    }

    /// Mean progress across all entries, in `[0, 1]`.
    pub fn overall_progress(entries: &[TrackedFile]) -> f32 {
        if entries.is_empty() {
            return 0.0;
        }
        entries.iter().map(|entry| entry.progress).sum::<f32>() / (entries.len() as f32 * 100.0)
    }

    pub fn status_text(&self) -> String {
        if self.failed > 0 {
            format!(
                "Files: {} | ⏳ Uploading: {} | ✅ Completed: {} | ❌ Failed: {}",
                self.total, self.uploading, self.completed, self.failed
            )
        } else {
            format!(
                "Files: {} | ⏳ Uploading: {} | ✅ Completed: {}",
                self.total, self.uploading, self.completed
            )
        }
    }
}

/// One batch the host page received through the upload callback.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedBatch {
    pub names: Vec<String>,
    pub total_size: u64,
}

impl ReceivedBatch {
    pub fn summary(&self) -> String {
        format!(
            "{} ({})",
            self.names.join(", "),
            FileSizeUtils::format_size(self.total_size)
        )
    }
}

/// The host side of the upload callback.
#[derive(Debug, Clone, Default)]
pub struct HostInbox {
    batches: Arc<Mutex<Vec<ReceivedBatch>>>,
}

impl HostInbox {
    fn lock(&self) -> MutexGuard<'_, Vec<ReceivedBatch>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn receive(&self, files: &[Arc<CandidateFile>]) {
        self.lock().push(ReceivedBatch {
            names: files.iter().map(|file| file.name.clone()).collect(),
            total_size: files.iter().map(|file| file.size).sum(),
        });
    }

    pub fn batches(&self) -> Vec<ReceivedBatch> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[derive(Debug, Default)]
pub struct UploadState {
    pub drop_zone: DropZoneState,
    pub selected_profile: usize,
    pub show_received: bool,
    pub inbox: HostInbox,
}

impl UploadState {
    pub fn clear(&mut self) {
        self.drop_zone = DropZoneState::Idle;
        self.inbox.clear();
    }
}
