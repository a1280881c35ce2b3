use crate::config::UploadConfig;
use crate::upload::notifier::Notifier;
use crate::upload::progress::{DriverHandle, ProgressDriver};
use crate::upload::queue::IntakeQueue;
use crate::upload::types::{BatchSource, CandidateFile, FileId, TrackedFile};
use crate::upload::validator::{validate, Rejection};
use derivative::Derivative;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Host handler, called with the accepted files of a batch.
pub type UploadCallback = Box<dyn FnMut(&[Arc<CandidateFile>]) + Send>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Ids of accepted files, in batch order.
    pub accepted: Vec<FileId>,
    pub rejected: Vec<Rejection>,
    /// Candidates dropped because the widget takes a single file.
    pub ignored: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Disabled,
    Processed(BatchReport),
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Disabled => None,
            BatchOutcome::Processed(report) => Some(report),
        }
    }

    pub fn accepted_count(&self) -> usize {
        self.report().map_or(0, |report| report.accepted.len())
    }
}

/// The upload widget's state: configuration, queue, running drivers and the
/// host callback.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct FileIntake {
    config: UploadConfig,
    queue: IntakeQueue,
    driver: ProgressDriver,
    #[derivative(Debug = "ignore")]
    notifier: Arc<dyn Notifier>,
    #[derivative(Debug = "ignore")]
    on_upload: Option<UploadCallback>,
    running: Vec<DriverHandle>,
}

impl FileIntake {
    pub fn new(config: UploadConfig, driver: ProgressDriver, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            queue: IntakeQueue::new(),
            driver,
            notifier,
            on_upload: None,
            running: Vec::new(),
        }
    }

    pub fn with_on_upload<F>(mut self, on_upload: F) -> Self
    where
        F: FnMut(&[Arc<CandidateFile>]) + Send + 'static,
    {
        self.on_upload = Some(Box::new(on_upload));
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.set_disabled(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.config.is_disabled()
    }

    pub fn queue(&self) -> &IntakeQueue {
        &self.queue
    }

    /// Validates a drop or picker selection and queues the files that pass.
    ///
    /// Each rejection is alerted before anything is queued. The host callback
    /// runs once, after the accepted files are queued and before their drivers
    /// start, and is skipped when nothing was accepted.
    pub fn submit(&mut self, source: BatchSource, mut candidates: Vec<CandidateFile>) -> BatchOutcome {
        if self.config.is_disabled() {
            debug!(%source, count = candidates.len(), "upload widget disabled, batch ignored");
            return BatchOutcome::Disabled;
        }

        let mut report = BatchReport::default();
        if !self.config.allow_multiple() && candidates.len() > 1 {
            report.ignored = candidates.len() - 1;
            candidates.truncate(1);
            warn!(%source, ignored = report.ignored, "single file upload, extra files ignored");
        }

        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match validate(&candidate, &self.config) {
                Ok(()) => accepted.push(Arc::new(candidate)),
                Err(rejection) => {
                    warn!(%source, file = rejection.file_name(), "rejected: {}", rejection);
                    self.notifier.alert(&rejection);
                    report.rejected.push(rejection);
                }
            }
        }

        if accepted.is_empty() {
            return BatchOutcome::Processed(report);
        }

        report.accepted = self.queue.accept_batch(&accepted);
        info!(
            %source,
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "batch queued"
        );

        if let Some(on_upload) = self.on_upload.as_mut() {
            on_upload(&accepted);
        }

        for id in &report.accepted {
            self.start_driver(*id);
        }

        BatchOutcome::Processed(report)
    }

    /// Queues an already validated file and starts its driver.
    pub fn accept(&mut self, file: CandidateFile) -> FileId {
        let name = file.name.clone();
        let id = self.queue.accept(Arc::new(file));
        info!(file_id = %id, file = %name, "file accepted");
        self.start_driver(id);
        id
    }

    /// Removes an entry at any status. Its driver notices on the next tick.
    pub fn remove(&mut self, id: FileId) -> bool {
        let removed = self.queue.remove(id);
        if removed {
            info!(file_id = %id, "file removed");
        }
        removed
    }

    pub fn snapshot(&self) -> Vec<TrackedFile> {
        self.queue.snapshot()
    }

    /// Drops every entry, as when the widget is mounted again.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn has_active(&self) -> bool {
        self.queue.has_active()
    }

    /// Waits until every driver started so far has stopped.
    pub async fn settle(&mut self) {
        for handle in self.running.drain(..) {
            handle.join().await;
        }
    }

    fn start_driver(&mut self, id: FileId) {
        self.running.retain(|handle| !handle.is_finished());
        let handle = self.driver.spawn(self.queue.clone(), id);
        self.running.push(handle);
    }
}
