mod state;
mod ui;

use crate::config::{AppConfig, UploadProfile};
use crate::upload::{AlertQueue, BatchOutcome, BatchSource, CandidateFile, FileIntake, ProgressDriver};
use eframe::{egui, App};
use rfd::FileDialog;
pub use state::{DropZoneState, HostInbox, QueueSummary, ReceivedBatch, UploadState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

const ACTIVE_REPAINT: Duration = Duration::from_millis(100);

pub struct MaterialUploader {
    config: AppConfig,
    runtime: Handle,
    intake: FileIntake,
    alerts: AlertQueue,
    state: UploadState,
}

impl MaterialUploader {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: Handle) -> Self {
        info!("Initializing course material uploader");
        Self::with_runtime(config, runtime)
    }

    pub fn with_runtime(config: AppConfig, runtime: Handle) -> Self {
        let alerts = AlertQueue::new();
        let state = UploadState::default();
        let intake = Self::mount(&config, 0, &runtime, &alerts, &state.inbox);
        Self {
            config,
            runtime,
            intake,
            alerts,
            state,
        }
    }

    fn mount(
        config: &AppConfig,
        profile_index: usize,
        runtime: &Handle,
        alerts: &AlertQueue,
        inbox: &HostInbox,
    ) -> FileIntake {
        let upload = config
            .profiles
            .get(profile_index)
            .map(|profile| profile.upload.clone())
            .unwrap_or_default();
        info!(
            extensions = ?upload.accepted_extensions(),
            max_size_mb = upload.max_size_mb(),
            multiple = upload.allow_multiple(),
            "mounting upload widget"
        );
        let driver = ProgressDriver::simulated(runtime.clone(), config.tick_interval, config.max_step);
        let inbox = inbox.clone();

        FileIntake::new(upload, driver, Arc::new(alerts.clone()))
            .with_on_upload(move |files| inbox.receive(files))
    }

    pub fn profiles(&self) -> &[UploadProfile] {
        &self.config.profiles
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn alerts(&self) -> &AlertQueue {
        &self.alerts
    }

    pub fn inbox(&self) -> &HostInbox {
        &self.state.inbox
    }

    /// Switches profile. The widget is mounted again with an empty queue.
    pub fn select_profile(&mut self, index: usize) {
        if index >= self.config.profiles.len() || index == self.state.selected_profile {
            return;
        }

        info!(profile = %self.config.profiles[index].name, "switching upload profile");
        self.intake.clear();
        self.alerts.clear();
        self.state.clear();
        self.state.selected_profile = index;
        self.intake = Self::mount(&self.config, index, &self.runtime, &self.alerts, &self.state.inbox);
    }

    pub fn handle_dropped_files(&mut self, dropped: &[egui::DroppedFile]) -> BatchOutcome {
        let candidates = dropped.iter().filter_map(candidate_from_dropped).collect();
        self.intake.submit(BatchSource::Drop, candidates)
    }

    pub fn handle_picked_paths(&mut self, paths: Vec<PathBuf>) -> BatchOutcome {
        let candidates = paths
            .iter()
            .filter_map(|path| match CandidateFile::from_path(path) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    error!(path = %path.display(), "failed to read picked file: {}", e);
                    None
                }
            })
            .collect();
        self.intake.submit(BatchSource::Picker, candidates)
    }

    pub fn open_picker(&mut self) {
        if self.intake.is_disabled() {
            return;
        }

        let paths = {
            let config = self.intake.config();
            let extensions = config.picker_extensions();
            let dialog = FileDialog::new().add_filter("Supported files", extensions.as_slice());
            if config.allow_multiple() {
                dialog.pick_files().unwrap_or_default()
            } else {
                dialog.pick_file().into_iter().collect()
            }
        };

        if paths.is_empty() {
            debug!("file picker closed without a selection");
            return;
        }
        self.handle_picked_paths(paths);
    }

    /// An open alert blocks drops, so the zone must not look ready for one.
    fn refresh_drop_zone(&mut self, hovering: bool) {
        let blocked = self.intake.is_disabled() || self.alerts.is_blocking();
        self.state.drop_zone = DropZoneState::resolve(blocked, hovering);
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.refresh_drop_zone(hovering);

        if dropped.is_empty() {
            return;
        }
        if self.alerts.is_blocking() {
            debug!(count = dropped.len(), "drop ignored while an alert is open");
            return;
        }
        self.handle_dropped_files(&dropped);
    }
}

/// Native drops carry a path; web-style drops carry the bytes.
pub fn candidate_from_dropped(file: &egui::DroppedFile) -> Option<CandidateFile> {
    if let Some(path) = &file.path {
        return match CandidateFile::from_path(path) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                error!(path = %path.display(), "failed to read dropped file: {}", e);
                None
            }
        };
    }

    file.bytes
        .as_ref()
        .map(|bytes| CandidateFile::new(file.name.clone(), bytes.len() as u64))
}

impl App for MaterialUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);

        if self.intake.has_active() {
            ctx.request_repaint_after(ACTIVE_REPAINT);
        }
    }
}
