use super::{DropZoneState, MaterialUploader, QueueSummary};
use crate::upload::{FileId, TrackedFile, UploadStatus};
use crate::utils::FileSizeUtils;
use eframe::egui::{self, Align, Color32, RichText};

const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
const DRAG_FILL: Color32 = Color32::from_rgb(239, 246, 255);
const DRAG_STROKE: Color32 = Color32::from_rgb(96, 165, 250);
const IDLE_STROKE: Color32 = Color32::from_rgb(209, 213, 219);
const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);

impl MaterialUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let blocked = self.alerts.is_blocking();

        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 30.0;

            egui::ScrollArea::vertical()
                .max_height(total_height - footer_height)
                .show(ui, |ui| {
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Course Material Upload");
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new("Add syllabi, references and lecture notes for question paper generation")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });
                    ui.add_space(16.0);

                    ui.add_enabled_ui(!blocked, |ui| {
                        self.render_profile_picker(ui);
                        ui.add_space(12.0);
                        self.render_drop_zone(ui);
                        ui.add_space(12.0);
                        self.render_queue(ui);
                        ui.add_space(12.0);
                        self.render_received(ui);
                    });
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.label(
                    RichText::new("Files stay on this machine; upload progress is simulated.")
                        .small()
                        .weak(),
                );
            });
        });

        self.render_alert(ctx);
    }

    fn render_profile_picker(&mut self, ui: &mut egui::Ui) {
        let mut selected = self.state.selected_profile;
        let current = self
            .profiles()
            .get(selected)
            .map(|profile| (profile.name.clone(), profile.description.clone()))
            .unwrap_or_default();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                egui::ComboBox::from_label("Upload profile")
                    .selected_text(current.0.as_str())
                    .show_ui(ui, |ui| {
                        for (index, profile) in self.config.profiles.iter().enumerate() {
                            ui.selectable_value(&mut selected, index, profile.name.as_str());
                        }
                    });

                let mut disabled = self.intake.is_disabled();
                if ui.checkbox(&mut disabled, "Disabled").changed() {
                    self.intake.set_disabled(disabled);
                }
            });

            if !current.1.is_empty() {
                ui.label(RichText::new(current.1.as_str()).small().weak());
            }
        });

        if selected != self.state.selected_profile {
            self.select_profile(selected);
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let zone = self.state.drop_zone;
        let config = self.intake.config();
        let formats = format!("Supported formats: {}", config.supported_formats_label());
        let max_size = format!("Maximum file size: {}MB", config.max_size_mb());
        let hint = if config.allow_multiple() {
            "Drag and drop files here, or click to select files"
        } else {
            "Drag and drop a file here, or click to select a file"
        };

        let (stroke, fill) = match zone {
            DropZoneState::DragActive => (DRAG_STROKE, DRAG_FILL),
            DropZoneState::Idle => (IDLE_STROKE, Color32::TRANSPARENT),
            DropZoneState::Disabled => (IDLE_STROKE.gamma_multiply(0.5), Color32::TRANSPARENT),
        };

        let response = egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, stroke))
            .fill(fill)
            .rounding(8.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    let text_color = if zone == DropZoneState::Disabled {
                        ui.visuals().weak_text_color()
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.label(RichText::new("📤 Upload Files").heading().color(text_color));
                    ui.add_space(6.0);
                    ui.label(RichText::new(hint).color(text_color));
                    ui.add_space(6.0);
                    ui.label(RichText::new(formats).small().weak());
                    ui.label(RichText::new(max_size).small().weak());
                });
            })
            .response
            .interact(egui::Sense::click());

        if zone != DropZoneState::Disabled && response.clicked() {
            self.open_picker();
        }
    }

    fn render_queue(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.intake.snapshot();
        if snapshot.is_empty() {
            return;
        }

        let summary = QueueSummary::from_snapshot(&snapshot);
        let mut to_remove: Option<FileId> = None;

        ui.group(|ui| {
            ui.label(RichText::new("Uploaded Files").strong());
            ui.label(RichText::new("Track your file upload progress").small().weak());
            ui.add_space(4.0);
            ui.label(summary.status_text());
            let overall = QueueSummary::overall_progress(&snapshot);
            ui.add(
                egui::ProgressBar::new(overall)
                    .text(format!("Overall {}%", (overall * 100.0).round()))
                    .animate(summary.uploading > 0)
                    .fill(ACCENT),
            );
            ui.add_space(8.0);

            for entry in &snapshot {
                if Self::render_entry(ui, entry) {
                    to_remove = Some(entry.id);
                }
                ui.add_space(6.0);
            }
        });

        if let Some(id) = to_remove {
            self.intake.remove(id);
        }
    }

    /// Returns true when the remove button was clicked.
    fn render_entry(ui: &mut egui::Ui, entry: &TrackedFile) -> bool {
        let mut remove = false;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("📄").size(22.0));
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(entry.name()).strong());
                        match &entry.status {
                            UploadStatus::Uploading => {}
                            UploadStatus::Completed => {
                                ui.colored_label(SUCCESS, "✔");
                            }
                            UploadStatus::Error(reason) => {
                                ui.colored_label(FAILURE, format!("❌ {}", reason));
                            }
                        }
                        ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                            if ui.small_button("✖").on_hover_text("Remove").clicked() {
                                remove = true;
                            }
                        });
                    });

                    let bar = egui::ProgressBar::new(entry.progress / 100.0)
                        .text(format!("{}%", entry.progress.round()))
                        .animate(false)
                        .fill(ACCENT);
                    ui.add(bar);
                    ui.label(
                        RichText::new(FileSizeUtils::format_size(entry.file.size))
                            .small()
                            .weak(),
                    );
                });
            });
        });

        remove
    }

    fn render_received(&mut self, ui: &mut egui::Ui) {
        let batches = self.state.inbox.batches();
        if batches.is_empty() {
            return;
        }

        if ui
            .button(if self.state.show_received {
                "Hide received files"
            } else {
                "Show received files"
            })
            .clicked()
        {
            self.state.show_received = !self.state.show_received;
        }

        if self.state.show_received {
            egui::ScrollArea::vertical()
                .id_source("received_batches")
                .max_height(160.0)
                .show(ui, |ui| {
                    egui::Frame::none()
                        .fill(ui.style().visuals.extreme_bg_color)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            for (index, batch) in batches.iter().enumerate() {
                                ui.label(format!("Batch {}: {}", index + 1, batch.summary()));
                            }
                        });
                });
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alerts.current() else {
            return;
        };

        egui::Window::new("Upload notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.alerts.dismiss();
                    }
                });
            });
    }
}
