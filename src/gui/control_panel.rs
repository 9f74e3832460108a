//! Control Panel Widget
//! Left side panel with deck selection, navigation, export and status.

use crate::deck::{Deck, DeckKind};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Settings the user picks in the panel
#[derive(Default, Clone)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub deck: DeckKind,
}

/// Left side control panel with file selection and slide controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
    is_error: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            is_error: false,
        }
    }
}

impl ControlPanel {
    pub fn new(deck: DeckKind, csv_path: Option<PathBuf>) -> Self {
        Self {
            settings: UserSettings { csv_path, deck },
            ..Self::default()
        }
    }

    /// Draw the control panel. `deck` is the loaded deck, if any.
    /// The deck selector is locked while `loading`.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        deck: Option<&Deck>,
        loading: bool,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Chartify Slides")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("CSV slide decks").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Deck Section =====
        ui.label(RichText::new("🗂 Deck").size(14.0).strong());
        ui.add_space(5.0);

        let previous_kind = self.settings.deck;
        ui.add_enabled_ui(!loading, |ui| {
            ComboBox::from_id_salt("deck_kind")
                .width(200.0)
                .selected_text(self.settings.deck.label())
                .show_ui(ui, |ui| {
                    for kind in [DeckKind::Titles, DeckKind::Paddles] {
                        ui.selectable_value(&mut self.settings.deck, kind, kind.label());
                    }
                });
        });
        if self.settings.deck != previous_kind {
            action = ControlPanelAction::DeckChanged;
        }

        ui.add_space(10.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        if let Some(deck) = deck {
            ui.add_space(4.0);
            let mut summary = format!("{} rows loaded", deck.record_count());
            if deck.rejected_count() > 0 {
                summary.push_str(&format!(", {} rejected", deck.rejected_count()));
            }
            ui.label(RichText::new(summary).size(11.0).color(Color32::GRAY));
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Navigation Section =====
        ui.label(RichText::new("🧭 Navigation").size(14.0).strong());
        ui.add_space(5.0);

        match deck {
            Some(deck) => {
                let (index, _) = deck.position();
                for (i, scene) in deck.scenes().iter().enumerate() {
                    let text = RichText::new(format!("{}. {}", i + 1, scene.title())).size(12.0);
                    ui.label(if i == index {
                        text.strong().color(Color32::from_rgb(100, 149, 237))
                    } else {
                        text.color(Color32::GRAY)
                    });
                }
                ui.add_space(5.0);

                if deck.uses_buttons() {
                    ui.horizontal(|ui| {
                        ui.add_enabled_ui(deck.can_go_back(), |ui| {
                            if ui.button("◀ Previous").clicked() {
                                action = ControlPanelAction::Previous;
                            }
                        });
                        ui.add_enabled_ui(deck.can_go_forward(), |ui| {
                            if ui.button("Next ▶").clicked() {
                                action = ControlPanelAction::Next;
                            }
                        });
                    });
                } else {
                    let hint = if deck.can_go_forward() {
                        "Click the slide to continue"
                    } else {
                        "Last scene reached"
                    };
                    ui.label(RichText::new(hint).size(11.0).color(Color32::GRAY));
                }

                ui.add_space(5.0);
                ui.add_enabled_ui(index > 0, |ui| {
                    if ui.button("⟲ Restart").clicked() {
                        action = ControlPanelAction::Restart;
                    }
                });
            }
            None => {
                ui.label(RichText::new("Load a CSV to start").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(deck.is_some(), |ui| {
                let pptx = egui::Button::new(RichText::new("📄 Export PPTX").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(pptx).clicked() {
                    action = ControlPanelAction::ExportPptx;
                }
                ui.add_space(6.0);
                let svg = egui::Button::new(RichText::new("🖼 Export SVG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(svg).clicked() {
                    action = ControlPanelAction::ExportSvg;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
        self.is_error = false;
    }

    /// Show an error in the status line
    pub fn set_error(&mut self, status: &str) {
        self.progress = 0.0;
        self.status = format!("Error: {}", status);
        self.is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    DeckChanged,
    Previous,
    Next,
    Restart,
    ExportPptx,
    ExportSvg,
}
