//! Chartify Slides Main Application
//! Main window with control panel and slide viewer.

use crate::config::AppConfig;
use crate::deck::{Deck, DeckKind};
use crate::export;
use crate::gui::{ControlPanel, ControlPanelAction, SlideViewer};
use egui::SidePanel;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Deck),
    Error(String),
}

/// Main application window.
pub struct SlidesApp {
    deck: Option<Deck>,
    control_panel: ControlPanel,
    slide_viewer: SlideViewer,
    image_size: (u32, u32),

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
    loading_kind: DeckKind,
}

impl SlidesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self::with_config(config)
    }

    fn with_config(config: AppConfig) -> Self {
        let mut app = Self {
            deck: None,
            control_panel: ControlPanel::new(config.deck, config.csv.clone()),
            slide_viewer: SlideViewer::new(),
            image_size: config.image_size,
            load_rx: None,
            is_loading: false,
            loading_kind: config.deck,
        };
        if let Some(path) = config.csv {
            app.start_load(path);
        }
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(self.control_panel.settings.deck.default_csv())
            .pick_file()
        {
            self.control_panel.settings.csv_path = Some(path.clone());
            self.start_load(path);
        }
    }

    /// Switching deck kind reparses the current CSV under the new schema.
    fn handle_deck_changed(&mut self) {
        self.deck = None;
        self.slide_viewer.clear();
        match self.control_panel.settings.csv_path.clone() {
            Some(path) => self.start_load(path),
            None => self.control_panel.set_progress(0.0, "Ready"),
        }
    }

    /// Load the CSV in a background thread
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        let kind = self.control_panel.settings.deck;
        self.loading_kind = kind;
        self.deck = None;
        self.slide_viewer.clear();
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Reading {}...",
                path.display()
            )));
            let result = match Deck::load(kind, &path) {
                Ok(deck) => LoadResult::Complete(deck),
                Err(e) => {
                    error!("Failed to load {}: {}", path.display(), e);
                    LoadResult::Error(e.to_string())
                }
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete(_) | LoadResult::Error(_)
                        if self.loading_kind != self.control_panel.settings.deck =>
                    {
                        // Stale result; the selector moved while loading
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Complete(deck) => {
                        let mut status = format!("Complete! {} rows loaded", deck.record_count());
                        if deck.rejected_count() > 0 {
                            status.push_str(&format!(", {} rejected", deck.rejected_count()));
                        }
                        self.control_panel.set_progress(100.0, &status);
                        self.slide_viewer.set_view(deck.render_current());
                        self.deck = Some(deck);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_error(&error);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }

        if !self.is_loading && self.loading_kind != self.control_panel.settings.deck {
            if let Some(path) = self.control_panel.settings.csv_path.clone() {
                debug!("reloading as {}", self.control_panel.settings.deck.label());
                self.start_load(path);
            }
        }
    }

    /// Apply a navigation step and re-render the slide if it moved.
    fn navigate(&mut self, step: impl FnOnce(&mut Deck) -> bool) {
        let Some(deck) = self.deck.as_mut() else {
            return;
        };
        if step(deck) {
            debug!("showing {}", deck.current_scene().id());
            self.slide_viewer.set_view(deck.render_current());
        }
    }

    fn handle_export_pptx(&mut self) {
        let Some(deck) = &self.deck else {
            self.control_panel.set_error("No deck to export");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PowerPoint", &["pptx"])
            .set_file_name(default_export_name(deck.kind(), "pptx"))
            .save_file()
        else {
            return;
        };

        self.control_panel.set_progress(10.0, "Rendering slides...");
        match export::export_pptx(deck, &output_path, self.image_size) {
            Ok(()) => {
                let (_, slides) = deck.position();
                self.control_panel
                    .set_progress(100.0, &format!("Complete! PPTX exported: {} slides", slides));
                open_exported(&output_path);
            }
            Err(e) => self.control_panel.set_error(&format!("{:#}", e)),
        }
    }

    fn handle_export_svg(&mut self) {
        let Some(deck) = &self.deck else {
            self.control_panel.set_error("No deck to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        self.control_panel.set_progress(10.0, "Rendering slides...");
        match export::export_svg(deck, &dir, self.image_size) {
            Ok(paths) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! {} SVG files written", paths.len()));
                if let Some(first) = paths.first() {
                    open_exported(first);
                }
            }
            Err(e) => self.control_panel.set_error(&format!("{:#}", e)),
        }
    }
}

fn default_export_name(kind: DeckKind, extension: &str) -> String {
    let stem = match kind {
        DeckKind::Titles => "titles_deck",
        DeckKind::Paddles => "paddles_deck",
    };
    format!("{}.{}", stem, extension)
}

fn open_exported(path: &Path) {
    info!("Opening {}", path.display());
    if let Err(e) = open::that(path) {
        warn!("Could not open {}: {}", path.display(), e);
    }
}

impl eframe::App for SlidesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self
                        .control_panel
                        .show(ui, self.deck.as_ref(), self.is_loading);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::DeckChanged => self.handle_deck_changed(),
                        ControlPanelAction::Previous => self.navigate(Deck::previous),
                        ControlPanelAction::Next => self.navigate(Deck::next),
                        ControlPanelAction::Restart => self.navigate(Deck::restart),
                        ControlPanelAction::ExportPptx => self.handle_export_pptx(),
                        ControlPanelAction::ExportSvg => self.handle_export_svg(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Slide Viewer
        let click_hint = self
            .deck
            .as_ref()
            .filter(|deck| !deck.uses_buttons() && deck.can_go_forward())
            .map(|_| "Click anywhere on the slide to continue");

        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| self.slide_viewer.show(ui, click_hint))
            .inner;
        if clicked {
            self.navigate(Deck::click);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn wait_for_load(app: &mut SlidesApp) {
        for _ in 0..500 {
            app.check_load_results();
            if !app.is_loading {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("load did not finish");
    }

    #[test]
    fn deck_switch_during_load_reloads_with_new_kind() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            b"type,release_year,maturity_rating,genre,Paddle Name,Brand,Price\n\
              Movie,2019,PG,['Dramas'],Perseus,Joola,$250\n",
        )
        .unwrap();
        file.flush().unwrap();

        let mut app = SlidesApp::with_config(AppConfig {
            deck: DeckKind::Titles,
            csv: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        });
        assert!(app.is_loading);

        app.control_panel.settings.deck = DeckKind::Paddles;
        app.handle_deck_changed();
        wait_for_load(&mut app);

        let deck = app.deck.as_ref().unwrap();
        assert_eq!(deck.kind(), DeckKind::Paddles);
        assert_eq!(deck.record_count(), 1);
    }

    #[test]
    fn export_names_follow_deck() {
        assert_eq!(default_export_name(DeckKind::Titles, "pptx"), "titles_deck.pptx");
        assert_eq!(default_export_name(DeckKind::Paddles, "svg"), "paddles_deck.svg");
    }
}
