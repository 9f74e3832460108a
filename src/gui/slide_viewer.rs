//! Slide Viewer Widget
//! Central panel showing the current slide: title, chart or text, notes.

use crate::charts::ChartPlotter;
use crate::deck::{SlideView, ViewBody};
use egui::{Color32, RichText, ScrollArea};

const MIN_CHART_SIZE: f32 = 240.0;
const MAX_CHART_SIZE: f32 = 640.0;

#[derive(Default)]
pub struct SlideViewer {
    view: Option<SlideView>,
}

impl SlideViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: SlideView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    /// Draw the slide. Returns true when the slide area was clicked.
    pub fn show(&self, ui: &mut egui::Ui, click_hint: Option<&str>) -> bool {
        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return false;
        };

        let area = ui.max_rect();
        let available = ui.available_size();
        let chart_size = (available.x.min(available.y) - 160.0).clamp(MIN_CHART_SIZE, MAX_CHART_SIZE);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&view.title).size(28.0).strong());
                });
                ui.add_space(15.0);

                Self::draw_body(ui, view, chart_size);

                if !view.annotations.is_empty() {
                    ui.add_space(12.0);
                    ui.separator();
                    for note in &view.annotations {
                        ui.label(RichText::new(note).italics().color(Color32::GRAY));
                    }
                }

                if let Some(hint) = click_hint {
                    ui.add_space(12.0);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(hint)
                                .size(12.0)
                                .color(Color32::from_rgb(100, 149, 237)),
                        );
                    });
                }
            });

        ui.rect_contains_pointer(area) && ui.input(|i| i.pointer.primary_clicked())
    }

    fn draw_body(ui: &mut egui::Ui, view: &SlideView, chart_size: f32) {
        match &view.body {
            ViewBody::Text { lines } => {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        for line in lines {
                            ui.label(RichText::new(line).size(16.0));
                        }
                    });
            }
            ViewBody::Pie { entries } if entries.is_empty() => Self::no_data(ui),
            ViewBody::Pie { entries } => {
                ui.vertical_centered(|ui| ChartPlotter::draw_pie(ui, entries, chart_size));
            }
            ViewBody::Sunburst { entries } if entries.is_empty() => Self::no_data(ui),
            ViewBody::Sunburst { entries } => {
                ui.vertical_centered(|ui| ChartPlotter::draw_sunburst(ui, entries, chart_size));
            }
            ViewBody::Bars { entries, .. } if entries.is_empty() => Self::no_data(ui),
            ViewBody::Bars {
                entries,
                value_label,
            } => {
                ChartPlotter::draw_bars(ui, view.id, entries, value_label, chart_size);
            }
        }
    }

    fn no_data(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("No data to chart").size(16.0).color(Color32::GRAY));
        });
    }
}
