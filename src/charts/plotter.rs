//! Chart Plotter Module
//! Draws slide charts inside egui: painter-built pie and sunburst, egui_plot bars.

use crate::charts::layout::{
    arc_centroid, partition_layout, pie_layout, screen_to_polar, wedge_pieces,
};
use crate::charts::palette::{category_color, sunburst_colors, Rgb};
use crate::data::{CategoryCount, NamedValue};
use egui::emath::Rot2;
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Painter, Pos2, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot};

/// Sunburst bands rest at this opacity and go fully opaque under the pointer.
const SUNBURST_OPACITY: f32 = 0.8;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Creates slide charts using the egui painter and egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a pie chart with `category: count` labels at the slice centroids.
    pub fn draw_pie(ui: &mut egui::Ui, entries: &[CategoryCount], size: f32) {
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = f64::from(size / 2.0);
        let slices = pie_layout(entries);

        for (i, slice) in slices.iter().enumerate() {
            Self::fill_wedge(
                &painter,
                center,
                0.0,
                radius,
                slice.start,
                slice.end,
                to_color32(category_color(i)),
            );
        }

        let text_color = Color32::BLACK;
        for slice in slices.iter().filter(|s| s.span() > 0.0) {
            let (x, y) = arc_centroid(slice, 0.0, radius);
            painter.text(
                center + Vec2::new(x as f32, y as f32),
                Align2::CENTER_CENTER,
                &slice.label,
                FontId::proportional(13.0),
                text_color,
            );
        }

        if let Some(pos) = response.hover_pos() {
            let offset = pos - center;
            let (angle, r) = screen_to_polar(f64::from(offset.x), f64::from(offset.y));
            if r <= radius {
                if let Some(slice) = slices.iter().find(|s| s.contains_angle(angle)) {
                    let share = slice.value / slices.iter().map(|s| s.value).sum::<f64>();
                    response.on_hover_text_at_pointer(format!(
                        "{} ({:.1}%)",
                        slice.label,
                        share * 100.0
                    ));
                }
            }
        }
    }

    /// Draw a one-level sunburst: root disc plus an outer ring with radial labels.
    pub fn draw_sunburst(ui: &mut egui::Ui, entries: &[NamedValue], size: f32) {
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = f64::from(size / 2.0);
        let nodes = partition_layout(entries, radius);
        let colors = sunburst_colors(entries.len());

        let pointer = response.hover_pos().map(|pos| {
            let offset = pos - center;
            screen_to_polar(f64::from(offset.x), f64::from(offset.y))
        });

        for (node, rgb) in nodes.iter().zip(colors.iter()) {
            let hovered = pointer.is_some_and(|(angle, r)| node.contains(angle, r));
            let opacity = if hovered { 1.0 } else { SUNBURST_OPACITY };
            Self::fill_wedge(
                &painter,
                center,
                node.y0,
                node.y1,
                node.x0,
                node.x1,
                to_color32(*rgb).gamma_multiply(opacity),
            );
        }

        for node in nodes.iter().filter(|n| n.shows_label()) {
            let Some(name) = &node.name else { continue };
            let anchor = node.label_anchor();
            let angle = anchor.rotation as f32;
            let galley =
                painter.layout_no_wrap(name.clone(), FontId::proportional(11.0), Color32::BLACK);
            // TextShape rotates around its top-left corner; shift so the galley centre lands on the anchor
            let half = galley.size() / 2.0;
            let target = center + Vec2::new(anchor.position.0 as f32, anchor.position.1 as f32);
            let pos = target - Rot2::from_angle(angle) * half;
            painter.add(TextShape::new(pos, galley, Color32::BLACK).with_angle(angle));
        }

        if let Some((angle, r)) = pointer {
            if let Some(node) = nodes.iter().skip(1).find(|n| n.contains(angle, r)) {
                if let Some(name) = &node.name {
                    response.on_hover_text_at_pointer(format!("{}: {}", name, node.value));
                }
            }
        }
    }

    /// Draw one bar per entry with the entry names on the x axis.
    pub fn draw_bars(
        ui: &mut egui::Ui,
        id: &str,
        entries: &[NamedValue],
        value_label: &str,
        height: f32,
    ) {
        let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
        let bars: Vec<Bar> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Bar::new(i as f64, e.value)
                    .name(&e.name)
                    .width(0.7)
                    .fill(to_color32(category_color(i)))
            })
            .collect();

        Plot::new(format!("bars_{}", id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .y_axis_label(value_label.to_string())
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                names.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(value_label));
            });
    }

    fn fill_wedge(
        painter: &Painter,
        center: Pos2,
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
        color: Color32,
    ) {
        for piece in wedge_pieces(inner, outer, start, end) {
            let points: Vec<Pos2> = piece
                .into_iter()
                .map(|(x, y)| center + Vec2::new(x as f32, y as f32))
                .collect();
            // Hairline in the fill color hides seams between neighbouring pieces
            painter.add(Shape::convex_polygon(points, color, Stroke::new(0.5, color)));
        }
    }
}
