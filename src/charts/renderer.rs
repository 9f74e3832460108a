//! Static Slide Renderer
//! Draws a `SlideView` with plotters for export.
//!
//! Layout:
//! 1. Title centered across the top
//! 2. Body: text lines, pie, sunburst ring or bar chart
//! 3. Annotation strip along the bottom edge

use crate::charts::layout::{partition_layout, pie_layout, polar_to_screen, wedge_outline};
use crate::charts::palette::{category_color, sunburst_colors, Rgb};
use crate::deck::{SlideView, ViewBody};
use crate::data::{CategoryCount, NamedValue};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

const TITLE_FONT: u32 = 40;
const BODY_FONT: u32 = 22;
const NOTE_FONT: u32 = 18;
const LINE_HEIGHT: i32 = 32;
const NOTE_HEIGHT: i32 = 26;
const BAR_NAME_CHARS: usize = 14;

const TEXT_COLOR: RGBColor = RGBColor(33, 33, 33);
const NOTE_COLOR: RGBColor = RGBColor(96, 96, 96);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Invalid image size {0}x{1}")]
    Size(u32, u32),
}

fn drawing_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Renders slides to PNG bytes or SVG text.
pub struct StaticSlideRenderer;

impl StaticSlideRenderer {
    /// Render to an encoded PNG.
    pub fn render_png(view: &SlideView, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Size(width, height));
        }
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw_slide(&root, view)?;
            root.present().map_err(drawing_err)?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Size(width, height))?;
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    /// Render to an SVG document.
    pub fn render_svg(view: &SlideView, width: u32, height: u32) -> Result<String, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Size(width, height));
        }
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            Self::draw_slide(&root, view)?;
            root.present().map_err(drawing_err)?;
        }
        Ok(svg)
    }

    fn draw_slide<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        view: &SlideView,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(drawing_err)?;
        let content = root
            .titled(&view.title, ("sans-serif", TITLE_FONT).into_font().color(&TEXT_COLOR))
            .map_err(drawing_err)?;

        let (_, height) = content.dim_in_pixel();
        let notes_height = if view.annotations.is_empty() {
            0
        } else {
            NOTE_HEIGHT * view.annotations.len() as i32 + 10
        };
        let (body, notes) = content.split_vertically((height as i32 - notes_height).max(0));

        match &view.body {
            ViewBody::Text { lines } => Self::draw_text(&body, lines)?,
            ViewBody::Pie { entries } => Self::draw_pie(&body, entries)?,
            ViewBody::Sunburst { entries } => Self::draw_sunburst(&body, entries)?,
            ViewBody::Bars {
                entries,
                value_label,
            } => Self::draw_bars(&body, entries, value_label)?,
        }

        let style = ("sans-serif", NOTE_FONT).into_font().color(&NOTE_COLOR);
        for (i, note) in view.annotations.iter().enumerate() {
            notes
                .draw_text(note, &style, (40, 4 + NOTE_HEIGHT * i as i32))
                .map_err(drawing_err)?;
        }
        Ok(())
    }

    fn draw_text<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        lines: &[String],
    ) -> Result<(), RenderError> {
        let (_, height) = area.dim_in_pixel();
        let capacity = ((height as i32 - 40).max(0) / LINE_HEIGHT) as usize;
        let style = ("sans-serif", BODY_FONT).into_font().color(&TEXT_COLOR);

        for (i, line) in visible_lines(lines, capacity).iter().enumerate() {
            area.draw_text(line, &style, (60, 30 + LINE_HEIGHT * i as i32))
                .map_err(drawing_err)?;
        }
        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        entries: &[CategoryCount],
    ) -> Result<(), RenderError> {
        let (center, radius) = chart_circle(area.dim_in_pixel());
        let slices = pie_layout(entries);

        for (i, slice) in slices.iter().enumerate() {
            let points = to_pixels(center, wedge_outline(0.0, radius, slice.start, slice.end));
            if points.is_empty() {
                continue;
            }
            area.draw(&Polygon::new(points, rgb(category_color(i)).filled()))
                .map_err(drawing_err)?;
        }

        let style = ("sans-serif", BODY_FONT)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for slice in slices.iter().filter(|s| s.span() > 0.0) {
            let pos = to_pixel(center, polar_to_screen(slice.mid_angle(), radius / 2.0));
            area.draw_text(&slice.label, &style, pos)
                .map_err(drawing_err)?;
        }
        Ok(())
    }

    fn draw_sunburst<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        entries: &[NamedValue],
    ) -> Result<(), RenderError> {
        let (center, radius) = chart_circle(area.dim_in_pixel());
        let nodes = partition_layout(entries, radius);
        let colors = sunburst_colors(entries.len());

        for (node, color) in nodes.iter().zip(colors) {
            let points = to_pixels(center, wedge_outline(node.y0, node.y1, node.x0, node.x1));
            if points.is_empty() {
                continue;
            }
            area.draw(&Polygon::new(points, rgb(color).mix(0.8).filled()))
                .map_err(drawing_err)?;
        }

        // plotters cannot rotate text freely, so ring labels stay horizontal
        let style = ("sans-serif", 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for node in nodes.iter().filter(|n| n.shows_label()) {
            if let Some(name) = &node.name {
                let pos = to_pixel(center, node.label_anchor().position);
                area.draw_text(name, &style, pos).map_err(drawing_err)?;
            }
        }
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        entries: &[NamedValue],
        value_label: &str,
    ) -> Result<(), RenderError> {
        if entries.is_empty() {
            return Self::draw_text(area, &["No data".to_string()]);
        }

        let names: Vec<String> = entries
            .iter()
            .map(|e| truncate_label(&e.name, BAR_NAME_CHARS))
            .collect();
        let y_max = entries.iter().map(|e| e.value).fold(0.0, f64::max).max(1.0) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0..entries.len() as i32).into_segmented(), 0f64..y_max)
            .map_err(drawing_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(entries.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc(value_label)
            .label_style(("sans-serif", 14))
            .draw()
            .map_err(drawing_err)?;

        chart
            .draw_series(entries.iter().enumerate().map(|(i, e)| {
                let x = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(x), 0.0), (SegmentValue::Exact(x + 1), e.value)],
                    rgb(category_color(i)).filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(drawing_err)?;
        Ok(())
    }
}

/// Centre and radius of the largest circle that fits the area with a margin.
fn chart_circle((width, height): (u32, u32)) -> ((i32, i32), f64) {
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = (f64::from(width.min(height)) / 2.0 - 20.0).max(0.0);
    (center, radius)
}

fn to_pixel(center: (i32, i32), (x, y): (f64, f64)) -> (i32, i32) {
    (center.0 + x.round() as i32, center.1 + y.round() as i32)
}

fn to_pixels(center: (i32, i32), points: Vec<(f64, f64)>) -> Vec<(i32, i32)> {
    points.into_iter().map(|p| to_pixel(center, p)).collect()
}

/// Lines that fit in `capacity` rows; overflow collapses into a final "... and N more".
fn visible_lines(lines: &[String], capacity: usize) -> Vec<String> {
    if lines.len() <= capacity {
        return lines.to_vec();
    }
    if capacity == 0 {
        return Vec::new();
    }
    let shown = capacity - 1;
    let mut visible = lines[..shown].to_vec();
    visible.push(format!("... and {} more", lines.len() - shown));
    visible
}

fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut short: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    short.push('…');
    short
}
