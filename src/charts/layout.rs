//! Chart geometry shared by the interactive viewer and the static renderer.
//!
//! Angles are radians measured clockwise from 12 o'clock. Screen coordinates
//! have y pointing down.

use crate::data::{CategoryCount, NamedValue};
use std::f64::consts::{PI, TAU};

/// Largest angular step used when approximating arcs with straight segments.
const ARC_STEP: f64 = PI / 90.0;

/// Minimum band area (radians × pixels) for a sunburst label to be drawn.
const LABEL_MIN_AREA: f64 = 0.03;

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSlice {
    pub label: String,
    pub value: f64,
    pub start: f64,
    pub end: f64,
}

impl ArcSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

/// Lay out pie slices proportional to their counts.
///
/// Slices are placed clockwise from 12 o'clock largest first (ties keep input
/// order); the returned vector keeps the input order.
pub fn pie_layout(entries: &[CategoryCount]) -> Vec<ArcSlice> {
    let values: Vec<f64> = entries.iter().map(|e| e.count as f64).collect();
    let angles = proportional_spans(&values, true);

    entries
        .iter()
        .zip(angles)
        .map(|(entry, (start, end))| ArcSlice {
            label: format!("{}: {}", entry.category, entry.count),
            value: entry.count as f64,
            start,
            end,
        })
        .collect()
}

/// Split the full circle into spans proportional to `values`.
fn proportional_spans(values: &[f64], largest_first: bool) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().sum();
    let mut order: Vec<usize> = (0..values.len()).collect();
    if largest_first {
        // Stable sort keeps input order between equal values
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    }

    let scale = if total > 0.0 { TAU / total } else { 0.0 };
    let mut spans = vec![(0.0, 0.0); values.len()];
    let mut angle = 0.0;
    for idx in order {
        let start = angle;
        angle += values[idx] * scale;
        spans[idx] = (start, angle);
    }
    spans
}

/// A node of the one-level radial partition used by the sunburst.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    /// `None` for the root disc.
    pub name: Option<String>,
    pub value: f64,
    pub depth: usize,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PartitionNode {
    pub fn shows_label(&self) -> bool {
        self.depth > 0 && (self.y1 - self.y0) * (self.x1 - self.x0) > LABEL_MIN_AREA
    }

    pub fn contains(&self, angle: f64, radius: f64) -> bool {
        angle >= self.x0 && angle < self.x1 && radius >= self.y0 && radius < self.y1
    }

    /// Where and how to draw the node's label.
    pub fn label_anchor(&self) -> LabelAnchor {
        let angle = (self.x0 + self.x1) / 2.0;
        let radius = (self.y0 + self.y1) / 2.0;
        let degrees = angle.to_degrees();
        // Text runs outward on the right half and is flipped on the left half
        let rotation = if degrees < 180.0 {
            degrees - 90.0
        } else {
            degrees + 90.0
        };
        LabelAnchor {
            position: polar_to_screen(angle, radius),
            rotation: rotation.to_radians(),
        }
    }
}

/// Label centre (relative to the chart centre) and clockwise rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub position: (f64, f64),
    pub rotation: f64,
}

/// Partition `entries` under a single root: the root fills the inner half of
/// the radius, the entries share the outer ring in input order.
pub fn partition_layout(entries: &[NamedValue], radius: f64) -> Vec<PartitionNode> {
    let band = radius / 2.0;
    let total: f64 = entries.iter().map(|e| e.value).sum();

    let mut nodes = Vec::with_capacity(entries.len() + 1);
    nodes.push(PartitionNode {
        name: None,
        value: total,
        depth: 0,
        x0: 0.0,
        x1: TAU,
        y0: 0.0,
        y1: band,
    });

    let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
    for (entry, (x0, x1)) in entries.iter().zip(proportional_spans(&values, false)) {
        nodes.push(PartitionNode {
            name: Some(entry.name.clone()),
            value: entry.value,
            depth: 1,
            x0,
            x1,
            y0: band,
            y1: radius,
        });
    }
    nodes
}

/// Convert a polar position to screen offsets from the centre.
pub fn polar_to_screen(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Angle (clockwise from 12 o'clock, in `[0, TAU)`) and radius of a screen offset.
pub fn screen_to_polar(dx: f64, dy: f64) -> (f64, f64) {
    let angle = dx.atan2(-dy).rem_euclid(TAU);
    (angle, dx.hypot(dy))
}

/// Pie label position: the centroid of the slice between `inner` and `outer`.
pub fn arc_centroid(slice: &ArcSlice, inner: f64, outer: f64) -> (f64, f64) {
    polar_to_screen(slice.mid_angle(), (inner + outer) / 2.0)
}

fn arc_steps(start: f64, end: f64) -> usize {
    // Tolerance keeps exact multiples of the step from gaining a sliver segment
    ((end - start) / ARC_STEP - 1e-9).ceil().max(1.0) as usize
}

/// Split an annular wedge into convex pieces, each given as its corner points
/// relative to the centre. A zero inner radius yields triangles.
pub fn wedge_pieces(inner: f64, outer: f64, start: f64, end: f64) -> Vec<Vec<(f64, f64)>> {
    if end <= start || outer <= 0.0 {
        return Vec::new();
    }
    let steps = arc_steps(start, end);
    let step = (end - start) / steps as f64;

    (0..steps)
        .map(|i| {
            let a0 = start + step * i as f64;
            let a1 = a0 + step;
            if inner <= 0.0 {
                vec![
                    (0.0, 0.0),
                    polar_to_screen(a0, outer),
                    polar_to_screen(a1, outer),
                ]
            } else {
                vec![
                    polar_to_screen(a0, inner),
                    polar_to_screen(a0, outer),
                    polar_to_screen(a1, outer),
                    polar_to_screen(a1, inner),
                ]
            }
        })
        .collect()
}

/// Outline of an annular wedge as a single closed polygon.
pub fn wedge_outline(inner: f64, outer: f64, start: f64, end: f64) -> Vec<(f64, f64)> {
    if end <= start || outer <= 0.0 {
        return Vec::new();
    }
    let steps = arc_steps(start, end);
    let step = (end - start) / steps as f64;

    let mut points: Vec<(f64, f64)> = (0..=steps)
        .map(|i| polar_to_screen(start + step * i as f64, outer))
        .collect();
    if inner <= 0.0 {
        points.push((0.0, 0.0));
    } else {
        points.extend((0..=steps).rev().map(|i| polar_to_screen(start + step * i as f64, inner)));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[(&str, usize)]) -> Vec<CategoryCount> {
        values
            .iter()
            .map(|(c, n)| CategoryCount {
                category: c.to_string(),
                count: *n,
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn pie_spans_are_proportional_and_cover_the_circle() {
        let slices = pie_layout(&counts(&[("Show", 1), ("Movie", 3)]));
        assert_eq!(slices[0].label, "Show: 1");
        // Largest slice is laid out first
        assert!(close(slices[1].start, 0.0));
        assert!(close(slices[1].end, TAU * 0.75));
        assert!(close(slices[0].start, TAU * 0.75));
        assert!(close(slices[0].end, TAU));
        let total: f64 = slices.iter().map(|s| s.span()).sum();
        assert!(close(total, TAU));
    }

    #[test]
    fn pie_ties_keep_input_order() {
        let slices = pie_layout(&counts(&[("a", 2), ("b", 2)]));
        assert!(close(slices[0].start, 0.0));
        assert!(close(slices[1].start, PI));
    }

    #[test]
    fn empty_pie_has_no_span() {
        let slices = pie_layout(&counts(&[("a", 0)]));
        assert!(close(slices[0].span(), 0.0));
        assert!(pie_layout(&[]).is_empty());
    }

    #[test]
    fn partition_has_root_disc_and_outer_ring() {
        let entries = vec![
            NamedValue {
                name: "Drama".into(),
                value: 2.0,
            },
            NamedValue {
                name: "Comedy".into(),
                value: 1.0,
            },
        ];
        let nodes = partition_layout(&entries, 300.0);
        assert_eq!(nodes.len(), 3);

        let root = &nodes[0];
        assert_eq!(root.name, None);
        assert_eq!(root.value, 3.0);
        assert!(close(root.y0, 0.0) && close(root.y1, 150.0));
        assert!(!root.shows_label());

        assert!(close(nodes[1].x0, 0.0));
        assert!(close(nodes[1].x1, TAU * 2.0 / 3.0));
        assert!(close(nodes[2].x1, TAU));
        assert!(close(nodes[2].y0, 150.0) && close(nodes[2].y1, 300.0));
        assert!(nodes[1].shows_label());
    }

    #[test]
    fn tiny_bands_hide_their_label() {
        let mut entries = vec![NamedValue {
            name: "Big".into(),
            value: 10_000.0,
        }];
        entries.push(NamedValue {
            name: "Tiny".into(),
            value: 0.001,
        });
        let nodes = partition_layout(&entries, 1.0);
        assert!(nodes[1].shows_label());
        assert!(!nodes[2].shows_label());
    }

    #[test]
    fn label_rotation_flips_on_the_left_half() {
        let node = |x0: f64, x1: f64| PartitionNode {
            name: Some("n".into()),
            value: 1.0,
            depth: 1,
            x0,
            x1,
            y0: 1.0,
            y1: 2.0,
        };
        // 3 o'clock: horizontal text, no rotation
        let right = node(PI / 2.0 - 0.1, PI / 2.0 + 0.1).label_anchor();
        assert!(close(right.rotation, 0.0));
        assert!(close(right.position.0, 1.5) && close(right.position.1, 0.0));
        // 9 o'clock: horizontal text again after the flip
        let left = node(1.5 * PI - 0.1, 1.5 * PI + 0.1).label_anchor();
        assert!(close(left.rotation, TAU));
    }

    #[test]
    fn polar_round_trip() {
        for &(angle, radius) in &[(0.0, 1.0), (PI / 2.0, 2.0), (PI, 3.0), (1.75 * PI, 4.0)] {
            let (x, y) = polar_to_screen(angle, radius);
            let (a, r) = screen_to_polar(x, y);
            assert!(close(a, angle), "{} vs {}", a, angle);
            assert!(close(r, radius));
        }
        // 12 o'clock is straight up on screen
        let (x, y) = polar_to_screen(0.0, 10.0);
        assert!(close(x, 0.0) && close(y, -10.0));
    }

    #[test]
    fn wedge_pieces_cover_the_span() {
        let pieces = wedge_pieces(0.0, 10.0, 0.0, PI);
        assert_eq!(pieces.len(), 90);
        assert!(pieces.iter().all(|p| p.len() == 3));
        let ring = wedge_pieces(5.0, 10.0, 0.0, 0.01);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring[0].len(), 4);
        assert!(wedge_pieces(0.0, 10.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn outline_closes_through_centre_for_pie_slices() {
        let outline = wedge_outline(0.0, 10.0, 0.0, PI / 2.0);
        assert_eq!(outline.last(), Some(&(0.0, 0.0)));
        let ring = wedge_outline(5.0, 10.0, 0.0, PI / 2.0);
        assert_eq!(ring.len() % 2, 0);
    }
}
