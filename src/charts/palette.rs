//! Color scales: a ten-color categorical palette for pies and bars, and a
//! cubehelix rainbow sampled evenly for sunburst rings.

use std::f64::consts::PI;

/// RGB triple shared by the egui and plotters back ends.
pub type Rgb = (u8, u8, u8);

pub const CATEGORY10: [Rgb; 10] = [
    (31, 119, 180),  // Blue
    (255, 127, 14),  // Orange
    (44, 160, 44),   // Green
    (214, 39, 40),   // Red
    (148, 103, 189), // Purple
    (140, 86, 75),   // Brown
    (227, 119, 194), // Pink
    (127, 127, 127), // Grey
    (188, 189, 34),  // Olive
    (23, 190, 207),  // Cyan
];

/// Color for the `index`-th category, cycling through [`CATEGORY10`].
pub fn category_color(index: usize) -> Rgb {
    CATEGORY10[index % CATEGORY10.len()]
}

/// Cyclical rainbow at `t` (wrapped into `[0, 1]`), built on cubehelix.
pub fn rainbow(t: f64) -> Rgb {
    let t = if (0.0..=1.0).contains(&t) {
        t
    } else {
        t - t.floor()
    };
    let ts = (t - 0.5).abs();
    cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

/// `n` evenly spaced samples of [`rainbow`], first and last at `t = 0` and `t = 1`.
pub fn quantize_rainbow(n: usize) -> Vec<Rgb> {
    match n {
        0 => Vec::new(),
        1 => vec![rainbow(0.0)],
        _ => (0..n)
            .map(|i| rainbow(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Sunburst colors: the root disc takes the first sample, ring entry `i` takes sample `i + 1`.
pub fn sunburst_colors(entries: usize) -> Vec<Rgb> {
    quantize_rainbow(entries + 1)
}

fn cubehelix(hue_degrees: f64, saturation: f64, lightness: f64) -> Rgb {
    const A: f64 = -0.14861;
    const B: f64 = 1.78277;
    const C: f64 = -0.29227;
    const D: f64 = -0.90649;
    const E: f64 = 1.97294;

    let h = (hue_degrees + 120.0) * PI / 180.0;
    let l = lightness;
    let a = saturation * l * (1.0 - l);
    let (sinh, cosh) = h.sin_cos();

    let channel = |v: f64| (255.0 * v).round().clamp(0.0, 255.0) as u8;
    (
        channel(l + a * (A * cosh + B * sinh)),
        channel(l + a * (C * cosh + D * sinh)),
        channel(l + a * (E * cosh)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_colors_cycle() {
        assert_eq!(category_color(0), (31, 119, 180));
        assert_eq!(category_color(10), category_color(0));
        assert_eq!(category_color(13), CATEGORY10[3]);
    }

    #[test]
    fn rainbow_is_cyclical() {
        assert_eq!(rainbow(0.0), rainbow(1.0));
        assert_eq!(rainbow(1.25), rainbow(0.25));
    }

    #[test]
    fn rainbow_midpoint_is_bright_green() {
        // Hue 80°, full saturation: green dominates red and blue
        let (r, g, b) = rainbow(0.5);
        assert!(g > r && g > b, "{:?}", (r, g, b));
    }

    #[test]
    fn quantize_counts() {
        assert!(quantize_rainbow(0).is_empty());
        assert_eq!(quantize_rainbow(1).len(), 1);
        let samples = quantize_rainbow(5);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], samples[4]);
        assert_eq!(sunburst_colors(3).len(), 4);
    }
}
