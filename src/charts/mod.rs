//! Charts module - Slide chart geometry, colors and drawing back ends

mod layout;
mod palette;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticSlideRenderer;
