//! GUI module - User interface components

mod app;
mod control_panel;
mod slide_viewer;

pub use app::SlidesApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use slide_viewer::SlideViewer;
