//! Chartify Slides - CSV slide decks with interactive charts
//!
//! Loads a CSV into a deck of pie, sunburst, bar and text slides, then shows
//! it in a window or exports it headless to PPTX, SVG or JSON.

mod charts;
mod config;
mod data;
mod deck;
mod export;
mod gui;
mod ppt;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{init_logging, AppConfig, Args};
use deck::Deck;
use eframe::egui;
use gui::SlidesApp;
use log::info;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = AppConfig::from(args);

    if config.is_headless() {
        run_headless(&config)
    } else {
        run_gui(config)
    }
}

fn run_headless(config: &AppConfig) -> Result<()> {
    let path = config.csv_path();
    info!("Loading {} deck from {}", config.deck.label(), path.display());

    let deck = Deck::load(config.deck, &path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    info!(
        "Loaded {} rows ({} rejected)",
        deck.record_count(),
        deck.rejected_count()
    );

    export::run_exports(&deck, &config.exports, config.image_size)
}

fn run_gui(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("Chartify Slides"),
        ..Default::default()
    };

    eframe::run_native(
        "Chartify Slides",
        options,
        Box::new(move |cc| Ok(Box::new(SlidesApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("Window failed: {}", e))
}
