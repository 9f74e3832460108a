//! Configuration Module
//! Command-line arguments and the resolved application configuration.

use crate::deck::DeckKind;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

/// Slide decks built from CSV files: pie, sunburst and text views.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Which deck to build from the CSV.
    #[arg(short, long, value_enum, default_value_t = DeckKind::Titles)]
    pub deck: DeckKind,

    /// (file path, optional) CSV to load. Defaults to the deck's usual file
    /// name in the working directory when exporting.
    #[arg(short, long)]
    pub csv: Option<PathBuf>,

    /// (file path) Write every slide into a PowerPoint deck and exit.
    #[arg(long)]
    pub export_pptx: Option<PathBuf>,

    /// (directory) Write one SVG per slide and exit.
    #[arg(long)]
    pub export_svg: Option<PathBuf>,

    /// (file path) Write every rendered slide view as JSON and exit.
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Exported image width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_parser = clap::value_parser!(u32).range(64..))]
    pub width: u32,

    /// Exported image height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_parser = clap::value_parser!(u32).range(64..))]
    pub height: u32,

    /// Turn on debug logging (navigation, parsing details).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where headless exports go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTargets {
    pub pptx: Option<PathBuf>,
    pub svg_dir: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl ExportTargets {
    pub fn is_empty(&self) -> bool {
        self.pptx.is_none() && self.svg_dir.is_none() && self.json.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub deck: DeckKind,
    pub csv: Option<PathBuf>,
    pub exports: ExportTargets,
    pub image_size: (u32, u32),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deck: DeckKind::default(),
            csv: None,
            exports: ExportTargets::default(),
            image_size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            deck: args.deck,
            csv: args.csv,
            exports: ExportTargets {
                pptx: args.export_pptx,
                svg_dir: args.export_svg,
                json: args.export_json,
            },
            image_size: (args.width, args.height),
        }
    }
}

impl AppConfig {
    /// Any export target means no window is opened.
    pub fn is_headless(&self) -> bool {
        !self.exports.is_empty()
    }

    /// The CSV to load, falling back to the deck's default file name.
    pub fn csv_path(&self) -> PathBuf {
        self.csv
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.deck.default_csv()))
    }
}

/// Start the logger. `RUST_LOG` wins over the `--verbose` default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let argv = std::iter::once("chartify-slides").chain(args.iter().copied());
        AppConfig::from(Args::try_parse_from(argv).unwrap())
    }

    #[test]
    fn defaults_open_the_titles_deck_in_a_window() {
        let config = parse(&[]);
        assert_eq!(config, AppConfig::default());
        assert!(!config.is_headless());
        assert_eq!(config.csv_path(), PathBuf::from("netflix_cleaned.csv"));
    }

    #[test]
    fn export_flags_make_the_run_headless() {
        let config = parse(&[
            "--deck",
            "paddles",
            "--csv",
            "data/paddles.csv",
            "--export-svg",
            "out",
            "--width",
            "800",
        ]);
        assert_eq!(config.deck, DeckKind::Paddles);
        assert!(config.is_headless());
        assert_eq!(config.exports.svg_dir, Some(PathBuf::from("out")));
        assert_eq!(config.image_size, (800, DEFAULT_HEIGHT));
        assert_eq!(config.csv_path(), PathBuf::from("data/paddles.csv"));
    }

    #[test]
    fn paddle_deck_defaults_to_its_own_csv() {
        let config = parse(&["-d", "paddles", "--export-json", "views.json"]);
        assert_eq!(config.csv_path(), PathBuf::from("pickleball_paddles.csv"));
        assert_eq!(config.exports.json, Some(PathBuf::from("views.json")));
    }

    #[test]
    fn rejects_unknown_deck_and_tiny_images() {
        let argv = ["chartify-slides", "--deck", "slideshow"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["chartify-slides", "--width", "10"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
