//! Export Module
//! Writes a whole deck to PPTX, SVG files or JSON without opening a window.

use crate::charts::StaticSlideRenderer;
use crate::config::ExportTargets;
use crate::deck::{Deck, SlideView};
use crate::ppt::{PptGenerator, SlideImage};
use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Render every view to PNG in parallel, keeping slide order.
pub fn render_slide_images(views: &[SlideView], size: (u32, u32)) -> Result<Vec<SlideImage>> {
    views
        .par_iter()
        .map(|view| {
            let png = StaticSlideRenderer::render_png(view, size.0, size.1)
                .with_context(|| format!("Failed to render {}", view.id))?;
            Ok(SlideImage {
                title: view.title.clone(),
                png,
                size,
            })
        })
        .collect()
}

pub fn export_pptx(deck: &Deck, path: &Path, size: (u32, u32)) -> Result<()> {
    let start = Instant::now();
    let images = render_slide_images(&deck.render_all(), size)?;
    PptGenerator::generate(&images, path, deck.kind().label())?;
    info!("PPTX export took {:?}", start.elapsed());
    Ok(())
}

/// Write one SVG per slide into `dir`, returning the written paths in slide order.
pub fn export_svg(deck: &Deck, dir: &Path, size: (u32, u32)) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let views = deck.render_all();
    let paths = views
        .par_iter()
        .enumerate()
        .map(|(idx, view)| {
            let svg = StaticSlideRenderer::render_svg(view, size.0, size.1)
                .with_context(|| format!("Failed to render {}", view.id))?;
            let path = dir.join(svg_file_name(idx, view));
            fs::write(&path, svg)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Wrote {} SVG slides to {}", paths.len(), dir.display());
    Ok(paths)
}

pub fn export_json(deck: &Deck, path: &Path) -> Result<()> {
    let views = deck.render_all();
    let json = serde_json::to_string_pretty(&views).context("Failed to serialize slide views")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} slide views to {}", views.len(), path.display());
    Ok(())
}

/// Run every requested export in turn.
pub fn run_exports(deck: &Deck, targets: &ExportTargets, size: (u32, u32)) -> Result<()> {
    if let Some(path) = &targets.pptx {
        export_pptx(deck, path, size)?;
    }
    if let Some(dir) = &targets.svg_dir {
        export_svg(deck, dir, size)?;
    }
    if let Some(path) = &targets.json {
        export_json(deck, path)?;
    }
    Ok(())
}

fn svg_file_name(idx: usize, view: &SlideView) -> String {
    format!("{:02}_{}.svg", idx + 1, view.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Paddle, Title};
    use crate::deck::ViewBody;
    use std::io::Cursor;

    fn paddle_deck() -> Deck {
        let paddles = [("Vatic Pro V7", "Vatic", 89.99), ("Joola Hyperion", "Joola", 219.95)]
            .iter()
            .enumerate()
            .map(|(i, (name, brand, price))| Paddle {
                line: i + 2,
                name: name.to_string(),
                brand: brand.to_string(),
                price: *price,
                price_text: format!("${:.2}", price),
            })
            .collect();
        Deck::paddles(Dataset::new(paddles, Vec::new()))
    }

    fn title_deck() -> Deck {
        let titles = [
            ("Movie", 2019, Some("PG"), "['Dramas', 'Comedies']"),
            ("TV Show", 2021, None, "['Dramas']"),
            ("Movie", 2008, Some("R"), "['Kids' TV']"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (kind, year, rating, genre))| Title {
            line: i + 2,
            kind: kind.to_string(),
            release_year: *year,
            maturity_rating: rating.map(str::to_string),
            genre: genre.to_string(),
        })
        .collect();
        Deck::titles(Dataset::new(titles, Vec::new()))
    }

    #[test]
    fn both_decks_render_every_slide() {
        for deck in [title_deck(), paddle_deck()] {
            let views = deck.render_all();
            let images = render_slide_images(&views, (640, 360)).unwrap();
            assert_eq!(images.len(), views.len());
            for (image, view) in images.iter().zip(&views) {
                assert_eq!(image.title, view.title);
                assert_eq!(&image.png[..4], b"\x89PNG");
            }
        }
    }

    #[test]
    fn svg_export_writes_one_file_per_scene() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("slides");
        let paths = export_svg(&paddle_deck(), &out, (640, 360)).unwrap();

        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["01_scene1.svg", "02_scene2.svg", "03_scene3.svg", "04_explore.svg"]
        );
        for path in &paths {
            assert!(fs::read_to_string(path).unwrap().contains("<svg"));
        }
    }

    #[test]
    fn pptx_export_packages_every_slide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles_deck.pptx");
        export_pptx(&title_deck(), &path, (640, 360)).unwrap();

        let bytes = fs::read(&path).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in [
            "ppt/presentation.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide3.xml",
            "ppt/media/image3.png",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
        assert!(archive.by_name("ppt/slides/slide4.xml").is_err());
    }

    #[test]
    fn svg_files_sort_in_slide_order() {
        let view = SlideView::new("scene2", "Price Landscape", ViewBody::Text { lines: vec![] });
        assert_eq!(svg_file_name(1, &view), "02_scene2.svg");
        assert_eq!(svg_file_name(10, &view), "11_scene2.svg");
    }

    #[test]
    fn json_export_lists_every_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views.json");
        export_json(&paddle_deck(), &path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let views = parsed.as_array().unwrap();
        assert_eq!(views.len(), 4);
        assert_eq!(views[0]["id"], "scene1");
        assert_eq!(views[0]["body"]["kind"], "pie");
        assert_eq!(views[3]["id"], "explore");
        assert_eq!(views[3]["body"]["kind"], "text");
    }

    #[test]
    fn no_targets_writes_nothing() {
        let targets = ExportTargets::default();
        assert!(run_exports(&paddle_deck(), &targets, (640, 360)).is_ok());
    }

    #[test]
    fn json_export_to_missing_directory_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("views.json");
        let err = export_json(&paddle_deck(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
    }
}
