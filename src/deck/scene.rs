//! Scene definitions for both decks and the render function behind each one.

use crate::data::{DataProcessor, Dataset, NamedValue, Paddle, RecordError, Title};
use crate::deck::view::{SlideView, ViewBody};

/// Slides of the catalog deck, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSlide {
    Overview,
    TypeDistribution,
    GenreSunburst,
}

impl TitleSlide {
    pub const ALL: [TitleSlide; 3] = [
        TitleSlide::Overview,
        TitleSlide::TypeDistribution,
        TitleSlide::GenreSunburst,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TitleSlide::Overview => "slide1",
            TitleSlide::TypeDistribution => "slide2",
            TitleSlide::GenreSunburst => "slide3",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TitleSlide::Overview => "Netflix Content Overview",
            TitleSlide::TypeDistribution => "Content Distribution by Type",
            TitleSlide::GenreSunburst => "Genre Breakdown",
        }
    }

    pub fn render(self, titles: &Dataset<Title>) -> SlideView {
        let view = match self {
            TitleSlide::Overview => render_overview(self, titles),
            TitleSlide::TypeDistribution => SlideView::new(
                self.id(),
                self.title(),
                ViewBody::Pie {
                    entries: DataProcessor::group_by_category(titles.records(), |t| {
                        t.kind.as_str()
                    }),
                },
            ),
            TitleSlide::GenreSunburst => render_genre_sunburst(self, titles),
        };
        with_rejected_note(view, titles.rejected())
    }
}

/// Scenes of the paddle deck. Numbers match the click targets (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleScene {
    Brands,
    Prices,
    BrandPrices,
    Explore,
}

impl PaddleScene {
    pub const ALL: [PaddleScene; 4] = [
        PaddleScene::Brands,
        PaddleScene::Prices,
        PaddleScene::BrandPrices,
        PaddleScene::Explore,
    ];

    pub fn number(self) -> u8 {
        match self {
            PaddleScene::Brands => 1,
            PaddleScene::Prices => 2,
            PaddleScene::BrandPrices => 3,
            PaddleScene::Explore => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    /// Scene number a click on this scene jumps to. Explore has none.
    pub fn click_target(self) -> Option<u8> {
        match self {
            PaddleScene::Brands => Some(2),
            PaddleScene::Prices => Some(3),
            PaddleScene::BrandPrices => Some(4),
            PaddleScene::Explore => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            PaddleScene::Brands => "scene1",
            PaddleScene::Prices => "scene2",
            PaddleScene::BrandPrices => "scene3",
            PaddleScene::Explore => "explore",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PaddleScene::Brands => "Paddles by Brand",
            PaddleScene::Prices => "Price Landscape",
            PaddleScene::BrandPrices => "Average Price by Brand",
            PaddleScene::Explore => "Explore the Paddles",
        }
    }

    pub fn render(self, paddles: &Dataset<Paddle>) -> SlideView {
        let view = match self {
            PaddleScene::Brands => render_brands(self, paddles),
            PaddleScene::Prices => render_prices(self, paddles),
            PaddleScene::BrandPrices => render_brand_prices(self, paddles),
            PaddleScene::Explore => SlideView::new(
                self.id(),
                self.title(),
                ViewBody::Text {
                    lines: paddles
                        .records()
                        .iter()
                        .map(|p| format!("{} - {} - {}", p.name, p.brand, p.price_text))
                        .collect(),
                },
            ),
        };
        with_rejected_note(view, paddles.rejected())
    }
}

/// Any scene of any deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title(TitleSlide),
    Paddle(PaddleScene),
}

impl Scene {
    pub fn id(self) -> &'static str {
        match self {
            Scene::Title(s) => s.id(),
            Scene::Paddle(s) => s.id(),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Scene::Title(s) => s.title(),
            Scene::Paddle(s) => s.title(),
        }
    }
}

fn with_rejected_note(view: SlideView, rejected: &[RecordError]) -> SlideView {
    match rejected.first() {
        None => view,
        Some(first) => view.annotate(format!(
            "{} rows were rejected while loading the CSV (first at line {})",
            rejected.len(),
            first.line()
        )),
    }
}

fn render_overview(slide: TitleSlide, titles: &Dataset<Title>) -> SlideView {
    let records = titles.records();
    let years = match DataProcessor::year_extent(records) {
        Some((min, max)) => format!("{} - {}", min, max),
        None => "n/a".to_string(),
    };
    let rated: Vec<&str> = records
        .iter()
        .filter_map(|t| t.maturity_rating.as_deref())
        .collect();
    let ratings = DataProcessor::distinct_values(&rated, |r| *r);

    SlideView::new(
        slide.id(),
        slide.title(),
        ViewBody::Text {
            lines: vec![
                format!("Total number of titles: {}", records.len()),
                format!("Release years range: {}", years),
                format!("Available maturity ratings: {}", ratings.join(", ")),
            ],
        },
    )
}

fn render_genre_sunburst(slide: TitleSlide, titles: &Dataset<Title>) -> SlideView {
    let tally = DataProcessor::process_genre_data(titles.records());
    let mut view = SlideView::new(
        slide.id(),
        slide.title(),
        ViewBody::Sunburst {
            entries: tally.entries,
        },
    );

    if !tally.skipped.is_empty() {
        let lines: Vec<String> = tally
            .skipped
            .iter()
            .take(5)
            .map(|s| s.line.to_string())
            .collect();
        let more = if tally.skipped.len() > 5 { ", ..." } else { "" };
        view = view.annotate(format!(
            "Skipped {} titles with unreadable genres (lines {}{})",
            tally.skipped.len(),
            lines.join(", "),
            more
        ));
    }
    view
}

fn render_brands(scene: PaddleScene, paddles: &Dataset<Paddle>) -> SlideView {
    let entries = DataProcessor::group_by_category(paddles.records(), |p| p.brand.as_str());
    let summary = format!(
        "{} paddles across {} brands",
        paddles.len(),
        entries.len()
    );
    SlideView::new(scene.id(), scene.title(), ViewBody::Pie { entries }).annotate(summary)
}

fn render_prices(scene: PaddleScene, paddles: &Dataset<Paddle>) -> SlideView {
    let records = paddles.records();
    let prices: Vec<f64> = records.iter().map(|p| p.price).collect();
    let entries = records
        .iter()
        .map(|p| NamedValue {
            name: p.name.clone(),
            value: p.price,
        })
        .collect();

    let mut view = SlideView::new(
        scene.id(),
        scene.title(),
        ViewBody::Bars {
            entries,
            value_label: "Price ($)".to_string(),
        },
    );

    if let Some(summary) = DataProcessor::price_summary(&prices) {
        let dearest = &records[summary.max_index];
        let cheapest = &records[summary.min_index];
        view = view
            .annotate(format!(
                "Most expensive: {} ({}) at ${:.2}",
                dearest.name, dearest.brand, dearest.price
            ))
            .annotate(format!(
                "Least expensive: {} ({}) at ${:.2}",
                cheapest.name, cheapest.brand, cheapest.price
            ))
            .annotate(format!(
                "Median price: ${:.2} (mean ${:.2})",
                summary.median, summary.mean
            ));
    }
    view
}

fn render_brand_prices(scene: PaddleScene, paddles: &Dataset<Paddle>) -> SlideView {
    let entries =
        DataProcessor::mean_by_category(paddles.records(), |p| p.brand.as_str(), |p| p.price);
    let priciest = entries
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value))
        .map(|top| format!("Priciest brand on average: {} (${:.2})", top.name, top.value));

    let view = SlideView::new(
        scene.id(),
        scene.title(),
        ViewBody::Bars {
            entries,
            value_label: "Mean price ($)".to_string(),
        },
    );
    match priciest {
        Some(note) => view.annotate(note),
        None => view,
    }
}
