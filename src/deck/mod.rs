//! Deck module - scenes, navigation and rendered slide views

mod navigation;
mod scene;
mod view;

pub use navigation::{SceneFlow, SlideNavigator};
pub use scene::{PaddleScene, Scene, TitleSlide};
pub use view::{SlideView, ViewBody};

use crate::data::{load_dataset, Dataset, LoaderError, Paddle, Title};
use clap::ValueEnum;
use std::path::Path;

/// Which deck a CSV file feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeckKind {
    /// Streaming catalog: overview, type pie, genre sunburst
    #[default]
    Titles,
    /// Pickleball paddles: click-through scenes ending in Explore
    Paddles,
}

impl DeckKind {
    pub fn label(self) -> &'static str {
        match self {
            DeckKind::Titles => "Catalog Titles",
            DeckKind::Paddles => "Pickleball Paddles",
        }
    }

    pub fn default_csv(self) -> &'static str {
        match self {
            DeckKind::Titles => "netflix_cleaned.csv",
            DeckKind::Paddles => "pickleball_paddles.csv",
        }
    }
}

/// A loaded deck: its dataset plus the navigation state driving it.
#[derive(Debug, Clone)]
pub enum Deck {
    Titles {
        data: Dataset<Title>,
        navigator: SlideNavigator,
    },
    Paddles {
        data: Dataset<Paddle>,
        flow: SceneFlow,
    },
}

impl Deck {
    pub fn titles(data: Dataset<Title>) -> Self {
        Deck::Titles {
            data,
            navigator: SlideNavigator::new(TitleSlide::ALL.len()),
        }
    }

    pub fn paddles(data: Dataset<Paddle>) -> Self {
        Deck::Paddles {
            data,
            flow: SceneFlow::new(),
        }
    }

    /// Load the CSV for `kind` and start at the first scene.
    pub fn load(kind: DeckKind, path: &Path) -> Result<Self, LoaderError> {
        Ok(match kind {
            DeckKind::Titles => Deck::titles(load_dataset(path)?),
            DeckKind::Paddles => Deck::paddles(load_dataset(path)?),
        })
    }

    pub fn kind(&self) -> DeckKind {
        match self {
            Deck::Titles { .. } => DeckKind::Titles,
            Deck::Paddles { .. } => DeckKind::Paddles,
        }
    }

    pub fn record_count(&self) -> usize {
        match self {
            Deck::Titles { data, .. } => data.len(),
            Deck::Paddles { data, .. } => data.len(),
        }
    }

    pub fn rejected_count(&self) -> usize {
        match self {
            Deck::Titles { data, .. } => data.rejected().len(),
            Deck::Paddles { data, .. } => data.rejected().len(),
        }
    }

    /// All scenes in presentation order.
    pub fn scenes(&self) -> Vec<Scene> {
        match self {
            Deck::Titles { .. } => TitleSlide::ALL.into_iter().map(Scene::Title).collect(),
            Deck::Paddles { .. } => PaddleScene::ALL.into_iter().map(Scene::Paddle).collect(),
        }
    }

    pub fn current_scene(&self) -> Scene {
        match self {
            Deck::Titles { navigator, .. } => Scene::Title(TitleSlide::ALL[navigator.index()]),
            Deck::Paddles { flow, .. } => Scene::Paddle(flow.current()),
        }
    }

    /// Zero-based position of the current scene and the scene count.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Deck::Titles { navigator, .. } => (navigator.index(), navigator.len()),
            Deck::Paddles { flow, .. } => (
                usize::from(flow.current().number()) - 1,
                PaddleScene::ALL.len(),
            ),
        }
    }

    /// Whether this deck is driven by prev/next buttons rather than clicks.
    pub fn uses_buttons(&self) -> bool {
        matches!(self, Deck::Titles { .. })
    }

    pub fn can_go_back(&self) -> bool {
        match self {
            Deck::Titles { navigator, .. } => !navigator.is_first(),
            Deck::Paddles { .. } => false,
        }
    }

    pub fn can_go_forward(&self) -> bool {
        match self {
            Deck::Titles { navigator, .. } => !navigator.is_last(),
            Deck::Paddles { flow, .. } => !flow.is_terminal(),
        }
    }

    /// Next button. Only the titles deck has one.
    pub fn next(&mut self) -> bool {
        match self {
            Deck::Titles { navigator, .. } => navigator.next(),
            Deck::Paddles { .. } => false,
        }
    }

    /// Previous button. Only the titles deck has one.
    pub fn previous(&mut self) -> bool {
        match self {
            Deck::Titles { navigator, .. } => navigator.previous(),
            Deck::Paddles { .. } => false,
        }
    }

    /// Click on the slide area. Only the paddle deck reacts.
    pub fn click(&mut self) -> bool {
        match self {
            Deck::Titles { .. } => false,
            Deck::Paddles { flow, .. } => flow.click(),
        }
    }

    /// Return to the first scene.
    pub fn restart(&mut self) -> bool {
        match self {
            Deck::Titles { navigator, .. } => {
                let moved = !navigator.is_first();
                navigator.reset();
                moved
            }
            Deck::Paddles { flow, .. } => flow.restart(),
        }
    }

    /// Render the current scene from scratch.
    pub fn render_current(&self) -> SlideView {
        match self {
            Deck::Titles { data, navigator } => TitleSlide::ALL[navigator.index()].render(data),
            Deck::Paddles { data, flow } => flow.current().render(data),
        }
    }

    /// Render every scene in order, leaving navigation untouched.
    pub fn render_all(&self) -> Vec<SlideView> {
        match self {
            Deck::Titles { data, .. } => TitleSlide::ALL.iter().map(|s| s.render(data)).collect(),
            Deck::Paddles { data, .. } => {
                PaddleScene::ALL.iter().map(|s| s.render(data)).collect()
            }
        }
    }
}
