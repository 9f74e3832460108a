//! Navigation state machines.
//!
//! `SlideNavigator` is the bounded linear automaton behind prev/next buttons.
//! `SceneFlow` is the click-through flow where each scene names its successor
//! and the Explore scene is terminal.

use crate::deck::scene::PaddleScene;
use log::debug;

/// Index into an ordered slide list, clamped to `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideNavigator {
    index: usize,
    len: usize,
}

impl SlideNavigator {
    /// A navigator always holds at least one slide.
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    /// Move forward one slide. Returns false at the last slide.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        debug!("slide {} -> {}", self.index - 1, self.index);
        true
    }

    /// Move back one slide. Returns false at the first slide.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        debug!("slide {} -> {}", self.index + 1, self.index);
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Click-driven scene state for the paddle deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneFlow {
    current: PaddleScene,
}

impl Default for SceneFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneFlow {
    pub fn new() -> Self {
        Self {
            current: PaddleScene::Brands,
        }
    }

    pub fn current(&self) -> PaddleScene {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current.click_target().is_none()
    }

    /// Follow the current scene's click target. No-op on the terminal scene.
    pub fn click(&mut self) -> bool {
        match self.current.click_target() {
            Some(target) => self.go_to(target),
            None => false,
        }
    }

    /// Jump to a scene by number. Unknown numbers fall back to scene 1.
    pub fn go_to(&mut self, target: u8) -> bool {
        let next = PaddleScene::from_number(target).unwrap_or_else(|| {
            debug!("scene target {} out of range, resetting to scene 1", target);
            PaddleScene::Brands
        });
        let changed = next != self.current;
        if changed {
            debug!("{} -> {}", self.current.id(), next.id());
        }
        self.current = next;
        changed
    }

    pub fn restart(&mut self) -> bool {
        self.go_to(PaddleScene::Brands.number())
    }
}
