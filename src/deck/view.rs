//! Slide view descriptions handed to the drawing back ends.

use crate::data::{CategoryCount, NamedValue};
use serde::Serialize;

/// A fully rendered slide: what to draw, not how.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideView {
    pub id: &'static str,
    pub title: String,
    pub body: ViewBody,
    /// Short notes drawn under the chart (highlights, skipped rows).
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewBody {
    Text {
        lines: Vec<String>,
    },
    Pie {
        entries: Vec<CategoryCount>,
    },
    Sunburst {
        entries: Vec<NamedValue>,
    },
    Bars {
        entries: Vec<NamedValue>,
        value_label: String,
    },
}

impl SlideView {
    pub fn new(id: &'static str, title: impl Into<String>, body: ViewBody) -> Self {
        Self {
            id,
            title: title.into(),
            body,
            annotations: Vec::new(),
        }
    }

    pub fn annotate(mut self, note: impl Into<String>) -> Self {
        self.annotations.push(note.into());
        self
    }
}
