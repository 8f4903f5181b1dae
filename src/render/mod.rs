//! Rendered widget content
//!
//! Widgets never draw to the terminal directly. A renderer replaces the
//! content of the widget's region on the shared [`Board`], and the terminal UI
//! draws whatever the board holds each frame.

mod board;

pub use board::{Board, Project, RenderError, Renderer};

use serde::{Deserialize, Serialize};

/// One piece of rendered content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Plain text line
    Text(String),
    /// A link with visible title text
    Link { title: String, href: String },
    /// Single glyph shown before the following content
    Icon(String),
}

/// Ordered list of nodes making up a widget's visible content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.nodes.push(Node::Text(text.into()));
        self
    }

    pub fn link(mut self, title: impl Into<String>, href: impl Into<String>) -> Self {
        self.nodes.push(Node::Link {
            title: title.into(),
            href: href.into(),
        });
        self
    }

    pub fn icon(mut self, glyph: impl Into<String>) -> Self {
        self.nodes.push(Node::Icon(glyph.into()));
        self
    }

    /// All visible text, one node per line
    pub fn visible_text(&self) -> String {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Text(text) => text.as_str(),
                Node::Link { title, .. } => title.as_str(),
                Node::Icon(glyph) => glyph.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Links in document order
    pub fn links(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Link { title, href } => Some((title.as_str(), href.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Which kind of content a region currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    /// Mounted, first cycle has not finished
    Loading,
    /// Payload from the latest successful fetch
    Fresh,
    /// Cached payload shown because the latest fetch failed
    Stale,
    /// No fresh or cached payload available
    Unavailable,
}

/// Content of a single widget region
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub freshness: Freshness,
    pub fragment: Fragment,
}

impl Region {
    pub fn loading() -> Self {
        Self {
            freshness: Freshness::Loading,
            fragment: Fragment::new().text("Loading..."),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            freshness: Freshness::Unavailable,
            fragment: Fragment::new().text("Not available right now"),
        }
    }

    /// Marker shown above stale content
    pub const STALE_MARKER: &'static str = "Last known data (update failed)";

    /// Visible text including the stale marker, as a reader would see it
    pub fn visible_text(&self) -> String {
        match self.freshness {
            Freshness::Stale => format!("{}\n{}", Self::STALE_MARKER, self.fragment.visible_text()),
            _ => self.fragment.visible_text(),
        }
    }
}
