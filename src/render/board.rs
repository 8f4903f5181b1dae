//! Shared board of widget regions and the renderer that writes to it

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::{Fragment, Freshness, Region};

/// Errors that can occur while replacing a region's content
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The widget's region was never mounted on the board
    #[error("no region mounted for widget '{0}'")]
    MissingRegion(String),

    /// The board lock was poisoned by a panicking writer
    #[error("board lock poisoned")]
    Poisoned,
}

/// Named regions that widgets render into, shared with the terminal UI
#[derive(Debug, Clone, Default)]
pub struct Board {
    regions: Arc<RwLock<HashMap<String, Region>>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the region for `id` in the loading state
    ///
    /// Mounting an existing region leaves its content untouched.
    pub fn mount(&self, id: &str) {
        if let Ok(mut regions) = self.regions.write() {
            regions.entry(id.to_string()).or_insert_with(Region::loading);
        }
    }

    /// Current content of a region
    pub fn region(&self, id: &str) -> Option<Region> {
        self.regions.read().ok()?.get(id).cloned()
    }

    /// Replaces the whole content of an already mounted region
    pub fn replace(&self, id: &str, region: Region) -> Result<(), RenderError> {
        let mut regions = self.regions.write().map_err(|_| RenderError::Poisoned)?;
        let slot = regions
            .get_mut(id)
            .ok_or_else(|| RenderError::MissingRegion(id.to_string()))?;
        *slot = region;
        Ok(())
    }
}

/// Projection from a payload to its visible fragment
pub type Project<P> = Arc<dyn Fn(&P) -> Fragment + Send + Sync>;

/// Projects a widget's payloads onto its board region
pub struct Renderer<P> {
    board: Board,
    project: Project<P>,
}

impl<P> Clone for Renderer<P> {
    fn clone(&self) -> Self {
        Self {
            board: self.board.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<P> Renderer<P> {
    pub fn new(board: Board, project: Project<P>) -> Self {
        Self { board, project }
    }

    /// Shows a freshly fetched payload
    pub fn render(&self, id: &str, payload: &P) -> Result<(), RenderError> {
        self.board.replace(
            id,
            Region {
                freshness: Freshness::Fresh,
                fragment: (self.project)(payload),
            },
        )
    }

    /// Shows a cached payload, marked as not current
    pub fn render_stale(&self, id: &str, payload: &P) -> Result<(), RenderError> {
        self.board.replace(
            id,
            Region {
                freshness: Freshness::Stale,
                fragment: (self.project)(payload),
            },
        )
    }

    /// Shows the neutral placeholder
    pub fn render_unavailable(&self, id: &str) -> Result<(), RenderError> {
        self.board.replace(id, Region::unavailable())
    }
}
