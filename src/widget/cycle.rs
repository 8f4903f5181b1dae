//! One fetch, cache, render pass

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{fetch, Transport, WidgetConfig};
use crate::cache::WidgetCache;
use crate::render::{Board, RenderError, Renderer};

/// What a cycle ended up showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch succeeded; fresh payload cached and rendered
    Fresh,
    /// Fetch failed; cached payload rendered as stale
    Stale,
    /// Fetch failed and nothing was cached
    Unavailable,
}

/// A widget wired to its transport, cache and board region
pub struct RefreshingWidget<P> {
    config: WidgetConfig<P>,
    transport: Arc<dyn Transport>,
    cache: WidgetCache,
    renderer: Renderer<P>,
}

impl<P> RefreshingWidget<P>
where
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Wires up a widget and mounts its region on the board
    pub fn new(
        config: WidgetConfig<P>,
        transport: Arc<dyn Transport>,
        cache: WidgetCache,
        board: Board,
    ) -> Self {
        board.mount(config.id());
        let renderer = Renderer::new(board, config.projection());
        Self {
            config,
            transport,
            cache,
            renderer,
        }
    }

    pub fn id(&self) -> &str {
        self.config.id()
    }

    pub fn config(&self) -> &WidgetConfig<P> {
        &self.config
    }

    /// Runs one refresh cycle
    ///
    /// Never fails: fetch errors select the fallback content, and render or
    /// cache-write errors are logged so later cycles keep running.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let id = self.config.id();

        match fetch(&self.config, self.transport.as_ref()).await {
            Ok(payload) => {
                if let Err(err) = self.cache.store(id, &payload) {
                    warn!(widget = %id, error = %err, "failed to persist payload");
                }
                log_render(id, self.renderer.render(id, &payload));
                debug!(widget = %id, "rendered fresh payload");
                CycleOutcome::Fresh
            }
            Err(err) => match self.cache.load::<P>(id) {
                Some(entry) => {
                    info!(
                        widget = %id,
                        category = err.category(),
                        error = %err,
                        stored_at = %entry.stored_at,
                        "fetch failed, showing cached payload"
                    );
                    log_render(id, self.renderer.render_stale(id, &entry.payload));
                    CycleOutcome::Stale
                }
                None => {
                    warn!(
                        widget = %id,
                        category = err.category(),
                        error = %err,
                        "fetch failed and no cached payload"
                    );
                    log_render(id, self.renderer.render_unavailable(id));
                    CycleOutcome::Unavailable
                }
            },
        }
    }
}

fn log_render(id: &str, result: Result<(), RenderError>) {
    if let Err(err) = result {
        warn!(widget = %id, error = %err, "render failed");
    }
}
