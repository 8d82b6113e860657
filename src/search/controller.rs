//! Incremental Search Controller
//!
//! Turns keystrokes into a debounced name lookup and a bounded suggestion
//! panel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::{rank_suggestions, Debouncer, Panel, SearchConfig};
use crate::fetch::FetchClient;

/// Called with the alpha-3 code of the chosen suggestion.
pub type SelectHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Called when the search input is cleared.
pub type ClearHandler = Arc<dyn Fn() + Send + Sync>;

/// State shared with the lookups a controller has in flight.
struct PanelState {
    panel: watch::Sender<Panel>,
    /// Sequence number of the latest input; older lookups are discarded
    latest: AtomicU64,
}

impl PanelState {
    fn show(&self, panel: Panel) {
        self.panel.send_replace(panel);
    }

    /// Invalidates every scheduled or in-flight lookup, returning a fresh number.
    fn next_sequence(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, sequence: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == sequence
    }
}

/// Search-as-you-type state machine for one input field.
///
/// The panel is either hidden or showing (suggestions or "no matches").
/// Every controller owns its debounce timer and panel, so several can be
/// driven side by side over the same [`FetchClient`].
pub struct SearchController {
    client: FetchClient,
    config: SearchConfig,
    debouncer: Debouncer,
    state: Arc<PanelState>,
    on_select: SelectHandler,
    on_clear: Option<ClearHandler>,
}

impl SearchController {
    pub fn new<F>(client: FetchClient, config: SearchConfig, on_select: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let (panel, _) = watch::channel(Panel::Hidden);
        Self {
            client,
            debouncer: Debouncer::new(config.debounce),
            config,
            state: Arc::new(PanelState {
                panel,
                latest: AtomicU64::new(0),
            }),
            on_select: Arc::new(on_select),
            on_clear: None,
        }
    }

    /// Registers a callback for [`SearchController::clear`].
    pub fn with_clear_handler<F>(mut self, on_clear: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_clear = Some(Arc::new(on_clear));
        self
    }

    /// Handles a change of the input text.
    ///
    /// Queries shorter than the minimum length hide the panel at once and
    /// cancel any pending lookup. Longer ones are looked up after the
    /// debounce window, and only if no newer input arrived meanwhile.
    pub fn on_input(&self, raw: &str) {
        let query = raw.trim().to_string();
        let sequence = self.state.next_sequence();

        if query.chars().count() < self.config.min_query_len {
            self.debouncer.cancel();
            self.state.show(Panel::Hidden);
            return;
        }

        let client = self.client.clone();
        let state = self.state.clone();
        let max_suggestions = self.config.max_suggestions;

        self.debouncer.schedule(async move {
            let results = client.search_by_name(&query).await;
            if !state.is_current(sequence) {
                debug!(query = %query, "discarding superseded suggestions");
                return;
            }
            state.show(rank_suggestions(&results, max_suggestions));
        });
    }

    /// Picks a suggestion: drops any pending lookup, hides the panel and
    /// notifies the select handler.
    pub fn select(&self, code: &str) {
        self.debouncer.cancel();
        self.hide();
        (self.on_select)(code);
    }

    /// Click outside the input and panel. Drops any pending lookup.
    pub fn dismiss(&self) {
        self.debouncer.cancel();
        self.hide();
    }

    /// Clear button: drops any pending lookup, hides the panel and notifies
    /// the clear handler.
    pub fn clear(&self) {
        self.debouncer.cancel();
        self.hide();
        if let Some(on_clear) = &self.on_clear {
            on_clear();
        }
    }

    /// Current panel.
    pub fn panel(&self) -> Panel {
        self.state.panel.borrow().clone()
    }

    /// Receiver notified on every panel change.
    pub fn subscribe(&self) -> watch::Receiver<Panel> {
        self.state.panel.subscribe()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn hide(&self) {
        // Late responses must not reopen a panel the user closed
        self.state.next_sequence();
        self.state.show(Panel::Hidden);
    }
}
