use super::provider::GeocodingProvider;
use super::SearchSuggestion;
use crate::sdk::map::MapSurface;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);
pub const MIN_QUERY_CHARS: usize = 2;
pub const SELECT_ZOOM: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Query too short; the list was hidden without a request.
    Cleared,
    /// A later keystroke took over; nothing was applied.
    Superseded,
    /// The list now shows this many suggestions.
    Shown(usize),
    /// The backend found nothing and the list was hidden.
    NoResults,
    /// The lookup failed; the previous list is untouched.
    Failed,
}

#[derive(Debug, Default)]
struct SuggestionList {
    items: Vec<SearchSuggestion>,
    visible: bool,
}

/// Debounced address lookup. Every keystroke takes a new sequence number and
/// only the holder of the latest one may touch the suggestion list.
pub struct SearchAutocomplete {
    provider: Arc<dyn GeocodingProvider>,
    debounce: Duration,
    latest: AtomicU64,
    list: Mutex<SuggestionList>,
}

impl SearchAutocomplete {
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self {
            provider,
            debounce: DEFAULT_DEBOUNCE,
            latest: AtomicU64::new(0),
            list: Mutex::new(SuggestionList::default()),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    pub async fn on_input(&self, text: &str) -> InputOutcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim();

        if query.chars().count() < MIN_QUERY_CHARS {
            let mut list = self.list.lock();
            list.items.clear();
            list.visible = false;
            return InputOutcome::Cleared;
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(token) {
            return InputOutcome::Superseded;
        }

        let result = self.provider.search(query).await;
        if !self.is_current(token) {
            log::debug!("Discarding stale suggestions for \"{}\"", query);
            return InputOutcome::Superseded;
        }

        match result {
            Ok(items) => {
                let mut list = self.list.lock();
                let count = items.len();
                list.items = items;
                list.visible = count > 0;
                if count == 0 {
                    InputOutcome::NoResults
                } else {
                    InputOutcome::Shown(count)
                }
            }
            Err(e) => {
                log::warn!("Address search for \"{}\" failed: {}", query, e);
                InputOutcome::Failed
            }
        }
    }

    /// Visible suggestions, empty while the list is hidden.
    pub fn suggestions(&self) -> Vec<SearchSuggestion> {
        let list = self.list.lock();
        if list.visible {
            list.items.clone()
        } else {
            Vec::new()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.list.lock().visible
    }

    /// Hides the list, e.g. on a click outside the search box.
    pub fn dismiss(&self) {
        self.list.lock().visible = false;
    }

    /// Recenters the map on a visible suggestion and closes the list.
    /// No marker is placed; the caller keeps role assignment with the user.
    pub fn select<M: MapSurface + ?Sized>(
        &self,
        map: &mut M,
        index: usize,
    ) -> Option<SearchSuggestion> {
        let mut list = self.list.lock();
        if !list.visible {
            return None;
        }
        let chosen = list.items.get(index)?.clone();
        list.visible = false;
        drop(list);

        map.set_view(chosen.position, SELECT_ZOOM);
        Some(chosen)
    }
}
