//! List-and-search view state for the stories screen.
//!
//! All mutation goes through [`reduce`], a plain `(state, event) -> state`
//! transition. The poller produces fetch events, the input layer produces
//! query/page/selection events, and the renderer only reads the derived
//! views ([`ListState::visible`], [`ListState::total_pages`], ...).
use crate::story::Story;

/// Default size of the page window.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

/// Coarse screen phase derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted, nothing requested yet.
    Idle,
    /// A page request is outstanding.
    Loading,
    /// Last request succeeded.
    Ready,
    /// Last request failed; `error_message` holds the reason.
    Failed,
}

/// Inputs to the list controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// The poller is about to request `page`.
    FetchStarted { page: u32 },
    /// `page` came back with `hits`, in API order.
    FetchSucceeded { page: u32, hits: Vec<Story> },
    /// `page` failed; `message` is the error's display text.
    FetchFailed { page: u32, message: String },
    /// Search box contents replaced.
    QueryChanged(String),
    /// Jump the page window to a 1-based page.
    PageSelected(usize),
    /// Move the row cursor inside the page window by a signed offset.
    SelectionMoved(isize),
}

/// View state of a mounted stories screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    /// Every story fetched so far, in fetch order. Never de-duplicated.
    pub items: Vec<Story>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Mirror of the poller's cursor: the page after the last success.
    ///
    /// The poller runs in its own task and keeps its own copy; every
    /// `FetchStarted` is checked against this one.
    pub next_page: u32,
    pub search_query: String,
    /// 1-based index into the filtered view.
    pub current_page: usize,
    pub items_per_page: usize,
    /// Row cursor inside the current page window.
    pub selected: usize,
    /// Number of successful page fetches since mount.
    pub pages_loaded: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl ListState {
    /// Fresh state for a newly mounted screen. A page size of 0 is treated as 1.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error_message: None,
            next_page: 0,
            search_query: String::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
            selected: 0,
            pages_loaded: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error_message.is_some() {
            Phase::Failed
        } else if self.pages_loaded > 0 {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Stories whose title or author contains the query, case-insensitively.
    pub fn filtered(&self) -> Vec<&Story> {
        let needle = self.search_query.to_lowercase();
        self.items.iter().filter(|s| s.matches(&needle)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        let needle = self.search_query.to_lowercase();
        self.items.iter().filter(|s| s.matches(&needle)).count()
    }

    /// `ceil(filtered / items_per_page)`; 0 when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.items_per_page)
    }

    /// The current page window over the filtered view.
    pub fn visible(&self) -> Vec<&Story> {
        let filtered = self.filtered();
        let start = (self.current_page.saturating_sub(1)).saturating_mul(self.items_per_page);
        if start >= filtered.len() {
            return Vec::new();
        }
        let end = start.saturating_add(self.items_per_page).min(filtered.len());
        filtered[start..end].to_vec()
    }

    /// Story under the row cursor, if the window is non-empty.
    pub fn selected_story(&self) -> Option<&Story> {
        self.visible().get(self.selected).copied()
    }

    /// Highest page the window may show (at least 1 so an empty list stays on page 1).
    fn max_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Re-clamp page and cursor after the filtered view changed size.
    fn clamp_window(&mut self) {
        self.current_page = self.current_page.clamp(1, self.max_page());
        let window = self.visible().len();
        self.selected = if window == 0 {
            0
        } else {
            self.selected.min(window - 1)
        };
    }

    /// Convenience for callers holding `&mut ListState`.
    pub fn apply(&mut self, event: ListEvent) {
        let state = std::mem::take(self);
        *self = reduce(state, event);
    }

    /// Event for moving one page forward, or `None` on the last page.
    pub fn next_window_page(&self) -> Option<ListEvent> {
        (self.current_page < self.total_pages())
            .then(|| ListEvent::PageSelected(self.current_page + 1))
    }

    /// Event for moving one page back, or `None` on the first page.
    pub fn prev_window_page(&self) -> Option<ListEvent> {
        (self.current_page > 1).then(|| ListEvent::PageSelected(self.current_page - 1))
    }
}

/// The list controller's transition function.
///
/// Fetch failures leave `items` and `next_page` untouched, so the poller
/// re-requests the same page on its next tick instead of skipping it.
pub fn reduce(mut state: ListState, event: ListEvent) -> ListState {
    match event {
        ListEvent::FetchStarted { page } => {
            tracing::trace!(page, "Story page requested");
            if page != state.next_page {
                tracing::warn!(
                    page,
                    expected = state.next_page,
                    "Poller cursor out of step with list state"
                );
            }
            state.is_loading = true;
        }
        ListEvent::FetchSucceeded { page, hits } => {
            tracing::debug!(page, hits = hits.len(), total = state.items.len() + hits.len(), "Appending story page");
            state.items.extend(hits);
            state.error_message = None;
            state.is_loading = false;
            state.next_page = page.saturating_add(1);
            state.pages_loaded = state.pages_loaded.saturating_add(1);
        }
        ListEvent::FetchFailed { page, message } => {
            tracing::warn!(page, error = %message, "Story page fetch failed");
            state.error_message = Some(message);
            state.is_loading = false;
        }
        ListEvent::QueryChanged(query) => {
            state.search_query = query;
            state.current_page = 1;
            state.selected = 0;
        }
        ListEvent::PageSelected(page) => {
            state.current_page = page;
            state.selected = 0;
        }
        ListEvent::SelectionMoved(delta) => {
            state.selected = state.selected.saturating_add_signed(delta);
        }
    }
    state.clamp_window();
    state
}
