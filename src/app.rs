//! Application state shared by the UI loop and input handlers.
//!
//! [`App`] owns the route stack and the per-screen state. The stories screen
//! is mounted while its route is on the stack: each mount bumps a generation
//! counter and spawns a poller tagged with it. Unmounting stops the poller,
//! and [`App::handle_stories_event`] drops events from any other generation.
use crate::config::Config;
use crate::counter::CounterState;
use crate::list::{ListEvent, ListState};
use crate::nav::{Navigator, Route, RouteName};
use crate::poller::{spawn_poller, PollerHandle};
use crate::source::StorySource;
use crate::story::Story;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status bar message stays up.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Messages from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A list-controller event from the poller of mount `generation`.
    ///
    /// Events whose generation is not the currently mounted one are dropped.
    Stories { generation: u64, event: ListEvent },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "story_poller")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

/// Starts the poller for one stories mount. Boxed so `App` does not carry
/// the source type parameter.
type PollerSpawner = Box<dyn Fn(u64, mpsc::Sender<AppEvent>) -> PollerHandle + Send>;

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub nav: Navigator,

    // Stories screen
    /// View state of the current stories mount. Reset on every mount.
    pub stories: ListState,
    pub items_per_page: usize,
    pub search_mode: bool,

    // Details screen
    pub detail_scroll: u16,

    // Counter screen
    pub counter: CounterState,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Set whenever state changed since the last frame.
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation (0-9).
    pub spinner_frame: usize,

    /// Poller of the mounted stories screen; `None` while unmounted.
    poller: Option<PollerHandle>,
    /// Incremented on every stories mount.
    stories_generation: u64,
    spawn_poller: PollerSpawner,
}

impl App {
    pub fn new<S: StorySource>(source: Arc<S>, config: &Config) -> Self {
        let interval = config.refresh_interval();
        let spawner: PollerSpawner = Box::new(move |generation: u64, tx: mpsc::Sender<AppEvent>| {
            spawn_poller(Arc::clone(&source), interval, generation, tx)
        });

        let initial = config.initial_route();
        let counter = match &initial {
            Route::Counter { message } => CounterState::new(message.clone()),
            _ => CounterState::new(config.counter_message.clone()),
        };

        Self {
            nav: Navigator::new(initial),
            stories: ListState::new(config.items_per_page),
            items_per_page: config.items_per_page,
            search_mode: false,
            detail_scroll: 0,
            counter,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            poller: None,
            stories_generation: 0,
            spawn_poller: spawner,
        }
    }

    /// Mount whatever the initial route needs. Call once, inside the runtime.
    pub fn start(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        self.sync_mounts(event_tx);
    }

    pub fn stories_mounted(&self) -> bool {
        self.poller.is_some()
    }

    /// Generation of the current stories mount (0 before the first mount).
    pub fn stories_generation(&self) -> u64 {
        self.stories_generation
    }

    /// Start a fresh stories mount: new state, new generation, new poller.
    /// No-op if already mounted.
    pub fn mount_stories(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if self.poller.is_some() {
            return;
        }
        self.stories_generation = self.stories_generation.wrapping_add(1);
        self.stories = ListState::new(self.items_per_page);
        self.search_mode = false;
        tracing::info!(generation = self.stories_generation, "Mounting stories screen");
        self.poller = Some((self.spawn_poller)(self.stories_generation, event_tx.clone()));
    }

    /// Stop the poller of the current mount. Safe to call when unmounted.
    pub fn unmount_stories(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            tracing::info!(generation = poller.generation(), "Unmounting stories screen");
            poller.stop();
        }
        self.search_mode = false;
    }

    /// Mount or unmount the stories screen to match the route stack.
    fn sync_mounts(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        let on_stack = self.nav.contains(RouteName::Stories);
        if on_stack && !self.stories_mounted() {
            self.mount_stories(event_tx);
        } else if !on_stack && self.stories_mounted() {
            self.unmount_stories();
        }
    }

    /// Go to `route`, mounting or tearing down screens as the stack changes.
    pub fn navigate(&mut self, route: Route, event_tx: &mpsc::Sender<AppEvent>) {
        match &route {
            Route::Details { .. } => self.detail_scroll = 0,
            Route::Counter { message } => self.counter = CounterState::new(message.clone()),
            Route::Stories => {}
        }
        let removed = self.nav.navigate(route);
        if !removed.is_empty() {
            tracing::debug!(removed = removed.len(), "Routes left the stack");
        }
        self.sync_mounts(event_tx);
        self.needs_redraw = true;
    }

    /// Pop the top screen. Returns false at the root.
    pub fn go_back(&mut self) -> bool {
        if self.nav.go_back().is_none() {
            return false;
        }
        if !self.nav.contains(RouteName::Stories) {
            self.unmount_stories();
        }
        self.needs_redraw = true;
        true
    }

    /// Open the details screen for the story under the cursor.
    pub fn open_selected_story(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(story) = self.stories.selected_story().cloned() else {
            return;
        };
        tracing::debug!(id = %story.id, "Opening story details");
        self.navigate(Route::Details { story }, event_tx);
    }

    /// Story shown by the details screen, when it is on top.
    pub fn detail_story(&self) -> Option<&Story> {
        match self.nav.current() {
            Route::Details { story } => Some(story),
            _ => None,
        }
    }

    /// Apply a poller event if it belongs to the current mount.
    ///
    /// Returns false (and changes nothing) for events from a previous mount
    /// or arriving while the screen is unmounted.
    pub fn handle_stories_event(&mut self, generation: u64, event: ListEvent) -> bool {
        let current = self.poller.as_ref().map(PollerHandle::generation);
        if current != Some(generation) {
            tracing::debug!(
                generation,
                current = ?current,
                "Dropping stale stories event"
            );
            return false;
        }
        self.stories.apply(event);
        true
    }

    /// Feed a user-originated list event (query, page, selection) to the reducer.
    pub fn apply_list_event(&mut self, event: ListEvent) {
        self.stories.apply(event);
    }

    pub fn increment_counter(&mut self) {
        self.counter.increment();
    }

    pub fn scroll_detail(&mut self, delta: i32) {
        self.detail_scroll = if delta < 0 {
            self.detail_scroll.saturating_sub(delta.unsigned_abs().min(u16::MAX as u32) as u16)
        } else {
            self.detail_scroll.saturating_add(delta.min(u16::MAX as i32) as u16)
        };
    }

    /// True while a spinner should animate on the visible screen.
    pub fn is_loading_visible(&self) -> bool {
        matches!(self.nav.current(), Route::Stories) && self.stories.is_loading
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Stop all background work before exit.
    pub fn shutdown(&mut self) {
        self.unmount_stories();
    }
}

// ============================================================================
// Tests
// ============================================================================
