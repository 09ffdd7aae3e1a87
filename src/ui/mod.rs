//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling per screen
//! - `events` - Background task event processing
//! - `render` - Route-based render dispatch
//! - `stories` - Story list, search bar and pagination
//! - `detail` - Single story view
//! - `counter` - Counter screen
//! - `status` - Status bar widget

mod counter;
mod detail;
mod events;
mod input;
mod loop_runner;
mod render;
mod status;
mod stories;

// Re-export the public API
pub use detail::detail_lines;
pub use loop_runner::{run, Action};
pub use stories::listing_lines;
