//! Terminal browser for the Hacker News story feed.
//!
//! Pages of stories are pulled from the Algolia search API by a background
//! [`poller`] while the stories screen is mounted, accumulated by the
//! [`list`] reducer, and filtered/paginated locally.

pub mod app;
pub mod config;
pub mod counter;
pub mod list;
pub mod nav;
pub mod poller;
pub mod source;
pub mod story;
pub mod ui;
pub mod util;
