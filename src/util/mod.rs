//! Text and URL helpers shared by the TUI and the one-shot listing.
//!
//! ```
//! use hnfeed::util::{display_width, truncate_to_width, validate_url_for_open};
//!
//! let width = display_width("Hello 世界"); // 6 + 2*2
//! assert_eq!(width, 10);
//!
//! let title = truncate_to_width("A very long story title", 12);
//! assert_eq!(title, "A very lo...");
//!
//! assert!(validate_url_for_open("https://example.com").is_ok());
//! ```

mod text;
mod url_validator;

pub use text::{display_width, sanitize_line, truncate_to_width};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Longest search query the stories screen accepts, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
