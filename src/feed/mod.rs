mod clean;
mod render;
mod write;

pub use clean::strip_query_strings;
pub use render::{enclosure_url, feed_items, render_feed};
pub use write::{FEED_FILENAME, write_feed, write_feed_or_report};
