//! Content module - post models, feed pagination, reading time and rich text

pub mod feed;
pub mod navigation;
mod post;
pub mod reading_time;
pub mod rich_text;

pub use feed::{FeedState, PageFetcher};
pub use navigation::{neighbours, NavPost, Navigation};
pub use post::{FeedPage, Post, PostSummary, RichTextBlock};
pub use reading_time::{estimate, ReadingTime};
pub use rich_text::{BlockKind, Mark, MarkKind, TextSpan};
