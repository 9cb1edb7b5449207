//! Helper functions for templates
//!
//! Date, HTML and URL helpers shared by the generator and the preview server.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
