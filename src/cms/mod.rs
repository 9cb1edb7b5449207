//! Headless CMS access: HTTP client and response parsing

mod client;
pub mod raw;

pub use client::CmsClient;
