//! Post and feed models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rich_text::TextSpan;

/// A post as listed on the home feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Stable identifier (the document uid), also used as the URL slug
    pub id: String,

    /// First publication date, absent for documents never published
    pub published_at: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One page of feed results as returned by the content source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPage {
    pub results: Vec<PostSummary>,

    /// Opaque cursor to the following page, `None` on the last page
    pub next_page: Option<String>,
}

/// A titled section of post content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextBlock {
    pub heading: String,
    pub body: Vec<TextSpan>,
}

/// A full blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    /// First publication date
    pub published_at: Option<DateTime<Utc>>,

    /// Last publication date
    pub updated_at: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub banner_url: Option<String>,
    pub author: String,

    /// Ordered content sections
    pub content: Vec<RichTextBlock>,
}

impl Post {
    /// Whether the post was republished after its first publication
    pub fn was_edited(&self) -> bool {
        match (self.published_at, self.updated_at) {
            (Some(published), Some(updated)) => updated > published,
            _ => false,
        }
    }

    /// Summary view of this post, as it would appear in the feed
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            published_at: self.published_at,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(published: Option<i64>, updated: Option<i64>) -> Post {
        Post {
            id: "hello".to_string(),
            published_at: published.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            updated_at: updated.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            title: "Hello".to_string(),
            subtitle: "World".to_string(),
            banner_url: None,
            author: "Ana".to_string(),
            content: Vec::new(),
        }
    }

    #[test]
    fn test_was_edited() {
        assert!(!post(Some(100), Some(100)).was_edited());
        assert!(post(Some(100), Some(200)).was_edited());
        assert!(!post(None, Some(200)).was_edited());
    }

    #[test]
    fn test_summary_keeps_identity() {
        let p = post(Some(100), None);
        let summary = p.summary();
        assert_eq!(summary.id, "hello");
        assert_eq!(summary.title, "Hello");
        assert_eq!(summary.published_at, p.published_at);
    }
}
