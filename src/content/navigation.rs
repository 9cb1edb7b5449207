//! Previous/next links between posts

use serde::Serialize;

use super::PostSummary;

/// Link target for a neighbouring post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPost {
    pub id: String,
    pub title: String,
}

impl From<&PostSummary> for NavPost {
    fn from(post: &PostSummary) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
        }
    }
}

/// Neighbours of a post within a newest-first feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The next older post
    pub previous: Option<NavPost>,
    /// The next newer post
    pub next: Option<NavPost>,
}

/// Locate `id` in the feed and return its neighbours
pub fn neighbours(feed: &[PostSummary], id: &str) -> Navigation {
    let Some(pos) = feed.iter().position(|p| p.id == id) else {
        return Navigation::default();
    };

    Navigation {
        previous: feed.get(pos + 1).map(NavPost::from),
        next: pos.checked_sub(1).and_then(|i| feed.get(i)).map(NavPost::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(ids: &[&str]) -> Vec<PostSummary> {
        ids.iter()
            .map(|id| PostSummary {
                id: id.to_string(),
                published_at: None,
                title: id.to_uppercase(),
                subtitle: String::new(),
                author: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_middle_post_has_both_links() {
        let posts = feed(&["newest", "middle", "oldest"]);
        let nav = neighbours(&posts, "middle");
        assert_eq!(nav.previous.unwrap().id, "oldest");
        let next = nav.next.unwrap();
        assert_eq!(next.id, "newest");
        assert_eq!(next.title, "NEWEST");
    }

    #[test]
    fn test_ends_have_one_link() {
        let posts = feed(&["newest", "oldest"]);
        let nav = neighbours(&posts, "newest");
        assert!(nav.next.is_none());
        assert_eq!(nav.previous.unwrap().id, "oldest");

        let nav = neighbours(&posts, "oldest");
        assert!(nav.previous.is_none());
        assert_eq!(nav.next.unwrap().id, "newest");
    }

    #[test]
    fn test_unknown_post_has_no_links() {
        let posts = feed(&["a"]);
        assert_eq!(neighbours(&posts, "zzz"), Navigation::default());
    }
}
