//! Built-in blog templates using the Tera template engine
//!
//! Templates are embedded in the binary; a site needs no theme directory.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/preview.html",
                include_str!("blog/partials/preview.html"),
            ),
            (
                "partials/comments.html",
                include_str!("blog/partials/comments.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    /// CMS repository for the preview toolbar script
    pub preview_repo: Option<String>,
}

/// A post entry on the home feed; also the shape of `feed/<n>.json` results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntryData {
    pub id: String,
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: Option<String>,
}

/// One page of the home feed, `next_page` points at a local continuation file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPageData {
    pub results: Vec<FeedEntryData>,
    pub next_page: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub description: String,
    /// Absolute URL of the published page
    pub canonical: String,
    pub banner_url: Option<String>,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub edited: Option<String>,
    pub reading_time: String,
    pub sections: Vec<SectionData>,
}

/// A rendered content block
#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationData {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentsData {
    pub repo: String,
    pub theme: String,
    pub label: Option<String>,
    /// Thread identifier, also the id of the container element
    pub issue_term: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewData {
    pub active: bool,
    pub exit_link: String,
}
