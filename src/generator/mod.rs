//! Generator module - renders the CMS content into static HTML files

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::cms::CmsClient;
use crate::content::{
    estimate, neighbours, rich_text, FeedState, NavPost, Navigation, Post, PostSummary,
};
use crate::error::BlogError;
use crate::helpers::{
    date_xml, edited_date, feed_page_path, full_url_for, post_path, publish_date, truncate,
    url_for,
};
use crate::templates::{
    CommentsData, FeedEntryData, FeedPageData, NavLink, NavigationData, PostPageData,
    PreviewData, SectionData, SiteData, TemplateRenderer,
};
use crate::Blog;

/// Outcome of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub feed_pages: usize,
    pub posts: usize,
    pub skipped: Vec<String>,
}

/// The whole feed plus the results of each page, in fetch order
#[derive(Debug, Clone)]
pub struct FeedWalk {
    pub state: FeedState,
    pub pages: Vec<Vec<PostSummary>>,
}

/// Fetch every feed page, one request in flight at a time.
///
/// A cursor the CMS hands out twice is an `InvalidCursor` error; following it
/// would never terminate.
pub async fn walk_feed(client: &CmsClient, reference: &str) -> crate::error::Result<FeedWalk> {
    let first = client.query_first_page(reference).await?;
    let mut pages = vec![first.results.clone()];
    let mut state = FeedState::initialize(first);
    let mut seen_cursors = HashSet::new();
    while let Some(cursor) = state.cursor() {
        if !seen_cursors.insert(cursor.to_string()) {
            return Err(BlogError::InvalidCursor(format!(
                "feed cursor repeated: {}",
                cursor
            )));
        }
        let seen = state.items().len();
        state = state.fetch_next(client).await?;
        pages.push(state.items()[seen..].to_vec());
    }
    Ok(FeedWalk { state, pages })
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            blog: blog.clone(),
            renderer,
        })
    }

    /// Generate the entire site from the content at `reference`
    pub async fn generate(&self, client: &CmsClient, reference: &str) -> Result<GenerateReport> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let FeedWalk { state, pages } = walk_feed(client, reference).await?;
        tracing::info!(
            "Fetched {} posts in {} feed pages",
            state.items().len(),
            pages.len()
        );

        let mut report = GenerateReport::default();
        let mut posts = Vec::with_capacity(state.items().len());
        for summary in state.items() {
            match client.post_by_uid(reference, &summary.id).await {
                Ok(post) => posts.push(post),
                Err(e @ (BlogError::NotFound { .. } | BlogError::MalformedContent { .. })) => {
                    tracing::warn!("Skipping post {}: {}", summary.id, e);
                    report.skipped.push(summary.id.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Skipped posts get no page, so nothing may link to them
        let skipped: HashSet<&str> = report.skipped.iter().map(String::as_str).collect();
        let published: Vec<PostSummary> = state
            .items()
            .iter()
            .filter(|p| !skipped.contains(p.id.as_str()))
            .cloned()
            .collect();
        let mut pages: Vec<Vec<PostSummary>> = pages
            .into_iter()
            .map(|page| {
                page.into_iter()
                    .filter(|p| !skipped.contains(p.id.as_str()))
                    .collect::<Vec<_>>()
            })
            .filter(|page| !page.is_empty())
            .collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }

        let preview = PreviewData::default();
        self.generate_feed(&pages, &preview)?;
        report.feed_pages = pages.len();

        for post in &posts {
            let navigation = neighbours(&published, &post.id);
            let html = self.render_post(post, &navigation, &preview)?;
            let output_path = self
                .blog
                .public_dir
                .join(post_path(&post.id))
                .join("index.html");
            write_output(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
            report.posts += 1;
        }

        self.copy_static_assets()?;

        Ok(report)
    }

    /// Write `index.html` for the first page and `feed/<n>.json` for the rest
    fn generate_feed(&self, pages: &[Vec<PostSummary>], preview: &PreviewData) -> Result<()> {
        for (i, results) in pages.iter().enumerate() {
            let page_num = i + 1;
            let next_page = if page_num < pages.len() {
                Some(url_for(&self.blog.config, &feed_page_path(page_num + 1)))
            } else {
                None
            };
            let data = self.build_feed_page(results, next_page);

            if page_num == 1 {
                let html = self.render_home(&data, preview)?;
                write_output(&self.blog.public_dir.join("index.html"), &html)?;
            } else {
                let json = serde_json::to_string(&data)?;
                let output_path = self.blog.public_dir.join(feed_page_path(page_num));
                write_output(&output_path, &json)?;
                tracing::debug!("Generated feed page: {:?}", output_path);
            }
        }

        tracing::info!("Generated home feed");
        Ok(())
    }

    /// Render the home page for a feed page
    pub fn render_home(&self, feed: &FeedPageData, preview: &PreviewData) -> Result<String> {
        let mut context = self.create_base_context(preview);
        context.insert("is_home", &true);
        context.insert("feed", feed);
        Ok(self.renderer.render("index.html", &context)?)
    }

    /// Render a post page
    pub fn render_post(
        &self,
        post: &Post,
        navigation: &Navigation,
        preview: &PreviewData,
    ) -> Result<String> {
        let mut context = self.create_base_context(preview);
        context.insert("is_home", &false);
        context.insert("post", &self.build_post_page(post));
        context.insert("navigation", &self.build_navigation(navigation));
        context.insert("comments", &self.build_comments(&post.id));
        Ok(self.renderer.render("post.html", &context)?)
    }

    /// Convert summaries into the template / JSON feed shape
    pub fn build_feed_page(
        &self,
        results: &[PostSummary],
        next_page: Option<String>,
    ) -> FeedPageData {
        FeedPageData {
            results: results.iter().map(|p| self.build_feed_entry(p)).collect(),
            next_page,
        }
    }

    fn build_feed_entry(&self, post: &PostSummary) -> FeedEntryData {
        FeedEntryData {
            id: post.id.clone(),
            path: url_for(&self.blog.config, &post_path(&post.id)),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post
                .published_at
                .map(|d| publish_date(&self.blog.config, &d)),
        }
    }

    fn build_post_page(&self, post: &Post) -> PostPageData {
        let config = &self.blog.config;

        let description = if post.subtitle.is_empty() {
            let text = post
                .content
                .first()
                .map(|block| rich_text::as_text(&block.body))
                .unwrap_or_default();
            truncate(&text, 160, None)
        } else {
            post.subtitle.clone()
        };

        PostPageData {
            id: post.id.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            description,
            canonical: full_url_for(config, &post_path(&post.id)),
            banner_url: post.banner_url.clone(),
            date: post.published_at.map(|d| publish_date(config, &d)),
            datetime: post.published_at.map(|d| date_xml(&d)),
            edited: post
                .updated_at
                .filter(|_| post.was_edited())
                .map(|d| edited_date(config, &d)),
            reading_time: estimate(&post.content).to_string(),
            sections: post
                .content
                .iter()
                .map(|block| SectionData {
                    heading: block.heading.clone(),
                    html: rich_text::as_html(&block.body),
                })
                .collect(),
        }
    }

    fn build_navigation(&self, navigation: &Navigation) -> NavigationData {
        let link = |nav: &NavPost| NavLink {
            title: nav.title.clone(),
            path: url_for(&self.blog.config, &post_path(&nav.id)),
        };
        NavigationData {
            previous: navigation.previous.as_ref().map(link),
            next: navigation.next.as_ref().map(link),
        }
    }

    fn build_comments(&self, id: &str) -> Option<CommentsData> {
        let comments = &self.blog.config.comments;
        if !comments.enabled() {
            return None;
        }
        Some(CommentsData {
            repo: comments.repo.clone(),
            theme: comments.theme.clone(),
            label: comments.label.clone(),
            issue_term: id.to_string(),
        })
    }

    fn build_site_data(&self) -> SiteData {
        let config = &self.blog.config;
        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            root: url_for(config, ""),
            preview_repo: config.preview.toolbar_repo.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, preview: &PreviewData) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.build_site_data());
        context.insert("preview", preview);
        context
    }

    /// Copy static assets (images, css) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::info!("Copied {} static files", copied);
        Ok(())
    }
}

/// Write a generated file, creating parent directories
fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, contents).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}
