//! headless-blog: a static blog generator backed by a headless CMS
//!
//! Posts are fetched from a Prismic-style content API and rendered with
//! embedded Tera templates into a home feed, feed continuation pages and one
//! page per post.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

pub use error::BlogError;

/// Config file name at the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::warn!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        }
    }

    /// Override the CMS access token (e.g. from the command line)
    pub fn set_access_token(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.config.cms.access_token = Some(token);
        }
    }

    /// Build a CMS client from the site configuration
    pub fn cms_client(&self) -> error::Result<cms::CmsClient> {
        cms::CmsClient::new(&self.config.cms)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.public_dir, dir.path().join("public"));
        assert_eq!(blog.static_dir, dir.path().join("static"));
    }

    #[test]
    fn test_new_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Space\npublic_dir: out\ncms:\n  endpoint: https://x.cdn.prismic.io/api/v2\n",
        )
        .unwrap();
        let mut blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Space");
        assert_eq!(blog.public_dir, dir.path().join("out"));

        blog.set_access_token(Some(String::new()));
        assert!(blog.config.cms.access_token.is_none());
        blog.set_access_token(Some("tok".to_string()));
        assert_eq!(blog.config.cms.access_token.as_deref(), Some("tok"));
    }
}
