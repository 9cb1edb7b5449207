//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub root: String,
    pub language: String,

    // Dates
    pub locale: String,
    pub timezone: String,
    pub date_format: String,
    pub edited_format: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: String::new(),
            author: String::new(),
            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            language: "pt-BR".to_string(),

            locale: "pt_BR".to_string(),
            timezone: "UTC".to_string(),
            date_format: "%-d %b %Y".to_string(),
            edited_format: "%-d %b %Y, às %H:%M".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            cms: CmsConfig::default(),
            comments: CommentsConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Chrono locale used for month and weekday names
    pub fn chrono_locale(&self) -> chrono::Locale {
        chrono::Locale::try_from(self.locale.as_str()).unwrap_or_else(|_| {
            tracing::warn!("Unknown locale {:?}, falling back to POSIX", self.locale);
            chrono::Locale::POSIX
        })
    }

    /// Timezone used when displaying publication dates
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, falling back to UTC", self.timezone);
            chrono_tz::UTC
        })
    }
}

/// Headless CMS connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// API v2 root, e.g. https://my-repo.cdn.prismic.io/api/v2
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: usize,
    pub order_by: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "post".to_string(),
            page_size: 1,
            order_by: "document.first_publication_date desc".to_string(),
        }
    }
}

/// Embedded comment widget (utterances) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    /// GitHub repository backing the threads; empty disables comments
    pub repo: String,
    pub theme: String,
    pub label: Option<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            theme: "github-dark".to_string(),
            label: None,
        }
    }
}

impl CommentsConfig {
    pub fn enabled(&self) -> bool {
        !self.repo.trim().is_empty()
    }
}

/// Preview mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub cookie: String,
    /// Repository name for the CMS preview toolbar script
    pub toolbar_repo: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cookie: "io.prismic.preview".to_string(),
            toolbar_repo: None,
        }
    }
}
