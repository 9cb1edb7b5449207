//! Initialize a new blog site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: spacetraveling
description: ''
author: ''
language: pt-BR

# URL
url: http://localhost:4000
root: /

# Date / Time format (strftime, localized month names)
locale: pt_BR
timezone: America/Sao_Paulo
date_format: '%-d %b %Y'
edited_format: '%-d %b %Y, às %H:%M'

# Directory
public_dir: public
static_dir: static

# Content API
cms:
  # e.g. https://your-repo.cdn.prismic.io/api/v2
  endpoint: ''
  # Prefer the CMS_ACCESS_TOKEN environment variable over committing a token
  access_token:
  document_type: post
  page_size: 1
  order_by: document.first_publication_date desc

# Comments (utteranc.es); leave repo empty to disable
comments:
  repo: ''
  theme: github-dark
  label:

# Preview mode
preview:
  cookie: io.prismic.preview
  toolbar_repo:
"#;

const DEFAULT_STYLE: &str = r#"body {
  margin: 0;
  background: #1a1d23;
  color: #f8f8f8;
  font-family: 'Inter', sans-serif;
}

.page {
  max-width: 700px;
  margin: 0 auto;
  padding: 2rem 1rem;
}

.post-summary a,
.post-nav a {
  color: inherit;
  text-decoration: none;
}

.info,
.edited {
  color: #bbbbbb;
  font-size: 0.875rem;
}

.load-more {
  background: none;
  border: none;
  color: #ff57b2;
  cursor: pointer;
  font-size: 1.125rem;
}
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("static/css"))?;
    fs::write(&config_path, DEFAULT_CONFIG)?;
    fs::write(target_dir.join("static/css/style.css"), DEFAULT_STYLE)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("blog");
        init_site(&target).unwrap();

        let config = SiteConfig::load(target.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.timezone, "America/Sao_Paulo");
        assert_eq!(config.cms.page_size, 1);
        assert!(config.cms.access_token.is_none());
        assert!(!config.comments.enabled());
        assert!(target.join("static/css/style.css").exists());
    }

    #[test]
    fn test_default_style_targets_theme_classes() {
        let post_template = include_str!("../templates/blog/post.html");
        for class in ["post-nav", "post-summary", "load-more", "edited"] {
            assert!(DEFAULT_STYLE.contains(&format!(".{}", class)), "{}", class);
        }
        assert!(post_template.contains(r#"class="post-nav""#));
        assert!(!DEFAULT_STYLE.contains(".navigation"));
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
