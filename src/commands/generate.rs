//! Generate static files

use anyhow::{Context, Result};

use crate::generator::Generator;
use crate::Blog;

/// Fetch the published content and render the whole site
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.cms_client()?;
    let reference = client
        .master_ref()
        .await
        .context("Failed to resolve the published content ref")?;
    tracing::debug!("Using ref {}", reference);

    let generator = Generator::new(blog)?;
    let report = generator.generate(&client, &reference).await?;

    tracing::info!(
        "Generated {} posts and {} feed pages",
        report.posts,
        report.feed_pages
    );
    if !report.skipped.is_empty() {
        tracing::warn!(
            "Skipped {} posts: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CmsConfig, SiteConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_run_uses_master_ref() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "refs": [{"id": "master", "ref": "MASTER", "isMasterRef": true}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/documents/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "next_page": null,
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            cms: CmsConfig {
                endpoint: format!("{}/api/v2", server.uri()),
                ..CmsConfig::default()
            },
            ..SiteConfig::default()
        };
        let blog = Blog::with_config(dir.path(), config);

        run(&blog).await.unwrap();
        assert!(blog.public_dir.join("index.html").exists());
    }

    #[tokio::test]
    async fn test_run_without_endpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        assert!(run(&blog).await.is_err());
    }
}
