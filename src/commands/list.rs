//! List the published posts

use anyhow::Result;

use crate::content::PostSummary;
use crate::generator::walk_feed;
use crate::helpers::publish_date;
use crate::Blog;

/// Print every post in feed order
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.cms_client()?;
    let reference = client.master_ref().await?;
    let walk = walk_feed(&client, &reference).await?;

    let posts = walk.state.items();
    println!("Posts ({}):", posts.len());
    for line in listing(blog, posts) {
        println!("  {}", line);
    }

    Ok(())
}

fn listing(blog: &Blog, posts: &[PostSummary]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            let date = post
                .published_at
                .map(|d| publish_date(&blog.config, &d))
                .unwrap_or_else(|| "unpublished".to_string());
            format!("{} - {} [{}]", date, post.title, post.id)
        })
        .collect()
}
