//! Loosely-typed CMS response shapes and their conversion into the content model

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::content::{
    BlockKind, FeedPage, Mark, MarkKind, Post, PostSummary, RichTextBlock, TextSpan,
};
use crate::error::{BlogError, Result};

/// API root document listing the available refs
#[derive(Debug, Clone, Deserialize)]
pub struct RawApi {
    #[serde(default)]
    pub refs: Vec<RawRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRef {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, rename = "isMasterRef")]
    pub is_master_ref: bool,
    pub label: Option<String>,
}

impl RawApi {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// Paginated search response
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub results: Vec<RawDocument>,
    pub next_page: Option<String>,
}

impl RawSearchResponse {
    pub fn into_feed_page(self) -> Result<FeedPage> {
        let results = self
            .results
            .into_iter()
            .map(RawDocument::into_summary)
            .collect::<Result<Vec<_>>>()?;
        Ok(FeedPage {
            results,
            next_page: self.next_page,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<String>,
    pub first_publication_date: Option<String>,
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawPostData,
}

/// Text fields arrive either as key text or as single-line rich text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Plain(String),
    Rich(Vec<RawSpan>),
}

impl RawText {
    fn into_string(self) -> String {
        match self {
            RawText::Plain(s) => s,
            RawText::Rich(spans) => spans
                .into_iter()
                .filter_map(|s| s.text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPostData {
    pub title: Option<RawText>,
    pub subtitle: Option<RawText>,
    pub author: Option<RawText>,
    pub banner: Option<RawImage>,
    pub content: Option<Vec<RawContentBlock>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContentBlock {
    pub heading: Option<RawText>,
    pub body: Option<Vec<RawSpan>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpan {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
    #[serde(default)]
    pub spans: Vec<RawMark>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMark {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Option<RawMarkData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMarkData {
    pub url: Option<String>,
}

impl RawDocument {
    /// Stable identifier: uid, else a slug of the title, else the document id.
    ///
    /// The identifier becomes a path segment and a link, so a uid must already
    /// be a slug and a fallback id may only hold `[A-Za-z0-9_-]`.
    fn identifier(&self, title: &str) -> Result<String> {
        if let Some(uid) = self.uid.as_deref().filter(|u| !u.trim().is_empty()) {
            if slug::slugify(uid) != uid {
                return Err(BlogError::malformed(
                    &self.id,
                    format!("uid {:?} is not a slug", uid),
                ));
            }
            return Ok(uid.to_string());
        }

        let slug = slug::slugify(title);
        if !slug.is_empty() {
            return Ok(slug);
        }
        if !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Ok(self.id.clone());
        }
        Err(BlogError::malformed(
            &self.id,
            "no usable identifier in uid, title or id",
        ))
    }

    fn label(&self) -> String {
        self.uid.clone().unwrap_or_else(|| self.id.clone())
    }

    fn title(&mut self) -> Result<String> {
        self.data
            .title
            .take()
            .map(RawText::into_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| BlogError::malformed(self.label(), "missing title"))
    }

    pub fn into_summary(mut self) -> Result<PostSummary> {
        let title = self.title()?;
        Ok(PostSummary {
            id: self.identifier(&title)?,
            published_at: parse_optional_timestamp(
                &self.label(),
                self.first_publication_date.as_deref(),
            )?,
            subtitle: text_or_empty(self.data.subtitle.take()),
            author: text_or_empty(self.data.author.take()),
            title,
        })
    }

    pub fn into_post(mut self) -> Result<Post> {
        let label = self.label();
        let title = self.title()?;

        let content = self
            .data
            .content
            .take()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, block)| block.into_block(&label, i))
            .collect::<Result<Vec<_>>>()?;

        Ok(Post {
            id: self.identifier(&title)?,
            published_at: parse_optional_timestamp(&label, self.first_publication_date.as_deref())?,
            updated_at: parse_optional_timestamp(&label, self.last_publication_date.as_deref())?,
            subtitle: text_or_empty(self.data.subtitle.take()),
            author: text_or_empty(self.data.author.take()),
            banner_url: self.data.banner.take().and_then(|b| b.url),
            title,
            content,
        })
    }
}

impl RawContentBlock {
    fn into_block(self, document: &str, index: usize) -> Result<RichTextBlock> {
        let heading = self.heading.ok_or_else(|| {
            BlogError::malformed(document, format!("content block {} has no heading", index))
        })?;
        let body = self.body.ok_or_else(|| {
            BlogError::malformed(document, format!("content block {} has no body", index))
        })?;

        Ok(RichTextBlock {
            heading: heading.into_string(),
            body: body.into_iter().filter_map(RawSpan::into_span).collect(),
        })
    }
}

impl RawSpan {
    /// Non-text blocks (images, embeds) carry no text and are dropped
    fn into_span(self) -> Option<TextSpan> {
        let text = self.text?;
        let marks = self
            .spans
            .into_iter()
            .filter_map(|m| {
                let kind = match m.kind.as_str() {
                    "strong" => MarkKind::Strong,
                    "em" => MarkKind::Em,
                    "hyperlink" => MarkKind::Hyperlink {
                        url: m.data.and_then(|d| d.url)?,
                    },
                    _ => return None,
                };
                Some(Mark {
                    start: m.start,
                    end: m.end,
                    kind,
                })
            })
            .collect();

        Some(TextSpan {
            kind: BlockKind::from_type_name(&self.kind),
            text,
            marks,
        })
    }
}

fn text_or_empty(text: Option<RawText>) -> String {
    text.map(RawText::into_string).unwrap_or_default()
}

fn parse_optional_timestamp(document: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(document, v)).transpose()
}

/// Parse RFC 3339 or the `+0000` offset form the API emits
pub fn parse_timestamp(document: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BlogError::malformed(document, format!("bad timestamp {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn document(value: serde_json::Value) -> RawDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(parse_timestamp("d", "2021-03-25T19:25:28+0000").unwrap(), expected);
        assert_eq!(parse_timestamp("d", "2021-03-25T19:25:28Z").unwrap(), expected);
        assert!(parse_timestamp("d", "yesterday").is_err());
    }

    #[test]
    fn test_master_ref() {
        let api: RawApi = serde_json::from_value(json!({
            "refs": [
                {"id": "release", "ref": "R1", "label": "Release"},
                {"id": "master", "ref": "M1", "label": "Master", "isMasterRef": true}
            ]
        }))
        .unwrap();
        assert_eq!(api.master_ref(), Some("M1"));
    }

    #[test]
    fn test_summary_from_document() {
        let doc = document(json!({
            "id": "YF2x",
            "uid": "como-utilizar-hooks",
            "type": "post",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "data": {"title": "Como utilizar Hooks", "subtitle": "Pensando em sincronização", "author": "Joseph Oliveira"}
        }));
        let summary = doc.into_summary().unwrap();
        assert_eq!(summary.id, "como-utilizar-hooks");
        assert_eq!(summary.title, "Como utilizar Hooks");
        assert_eq!(summary.author, "Joseph Oliveira");
        assert!(summary.published_at.is_some());
    }

    #[test]
    fn test_identifier_fallbacks() {
        let doc = document(json!({"id": "YF2x", "data": {"title": "Hello World"}}));
        assert_eq!(doc.into_summary().unwrap().id, "hello-world");

        let doc = document(json!({"id": "YF2x", "uid": "", "data": {"title": "!!!"}}));
        assert_eq!(doc.into_summary().unwrap().id, "YF2x");
    }

    #[test]
    fn test_uid_must_be_a_slug() {
        for uid in ["../../../pwned", "x\" onmouseover=\"alert(1)", "Hello World", "a/b"] {
            let doc = document(json!({"id": "YF2x", "uid": uid, "data": {"title": "Hello"}}));
            match doc.into_summary().unwrap_err() {
                BlogError::MalformedContent { document, reason } => {
                    assert_eq!(document, "YF2x");
                    assert!(reason.contains("not a slug"), "{}", reason);
                }
                other => panic!("unexpected error for {:?}: {}", uid, other),
            }
        }

        let doc = document(json!({
            "id": "YF2x",
            "uid": "../escape",
            "data": {"title": "Hello", "content": []}
        }));
        assert!(matches!(
            doc.into_post().unwrap_err(),
            BlogError::MalformedContent { .. }
        ));
    }

    #[test]
    fn test_unsafe_fallback_id_is_malformed() {
        let doc = document(json!({"id": "../x", "data": {"title": "???"}}));
        assert!(matches!(
            doc.into_summary().unwrap_err(),
            BlogError::MalformedContent { .. }
        ));
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let doc = document(json!({"id": "YF2x", "uid": "x", "data": {}}));
        let err = doc.into_summary().unwrap_err();
        assert!(matches!(err, BlogError::MalformedContent { .. }));
    }

    #[test]
    fn test_post_with_rich_content() {
        let doc = document(json!({
            "id": "YF2x",
            "uid": "hooks",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "last_publication_date": "2021-03-19T15:49:00+0000",
            "data": {
                "title": [{"type": "heading1", "text": "Hooks", "spans": []}],
                "banner": {"url": "https://images.example.com/banner.png"},
                "author": "Joseph",
                "content": [{
                    "heading": "Proin et varius",
                    "body": [
                        {"type": "paragraph", "text": "Nullam dolor sapien", "spans": [
                            {"start": 0, "end": 6, "type": "strong"},
                            {"start": 7, "end": 12, "type": "hyperlink", "data": {"url": "https://example.com"}},
                            {"start": 0, "end": 3, "type": "label", "data": {"label": "x"}}
                        ]},
                        {"type": "image", "url": "https://images.example.com/x.png"}
                    ]
                }]
            }
        }));
        let post = doc.into_post().unwrap();
        assert_eq!(post.title, "Hooks");
        assert_eq!(post.subtitle, "");
        assert_eq!(post.banner_url.as_deref(), Some("https://images.example.com/banner.png"));
        assert!(post.was_edited());
        assert_eq!(post.content.len(), 1);
        assert_eq!(post.content[0].heading, "Proin et varius");
        assert_eq!(post.content[0].body.len(), 1);
        assert_eq!(post.content[0].body[0].marks.len(), 2);
    }

    #[test]
    fn test_block_without_body_is_malformed() {
        let doc = document(json!({
            "id": "YF2x",
            "uid": "broken",
            "data": {"title": "Broken", "content": [{"heading": "Only heading"}]}
        }));
        match doc.into_post().unwrap_err() {
            BlogError::MalformedContent { document, reason } => {
                assert_eq!(document, "broken");
                assert!(reason.contains("no body"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_block_without_heading_is_malformed() {
        let doc = document(json!({
            "id": "YF2x",
            "uid": "broken",
            "data": {"title": "Broken", "content": [{"body": []}]}
        }));
        assert!(matches!(
            doc.into_post().unwrap_err(),
            BlogError::MalformedContent { .. }
        ));
    }
}
