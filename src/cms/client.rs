use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::raw::{RawApi, RawSearchResponse};
use crate::config::CmsConfig;
use crate::content::{FeedPage, PageFetcher, Post};
use crate::error::{BlogError, Result};

const USER_AGENT: &str = concat!("headless-blog/", env!("CARGO_PKG_VERSION"));

/// Client for a Prismic-style REST API (v2)
#[derive(Debug, Clone)]
pub struct CmsClient {
    client: Client,
    endpoint: String,
    access_token: Option<String>,
    document_type: String,
    page_size: usize,
    order_by: String,
}

impl CmsClient {
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &CmsConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim().trim_end_matches('/').to_string();
        Url::parse(&endpoint)
            .map_err(|e| BlogError::Config(format!("invalid cms.endpoint {:?}: {}", endpoint, e)))?;

        Ok(Self {
            client,
            endpoint,
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
            document_type: config.document_type.clone(),
            page_size: config.page_size.max(1),
            order_by: config.order_by.clone(),
        })
    }

    /// Resolve the ref of the currently published content
    pub async fn master_ref(&self) -> Result<String> {
        let mut url = self.url("")?;
        self.authorize(&mut url);
        let api: RawApi = self.get_json(url).await?;
        api.master_ref()
            .map(str::to_string)
            .ok_or_else(|| BlogError::malformed(&self.endpoint, "API exposes no master ref"))
    }

    /// First page of documents of the configured type
    pub async fn query_first_page(&self, reference: &str) -> Result<FeedPage> {
        let predicate = format!("[[at(document.type, \"{}\")]]", self.document_type);
        let mut url = self.search_url(reference, &predicate)?;
        url.query_pairs_mut()
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("orderings", &format!("[{}]", self.order_by));
        self.authorize(&mut url);

        let response: RawSearchResponse = self.get_json(url).await?;
        response.into_feed_page()
    }

    /// Full post looked up by its uid
    pub async fn post_by_uid(&self, reference: &str, uid: &str) -> Result<Post> {
        let predicate = format!(
            "[[at(my.{}.uid, \"{}\")]]",
            self.document_type,
            uid.replace('"', "\\\"")
        );
        let mut url = self.search_url(reference, &predicate)?;
        url.query_pairs_mut().append_pair("pageSize", "1");
        self.authorize(&mut url);

        let response: RawSearchResponse = self.get_json(url).await?;
        let document = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::NotFound {
                kind: self.document_type.clone(),
                uid: uid.to_string(),
            })?;
        document.into_post()
    }

    /// Whether a cursor points back at this client's API
    pub fn owns_cursor(&self, cursor: &str) -> bool {
        cursor.starts_with(&format!("{}/", self.endpoint))
    }

    fn url(&self, path: &str) -> Result<Url> {
        let url = if path.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}/{}", self.endpoint, path)
        };
        Url::parse(&url).map_err(|e| BlogError::Config(format!("invalid url {:?}: {}", url, e)))
    }

    fn search_url(&self, reference: &str, predicate: &str) -> Result<Url> {
        let mut url = self.url("documents/search")?;
        url.query_pairs_mut()
            .append_pair("ref", reference)
            .append_pair("q", predicate);
        Ok(url)
    }

    fn authorize(&self, url: &mut Url) {
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", redact(&url));
        let response = self.client.get(url).send().await?;
        handle_response(response).await
    }
}

impl PageFetcher for CmsClient {
    /// The cursor is requested verbatim; it already carries ref and token
    async fn fetch_page(&self, cursor: &str) -> Result<FeedPage> {
        let url = Url::parse(cursor)
            .map_err(|e| BlogError::InvalidCursor(format!("{:?}: {}", cursor, e)))?;
        let response: RawSearchResponse = self.get_json(url).await?;
        response.into_feed_page()
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(BlogError::Api {
            status_code: status.as_u16(),
            message,
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Hide the access token in logged URLs
fn redact(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "access_token" {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return shown.to_string();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}
