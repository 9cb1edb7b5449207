//! Local server: serves the generated site and renders preview mode live

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::CmsClient;
use crate::content::{neighbours, PageFetcher};
use crate::error::BlogError;
use crate::generator::{walk_feed, Generator};
use crate::templates::PreviewData;
use crate::Blog;

const EXIT_PREVIEW_PATH: &str = "/api/exit-preview";

/// Server state
struct ServerState {
    blog: Blog,
    generator: Generator,
    /// Absent when no CMS endpoint is configured; preview is then unavailable
    client: Option<CmsClient>,
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(blog: &Blog) -> Result<Router> {
    let client = match blog.cms_client() {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("Preview mode disabled: {}", e);
            None
        }
    };

    let state = Arc::new(ServerState {
        blog: blog.clone(),
        generator: Generator::new(blog)?,
        client,
    });

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/post/:uid", get(post_handler))
        .route("/post/:uid/", get(post_handler))
        .route("/api/preview", get(preview_handler))
        .route(EXIT_PREVIEW_PATH, get(exit_preview_handler))
        .route("/api/feed", get(feed_handler))
        .fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    token: String,
}

#[derive(Debug, Deserialize)]
struct FeedParams {
    cursor: String,
}

/// Enter preview mode: remember the preview ref in a cookie
async fn preview_handler(
    State(state): State<Arc<ServerState>>,
    jar: CookieJar,
    Query(params): Query<PreviewParams>,
) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((state.blog.config.preview.cookie.clone(), params.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    tracing::info!("Entering preview mode");
    (jar.add(cookie), Redirect::to("/"))
}

/// Leave preview mode
async fn exit_preview_handler(
    State(state): State<Arc<ServerState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let cookie = Cookie::build((state.blog.config.preview.cookie.clone(), "")).path("/");
    tracing::info!("Leaving preview mode");
    (jar.remove(cookie), Redirect::to("/"))
}

async fn home_handler(
    State(state): State<Arc<ServerState>>,
    jar: CookieJar,
    request: Request<Body>,
) -> Response {
    let (Some(client), Some(reference)) = (&state.client, preview_ref(&state, &jar)) else {
        return serve_static(&state, request).await;
    };

    let page = match client.query_first_page(&reference).await {
        Ok(page) => page,
        Err(e) => return error_response(e),
    };
    let next_page = page.next_page.as_deref().map(feed_proxy_link);
    let feed = state.generator.build_feed_page(&page.results, next_page);
    render(state.generator.render_home(&feed, &preview_data()))
}

async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(uid): Path<String>,
    jar: CookieJar,
    request: Request<Body>,
) -> Response {
    let (Some(client), Some(reference)) = (&state.client, preview_ref(&state, &jar)) else {
        return serve_static(&state, request).await;
    };

    let post = match client.post_by_uid(&reference, &uid).await {
        Ok(post) => post,
        Err(e) => return error_response(e),
    };
    let navigation = match walk_feed(client, &reference).await {
        Ok(walk) => neighbours(walk.state.items(), &uid),
        Err(e) => return error_response(e),
    };
    render(
        state
            .generator
            .render_post(&post, &navigation, &preview_data()),
    )
}

/// Proxy one feed page from the CMS for the preview home's "load more"
async fn feed_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<FeedParams>,
) -> Response {
    let Some(client) = &state.client else {
        return (StatusCode::SERVICE_UNAVAILABLE, "CMS not configured").into_response();
    };
    if !client.owns_cursor(&params.cursor) {
        return (StatusCode::BAD_REQUEST, "Cursor does not belong to the CMS").into_response();
    }

    match client.fetch_page(&params.cursor).await {
        Ok(page) => {
            let next_page = page.next_page.as_deref().map(feed_proxy_link);
            Json(state.generator.build_feed_page(&page.results, next_page)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn static_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    serve_static(&state, request).await
}

/// Serve a file from the public directory using tower-http
async fn serve_static(state: &ServerState, request: Request<Body>) -> Response {
    let mut service =
        ServeDir::new(&state.blog.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn render(html: Result<String>) -> Response {
    match html {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render failed").into_response()
        }
    }
}

fn error_response(error: BlogError) -> Response {
    let status = match &error {
        BlogError::NotFound { .. } => StatusCode::NOT_FOUND,
        BlogError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    tracing::warn!("Preview request failed: {}", error);
    (status, error.to_string()).into_response()
}

fn preview_data() -> PreviewData {
    PreviewData {
        active: true,
        exit_link: EXIT_PREVIEW_PATH.to_string(),
    }
}

/// Local URL that proxies a CMS cursor
fn feed_proxy_link(cursor: &str) -> String {
    format!(
        "/api/feed?cursor={}",
        utf8_percent_encode(cursor, NON_ALPHANUMERIC)
    )
}

/// Preview ref from the request cookies, if preview mode is on
fn preview_ref(state: &ServerState, jar: &CookieJar) -> Option<String> {
    jar.get(&state.blog.config.preview.cookie)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
