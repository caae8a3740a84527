use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// The trunk build of the `frontend` crate.
#[derive(RustEmbed)]
#[folder = "../frontend/dist"]
#[allow_missing = true]
pub struct WebClientAssets;

/// Serve the embedded web client.
///
/// Paths that look like files (`app-1a2b.wasm`, `style.css`) must exist;
/// anything else falls back to `index.html` so client-side routes work.
pub async fn serve_web_client(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    if let Some(response) = asset(path) {
        return response;
    }
    if looks_like_file(path) {
        return (StatusCode::NOT_FOUND, "Asset not found").into_response();
    }
    asset("index.html")
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "Web client not built").into_response())
}

fn asset(path: &str) -> Option<Response> {
    let content = WebClientAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref())],
            Body::from(content.data.into_owned()),
        )
            .into_response(),
    )
}

fn looks_like_file(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|last| last.contains('.'))
}
