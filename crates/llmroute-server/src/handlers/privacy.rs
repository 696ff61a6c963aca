//! Static privacy policy page.

use axum::response::Html;

const PRIVACY_HTML: &str = include_str!("../../assets/privacy.html");

/// Serves the fixed privacy policy document.
pub async fn privacy() -> Html<&'static str> {
    Html(PRIVACY_HTML)
}
