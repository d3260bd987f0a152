//! Crawler preview page rendering
//!
//! Social crawlers get an HTML document carrying Open Graph / Twitter Card
//! meta tags plus a client-side redirect instead of an HTTP redirect, so
//! link previews render with the link's title, description and image.

use std::fmt::Write;

/// Inputs for one preview page.
#[derive(Debug, Clone, Default)]
pub struct PreviewPage {
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Canonical short URL, e.g. "https://s.example.com/abc123"
    pub canonical_url: String,
    pub site_name: String,
    /// Destination the embedded client-side redirect points at
    pub redirect_url: String,
}

/// HTML-escape a string for attribute and text contexts.
pub fn escape_html(unsafe_str: &str) -> String {
    let mut out = String::with_capacity(unsafe_str.len());
    for c in unsafe_str.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the full crawler preview document.
pub fn render_preview_page(page: &PreviewPage) -> String {
    let title = escape_html(&page.title);
    let description = escape_html(&page.description);
    let image_url = escape_html(&page.image_url);
    let canonical_url = escape_html(&page.canonical_url);
    let site_name = escape_html(&page.site_name);
    let redirect_url = escape_html(&page.redirect_url);

    let mut html = String::with_capacity(1536);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(html, "<title>{}</title>", title);
    let _ = writeln!(html, "<meta name=\"description\" content=\"{}\">", description);

    // Open Graph / Facebook
    html.push_str("<meta property=\"og:type\" content=\"website\">\n");
    let _ = writeln!(html, "<meta property=\"og:url\" content=\"{}\">", canonical_url);
    let _ = writeln!(html, "<meta property=\"og:title\" content=\"{}\">", title);
    let _ = writeln!(
        html,
        "<meta property=\"og:description\" content=\"{}\">",
        description
    );
    if !page.image_url.is_empty() {
        let _ = writeln!(html, "<meta property=\"og:image\" content=\"{}\">", image_url);
        html.push_str("<meta property=\"og:image:width\" content=\"1200\">\n");
        html.push_str("<meta property=\"og:image:height\" content=\"630\">\n");
    }
    let _ = writeln!(
        html,
        "<meta property=\"og:site_name\" content=\"{}\">",
        site_name
    );
    html.push_str("<meta property=\"og:locale\" content=\"en_US\">\n");

    // Twitter Card
    html.push_str("<meta property=\"twitter:card\" content=\"summary_large_image\">\n");
    let _ = writeln!(
        html,
        "<meta property=\"twitter:url\" content=\"{}\">",
        canonical_url
    );
    let _ = writeln!(html, "<meta property=\"twitter:title\" content=\"{}\">", title);
    let _ = writeln!(
        html,
        "<meta property=\"twitter:description\" content=\"{}\">",
        description
    );
    if !page.image_url.is_empty() {
        let _ = writeln!(
            html,
            "<meta property=\"twitter:image\" content=\"{}\">",
            image_url
        );
    }

    // Client-side redirect for crawlers that follow through
    let _ = writeln!(
        html,
        "<meta http-equiv=\"refresh\" content=\"0;url={}\">",
        redirect_url
    );
    html.push_str("</head>\n<body>\n<p>Redirecting...</p>\n");
    let _ = writeln!(
        html,
        "<script>window.location.href = \"{}\";</script>",
        redirect_url
    );
    html.push_str("</body>\n</html>\n");

    html
}
