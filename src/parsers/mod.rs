pub mod content;
pub mod navigation;
pub mod selectors;
pub mod views;

use crate::results::{NavigationAnalysis, StructuredContent};
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub use selectors::Region;

/// Parse a selector literal owned by this crate
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector must parse")
}

/// Whitespace-collapsed text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Resolve `raw` against the page URL the way `element.href` does
fn resolve_link(base: Option<&Url>, raw: &str) -> String {
    match base.and_then(|b| b.join(raw.trim()).ok()) {
        Some(resolved) => resolved.to_string(),
        None => raw.trim().to_string(),
    }
}

/// Views computed purely from the rendered DOM
pub struct RenderedViews {
    pub structured_content: StructuredContent,
    pub navigation: NavigationAnalysis,
}

/// Compute the DOM-only views from rendered HTML
///
/// The parsed document never outlives this call, so callers can hold the
/// result across await points.
pub fn parse_rendered(html: &str, page_url: &str) -> RenderedViews {
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let structured_content = content::extract_structured_content(&doc, base.as_ref());
    let navigation = navigation::extract_navigation(&doc, base.as_ref());

    ::log::debug!(
        "Rendered DOM: {} headings, {} text blocks, {} buttons, {} nav items",
        structured_content.headings_hierarchy.len(),
        structured_content.text_content.len(),
        structured_content.buttons.len(),
        navigation.primary_nav.len()
    );

    RenderedViews {
        structured_content,
        navigation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link() {
        let base = Url::parse("https://example.com/docs/page").unwrap();
        assert_eq!(resolve_link(Some(&base), "/start"), "https://example.com/start");
        assert_eq!(resolve_link(Some(&base), "next"), "https://example.com/docs/next");
        assert_eq!(
            resolve_link(Some(&base), "https://other.org/"),
            "https://other.org/"
        );
        assert_eq!(resolve_link(None, " /start "), "/start");
    }

    #[test]
    fn test_parse_rendered_combines_views() {
        let html = r#"<html><head><title> Acme  Corp </title></head><body>
            <nav><a href="/" aria-current="page">Home</a><a href="/about">About</a></nav>
            <h1>Welcome</h1></body></html>"#;
        let views = parse_rendered(html, "https://acme.test/");
        assert_eq!(views.structured_content.page_title, "Acme Corp");
        assert_eq!(views.structured_content.main_heading, "Welcome");
        assert_eq!(views.navigation.primary_nav.len(), 2);
        assert_eq!(views.navigation.primary_nav[1].href, "https://acme.test/about");
    }
}
