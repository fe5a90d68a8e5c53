use super::{Region, element_text, resolve_link, selector};
use crate::results::{FooterLink, NavItem, NavStyle, NavigationAnalysis};
use scraper::{ElementRef, Html};
use url::Url;

/// Link labels this long are content, not navigation
const MAX_LINK_TEXT: usize = 50;
const MAX_FOOTER_LINKS: usize = 10;

/// Primary navigation, breadcrumbs and footer links
///
/// `nav_style` needs computed styles and is left at its default here; see
/// [`nav_style_from_computed`].
pub fn extract_navigation(doc: &Html, base: Option<&Url>) -> NavigationAnalysis {
    let primary_nav = Region::Navigation
        .resolve(doc)
        .map(|nav| {
            nav_links(nav, base)
                .map(|(link, text, href)| NavItem {
                    text,
                    href,
                    is_current: is_current(link),
                })
                .collect()
        })
        .unwrap_or_default();

    let breadcrumbs = Region::Breadcrumbs
        .resolve(doc)
        .map(|trail| {
            trail
                .select(&selector("a, span"))
                .map(element_text)
                .filter(|crumb| !crumb.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let footer_nav = Region::Footer
        .resolve(doc)
        .map(|footer| {
            nav_links(footer, base)
                .take(MAX_FOOTER_LINKS)
                .map(|(_, text, href)| FooterLink { text, href })
                .collect()
        })
        .unwrap_or_default();

    NavigationAnalysis {
        primary_nav,
        nav_style: NavStyle::default(),
        breadcrumbs,
        footer_nav,
    }
}

/// Anchors under `root` with a short, non-empty label
fn nav_links<'a>(
    root: ElementRef<'a>,
    base: Option<&'a Url>,
) -> impl Iterator<Item = (ElementRef<'a>, String, String)> + 'a {
    root.select(&selector("a"))
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(move |link| {
            let text = element_text(link);
            if text.is_empty() || text.chars().count() >= MAX_LINK_TEXT {
                return None;
            }
            let href = link
                .value()
                .attr("href")
                .map(|raw| resolve_link(base, raw))
                .unwrap_or_default();
            Some((link, text, href))
        })
}

fn is_current(link: ElementRef<'_>) -> bool {
    let element = link.value();
    element.attr("aria-current") == Some("page") || element.classes().any(|c| c == "active")
}

/// Column flex or plain block display reads as a vertical menu
pub fn nav_style_from_computed(display: &str, flex_direction: &str) -> NavStyle {
    if flex_direction == "column" || display == "block" {
        NavStyle::Vertical
    } else {
        NavStyle::Horizontal
    }
}
