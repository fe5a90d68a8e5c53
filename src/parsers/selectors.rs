//! Prioritized selector chains for the semantic regions of a page.
//!
//! Each region has a fixed list of CSS selectors tried in order; the first
//! selector that matches anything wins. Unlike `querySelector("a, b, c")`,
//! priority follows the list rather than document order.

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    Main,
    Navigation,
    Sidebar,
    Footer,
    Breadcrumbs,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Header,
        Region::Main,
        Region::Navigation,
        Region::Sidebar,
        Region::Footer,
        Region::Breadcrumbs,
    ];

    /// Key used for this region in the chains passed to in-page scripts
    pub fn name(self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Main => "main",
            Region::Navigation => "navigation",
            Region::Sidebar => "sidebar",
            Region::Footer => "footer",
            Region::Breadcrumbs => "breadcrumbs",
        }
    }

    /// Selector alternatives, highest priority first
    pub fn selectors(self) -> &'static [&'static str] {
        match self {
            Region::Header => &["header", ".header", "#header", "[role=\"banner\"]"],
            Region::Main => &["main", ".main", "#main", "[role=\"main\"]"],
            Region::Navigation => &["nav", ".nav", ".navigation", "[role=\"navigation\"]"],
            Region::Sidebar => &["aside", ".sidebar", "[role=\"complementary\"]"],
            Region::Footer => &["footer", ".footer", "#footer", "[role=\"contentinfo\"]"],
            Region::Breadcrumbs => &[
                ".breadcrumbs",
                ".breadcrumb",
                "nav[aria-label*=\"breadcrumb\"]",
            ],
        }
    }

    /// Resolve this region against a parsed document
    pub fn resolve<'a>(self, doc: &'a Html) -> Option<ElementRef<'a>> {
        for css in self.selectors() {
            let selector = match Selector::parse(css) {
                Ok(selector) => selector,
                Err(e) => {
                    ::log::warn!("Skipping unparsable selector {:?}: {:?}", css, e);
                    continue;
                }
            };
            if let Some(element) = doc.select(&selector).next() {
                ::log::trace!("Region {} resolved by {}", self.name(), css);
                return Some(element);
            }
        }
        ::log::trace!("Region {} not present", self.name());
        None
    }
}

/// All chains as a JSON object, `{ "header": [...], "main": [...], ... }`
pub fn chains_json() -> Value {
    let mut chains = Map::new();
    for region in Region::ALL {
        let list = region
            .selectors()
            .iter()
            .map(|css| Value::String(css.to_string()))
            .collect();
        chains.insert(region.name().to_string(), Value::Array(list));
    }
    Value::Object(chains)
}
