use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a scrape result was obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeMethod {
    /// Rendered in a headless browser with all five views computed
    LayoutAware,
    /// Plain HTTP GET, structured views left at their defaults
    #[default]
    Fallback,
}

/// Everything the pipeline knows about a scraped page
///
/// Built once per scrape. When `success` is false every structured view is
/// at its default and `error` explains why; such a result must never reach
/// synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeResult {
    pub success: bool,

    /// Normalized URL that was scraped
    pub url: String,

    pub method: ScrapeMethod,

    /// Base64-encoded PNG, empty when no screenshot could be taken
    pub screenshot: String,

    /// Raw HTML (rendered DOM for layout-aware scrapes, response body otherwise)
    pub html: String,

    pub layout_structure: LayoutStructure,
    pub content_sections: ContentSections,
    pub design_system: DesignSystem,
    pub structured_content: StructuredContent,
    pub navigation_analysis: NavigationAnalysis,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Successful result from a plain fetch: only `html` carries page data
    pub fn fallback(url: &str, html: String) -> Self {
        Self {
            success: true,
            url: url.to_string(),
            method: ScrapeMethod::Fallback,
            html,
            structured_content: StructuredContent {
                page_title: "Website".to_string(),
                ..StructuredContent::default()
            },
            ..Self::default()
        }
    }

    /// Terminal scrape failure
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            method: ScrapeMethod::Fallback,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    /// Header, navigation, main and footer all present
    FullLayout,
    /// A main region was found
    ContentFocused,
    #[default]
    Simple,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutFlow {
    Horizontal,
    #[default]
    Vertical,
    Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutStructure {
    pub page_type: PageType,
    pub layout_flow: LayoutFlow,
    pub container_info: ContainerInfo,
    /// Structural regions in observation order: header and navigation, then
    /// content, then sidebar and footer
    pub main_sections: Vec<MainSection>,
    pub viewport: Viewport,
}

/// Computed box properties of the main container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerInfo {
    pub width: f64,
    pub max_width: String,
    pub margin: String,
    pub padding: String,
    pub display: String,
    pub flex_direction: String,
    pub grid_template_columns: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Navigation,
    #[default]
    Content,
    Sidebar,
    Footer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MainSection {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub bounds: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<SectionStyles>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionStyles {
    pub background: String,
    pub position: String,
}

/// Page content bucketed by region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSections {
    pub header_content: Option<HeaderContent>,
    pub navigation_content: Option<NavigationContent>,
    pub main_content: MainContent,
    pub sidebar_content: Option<RegionSummary>,
    pub footer_content: Option<RegionSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderContent {
    pub title: String,
    pub has_navigation: bool,
    pub background_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationContent {
    pub links: Vec<NavContentLink>,
    pub layout: String,
    pub position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavContentLink {
    pub text: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MainContent {
    /// Sorted ascending by `bounds.y`; this is the reading order used for resynthesis
    pub sections: Vec<ContentSection>,
    pub total_sections: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSectionKind {
    /// Opened by a standalone h1-h3 heading
    #[default]
    TextSection,
    /// A section/article element with its own content
    ContentSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentSection {
    #[serde(rename = "type")]
    pub kind: ContentSectionKind,
    pub heading: Option<SectionHeading>,
    pub content: Vec<String>,
    pub bounds: VerticalBounds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionHeading {
    /// Heading level 1-6
    pub level: u8,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub font_size: String,
    pub color: String,
    pub font_weight: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalBounds {
    pub y: f64,
    pub height: f64,
}

/// Short digest of a secondary region (sidebar, footer)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionSummary {
    pub headings: Vec<String>,
    pub text: Vec<String>,
    pub link_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSystem {
    pub colors: ColorPalette,
    pub typography: Typography,
    pub components: Components,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub primary: Option<PrimaryColors>,
}

/// Body-level colors and font stack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrimaryColors {
    pub background: String,
    pub text: String,
    pub font_family: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    /// Keyed by tag name (`h1` .. `h4`), first matching element only
    pub headings: BTreeMap<String, HeadingStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingStyle {
    pub font_size: String,
    pub font_weight: String,
    pub color: String,
    pub margin_top: String,
    pub margin_bottom: String,
    pub line_height: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Components {
    pub button: Option<ButtonStyle>,
    pub link: Option<LinkStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyle {
    pub background_color: String,
    pub color: String,
    pub border: String,
    pub border_radius: String,
    pub padding: String,
    pub font_size: String,
    pub font_weight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStyle {
    pub color: String,
    pub text_decoration: String,
    pub font_weight: String,
}

/// Top-3 most frequent positive spacing values, in pixels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    pub common_margins: Vec<u32>,
    pub common_paddings: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredContent {
    pub page_title: String,
    pub meta_description: String,
    pub main_heading: String,
    pub headings_hierarchy: Vec<HeadingEntry>,
    /// Leaf text blocks between 30 and 500 characters
    pub text_content: Vec<String>,
    pub buttons: Vec<ButtonInfo>,
    pub images: Vec<ImageInfo>,
    pub lists: Vec<ListInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingEntry {
    pub level: u8,
    pub text: String,
    /// Position among all headings in the document, empty ones included
    pub order: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonInfo {
    pub text: String,
    /// Tag name of the element (`button`, `a`, `input`)
    #[serde(rename = "type")]
    pub kind: String,
    pub href: String,
    pub classes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfo {
    pub alt: String,
    pub src: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Ul,
    Ol,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListInfo {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavStyle {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationAnalysis {
    pub primary_nav: Vec<NavItem>,
    pub nav_style: NavStyle,
    pub breadcrumbs: Vec<String>,
    /// At most 10 entries
    pub footer_nav: Vec<FooterLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavItem {
    pub text: String,
    pub href: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLink {
    pub text: String,
    pub href: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_no_structured_data() {
        let result = ScrapeResult::failed("https://example.com", "connection refused");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("connection refused"));
        assert!(result.html.is_empty());
        assert!(result.structured_content.page_title.is_empty());
        assert!(result.navigation_analysis.primary_nav.is_empty());
        assert_eq!(result.content_sections, ContentSections::default());
    }

    #[test]
    fn test_fallback_result_defaults() {
        let result = ScrapeResult::fallback("https://example.com", "<html></html>".into());
        assert!(result.success);
        assert_eq!(result.method, ScrapeMethod::Fallback);
        assert_eq!(result.structured_content.page_title, "Website");
        assert!(result.screenshot.is_empty());
        assert_eq!(result.layout_structure.page_type, PageType::Simple);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::json!({
            "pageType": "full_layout",
            "layoutFlow": "grid",
            "mainSections": [{"type": "navigation", "bounds": {"x": 0, "y": 10, "width": 100, "height": 40}}]
        });
        let layout: LayoutStructure = serde_json::from_value(json).unwrap();
        assert_eq!(layout.page_type, PageType::FullLayout);
        assert_eq!(layout.layout_flow, LayoutFlow::Grid);
        assert_eq!(layout.main_sections[0].kind, SectionKind::Navigation);
        assert_eq!(layout.main_sections[0].bounds.y, 10.0);
        assert!(layout.main_sections[0].styles.is_none());

        let result = ScrapeResult::fallback("https://example.com", String::new());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["method"], "fallback");
        assert_eq!(value["structuredContent"]["pageTitle"], "Website");
        assert!(value.get("error").is_none());
    }
}
