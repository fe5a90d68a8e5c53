//! Prompt construction from the structured views.
//!
//! Section order and truncation limits bound the prompt size.

use crate::results::{
    ContentSections, DesignSystem, LayoutFlow, LayoutStructure, NavStyle, NavigationAnalysis,
    PageType, ScrapeResult, StructuredContent,
};
use crate::synth::DEFAULT_TITLE;
use crate::utils::{non_empty, truncate_chars};
use std::fmt::Write;

const MAX_PROMPT_SECTIONS: usize = 8;
const MAX_SECTION_EXCERPTS: usize = 2;
/// Excerpts at or below this length are not worth sending
const MIN_EXCERPT_LEN: usize = 50;
const SECTION_EXCERPT_LEN: usize = 100;
const MAX_TEXT_EXCERPTS: usize = 3;
const TEXT_EXCERPT_LEN: usize = 80;
const MAX_PROMPT_BUTTONS: usize = 5;
const MAX_PROMPT_NAV: usize = 8;
const MAX_PROMPT_FOOTER: usize = 6;

const INSTRUCTIONS: &str = "CRITICAL REQUIREMENTS:
- Return ONLY complete HTML code (no explanations, no markdown blocks)
- Start with <!DOCTYPE html> and end with </html>
- Use CSS Grid/Flexbox for layout structure
- Keep the logical content flow and visual hierarchy
- Embed all styles in a single <style> element";

const IMPLEMENTATION: &str = "LAYOUT IMPLEMENTATION REQUIREMENTS:
1. Semantic structure: header with brand and primary navigation, main with the content sections in order, footer with secondary links.
2. Content flow: vertical flow, related content grouped in sections, consistent h1 > h2 > h3 > p hierarchy, 2-3rem between sections.
3. Layout system: CSS Grid for the page, Flexbox for navigation and components, a max-width container, responsive breakpoints.
4. Visual hierarchy: prominent main heading, clear section divisions, consistent button styling, readable contrast.

Generate the complete HTML page now:";

/// Format a scrape result into a generation prompt
pub fn build_prompt(result: &ScrapeResult, url: &str) -> String {
    let mut prompt = format!(
        "Create a well-structured, professional website that recreates {} with proper layout flow and visual hierarchy.\n\n{}\n\n",
        url, INSTRUCTIONS
    );

    prompt.push_str(&format_layout(&result.layout_structure));
    prompt.push_str("\nCONTENT STRUCTURE:\n");
    prompt.push_str(&format_content(&result.content_sections, &result.structured_content));
    prompt.push_str("\nNAVIGATION SYSTEM:\n");
    prompt.push_str(&format_navigation(&result.navigation_analysis));
    prompt.push_str("\nDESIGN SYSTEM:\n");
    prompt.push_str(&format_design(&result.design_system));
    prompt.push('\n');
    prompt.push_str(IMPLEMENTATION);
    prompt
}

fn format_layout(layout: &LayoutStructure) -> String {
    let page_type = match layout.page_type {
        PageType::FullLayout => "full_layout",
        PageType::ContentFocused => "content_focused",
        PageType::Simple => "simple",
    };
    let flow = match layout.layout_flow {
        LayoutFlow::Horizontal => "horizontal",
        LayoutFlow::Vertical => "vertical",
        LayoutFlow::Grid => "grid",
    };
    let max_width = non_empty(&layout.container_info.max_width)
        .filter(|w| *w != "none")
        .unwrap_or("1200px");

    format!(
        "LAYOUT STRUCTURE:\nPage Type: {}\nLayout Flow: {}\nContainer Width: {}\n",
        page_type, flow, max_width
    )
}

fn format_content(sections: &ContentSections, content: &StructuredContent) -> String {
    let mut out = String::new();
    let title = non_empty(&content.page_title).unwrap_or(DEFAULT_TITLE);
    let main_heading = non_empty(&content.main_heading).unwrap_or(title);

    let _ = writeln!(out, "Page Title: {}", title);
    let _ = writeln!(out, "Main Heading: {}", main_heading);
    if let Some(description) = non_empty(&content.meta_description) {
        let _ = writeln!(out, "Description: {}", description);
    }

    let sections = &sections.main_content.sections;
    if !sections.is_empty() {
        out.push_str("CONTENT SECTIONS (in order):\n");
        for (index, section) in sections.iter().take(MAX_PROMPT_SECTIONS).enumerate() {
            if let Some(heading) = &section.heading {
                let _ = writeln!(out, "  {}. H{}: {}", index + 1, heading.level, heading.text);
            }
            for item in section
                .content
                .iter()
                .take(MAX_SECTION_EXCERPTS)
                .filter(|item| item.chars().count() > MIN_EXCERPT_LEN)
            {
                let _ = writeln!(out, "     Content: {}", excerpt(item, SECTION_EXCERPT_LEN));
            }
        }
    }

    if !content.text_content.is_empty() {
        out.push_str("ADDITIONAL TEXT CONTENT:\n");
        for text in content.text_content.iter().take(MAX_TEXT_EXCERPTS) {
            let _ = writeln!(out, "  - {}", excerpt(text, TEXT_EXCERPT_LEN));
        }
    }

    if !content.buttons.is_empty() {
        out.push_str("BUTTONS/ACTIONS:\n");
        for button in content.buttons.iter().take(MAX_PROMPT_BUTTONS) {
            let _ = writeln!(out, "  - {}", non_empty(&button.text).unwrap_or("Button"));
        }
    }

    out
}

fn format_navigation(nav: &NavigationAnalysis) -> String {
    let mut out = String::new();

    if !nav.primary_nav.is_empty() {
        out.push_str("PRIMARY NAVIGATION:\n");
        for item in nav.primary_nav.iter().take(MAX_PROMPT_NAV) {
            let marker = if item.is_current { " (CURRENT)" } else { "" };
            let _ = writeln!(out, "  - {}{}", item.text, marker);
        }
    }

    let style = match nav.nav_style {
        NavStyle::Horizontal => "horizontal",
        NavStyle::Vertical => "vertical",
    };
    let _ = writeln!(out, "Navigation Style: {}", style);

    if !nav.breadcrumbs.is_empty() {
        let _ = writeln!(out, "Breadcrumbs: {}", nav.breadcrumbs.join(" > "));
    }

    if !nav.footer_nav.is_empty() {
        out.push_str("FOOTER NAVIGATION:\n");
        for link in nav.footer_nav.iter().take(MAX_PROMPT_FOOTER) {
            let _ = writeln!(out, "  - {}", link.text);
        }
    }

    out
}

fn format_design(design: &DesignSystem) -> String {
    let mut out = String::new();

    if let Some(primary) = &design.colors.primary {
        out.push_str("COLOR SCHEME:\n");
        let _ = writeln!(out, "  Background: {}", or_default(&primary.background, "#ffffff"));
        let _ = writeln!(out, "  Text: {}", or_default(&primary.text, "#333333"));
        let _ = writeln!(
            out,
            "  Font Family: {}",
            or_default(&primary.font_family, "system-ui, sans-serif")
        );
    }

    if !design.typography.headings.is_empty() {
        out.push_str("TYPOGRAPHY:\n");
        for (tag, style) in &design.typography.headings {
            let _ = writeln!(
                out,
                "  {}: {}, {}, {}",
                tag.to_uppercase(),
                or_default(&style.font_size, "1rem"),
                or_default(&style.font_weight, "normal"),
                or_default(&style.color, "inherit")
            );
        }
    }

    if let Some(button) = &design.components.button {
        out.push_str("BUTTON STYLE:\n");
        let _ = writeln!(
            out,
            "  Background: {}, Color: {}, Radius: {}, Padding: {}",
            or_default(&button.background_color, "#007bff"),
            or_default(&button.color, "#ffffff"),
            or_default(&button.border_radius, "4px"),
            or_default(&button.padding, "12px 24px")
        );
    }

    if !design.spacing.common_margins.is_empty() {
        let _ = writeln!(out, "Common Margins: {}px", join_px(&design.spacing.common_margins));
    }
    if !design.spacing.common_paddings.is_empty() {
        let _ = writeln!(out, "Common Paddings: {}px", join_px(&design.spacing.common_paddings));
    }

    if out.is_empty() {
        out.push_str("Modern, clean design system\n");
    }
    out
}

/// Truncated excerpt; the ellipsis marks text that was actually cut
fn excerpt(text: &str, max: usize) -> String {
    let cut = truncate_chars(text, max);
    if cut.len() < text.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

fn join_px(values: &[u32]) -> String {
    values
        .iter()
        .take(3)
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    non_empty(value).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{
        ButtonInfo, ContentSection, FooterLink, HeadingStyle, NavItem, PrimaryColors,
        SectionHeading,
    };

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing {:?}", needle))
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let mut result = ScrapeResult::fallback("https://example.com", String::new());
        result.navigation_analysis.primary_nav = vec![NavItem {
            text: "Home".into(),
            href: "/".into(),
            is_current: true,
        }];
        result.design_system.colors.primary = Some(PrimaryColors {
            background: "rgb(1, 2, 3)".into(),
            ..PrimaryColors::default()
        });

        let prompt = build_prompt(&result, "https://example.com");

        let layout = position(&prompt, "LAYOUT STRUCTURE:");
        let content = position(&prompt, "CONTENT STRUCTURE:");
        let nav = position(&prompt, "NAVIGATION SYSTEM:");
        let design = position(&prompt, "DESIGN SYSTEM:");
        assert!(layout < content && content < nav && nav < design);

        assert!(prompt.contains("Page Type: simple"));
        assert!(prompt.contains("Container Width: 1200px"));
        assert!(prompt.contains("Page Title: Website"));
        assert!(prompt.contains("Main Heading: Website"));
        assert!(prompt.contains("  - Home (CURRENT)"));
        assert!(prompt.contains("  Background: rgb(1, 2, 3)"));
        assert!(prompt.contains("  Text: #333333"));
    }

    #[test]
    fn test_section_outline_limits_and_truncation() {
        let long = "a".repeat(150);
        let medium = "b".repeat(60);
        let short = "too short";
        let mut result = ScrapeResult::default();
        result.content_sections.main_content.sections = (0..10)
            .map(|i| ContentSection {
                heading: Some(SectionHeading {
                    level: 2,
                    text: format!("Heading {}", i),
                    styles: None,
                }),
                content: vec![long.clone(), medium.clone(), short.to_string()],
                ..ContentSection::default()
            })
            .collect();

        let prompt = build_prompt(&result, "https://example.com");

        assert!(prompt.contains("  1. H2: Heading 0"));
        assert!(prompt.contains("  8. H2: Heading 7"));
        assert!(!prompt.contains("Heading 8"));
        assert!(prompt.contains(&format!("     Content: {}...\n", "a".repeat(100))));
        assert!(prompt.contains(&format!("     Content: {}\n", medium)));
        assert!(!prompt.contains(short));
    }

    #[test]
    fn test_text_buttons_and_footer_limits() {
        let mut result = ScrapeResult::default();
        result.structured_content.text_content = (0..5).map(|i| format!("{}{}", i, "t".repeat(99))).collect();
        result.structured_content.buttons = (0..7)
            .map(|i| ButtonInfo {
                text: format!("Action {}", i),
                ..ButtonInfo::default()
            })
            .collect();
        result.navigation_analysis.footer_nav = (0..9)
            .map(|i| FooterLink {
                text: format!("Foot {}", i),
                href: String::new(),
            })
            .collect();
        result.navigation_analysis.breadcrumbs = vec!["Home".into(), "Docs".into()];

        let prompt = build_prompt(&result, "https://example.com");

        assert_eq!(prompt.matches("...\n").count(), 3);
        assert!(prompt.contains(&format!("  - 0{}...\n", "t".repeat(79))));
        assert!(prompt.contains("  - Action 4"));
        assert!(!prompt.contains("Action 5"));
        assert!(prompt.contains("  - Foot 5"));
        assert!(!prompt.contains("Foot 6"));
        assert!(prompt.contains("Breadcrumbs: Home > Docs"));
    }

    #[test]
    fn test_design_tokens() {
        let mut result = ScrapeResult::default();
        result.design_system.typography.headings.insert(
            "h1".into(),
            HeadingStyle {
                font_size: "48px".into(),
                font_weight: "700".into(),
                color: "rgb(0, 0, 0)".into(),
                ..HeadingStyle::default()
            },
        );
        result.design_system.spacing.common_margins = vec![16, 24, 8];

        let prompt = build_prompt(&result, "https://example.com");
        assert!(prompt.contains("  H1: 48px, 700, rgb(0, 0, 0)"));
        assert!(prompt.contains("Common Margins: 16, 24, 8px"));
        assert!(!prompt.contains("Common Paddings"));
    }
}
