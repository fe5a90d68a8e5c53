//! Deterministic HTML synthesis from a scrape result.
//!
//! No generation involved: the document is a fixed template filled with the
//! extracted content and design tokens. Every field has a default, so any
//! successful [`ScrapeResult`] renders.

use crate::results::{ButtonInfo, ContentSection, NavItem, ScrapeResult};
use crate::utils::{escape_html, non_empty};

pub const DEFAULT_TITLE: &str = "Website";
const DEFAULT_BACKGROUND: &str = "#ffffff";
const DEFAULT_TEXT: &str = "#333333";
const DEFAULT_FONT: &str = "system-ui, -apple-system, sans-serif";
const DEFAULT_BUTTON_BACKGROUND: &str = "#0066cc";
const DEFAULT_BUTTON_TEXT: &str = "#ffffff";
const DEFAULT_BUTTON_RADIUS: &str = "6px";
const DEFAULT_BUTTON_PADDING: &str = "12px 24px";

const MAX_NAV_ITEMS: usize = 6;
const MAX_SECTIONS: usize = 6;
const MAX_SECTION_CONTENT: usize = 2;
const MAX_TEXT_BLOCKS: usize = 3;
const MAX_BUTTONS: usize = 4;

/// Design tokens substituted into [`STYLESHEET`]
struct Tokens {
    background: String,
    text: String,
    font: String,
    button_background: String,
    button_text: String,
    button_radius: String,
    button_padding: String,
}

impl Tokens {
    fn from_result(result: &ScrapeResult) -> Self {
        let design = &result.design_system;
        let primary = design.colors.primary.as_ref();
        let button = design.components.button.as_ref();

        Self {
            background: css_or(primary.map(|p| p.background.as_str()), DEFAULT_BACKGROUND),
            text: css_or(primary.map(|p| p.text.as_str()), DEFAULT_TEXT),
            font: css_or(primary.map(|p| p.font_family.as_str()), DEFAULT_FONT),
            button_background: css_or(
                button.map(|b| b.background_color.as_str()),
                DEFAULT_BUTTON_BACKGROUND,
            ),
            button_text: css_or(button.map(|b| b.color.as_str()), DEFAULT_BUTTON_TEXT),
            button_radius: css_or(button.map(|b| b.border_radius.as_str()), DEFAULT_BUTTON_RADIUS),
            button_padding: css_or(button.map(|b| b.padding.as_str()), DEFAULT_BUTTON_PADDING),
        }
    }

    fn stylesheet(&self) -> String {
        STYLESHEET
            .replace("{{BG}}", &self.background)
            .replace("{{TEXT}}", &self.text)
            .replace("{{FONT}}", &self.font)
            .replace("{{BTN_BG}}", &self.button_background)
            .replace("{{BTN_TEXT}}", &self.button_text)
            .replace("{{BTN_RADIUS}}", &self.button_radius)
            .replace("{{BTN_PADDING}}", &self.button_padding)
    }
}

/// Render a complete standalone HTML document for `result`
///
/// Pure: identical inputs produce byte-identical output.
pub fn synthesize(result: &ScrapeResult, url: &str) -> String {
    let content = &result.structured_content;

    let title = non_empty(&content.page_title).unwrap_or(DEFAULT_TITLE);
    let main_heading = non_empty(&content.main_heading).unwrap_or(title);
    let description = non_empty(&content.meta_description);
    let tokens = Tokens::from_result(result);

    let mut html = String::with_capacity(12 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", escape_html(title)));
    if let Some(description) = description {
        html.push_str(&format!(
            "    <meta name=\"description\" content=\"{}\">\n",
            escape_html(description)
        ));
    }
    html.push_str("    <style>");
    html.push_str(&tokens.stylesheet());
    html.push_str("    </style>\n</head>\n<body>\n");

    html.push_str(&format!(
        r##"    <header class="site-header">
        <div class="container">
            <div class="header-content">
                <a href="#" class="logo">{}</a>
            </div>
        </div>
    </header>
"##,
        escape_html(title)
    ));

    html.push_str(&render_nav(&result.navigation_analysis.primary_nav));

    html.push_str("    <section class=\"hero-section\">\n        <div class=\"container\">\n");
    html.push_str(&format!(
        "            <h1 class=\"hero-title\">{}</h1>\n",
        escape_html(main_heading)
    ));
    if let Some(description) = description {
        html.push_str(&format!(
            "            <p class=\"hero-description\">{}</p>\n",
            escape_html(description)
        ));
    }
    html.push_str("        </div>\n    </section>\n");

    html.push_str("    <main class=\"main-content\">\n        <div class=\"container\">\n");
    for (index, section) in result
        .content_sections
        .main_content
        .sections
        .iter()
        .take(MAX_SECTIONS)
        .enumerate()
    {
        html.push_str(&render_section(index, section));
    }
    for text in content.text_content.iter().take(MAX_TEXT_BLOCKS) {
        html.push_str(&format!(
            "            <section class=\"content-section\">\n                <p class=\"section-content\">{}</p>\n            </section>\n",
            escape_html(text)
        ));
    }
    html.push_str(&render_buttons(&content.buttons));
    html.push_str("        </div>\n    </main>\n");

    let url = escape_html(url);
    html.push_str(&format!(
        r#"    <footer class="site-footer">
        <div class="container">
            <div class="footer-content">
                <p>Recreated from <a href="{url}" target="_blank" rel="noopener">{url}</a></p>
            </div>
        </div>
    </footer>
</body>
</html>
"#
    ));

    html
}

fn render_nav(items: &[NavItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut nav = String::from(
        "    <nav class=\"main-nav\">\n        <div class=\"nav-container\">\n",
    );
    for item in items.iter().take(MAX_NAV_ITEMS) {
        let href = non_empty(&item.href).unwrap_or("#");
        let text = non_empty(&item.text).unwrap_or("Link");
        let (class, marker) = if item.is_current {
            ("nav-link current", " aria-current=\"page\"")
        } else {
            ("nav-link", "")
        };
        nav.push_str(&format!(
            "            <a href=\"{}\" class=\"{}\"{}>{}</a>\n",
            escape_html(href),
            class,
            marker,
            escape_html(text)
        ));
    }
    nav.push_str("        </div>\n    </nav>\n");
    nav
}

fn render_section(index: usize, section: &ContentSection) -> String {
    let mut out = String::from("            <section class=\"content-section\">\n");

    if let Some(heading) = &section.heading {
        let level = if (1..=6).contains(&heading.level) {
            heading.level
        } else {
            2
        };
        let fallback = format!("Section {}", index + 1);
        let text = non_empty(&heading.text).unwrap_or(&fallback);
        out.push_str(&format!(
            "                <h{level} class=\"section-heading\">{}</h{level}>\n",
            escape_html(text)
        ));
    }

    for item in section.content.iter().take(MAX_SECTION_CONTENT) {
        out.push_str(&format!(
            "                <p class=\"section-content\">{}</p>\n",
            escape_html(item)
        ));
    }

    out.push_str("            </section>\n");
    out
}

fn render_buttons(buttons: &[ButtonInfo]) -> String {
    if buttons.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "            <section class=\"cta-section\">\n                <div class=\"button-group\">\n",
    );
    for button in buttons.iter().take(MAX_BUTTONS) {
        let text = escape_html(non_empty(&button.text).unwrap_or("Button"));
        match non_empty(&button.href) {
            Some(href) => out.push_str(&format!(
                "                    <a href=\"{}\" class=\"btn btn-primary\">{}</a>\n",
                escape_html(href),
                text
            )),
            None => out.push_str(&format!(
                "                    <button type=\"button\" class=\"btn btn-primary\">{}</button>\n",
                text
            )),
        }
    }
    out.push_str("                </div>\n            </section>\n");
    out
}

/// A scraped CSS value, or `default` when missing or unsafe to inline
fn css_or(value: Option<&str>, default: &str) -> String {
    let cleaned: String = value
        .unwrap_or_default()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';'))
        .collect();
    match non_empty(&cleaned) {
        Some(v) => v.to_string(),
        None => default.to_string(),
    }
}

const STYLESHEET: &str = r#"
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: {{FONT}};
            line-height: 1.6;
            color: {{TEXT}};
            background-color: {{BG}};
            font-size: 16px;
        }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 0 1.5rem;
        }

        .site-header {
            background: {{BG}};
            border-bottom: 1px solid #e2e8f0;
            position: sticky;
            top: 0;
            z-index: 100;
        }

        .header-content {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 1rem 0;
        }

        .logo {
            font-size: 1.75rem;
            font-weight: 800;
            color: {{TEXT}};
            text-decoration: none;
        }

        .main-nav {
            background: {{BG}};
        }

        .nav-container {
            display: flex;
            flex-wrap: wrap;
            justify-content: center;
            gap: 2rem;
            max-width: 1200px;
            margin: 0 auto;
            padding: 1rem 1.5rem;
        }

        .nav-link {
            color: {{TEXT}};
            text-decoration: none;
            font-weight: 500;
            padding: 0.5rem 1rem;
            border-radius: 6px;
            transition: all 0.3s ease;
        }

        .nav-link:hover,
        .nav-link.current {
            color: {{BTN_BG}};
            background-color: rgba(0, 102, 204, 0.1);
        }

        .hero-section {
            text-align: center;
            padding: 4rem 0;
            background: linear-gradient(135deg, rgba(0, 102, 204, 0.05) 0%, rgba(0, 102, 204, 0.1) 100%);
        }

        .hero-title {
            font-size: 3rem;
            font-weight: 800;
            margin-bottom: 1.5rem;
            color: {{TEXT}};
            line-height: 1.2;
        }

        .hero-description {
            font-size: 1.25rem;
            opacity: 0.8;
            max-width: 600px;
            margin: 0 auto 2rem;
        }

        .main-content {
            padding: 3rem 0;
        }

        .main-content > .container {
            display: grid;
            grid-template-columns: 1fr;
            gap: 2.5rem;
        }

        .content-section {
            padding: 2rem;
            background: {{BG}};
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0, 0, 0, 0.08);
            border: 1px solid #f0f0f0;
            animation: fadeInUp 0.6s ease-out;
        }

        .section-heading {
            color: {{TEXT}};
            margin-bottom: 1.5rem;
            font-weight: 700;
            line-height: 1.3;
        }

        h1.section-heading { font-size: 2.5rem; }
        h2.section-heading { font-size: 2rem; }
        h3.section-heading { font-size: 1.5rem; }
        h4.section-heading { font-size: 1.25rem; }

        .section-content {
            font-size: 1.1rem;
            line-height: 1.7;
            margin-bottom: 1rem;
            opacity: 0.9;
        }

        .cta-section {
            text-align: center;
            padding: 3rem 0;
        }

        .button-group {
            display: flex;
            flex-wrap: wrap;
            justify-content: center;
            gap: 1rem;
        }

        .btn {
            display: inline-block;
            padding: {{BTN_PADDING}};
            background-color: {{BTN_BG}};
            color: {{BTN_TEXT}};
            text-decoration: none;
            border-radius: {{BTN_RADIUS}};
            font-weight: 600;
            font-size: 1rem;
            border: none;
            cursor: pointer;
            transition: all 0.3s ease;
        }

        .btn:hover {
            filter: brightness(0.92);
            transform: translateY(-2px);
            box-shadow: 0 4px 15px rgba(0, 0, 0, 0.2);
        }

        .site-footer {
            background: {{TEXT}};
            color: {{BG}};
            text-align: center;
            padding: 2rem 0;
            margin-top: 3rem;
        }

        .footer-content {
            font-size: 0.9rem;
            opacity: 0.8;
        }

        .footer-content a {
            color: {{BG}};
        }

        @media (max-width: 768px) {
            .header-content,
            .nav-container,
            .button-group {
                flex-direction: column;
                align-items: center;
                gap: 1rem;
            }

            .hero-title {
                font-size: 2.25rem;
            }

            .content-section {
                padding: 1.5rem;
            }
        }

        @keyframes fadeInUp {
            from {
                opacity: 0;
                transform: translateY(20px);
            }
            to {
                opacity: 1;
                transform: translateY(0);
            }
        }
"#;
