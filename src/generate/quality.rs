//! Cleanup and structural scoring of generated HTML.

use crate::results::StructuredContent;
use crate::utils::truncate_chars;
use regex::Regex;
use std::sync::LazyLock;

/// Generated documents shorter than this always fail
pub const MIN_GENERATED_LEN: usize = 2000;
const MIN_OPENING_TAGS: usize = 40;
const HEADING_PROBE_LEN: usize = 30;
const BUTTON_PROBE_LEN: usize = 20;

const DOCTYPE: &str = "<!doctype html>";
const HTML_OPEN: &str = "<html";
const HTML_CLOSE: &str = "</html>";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:html)?\n?").expect("fence regex"));

/// Strip code fences and cut the document out of surrounding chatter
///
/// Starts at the doctype (or the first `<html` tag) and ends at the last
/// `</html>`. Without a closing tag the cleaned text is returned as is.
pub fn extract_html(response: &str) -> String {
    let cleaned = CODE_FENCE.replace_all(response.trim(), "");
    let cleaned = cleaned.trim();

    // ASCII lowercasing keeps byte offsets valid for slicing `cleaned`
    let lower = cleaned.to_ascii_lowercase();
    let start = lower.find(DOCTYPE).or_else(|| lower.find(HTML_OPEN));
    let end = lower.rfind(HTML_CLOSE);

    match (start, end) {
        (Some(start), Some(end)) if end >= start => {
            cleaned[start..end + HTML_CLOSE.len()].to_string()
        }
        _ => cleaned.to_string(),
    }
}

/// Outcome of [`QualityGate::assess`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityReport {
    /// Checks that held
    pub passed: usize,
    /// Checks evaluated (9 base plus up to 2 content checks)
    pub total: usize,
    pub accepted: bool,
}

/// Structural heuristic deciding whether generated HTML is usable
pub struct QualityGate {
    threshold: usize,
    doctype: Regex,
    html: Regex,
    head: Regex,
    body: Regex,
    nav_landmark: Regex,
    main_landmark: Regex,
    style: Regex,
    opening_tag: Regex,
}

impl QualityGate {
    /// `threshold` is the number of checks that must hold
    pub fn new(threshold: usize) -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("quality gate regex");
        Self {
            threshold,
            doctype: re(r"(?i)<!doctype\s+html"),
            html: re(r"(?is)<html[\s>].*</html>"),
            head: re(r"(?is)<head[\s>].*</head>"),
            body: re(r"(?is)<body[\s>].*</body>"),
            nav_landmark: re(r"(?i)<(?:header|nav)[\s>]"),
            main_landmark: re(r"(?i)<(?:main|section)[\s>]"),
            style: re(r"(?i)<style[\s>]"),
            opening_tag: re(r"<[a-zA-Z]"),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn assess(&self, html: &str, content: &StructuredContent) -> QualityReport {
        if html.chars().count() < MIN_GENERATED_LEN {
            return QualityReport {
                passed: 0,
                total: 0,
                accepted: false,
            };
        }

        let lower = html.to_lowercase();
        let mut checks = vec![
            self.doctype.is_match(html),
            self.html.is_match(html),
            self.head.is_match(html),
            self.body.is_match(html),
            self.nav_landmark.is_match(html),
            self.main_landmark.is_match(html),
            self.style.is_match(html),
            lower.contains("display:") || lower.contains("flex") || lower.contains("grid"),
            self.opening_tag.find_iter(html).count() > MIN_OPENING_TAGS,
        ];

        let heading = content.main_heading.trim();
        if !heading.is_empty() {
            let probe = truncate_chars(heading, HEADING_PROBE_LEN).to_lowercase();
            checks.push(lower.contains(&probe));
        }

        if !content.buttons.is_empty() {
            let matched = content
                .buttons
                .iter()
                .take(2)
                .map(|b| truncate_chars(b.text.trim(), BUTTON_PROBE_LEN).to_lowercase())
                .filter(|probe| !probe.is_empty())
                .any(|probe| lower.contains(&probe));
            checks.push(matched);
        }

        let passed = checks.iter().filter(|ok| **ok).count();
        QualityReport {
            passed,
            total: checks.len(),
            accepted: passed >= self.threshold,
        }
    }
}
