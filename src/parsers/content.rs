use super::{element_text, resolve_link, selector};
use crate::results::{ButtonInfo, HeadingEntry, ImageInfo, ListInfo, ListKind, StructuredContent};
use scraper::{ElementRef, Html};
use url::Url;

/// Elements treated as call-to-action buttons
pub const BUTTON_SELECTOR: &str = "button, .btn, .button, input[type=\"button\"], input[type=\"submit\"], a[class*=\"btn\"]";

const TEXT_BLOCK_SELECTOR: &str = "p, div[class*=\"text\"], div[class*=\"content\"]";
const BLOCK_CHILD_SELECTOR: &str = "div, p, h1, h2, h3, h4, h5, h6";
const MIN_TEXT_LEN: usize = 30;
const MAX_TEXT_LEN: usize = 500;

/// Extracts title, headings, text blocks, buttons, images and lists
pub fn extract_structured_content(doc: &Html, base: Option<&Url>) -> StructuredContent {
    let page_title = doc
        .select(&selector("title"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    let meta_description = doc
        .select(&selector("meta[name=\"description\"]"))
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    let main_heading = doc
        .select(&selector("h1"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    StructuredContent {
        page_title,
        meta_description,
        main_heading,
        headings_hierarchy: headings_hierarchy(doc),
        text_content: text_blocks(doc),
        buttons: buttons(doc, base),
        images: images(doc, base),
        lists: lists(doc),
    }
}

fn headings_hierarchy(doc: &Html) -> Vec<HeadingEntry> {
    doc.select(&selector("h1, h2, h3, h4, h5, h6"))
        .enumerate()
        .filter_map(|(order, heading)| {
            let text = element_text(heading);
            if text.is_empty() {
                return None;
            }
            let level = heading.value().name()[1..].parse().unwrap_or(1);
            Some(HeadingEntry { level, text, order })
        })
        .collect()
}

/// Leaf text blocks: no nested block elements, length strictly between the bounds
fn text_blocks(doc: &Html) -> Vec<String> {
    let block_children = selector(BLOCK_CHILD_SELECTOR);
    doc.select(&selector(TEXT_BLOCK_SELECTOR))
        .filter(|element| !has_descendant(*element, &block_children))
        .map(element_text)
        .filter(|text| {
            let len = text.chars().count();
            len > MIN_TEXT_LEN && len < MAX_TEXT_LEN
        })
        .collect()
}

fn has_descendant(element: ElementRef<'_>, sel: &scraper::Selector) -> bool {
    element.select(sel).any(|child| child.id() != element.id())
}

fn buttons(doc: &Html, base: Option<&Url>) -> Vec<ButtonInfo> {
    doc.select(&selector(BUTTON_SELECTOR))
        .filter_map(|button| {
            let attrs = button.value();
            let text = Some(element_text(button))
                .filter(|t| !t.is_empty())
                .or_else(|| attr_text(button, "value"))
                .or_else(|| attr_text(button, "aria-label"))?;

            let kind = attrs.name().to_string();
            // Only anchors expose an href property
            let href = match (kind.as_str(), attrs.attr("href")) {
                ("a", Some(raw)) => resolve_link(base, raw),
                _ => String::new(),
            };

            Some(ButtonInfo {
                text,
                kind,
                href,
                classes: attrs.attr("class").unwrap_or_default().to_string(),
            })
        })
        .collect()
}

fn attr_text(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Images with both a source and alt text
fn images(doc: &Html, base: Option<&Url>) -> Vec<ImageInfo> {
    doc.select(&selector("img"))
        .filter_map(|img| {
            let src = attr_text(img, "src")?;
            let alt = attr_text(img, "alt")?;
            let dimension = |name: &str| {
                img.value()
                    .attr(name)
                    .and_then(|v| v.trim().trim_end_matches("px").parse().ok())
                    .unwrap_or(0)
            };
            Some(ImageInfo {
                alt,
                src: resolve_link(base, &src),
                width: dimension("width"),
                height: dimension("height"),
            })
        })
        .collect()
}

fn lists(doc: &Html) -> Vec<ListInfo> {
    let item_selector = selector("li");
    doc.select(&selector("ul, ol"))
        .filter_map(|list| {
            let items: Vec<String> = list
                .select(&item_selector)
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();
            if items.is_empty() {
                return None;
            }
            let kind = if list.value().name() == "ol" {
                ListKind::Ol
            } else {
                ListKind::Ul
            };
            Some(ListInfo { kind, items })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> StructuredContent {
        let doc = Html::parse_document(html);
        let base = Url::parse("https://shop.test/products/").unwrap();
        extract_structured_content(&doc, Some(&base))
    }

    #[test]
    fn test_title_meta_and_main_heading() {
        let content = extract(
            r#"<html><head><title>Shop</title><meta name="description" content=" Best shop "></head>
            <body><h2>Intro</h2><h1>  Big   Sale </h1><h1>Second</h1></body></html>"#,
        );
        assert_eq!(content.page_title, "Shop");
        assert_eq!(content.meta_description, "Best shop");
        assert_eq!(content.main_heading, "Big Sale");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let content = extract("<html><body></body></html>");
        assert_eq!(content, StructuredContent::default());
    }

    #[test]
    fn test_headings_hierarchy_keeps_global_order() {
        let content = extract(
            "<html><body><h1>A</h1><h2></h2><h3>C</h3><h6>F</h6></body></html>",
        );
        let levels: Vec<u8> = content.headings_hierarchy.iter().map(|h| h.level).collect();
        let orders: Vec<usize> = content.headings_hierarchy.iter().map(|h| h.order).collect();
        assert_eq!(levels, vec![1, 3, 6]);
        // The empty h2 still consumes an order slot
        assert_eq!(orders, vec![0, 2, 3]);
    }

    #[test]
    fn test_text_blocks_are_leaves_within_length_bounds() {
        let long = "x".repeat(600);
        let html = format!(
            r#"<html><body>
            <p>Too short.</p>
            <p>This paragraph is comfortably longer than thirty characters.</p>
            <div class="content"><p>Nested paragraph that is long enough to be a block.</p></div>
            <div class="text-body">A leaf div whose class mentions text and is long.</div>
            <p>{}</p>
            </body></html>"#,
            long
        );
        let content = extract(&html);
        assert_eq!(
            content.text_content,
            vec![
                "This paragraph is comfortably longer than thirty characters.".to_string(),
                "Nested paragraph that is long enough to be a block.".to_string(),
                "A leaf div whose class mentions text and is long.".to_string(),
            ]
        );
    }

    #[test]
    fn test_buttons() {
        let content = extract(
            r#"<html><body>
            <a class="btn primary" href="/start">Get Started</a>
            <button class="cta">Buy</button>
            <input type="submit" value="Send">
            <button aria-label="Close"></button>
            <button></button>
            </body></html>"#,
        );
        assert_eq!(content.buttons.len(), 4);
        assert_eq!(content.buttons[0].text, "Get Started");
        assert_eq!(content.buttons[0].kind, "a");
        assert_eq!(content.buttons[0].href, "https://shop.test/start");
        assert_eq!(content.buttons[0].classes, "btn primary");
        assert_eq!(content.buttons[1].href, "");
        assert_eq!(content.buttons[2].text, "Send");
        assert_eq!(content.buttons[2].kind, "input");
        assert_eq!(content.buttons[3].text, "Close");
    }

    #[test]
    fn test_images_require_alt() {
        let content = extract(
            r#"<html><body>
            <img src="a.png" alt="Logo" width="120" height="40">
            <img src="b.png">
            <img src="c.png" alt="">
            </body></html>"#,
        );
        assert_eq!(content.images.len(), 1);
        assert_eq!(content.images[0].src, "https://shop.test/products/a.png");
        assert_eq!(content.images[0].width, 120);
        assert_eq!(content.images[0].height, 40);
    }

    #[test]
    fn test_lists() {
        let content = extract(
            "<html><body><ul><li>One</li><li> </li><li>Two</li></ul><ol><li>First</li></ol><ul></ul></body></html>",
        );
        assert_eq!(content.lists.len(), 2);
        assert_eq!(content.lists[0].kind, ListKind::Ul);
        assert_eq!(content.lists[0].items, vec!["One", "Two"]);
        assert_eq!(content.lists[1].kind, ListKind::Ol);
    }
}
