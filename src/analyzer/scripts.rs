//! In-page extraction scripts.
//!
//! Each script is a WebDriver `execute` body. `arguments[0]` carries the
//! region selector chains (see [`crate::parsers::selectors::chains_json`]).
//! Scripts only read the DOM.

/// Shared helpers prepended to every script
const PRELUDE: &str = r#"
const chains = arguments[0] || {};
const resolve = (name) => {
    for (const sel of (chains[name] || [])) {
        let el = null;
        try { el = document.querySelector(sel); } catch (e) { el = null; }
        if (el) return el;
    }
    return null;
};
const rect = (el) => {
    const r = el.getBoundingClientRect();
    return { x: r.x, y: r.y, width: r.width, height: r.height };
};
const text = (el) => (el.textContent || '').replace(/\s+/g, ' ').trim();
"#;

const LAYOUT_BODY: &str = r#"
const body = document.body;
const mainEl = resolve('main');
const main = mainEl || body;
const header = resolve('header');
const nav = resolve('navigation');
const footer = resolve('footer');
const sidebar = resolve('sidebar');

let pageType = 'simple';
if (header && nav && mainEl && footer) {
    pageType = 'full_layout';
} else if (mainEl) {
    pageType = 'content_focused';
}

const mainStyles = window.getComputedStyle(main);
const containerInfo = {
    width: main.getBoundingClientRect().width,
    maxWidth: mainStyles.maxWidth,
    margin: mainStyles.margin,
    padding: mainStyles.padding,
    display: mainStyles.display,
    flexDirection: mainStyles.flexDirection,
    gridTemplateColumns: mainStyles.gridTemplateColumns
};

let layoutFlow = 'vertical';
if (mainStyles.display === 'flex' && mainStyles.flexDirection === 'row') {
    layoutFlow = 'horizontal';
} else if (mainStyles.display === 'grid' && mainStyles.gridTemplateColumns !== 'none') {
    layoutFlow = 'grid';
}

const sections = [];
if (header) {
    const s = window.getComputedStyle(header);
    sections.push({ type: 'header', bounds: rect(header), styles: { background: s.backgroundColor, position: s.position } });
}
if (nav && nav !== header) {
    sections.push({ type: 'navigation', bounds: rect(nav) });
}
main.querySelectorAll('section, article, .section, .content-section').forEach((el) => {
    const b = rect(el);
    if (b.height > 50) {
        sections.push({ type: 'content', bounds: b });
    }
});
if (sidebar) {
    sections.push({ type: 'sidebar', bounds: rect(sidebar) });
}
if (footer) {
    sections.push({ type: 'footer', bounds: rect(footer) });
}

return {
    pageType: pageType,
    layoutFlow: layoutFlow,
    containerInfo: containerInfo,
    mainSections: sections,
    viewport: { width: window.innerWidth, height: window.innerHeight }
};
"#;

const CONTENT_SECTIONS_BODY: &str = r#"
const result = {
    headerContent: null,
    navigationContent: null,
    mainContent: { sections: [], totalSections: 0 },
    sidebarContent: null,
    footerContent: null
};
const level = (el) => parseInt(el.tagName.substring(1), 10);

const header = resolve('header');
if (header) {
    const title = header.querySelector('h1, .logo, .brand');
    result.headerContent = {
        title: title ? text(title) : '',
        hasNavigation: !!header.querySelector('nav, .nav'),
        backgroundColor: window.getComputedStyle(header).backgroundColor
    };
}

const nav = resolve('navigation');
if (nav) {
    const s = window.getComputedStyle(nav);
    result.navigationContent = {
        links: Array.from(nav.querySelectorAll('a')).map((a) => ({
            text: text(a),
            href: a.href,
            isActive: a.classList.contains('active') || a.getAttribute('aria-current') === 'page'
        })).filter((l) => l.text),
        layout: s.display,
        position: s.position
    };
}

const main = resolve('main') || document.body;
const sections = [];
let current = null;
main.querySelectorAll('h1, h2, h3, section, article, .section, .content-block, .hero').forEach((el) => {
    const r = el.getBoundingClientRect();
    if (r.height < 20) return;
    if (el.matches('h1, h2, h3')) {
        if (current) sections.push(current);
        const s = window.getComputedStyle(el);
        current = {
            type: 'text_section',
            heading: {
                level: level(el),
                text: text(el),
                styles: { fontSize: s.fontSize, color: s.color, fontWeight: s.fontWeight }
            },
            content: [],
            bounds: { y: r.y, height: r.height }
        };
    } else if (el.matches('section, article, .section')) {
        const h = el.querySelector('h1, h2, h3, h4');
        const content = Array.from(el.querySelectorAll('p, div'))
            .map(text)
            .filter((t) => t && t.length > 20);
        sections.push({
            type: 'content_section',
            heading: h ? { level: level(h), text: text(h) } : null,
            content: content.slice(0, 3),
            bounds: { y: r.y, height: r.height }
        });
    }
});
if (current) sections.push(current);
result.mainContent = { sections: sections, totalSections: sections.length };

const summarize = (el) => el ? {
    headings: Array.from(el.querySelectorAll('h1, h2, h3, h4, h5, h6')).map(text).filter(Boolean).slice(0, 5),
    text: Array.from(el.querySelectorAll('p')).map(text).filter((t) => t.length > 20).slice(0, 3),
    linkCount: el.querySelectorAll('a').length
} : null;
result.sidebarContent = summarize(resolve('sidebar'));
result.footerContent = summarize(resolve('footer'));

return result;
"#;

const DESIGN_BODY: &str = r#"
const design = { colors: {}, typography: { headings: {} }, components: {}, spacingPools: { margins: [], paddings: [] } };

const bodyStyles = window.getComputedStyle(document.body);
design.colors.primary = {
    background: bodyStyles.backgroundColor,
    text: bodyStyles.color,
    fontFamily: bodyStyles.fontFamily
};

['h1', 'h2', 'h3', 'h4'].forEach((tag) => {
    const el = document.querySelector(tag);
    if (el) {
        const s = window.getComputedStyle(el);
        design.typography.headings[tag] = {
            fontSize: s.fontSize,
            fontWeight: s.fontWeight,
            color: s.color,
            marginTop: s.marginTop,
            marginBottom: s.marginBottom,
            lineHeight: s.lineHeight
        };
    }
});

const button = document.querySelector('button, .btn, .button, input[type="button"], a[class*="btn"]');
if (button) {
    const s = window.getComputedStyle(button);
    design.components.button = {
        backgroundColor: s.backgroundColor,
        color: s.color,
        border: s.border,
        borderRadius: s.borderRadius,
        padding: s.padding,
        fontSize: s.fontSize,
        fontWeight: s.fontWeight
    };
}

const link = document.querySelector('a:not([class*="btn"])');
if (link) {
    const s = window.getComputedStyle(link);
    design.components.link = {
        color: s.color,
        textDecoration: s.textDecoration,
        fontWeight: s.fontWeight
    };
}

document.querySelectorAll('section, article, .section, h1, h2, h3, p').forEach((el) => {
    const s = window.getComputedStyle(el);
    const px = (v) => parseInt(v, 10) || 0;
    [px(s.marginTop), px(s.marginBottom)].forEach((v) => { if (v > 0) design.spacingPools.margins.push(v); });
    [px(s.paddingTop), px(s.paddingBottom)].forEach((v) => { if (v > 0) design.spacingPools.paddings.push(v); });
});

return design;
"#;

const NAV_STYLE_BODY: &str = r#"
const nav = resolve('navigation');
if (!nav) return null;
const s = window.getComputedStyle(nav);
return { display: s.display, flexDirection: s.flexDirection };
"#;

const PAGE_SIZE_BODY: &str = r#"
const doc = document.documentElement;
return {
    width: Math.max(doc.scrollWidth, window.innerWidth),
    height: Math.max(document.body ? document.body.scrollHeight : 0, doc.scrollHeight)
};
"#;

fn with_prelude(body: &str) -> String {
    format!("{}{}", PRELUDE, body)
}

pub fn layout_structure() -> String {
    with_prelude(LAYOUT_BODY)
}

pub fn content_sections() -> String {
    with_prelude(CONTENT_SECTIONS_BODY)
}

pub fn design_system() -> String {
    with_prelude(DESIGN_BODY)
}

pub fn nav_style() -> String {
    with_prelude(NAV_STYLE_BODY)
}

/// Document scroll size, used to grow the window for a full-page screenshot
pub fn page_size() -> String {
    PAGE_SIZE_BODY.to_string()
}
