//! HTML tokenizing and tree building.
//!
//! This is a lenient, single-pass tokenizer for well-formed-enough HTML
//! fragments, not an HTML5 parser. Tags are found left to right and text
//! between them is attached to the element on top of a construction stack.
//!
//! Leniency is deliberate: a closing tag that does not match the top of the
//! stack is ignored instead of repaired, and the builder never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use html2md4llm_core::{tags, Element, Node, Text};

use crate::entities::decode_entities;
use crate::normalize::normalize;
use crate::options::DEFAULT_MAX_DEPTH;

static RE_DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE[^>]*>").unwrap());
static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<script[^>]*>[\s\S]*?</script>").unwrap());
static RE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<style[^>]*>[\s\S]*?</style>").unwrap());
static RE_IFRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<iframe[^>]*>[\s\S]*?</iframe>").unwrap());
static RE_SVG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<svg[^>]*>[\s\S]*?</svg>").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<link[^>]*>").unwrap());
static RE_SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<source[^>]*>").unwrap());
static RE_INPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<input[^>]*>").unwrap());
static RE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?([a-z][a-z0-9]*)[^>]*>").unwrap());
static RE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)([a-z][a-z0-9-]*)="([^"]*)""#).unwrap());

static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([\s\S]*?)</title>").unwrap());
static RE_META_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*name=["']description["'][^>]*content=["']([^"']*)["']"#).unwrap()
});
static RE_META_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*name=["']keywords["'][^>]*content=["']([^"']*)["']"#).unwrap()
});

/// Attributes always dropped by the tree builder
pub const DEFAULT_REMOVED_ATTRIBUTES: &[&str] = &["loading", "decoding", "fetchpriority"];

/// Decides which attributes the tree builder drops.
///
/// Patterns match an attribute name exactly, or by prefix when they end in
/// `-*` (`aria-*` drops every name starting with `aria`). `data-*`
/// attributes are always dropped; `style` is always kept because the
/// normalizer still needs it for visibility checks.
#[derive(Debug, Clone)]
pub struct AttributeFilter {
    patterns: Vec<String>,
}

impl AttributeFilter {
    /// Default blacklist plus caller-supplied patterns
    pub fn new(extra: &[String]) -> Self {
        let patterns = DEFAULT_REMOVED_ATTRIBUTES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned())
            .collect();
        Self { patterns }
    }

    pub fn should_remove(&self, name: &str) -> bool {
        if name == "style" {
            return false;
        }
        if name.starts_with("data-") {
            return true;
        }
        self.patterns.iter().any(|pattern| match pattern.strip_suffix("-*") {
            Some(prefix) => name.starts_with(prefix),
            None => name == pattern,
        })
    }
}

impl Default for AttributeFilter {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Document metadata found in the page head
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

/// Read `<title>` and the description/keywords `<meta>` tags
pub fn extract_metadata(html: &str) -> Metadata {
    Metadata {
        title: first_capture(&RE_TITLE, html).map(|t| t.trim().to_string()),
        description: first_capture(&RE_META_DESCRIPTION, html),
        keywords: first_capture(&RE_META_KEYWORDS, html),
    }
}

fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html).map(|caps| caps[1].to_string())
}

/// Parse an HTML string into a normalized document tree.
///
/// A fragment with a single top-level node returns that node; otherwise the
/// top-level nodes are kept under a synthetic `root` element.
///
/// # Example
///
/// ```rust
/// use html2md4llm::parse_html;
///
/// let tree = parse_html("<div><span>text</span></div>", &[]);
/// assert_eq!(tree.text_value(), Some("text"));
/// assert_eq!(tree.flattened_tags().unwrap(), ["div", "span"]);
/// ```
pub fn parse_html(html: &str, remove_attributes: &[String]) -> Node {
    parse_html_bounded(html, remove_attributes, DEFAULT_MAX_DEPTH)
}

pub(crate) fn parse_html_bounded(html: &str, remove_attributes: &[String], max_depth: usize) -> Node {
    let filter = AttributeFilter::new(remove_attributes);
    let mut root = build_tree(html, &filter, max_depth);
    normalize(&mut root);
    unwrap_root(root)
}

/// Remove regions that never carry content: doctype, scripts, styles,
/// frames, inline SVG, resource tags and comments
pub fn pre_clean(html: &str) -> String {
    let mut cleaned = RE_DOCTYPE.replace_all(html, "").into_owned();
    for re in [
        &RE_SCRIPT, &RE_STYLE, &RE_IFRAME, &RE_SVG, &RE_LINK, &RE_SOURCE, &RE_INPUT, &RE_COMMENT,
    ] {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    cleaned
}

/// Tokenize `html` and build the raw tree under a synthetic `root` element.
///
/// Opening tags found while `max_depth` elements are already open are
/// attached but not opened, so nesting never grows past `max_depth`.
pub fn build_tree(html: &str, filter: &AttributeFilter, max_depth: usize) -> Element {
    let cleaned = pre_clean(html);
    debug!(input_len = html.len(), cleaned_len = cleaned.len(), "pre-cleaned html");

    let mut builder = TreeBuilder::new(max_depth);
    let mut last_index = 0;

    for caps in RE_TAG.captures_iter(&cleaned) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        builder.text(&cleaned[last_index..whole.start()]);

        let full_tag = whole.as_str();
        let tag_name = caps[1].to_ascii_lowercase();

        if full_tag.starts_with("</") {
            builder.close(&tag_name);
        } else {
            let element = open_element(&tag_name, full_tag, filter);
            let self_closing = full_tag.ends_with("/>") || tags::is_void(&tag_name);
            builder.open(element, self_closing);
        }

        last_index = whole.end();
    }

    builder.text(&cleaned[last_index..]);
    builder.finish()
}

/// Return the only top-level node, or the synthetic root when there are
/// zero or several
pub fn unwrap_root(mut root: Element) -> Node {
    if root.children.len() == 1 {
        if let Some(only) = root.children.pop() {
            return only;
        }
    }
    Node::Element(root)
}

fn open_element(tag_name: &str, full_tag: &str, filter: &AttributeFilter) -> Element {
    let mut element = Element::new(tag_name);
    let mut data_src = None;

    for caps in RE_ATTR.captures_iter(full_tag) {
        let name = &caps[1];
        let value = &caps[2];

        if name == "data-src" {
            data_src = Some(value.to_string());
        }
        if !filter.should_remove(name) {
            element.set_attr(name, value);
        }
    }

    // Lazy-loaded images keep their real URL in data-src
    if element.tag == "img" && !element.has_attr("src") {
        if let Some(src) = data_src.filter(|s| !s.is_empty()) {
            element.set_attr("src", &src);
        }
    }

    element
}

fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}'))
        .collect()
}

/// Stack of currently open elements above the synthetic root
struct TreeBuilder {
    root: Element,
    open: Vec<Element>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            root: Element::new("root"),
            open: Vec::new(),
            max_depth,
        }
    }

    fn top_mut(&mut self) -> &mut Element {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn text(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let content = clean_text(&decode_entities(trimmed));
        self.top_mut().add_child(Node::Text(Text::new(&content)));
    }

    fn open(&mut self, element: Element, self_closing: bool) {
        if self_closing {
            self.top_mut().add_child(element.into());
        } else if self.open.len() >= self.max_depth {
            trace!(tag = %element.tag, depth = self.open.len(), "nesting capped, tag not opened");
            self.top_mut().add_child(element.into());
        } else {
            self.open.push(element);
        }
    }

    fn close(&mut self, tag_name: &str) {
        if !self.open.last().is_some_and(|top| top.tag == tag_name) {
            trace!(tag = tag_name, "ignoring unmatched closing tag");
            return;
        }
        if let Some(done) = self.open.pop() {
            self.top_mut().add_child(done.into());
        }
    }

    fn finish(mut self) -> Element {
        while let Some(done) = self.open.pop() {
            self.top_mut().add_child(done.into());
        }
        debug!(top_level = self.root.children.len(), "built tree");
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(html: &str) -> Element {
        build_tree(html, &AttributeFilter::default(), DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn test_build_simple_tree() {
        let root = raw("<p>Hello <b>World</b></p>");
        assert_eq!(root.tag, "root");
        assert_eq!(root.children.len(), 1);
        let p = root.children[0].as_element().unwrap();
        assert_eq!(p.tag, "p");
        assert_eq!(p.children[0].text_value(), Some("Hello"));
        assert_eq!(p.children[1].tag_name(), Some("b"));
    }

    #[test]
    fn test_uppercase_tags_lowercased() {
        let root = raw("<DIV><P>x</P></DIV>");
        let div = root.children[0].as_element().unwrap();
        assert_eq!(div.tag, "div");
        assert_eq!(div.children[0].tag_name(), Some("p"));
    }

    #[test]
    fn test_void_and_self_closing_not_opened() {
        let root = raw("<p>a<br>b<img src=\"x.png\"/>c<custom/>d</p>");
        let p = root.children[0].as_element().unwrap();
        let kinds: Vec<_> = p
            .children
            .iter()
            .map(|c| c.tag_name().or(c.text_value()).unwrap())
            .collect();
        assert_eq!(kinds, ["a", "br", "b", "img", "c", "custom", "d"]);
    }

    #[test]
    fn test_mismatched_closer_ignored() {
        let root = raw("<div><span>a</div>b</span>c");
        let div = root.children[0].as_element().unwrap();
        let span = div.children[0].as_element().unwrap();
        assert_eq!(span.children[0].text_value(), Some("a"));
        assert_eq!(span.children[1].text_value(), Some("b"));
        assert_eq!(div.children.len(), 2);
        assert_eq!(div.children[1].text_value(), Some("c"));
    }

    #[test]
    fn test_trailing_text_attached() {
        let root = raw("<p>x</p> tail ");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].text_value(), Some("tail"));
    }

    #[test]
    fn test_entities_and_invisible_chars() {
        let root = raw("<p>&lt;a&gt;\u{200E} &amp; \u{202B}b</p>");
        let p = root.children[0].as_element().unwrap();
        assert_eq!(p.children[0].text_value(), Some("<a> & b"));
    }

    #[test]
    fn test_invisible_only_text_kept_empty() {
        let root = raw("<span>\u{200E}\u{202A}</span>");
        let span = root.children[0].as_element().unwrap();
        assert_eq!(span.children.len(), 1);
        assert_eq!(span.children[0].text_value(), Some(""));
    }

    #[test]
    fn test_pre_clean() {
        let html = "<!DOCTYPE html><p>a</p><SCRIPT>var x = '<p>';</SCRIPT>\
                    <style>p{}</style><iframe src=\"x\">f</iframe><svg><path d=\"M1\"/></svg>\
                    <link rel=\"x\"><source srcset=\"a\"><input type=\"text\"><!-- note --><p>b</p>";
        assert_eq!(pre_clean(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_attribute_filter() {
        let filter = AttributeFilter::new(&["aria-*".to_string(), "role".to_string()]);
        assert!(filter.should_remove("loading"));
        assert!(filter.should_remove("decoding"));
        assert!(filter.should_remove("fetchpriority"));
        assert!(filter.should_remove("data-id"));
        assert!(filter.should_remove("aria-label"));
        assert!(filter.should_remove("role"));
        assert!(!filter.should_remove("style"));
        assert!(!filter.should_remove("href"));
        assert!(!filter.should_remove("roles"));
    }

    #[test]
    fn test_attributes_parsed_and_filtered() {
        let root = raw(r#"<a href="/x" data-track="1" loading="lazy" title="T">x</a>"#);
        let a = root.children[0].as_element().unwrap();
        assert_eq!(a.attr("href"), Some("/x"));
        assert_eq!(a.attr("title"), Some("T"));
        assert!(!a.has_attr("data-track"));
        assert!(!a.has_attr("loading"));
    }

    #[test]
    fn test_unquoted_attributes_ignored() {
        let root = raw("<a href=/x class='c'>x</a>");
        let a = root.children[0].as_element().unwrap();
        assert!(a.attributes.is_empty());
    }

    #[test]
    fn test_img_data_src_promoted() {
        let root = raw(r#"<img data-src="lazy.png" alt="a">"#);
        let img = root.children[0].as_element().unwrap();
        assert_eq!(img.attr("src"), Some("lazy.png"));
        assert!(!img.has_attr("data-src"));

        let root = raw(r#"<img src="real.png" data-src="lazy.png">"#);
        let img = root.children[0].as_element().unwrap();
        assert_eq!(img.attr("src"), Some("real.png"));
    }

    #[test]
    fn test_depth_cap() {
        let html = "<div><div><div><div>deep</div></div></div></div>";
        let root = build_tree(html, &AttributeFilter::default(), 2);
        let first = root.children[0].as_element().unwrap();
        let second = first.children[0].as_element().unwrap();
        assert_eq!(second.children.len(), 3);
        assert_eq!(second.children[2].text_value(), Some("deep"));
    }

    #[test]
    fn test_unclosed_elements_closed_at_end() {
        let root = raw("<div><p>open");
        let div = root.children[0].as_element().unwrap();
        let p = div.children[0].as_element().unwrap();
        assert_eq!(p.children[0].text_value(), Some("open"));
    }

    #[test]
    fn test_unwrap_root() {
        assert_eq!(unwrap_root(raw("<p>x</p>")).tag_name(), Some("p"));
        assert_eq!(unwrap_root(raw("<p>x</p><p>y</p>")).tag_name(), Some("root"));
        assert_eq!(unwrap_root(raw("")).tag_name(), Some("root"));
    }

    #[test]
    fn test_extract_metadata() {
        let html = r#"<html><head><title> Page </title>
            <meta name="description" content="About things">
            <meta name="keywords" content="a, b"></head><body></body></html>"#;
        let meta = extract_metadata(html);
        assert_eq!(meta.title.as_deref(), Some("Page"));
        assert_eq!(meta.description.as_deref(), Some("About things"));
        assert_eq!(meta.keywords.as_deref(), Some("a, b"));
        assert!(extract_metadata("<p>x</p>").is_empty());
    }
}
