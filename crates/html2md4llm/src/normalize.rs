//! Tree normalization passes.
//!
//! Runs three passes in order over a freshly built tree:
//!
//! 1. collapse `pre`/`code` subtrees into one text node
//! 2. drop hidden, decorative and empty elements
//! 3. collapse single-child wrapper chains, keeping the wrapper tags and
//!    classes on the surviving node
//!
//! Running the passes again on their own output changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use html2md4llm_core::{tags, Element, Node};

static RE_DISPLAY_NONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)display\s*:\s*none").unwrap());

/// Run every normalization pass on `root` and its descendants
pub fn normalize(root: &mut Element) {
    flatten_pre_code(root);
    remove_unwanted(root);
    flatten_containers(root);
    debug!(top_level = root.children.len(), "normalized tree");
}

/// Normalize a tree held as a [`Node`]; text nodes are left alone
pub fn normalize_node(node: &mut Node) {
    if let Node::Element(element) = node {
        normalize(element);
    }
}

/// Replace the content of every `pre` and `code` element with its text
fn flatten_pre_code(element: &mut Element) {
    if element.tag == "pre" || element.tag == "code" {
        let content: String = element.children.iter().map(Node::text_content).collect();
        element.children = vec![Node::text(&content)];
        return;
    }

    for child in &mut element.children {
        if let Node::Element(child) = child {
            flatten_pre_code(child);
        }
    }
}

fn remove_unwanted(element: &mut Element) {
    element.children.retain_mut(|child| match child {
        Node::Text(_) => true,
        Node::Element(child) => keep_element(child),
    });
}

fn keep_element(element: &mut Element) -> bool {
    if is_hidden(element) {
        return false;
    }

    match element.tag.as_str() {
        "img" if !element.has_attr("src") => return false,
        "a" if element
            .attr("href")
            .is_some_and(|href| href.starts_with("javascript:")) =>
        {
            return false
        }
        "meta" => return matches!(element.attr("name"), Some("description" | "keywords")),
        tag if tags::is_kept_void(tag) => return true,
        _ => {}
    }

    remove_unwanted(element);
    element.attributes.shift_remove("style");

    tags::is_table_structure(&element.tag) || !element.children.is_empty()
}

fn is_hidden(element: &Element) -> bool {
    if element
        .attr("style")
        .is_some_and(|style| RE_DISPLAY_NONE.is_match(style))
    {
        return true;
    }
    if element.attr("aria-hidden") == Some("true") || element.attr("tabindex") == Some("-1") {
        return true;
    }
    if element.has_attr("hidden") {
        return true;
    }
    matches!(element.attr("role"), Some("presentation" | "none"))
}

fn flatten_containers(element: &mut Element) {
    let children = std::mem::take(&mut element.children);
    element.children = children.into_iter().map(collapse_wrappers).collect();
}

/// Walk down a chain of single-child wrappers and return the node it ends on
fn collapse_wrappers(mut node: Node) -> Node {
    let mut wrapper_tags = Vec::new();
    let mut wrapper_classes = Vec::new();

    loop {
        let Node::Element(wrapper) = &mut node else {
            break;
        };
        if !tags::is_flattenable(&wrapper.tag) || wrapper.children.len() != 1 {
            break;
        }
        let Some(inner) = wrapper.children.pop() else {
            break;
        };

        if let Some(class) = wrapper.attr("class").filter(|c| !c.is_empty()) {
            wrapper_classes.push(class.to_string());
        }
        wrapper_tags.push(std::mem::take(&mut wrapper.tag));
        node = inner;
    }

    if !wrapper_tags.is_empty() {
        node.set_flattened(wrapper_tags, wrapper_classes);
    }
    if let Node::Element(terminal) = &mut node {
        flatten_containers(terminal);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{build_tree, unwrap_root, AttributeFilter};
    use crate::options::DEFAULT_MAX_DEPTH;

    fn parse(html: &str) -> Node {
        let mut root = build_tree(html, &AttributeFilter::default(), DEFAULT_MAX_DEPTH);
        normalize(&mut root);
        unwrap_root(root)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_flatten_wrapper_chain_to_text() {
        let tree = parse("<div><span>text</span></div>");
        assert_eq!(tree.text_value(), Some("text"));
        assert_eq!(tree.flattened_tags().unwrap(), strings(&["div", "span"]));
        assert_eq!(tree.flattened_classes().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_flatten_keeps_terminal_element() {
        let tree = parse("<div><span><strong>bold</strong></span></div>");
        assert_eq!(tree.tag_name(), Some("strong"));
        assert_eq!(tree.flattened_tags().unwrap(), strings(&["div", "span"]));
        assert_eq!(tree.children()[0].text_value(), Some("bold"));
    }

    #[test]
    fn test_flatten_collects_classes() {
        let tree = parse(r#"<div class="outer"><p class="">x</p></div>"#);
        assert_eq!(tree.flattened_tags().unwrap(), strings(&["div", "p"]));
        assert_eq!(tree.flattened_classes().unwrap(), strings(&["outer"]));
    }

    #[test]
    fn test_non_wrapper_stops_flattening() {
        let tree = parse("<article><div>text</div></article>");
        assert_eq!(tree.tag_name(), Some("article"));
        assert!(tree.flattened_tags().is_none());
        let child = &tree.children()[0];
        assert_eq!(child.text_value(), Some("text"));
        assert_eq!(child.flattened_tags().unwrap(), strings(&["div"]));
    }

    #[test]
    fn test_multi_child_wrapper_kept() {
        let tree = parse("<div><p>a</p><p>b</p></div>");
        assert_eq!(tree.tag_name(), Some("div"));
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].flattened_tags().unwrap(), strings(&["p"]));
    }

    #[test]
    fn test_pre_code_flattened() {
        let tree = parse("<pre><code><span>let</span> <b>x</b></code></pre>");
        let pre = tree.as_element().unwrap();
        assert_eq!(pre.children.len(), 1);
        assert_eq!(pre.children[0].text_value(), Some("letx"));
    }

    #[test]
    fn test_code_with_only_br_keeps_empty_text() {
        let tree = parse("<p>a<code><br></code></p>");
        let code = &tree.children()[1];
        assert_eq!(code.tag_name(), Some("code"));
        assert_eq!(code.children()[0].text_value(), Some(""));
    }

    #[test]
    fn test_hidden_elements_removed() {
        let html = r#"<div>
            <p style="DISPLAY : None">a</p>
            <p aria-hidden="true">b</p>
            <p tabindex="-1">c</p>
            <p hidden="">d</p>
            <p role="presentation">e</p>
            <p role="none">f</p>
            <p>kept</p>
            <p aria-hidden="false">also kept</p>
        </div>"#;
        let tree = parse(html);
        let texts: Vec<_> = tree.children().iter().map(|c| c.text_value().unwrap()).collect();
        assert_eq!(texts, ["kept", "also kept"]);
    }

    #[test]
    fn test_img_rules() {
        let tree = parse(r#"<p>pic<img alt="none"><img src="a.png"></p>"#);
        let p = tree.as_element().unwrap();
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[1].attr("src"), Some("a.png"));
    }

    #[test]
    fn test_javascript_links_removed() {
        let tree = parse(r#"<p>see <a href="javascript:void(0)">x</a><a href="/ok">y</a></p>"#);
        let p = tree.as_element().unwrap();
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[1].attr("href"), Some("/ok"));
    }

    #[test]
    fn test_meta_filtering() {
        let tree = parse(
            r#"<head><meta name="description" content="d"><meta name="viewport" content="v"><meta name="keywords" content="k"><meta charset="utf-8"></head>"#,
        );
        let names: Vec<_> = tree.children().iter().map(|c| c.attr("name").unwrap()).collect();
        assert_eq!(names, ["description", "keywords"]);
    }

    #[test]
    fn test_empty_elements_removed() {
        let tree = parse("<p>x<strong> </strong><em><span></span></em><b><img></b></p>");
        assert_eq!(tree.text_value(), Some("x"));
        assert_eq!(tree.flattened_tags().unwrap(), strings(&["p"]));
    }

    #[test]
    fn test_table_structure_survives_empty() {
        let tree = parse("<table><tr><td></td><td>x</td></tr></table>");
        let table = tree.as_element().unwrap();
        let tr = table.children[0].as_element().unwrap();
        assert_eq!(tr.children.len(), 2);
        assert!(tr.children[0].children().is_empty());
    }

    #[test]
    fn test_style_dropped_after_filtering() {
        let tree = parse(r#"<p style="color:red">x<b style="x">y</b></p>"#);
        let p = tree.as_element().unwrap();
        assert!(!p.has_attr("style"));
        assert!(!p.children[1].as_element().unwrap().has_attr("style"));
    }

    #[test]
    fn test_picture_keeps_image() {
        let tree = parse(r#"<picture><source srcset="a.webp"><img src="c.gif"></picture>"#);
        let picture = tree.as_element().unwrap();
        assert_eq!(picture.tag, "picture");
        assert_eq!(picture.children.len(), 1);
        assert_eq!(picture.children[0].tag_name(), Some("img"));
    }

    #[test]
    fn test_normalize_idempotent() {
        let html = r#"<div class="a"><section><p>One <b>two</b></p></section>
            <ul><li><span>x</span></li><li hidden="">y</li></ul>
            <pre><code>z</code></pre><table><tr><th></th></tr></table></div>"#;
        let mut root = build_tree(html, &AttributeFilter::default(), DEFAULT_MAX_DEPTH);
        normalize(&mut root);
        let once = root.clone();
        normalize(&mut root);
        assert_eq!(root, once);
    }
}
