//! Markdown generation from a normalized document tree.
//!
//! Children of an element are rendered in order and joined with a
//! separator picked from the kind of the two neighbours:
//!
//! | left   | right  | separator |
//! |--------|--------|-----------|
//! | inline | inline | `" "`     |
//! | block  | block  | `"\n\n"`  |
//! | block  | any    | `"\n"`    |
//! | any    | block  | `"\n"`    |
//! | other  | other  | nothing   |
//!
//! `br` is neither inline nor block: it renders as a bare newline.

use crate::node::{Element, Node};
use crate::table::render_table;
use crate::tags;

/// Render a tree as Markdown
pub fn generate(node: &Node) -> String {
    generate_indented(node, 0)
}

/// Render a tree as Markdown with the given list indent
pub fn generate_indented(node: &Node, indent: usize) -> String {
    match node {
        Node::Text(text) => text.text.clone(),
        Node::Element(element) => render_element(element, indent),
    }
}

pub(crate) fn render_element(element: &Element, indent: usize) -> String {
    let tag = element.tag.as_str();

    if tag == "table" {
        return render_table(element, indent);
    }

    if element.children.len() == 1 && !tags::is_rendered_tag(tag) {
        return generate_indented(&element.children[0], indent);
    }

    match tag {
        "ul" | "ol" => return render_list(element, indent),
        "a" => return render_link(element),
        "img" => return render_image(element),
        "br" => return "\n".to_string(),
        _ => {}
    }

    let content = render_children(&element.children, indent);

    if let Some(level) = tags::heading_level(tag) {
        return format!("{} {}", "#".repeat(level), content);
    }

    match tag {
        "strong" | "b" => format!("**{content}**"),
        "em" | "i" => format!("*{content}*"),
        "code" => format!("`{content}`"),
        "pre" => format!("```\n{content}\n```"),
        _ => content,
    }
}

/// Whether a node joins its neighbours as an inline run
pub fn is_inline(node: &Node) -> bool {
    match node {
        Node::Element(element) => element.tag != "br" && tags::is_inline_tag(&element.tag),
        Node::Text(text) => match text.flattened_tags.as_deref() {
            Some(flattened) if !flattened.is_empty() => {
                flattened.iter().all(|t| tags::is_inline_tag(t))
            }
            _ => false,
        },
    }
}

/// Whether a node starts a block of its own.
///
/// A collapsed wrapper chain takes precedence over the node's own tag.
pub fn is_block(node: &Node) -> bool {
    if node.tag_name() == Some("br") {
        return false;
    }
    if let Some(flattened) = node.flattened_tags().filter(|t| !t.is_empty()) {
        return flattened.iter().any(|t| tags::is_block_tag(t));
    }
    match node {
        Node::Element(element) => tags::is_block_tag(&element.tag),
        Node::Text(_) => false,
    }
}

fn separator(left: &Node, right: &Node) -> &'static str {
    let left_block = is_block(left);
    let right_block = is_block(right);

    if is_inline(left) && is_inline(right) {
        " "
    } else if left_block && right_block {
        "\n\n"
    } else if left_block || right_block {
        "\n"
    } else {
        ""
    }
}

/// Render children in order, separating neighbours that both produced output
pub(crate) fn render_children(children: &[Node], indent: usize) -> String {
    let rendered: Vec<String> = children
        .iter()
        .map(|child| generate_indented(child, indent))
        .collect();

    let mut out = String::new();
    for (i, text) in rendered.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        out.push_str(text);

        if let Some(next) = rendered.get(i + 1) {
            if !next.is_empty() {
                out.push_str(separator(&children[i], &children[i + 1]));
            }
        }
    }
    out
}

fn render_list(list: &Element, indent: usize) -> String {
    let ordered = list.tag == "ol";
    let prefix = " ".repeat(indent);
    let mut out = String::new();

    // Numbering follows the child position, so non-`li` children still
    // consume a number.
    for (i, child) in list.children.iter().enumerate() {
        let Some(item) = child.as_element().filter(|e| e.tag == "li") else {
            continue;
        };

        out.push_str(&prefix);
        if ordered {
            out.push_str(&(i + 1).to_string());
            out.push('.');
        } else {
            out.push('-');
        }
        out.push(' ');
        for part in &item.children {
            out.push_str(&generate_indented(part, indent + 2));
        }
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    out
}

fn render_link(link: &Element) -> String {
    let mut texts = Vec::new();
    for child in &link.children {
        collect_link_text(child, &mut texts);
    }
    format!("[{}]({})", texts.join(", "), link.attr("href").unwrap_or(""))
}

fn collect_link_text<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Text(text) => {
            let trimmed = text.text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed);
            }
        }
        Node::Element(element) => {
            for child in &element.children {
                collect_link_text(child, out);
            }
        }
    }
}

fn render_image(image: &Element) -> String {
    format!(
        "![{}]({})",
        image.attr("alt").unwrap_or(""),
        image.attr("src").unwrap_or("")
    )
}
