//! Extraction strategies that narrow a normalized tree to its main content.

use tracing::debug;

use html2md4llm_core::{Element, Node};

use crate::options::Strategy;

/// Apply an extraction strategy to a normalized tree
pub fn extract(root: Node, strategy: Strategy) -> Node {
    let extracted = match strategy {
        Strategy::List => largest_list(&root).clone(),
        Strategy::Article => article(&root),
    };
    debug!(?strategy, root = extracted.tag_name().unwrap_or("#text"), "extracted content");
    extracted
}

/// The `ul`/`ol` with the most direct `li` children, or `root` when no list
/// has any.
///
/// Lists are visited in document order and ties keep the first one found.
pub fn largest_list(root: &Node) -> &Node {
    let mut best: Option<(&Node, usize)> = None;
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        let Node::Element(element) = node else {
            continue;
        };

        if element.tag == "ul" || element.tag == "ol" {
            let items = element.element_children().filter(|e| e.tag == "li").count();
            if items > best.map_or(0, |(_, count)| count) {
                best = Some((node, items));
            }
        }

        pending.extend(element.children.iter().rev());
    }

    best.map_or(root, |(list, _)| list)
}

/// Rebuild the tree keeping only branches that lead to non-blank text
pub fn article(node: &Node) -> Node {
    match node {
        Node::Text(_) => node.clone(),
        Node::Element(element) => Node::Element(Element {
            tag: element.tag.clone(),
            attributes: element.attributes.clone(),
            children: element
                .children
                .iter()
                .filter(|child| child.has_text())
                .map(article)
                .collect(),
            flattened_tags: element.flattened_tags.clone(),
            flattened_classes: element.flattened_classes.clone(),
        }),
    }
}
