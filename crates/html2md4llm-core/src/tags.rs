//! Tag tables shared by the tree builder, the normalizer and the generator.

/// Elements rendered as inline runs
pub const INLINE_ELEMENTS: &[&str] = &["span", "a", "strong", "em", "code", "b", "i"];

/// Elements that start a new block of output
pub const BLOCK_ELEMENTS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "pre", "br", "div", "section", "table",
];

/// Elements with their own rendering rule. Any other element holding a
/// single child renders as that child.
pub const RENDERED_ELEMENTS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "pre", "br", "strong", "b", "em", "i",
    "code", "a",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "br", "hr", "img", "input", "meta", "link", "source", "area", "base", "col", "embed", "param",
    "track", "wbr",
];

/// Void elements that survive pruning without children
pub const KEPT_VOID_ELEMENTS: &[&str] = &["br", "hr", "img"];

/// Wrapper elements collapsed when they hold a single child
pub const FLATTENABLE_ELEMENTS: &[&str] = &["div", "span", "section", "p"];

/// Table structure kept even when empty
pub const TABLE_ELEMENTS: &[&str] = &["table", "thead", "tbody", "tfoot", "tr", "th", "td"];

pub fn is_inline_tag(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag)
}

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

pub fn is_rendered_tag(tag: &str) -> bool {
    RENDERED_ELEMENTS.contains(&tag)
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_kept_void(tag: &str) -> bool {
    KEPT_VOID_ELEMENTS.contains(&tag)
}

pub fn is_flattenable(tag: &str) -> bool {
    FLATTENABLE_ELEMENTS.contains(&tag)
}

pub fn is_table_structure(tag: &str) -> bool {
    TABLE_ELEMENTS.contains(&tag)
}

/// Heading level for `h1`..`h6`
pub fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
