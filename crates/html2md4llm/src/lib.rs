//! html2md4llm - HTML to Markdown for LLM pipelines
//!
//! Converts HTML fragments into compact Markdown, or into a JSON tree,
//! after stripping scripts, hidden elements and wrapper noise.
//!
//! # Pipeline
//!
//! ```text
//! HTML ─▶ pre-clean ─▶ tree builder ─▶ normalize ─▶ [extract] ─▶ Markdown | JSON
//! ```
//!
//! # Example
//!
//! ```rust
//! use html2md4llm::{convert, ConvertOptions, Strategy};
//!
//! let html = "<ul><li>a</li></ul><ol><li>x</li><li>y</li></ol>";
//! let options = ConvertOptions::default().with_strategy(Strategy::List);
//! assert_eq!(convert(html, &options).unwrap(), "1. x\n2. y");
//! ```

mod convert;
pub mod entities;
pub mod extract;
mod html;
pub mod normalize;
mod options;

pub use convert::{convert, convert_bytes, convert_tree, to_json, Converter};
pub use html::{
    build_tree, extract_metadata, parse_html, pre_clean, unwrap_root, AttributeFilter, Metadata,
    DEFAULT_REMOVED_ATTRIBUTES,
};
pub use html2md4llm_core::{generate, Element, Node, Text};
pub use options::{parse_attribute_list, ConvertOptions, OutputFormat, Strategy, DEFAULT_MAX_DEPTH};

/// Error type for conversions
#[derive(Debug, thiserror::Error)]
pub enum Html2MdError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{option} must be {expected}, got '{value}'")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Html2MdError {
    pub(crate) fn invalid_option(option: &'static str, value: &str, expected: &'static str) -> Self {
        Html2MdError::InvalidOption {
            option,
            value: value.to_string(),
            expected,
        }
    }
}

/// Result type for conversions
pub type Result<T> = std::result::Result<T, Html2MdError>;
