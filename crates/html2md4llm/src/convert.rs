//! Conversion entry points.

use tracing::debug;

use html2md4llm_core::{generate, Node};

use crate::extract::extract;
use crate::html::parse_html_bounded;
use crate::options::{ConvertOptions, OutputFormat};
use crate::{Html2MdError, Result};

/// Reusable converter holding a set of options
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    /// Convert an HTML string to Markdown or a JSON tree
    pub fn convert(&self, html: &str) -> Result<String> {
        convert(html, &self.options)
    }

    pub fn convert_bytes(&self, input: &[u8]) -> Result<String> {
        convert_bytes(input, &self.options)
    }
}

/// Convert an HTML string according to `options`.
///
/// Options are validated before any parsing happens. Malformed markup never
/// fails.
///
/// # Example
///
/// ```rust
/// use html2md4llm::{convert, ConvertOptions};
///
/// let markdown = convert("<h1>A</h1><p>B</p>", &ConvertOptions::default()).unwrap();
/// assert_eq!(markdown, "# A\n\nB");
/// ```
pub fn convert(html: &str, options: &ConvertOptions) -> Result<String> {
    options.validate()?;
    debug!(
        input_len = html.len(),
        format = %options.output_format,
        strategy = ?options.strategy,
        "converting html"
    );

    let tree = parse_html_bounded(html, &options.remove_attributes, options.max_depth);
    convert_tree(tree, options)
}

/// Convert raw bytes, which must be UTF-8 encoded HTML
pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> Result<String> {
    let html = std::str::from_utf8(input)
        .map_err(|e| Html2MdError::InvalidInput(format!("HTML input must be UTF-8 text: {e}")))?;
    convert(html, options)
}

/// Apply extraction and produce output for an already parsed tree
pub fn convert_tree(tree: Node, options: &ConvertOptions) -> Result<String> {
    let tree = match options.strategy {
        Some(strategy) => extract(tree, strategy),
        None => tree,
    };

    let output = match options.output_format {
        OutputFormat::Markdown => generate(&tree),
        OutputFormat::Json => to_json(&tree)?,
    };
    debug!(output_len = output.len(), "conversion finished");
    Ok(output)
}

/// Serialize a tree as pretty-printed JSON
pub fn to_json(tree: &Node) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Strategy;

    #[test]
    fn test_convert_markdown() {
        let out = convert("<strong>A</strong><em>B</em>", &ConvertOptions::default()).unwrap();
        assert_eq!(out, "**A** *B*");
    }

    #[test]
    fn test_convert_rejects_zero_depth() {
        let options = ConvertOptions::default().with_max_depth(0);
        assert!(matches!(
            convert("<p>x</p>", &options),
            Err(Html2MdError::InvalidOption { option: "maxDepth", .. })
        ));
    }

    #[test]
    fn test_convert_bytes_invalid_utf8() {
        let err = convert_bytes(&[0x3c, 0x70, 0xff, 0xfe], &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, Html2MdError::InvalidInput(_)));
    }

    #[test]
    fn test_convert_bytes() {
        let out = convert_bytes("<h2>Ünïcode</h2>".as_bytes(), &ConvertOptions::default()).unwrap();
        assert_eq!(out, "## Ünïcode");
    }

    #[test]
    fn test_json_output() {
        let options = ConvertOptions::default().with_format(OutputFormat::Json);
        let out = convert("<p>中文</p>", &options).unwrap();
        assert_eq!(
            out,
            "{\n  \"type\": \"text\",\n  \"text\": \"中文\",\n  \"flattenedTags\": [\n    \"p\"\n  ],\n  \"flattenedClasses\": []\n}"
        );
    }

    #[test]
    fn test_converter_with_strategy() {
        let converter = Converter::with_options(ConvertOptions::default().with_strategy(Strategy::List));
        let out = converter
            .convert("<p>intro</p><ul><li>a</li></ul><ol><li>1</li><li>2</li></ol>")
            .unwrap();
        assert_eq!(out, "1. 1\n2. 2");
    }

    #[test]
    fn test_converter_options_mut() {
        let mut converter = Converter::new();
        converter.options_mut().output_format = OutputFormat::Json;
        assert_eq!(converter.options().output_format, OutputFormat::Json);
    }
}
