//! Conversion options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::{Html2MdError, Result};

/// Default cap on open-element nesting in the tree builder
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Output representation of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum OutputFormat {
    #[default]
    Markdown,
    /// Pretty-printed JSON serialization of the tree
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Html2MdError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Html2MdError::invalid_option("outputFormat", s, "'markdown' or 'json'")),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = Html2MdError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content extraction applied before output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Keep only the list with the most items
    List,
    /// Keep only branches that contain text
    Article,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::List => "list",
            Strategy::Article => "article",
        }
    }
}

impl FromStr for Strategy {
    type Err = Html2MdError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(Strategy::List),
            "article" => Ok(Strategy::Article),
            _ => Err(Html2MdError::invalid_option("strategy", s, "'list' or 'article'")),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`convert`](crate::convert)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    pub output_format: OutputFormat,
    #[serde(deserialize_with = "deserialize_strategy")]
    pub strategy: Option<Strategy>,
    /// Extra attribute patterns to drop, merged into the default blacklist
    pub remove_attributes: Vec<String>,
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Markdown,
            strategy: None,
            remove_attributes: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a JSON object such as
    /// `{"outputFormat": "json", "strategy": "list", "removeAttributes": ["aria-*"]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ConvertOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Drop attributes matching `pattern`; a trailing `-*` matches by prefix
    pub fn remove_attribute(mut self, pattern: impl Into<String>) -> Self {
        self.remove_attributes.push(pattern.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Html2MdError::invalid_option(
                "maxDepth",
                &self.max_depth.to_string(),
                "a positive integer",
            ));
        }
        Ok(())
    }
}

/// Split a comma-separated attribute list such as `"aria-*, role"`
pub fn parse_attribute_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn deserialize_strategy<'de, D>(deserializer: D) -> std::result::Result<Option<Strategy>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
