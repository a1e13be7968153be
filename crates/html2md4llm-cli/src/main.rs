//! CLI binary for html2md4llm.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConvertOptions` and writes the result.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use html2md4llm::{
    convert_bytes, extract_metadata, parse_attribute_list, ConvertOptions, Metadata, OutputFormat,
    Strategy, DEFAULT_MAX_DEPTH,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a saved page to Markdown
  html2md4llm page.html -o page.md

  # Read from stdin, keep only the biggest list
  curl -s https://example.com | html2md4llm --strategy list

  # JSON tree without ARIA attributes or roles
  html2md4llm page.html --json -r "aria-*,role"

ENVIRONMENT VARIABLES:
  RUST_LOG                   Log filter, overrides -v
  HTML2MD4LLM_FORMAT         Default output format
  HTML2MD4LLM_STRATEGY       Default extraction strategy
  HTML2MD4LLM_REMOVE_ATTRS   Default attribute removals

NOTES:
  -v turns on debug logging; use -V or --version for the version.
"#;

/// Convert HTML to Markdown or a JSON tree for LLM input.
#[derive(Parser, Debug)]
#[command(
    name = "html2md4llm",
    version,
    about = "Convert HTML to Markdown or a JSON tree for LLM input",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file to read; `-` or nothing reads stdin.
    input: Option<PathBuf>,

    /// File to write; stdout when omitted.
    #[arg(value_name = "OUTPUT")]
    output_path: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long, conflicts_with = "output_path")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, env = "HTML2MD4LLM_FORMAT", value_enum, default_value = "markdown")]
    format: FormatArg,

    /// Shorthand for `--format json`.
    #[arg(long, overrides_with = "markdown")]
    json: bool,

    /// Shorthand for `--format markdown`; the later of `--json` and `--markdown` wins.
    #[arg(long, overrides_with = "json")]
    markdown: bool,

    /// Extraction strategy applied before output.
    #[arg(short, long, env = "HTML2MD4LLM_STRATEGY", value_enum)]
    strategy: Option<StrategyArg>,

    /// Comma-separated attribute names to drop; `prefix-*` drops by prefix.
    #[arg(short = 'r', long = "remove-attrs", env = "HTML2MD4LLM_REMOVE_ATTRS")]
    remove_attrs: Vec<String>,

    /// Maximum element nesting kept by the parser.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Prepend YAML front-matter with the page title, description and keywords.
    #[arg(long)]
    metadata: bool,

    /// Enable DEBUG-level tracing logs (`-V` prints the version).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    List,
    Article,
}

impl From<StrategyArg> for Strategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::List => Strategy::List,
            StrategyArg::Article => Strategy::Article,
        }
    }
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        let output_format = if self.json {
            OutputFormat::Json
        } else if self.markdown {
            OutputFormat::Markdown
        } else {
            self.format.into()
        };

        ConvertOptions {
            output_format,
            strategy: self.strategy.map(Strategy::from),
            remove_attributes: self
                .remove_attrs
                .iter()
                .flat_map(|list| parse_attribute_list(list))
                .collect(),
            max_depth: self.max_depth,
        }
    }

    fn output_path(&self) -> Option<&PathBuf> {
        self.output.as_ref().or(self.output_path.as_ref())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("html2md4llm: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options();
    if cli.metadata && options.output_format == OutputFormat::Json {
        bail!("--metadata only applies to markdown output");
    }
    debug!(?options, "parsed command line");

    let input = read_input(cli.input.as_ref())?;
    let mut output = convert_bytes(&input, &options)?;

    if cli.metadata {
        let html = String::from_utf8_lossy(&input);
        output = front_matter(&extract_metadata(&html)) + &output;
    }

    match cli.output_path() {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("Failed to write output: {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if stdout.is_terminal() {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            fs::read(path).with_context(|| format!("Failed to read input: {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// YAML front-matter block, empty when the page has no metadata
fn front_matter(meta: &Metadata) -> String {
    if meta.is_empty() {
        return String::new();
    }

    let mut out = String::from("---\n");
    for (key, value) in [
        ("title", &meta.title),
        ("description", &meta.description),
        ("keywords", &meta.keywords),
    ] {
        if let Some(value) = value {
            // A JSON string is a valid YAML scalar
            let quoted = serde_json::to_string(value).unwrap_or_default();
            out.push_str(&format!("{key}: {quoted}\n"));
        }
    }
    out.push_str("---\n\n");
    out
}
