//! html2md4llm-core - document tree and Markdown generation
//!
//! This crate holds the tree that the `html2md4llm` parser produces and the
//! generator that turns it into Markdown. It does no HTML parsing itself.
//!
//! # Architecture
//!
//! ```text
//! HTML String ──parse + normalize──▶ ┌───────────────┐ ──generate──▶ Markdown String
//!                                    │ Document tree │
//!                                    └───────────────┘ ──serde─────▶ JSON tree
//! ```
//!
//! # Example
//!
//! ```rust
//! use html2md4llm_core::{generate, Node};
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! assert_eq!(generate(&h1), "# Hello World");
//! ```

mod generate;
mod node;
mod table;
pub mod tags;

pub use generate::{generate, generate_indented, is_block, is_inline};
pub use node::{Element, Node, Text};
