//! Shared types, error model, and configuration for qnatsv.
//!
//! This crate is the foundation depended on by the core and CLI crates.
//! It provides:
//! - [`QnaTsvError`], the unified error type
//! - The source model ([`QnaExport`], [`SourceDocument`], [`DocumentContext`])
//!   and the flat [`OutputRow`]
//! - Configuration ([`ConverterConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{ConverterConfig, SettingsConfig, load_config, load_config_from};
pub use error::{QnaTsvError, Result};
pub use types::{
    DEFAULT_ANSWER, DEFAULT_ID, DEFAULT_IS_CONTEXT_ONLY, DEFAULT_QUESTION, DEFAULT_SOURCE,
    DocumentContext, DocumentId, OutputRow, QnaExport, SUGGESTED_QUESTIONS, SourceDocument,
    bool_text,
};
