//! # Scholar Scout
//!
//! Search arXiv for papers matching a natural-language research interest
//! and extract researcher contact details from the first page of paper
//! PDFs.
//!
//! ## Architecture
//!
//! Two decoupled pipelines that share only the optional language-model
//! assistant:
//!
//! - [`query`] + [`sources`]: requirement text → fielded boolean search
//!   expression → paper records. Synthesis uses the assistant when one is
//!   configured and a deterministic keyword rule engine otherwise.
//! - [`pdf`] + [`extract`] + [`enrich`]: PDF URL → first-page text →
//!   best-effort researcher roster → optional profile enrichment.
//!
//! Supporting modules:
//!
//! - [`models`]: Core data structures (PaperRecord, ResearcherRecord, ...)
//! - [`llm`]: The assistant collaborator trait and its Ollama backend
//! - [`pipeline`]: Request-scoped orchestration used by the CLI and server
//! - [`server`]: axum web surface (search form + JSON contacts endpoint)
//! - [`config`]: Configuration resolved once at process start
//! - [`utils`]: HTTP client and retry helpers

pub mod config;
pub mod enrich;
pub mod extract;
pub mod llm;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod query;
pub mod server;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{PaperRecord, ResearcherRecord};
pub use pipeline::{ContactPipeline, ContactReport, SearchPipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
