//! # Storage Module
//!
//! Persistence for categories, expenses, deposits and the settings singleton.
//!
//! The domain layer only sees the traits in [`traits`]; the concrete backend is
//! a document store that keeps one YAML document per record under a directory
//! per collection:
//!
//! ```text
//! data/
//! ├── categories/{id}.yaml
//! ├── expenses/{id}.yaml
//! ├── deposits/{id}.yaml
//! └── settings/default.yaml
//! ```
//!
//! Each document is written atomically (temp file + rename), so a single
//! record is never observed half-written. There are no multi-document
//! transactions; cross-collection checks such as category references are
//! advisory.

pub mod document;
pub mod traits;

pub use document::DocumentConnection;
pub use traits::*;
