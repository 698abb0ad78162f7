//! tangle-core - type-based dependency analysis for C#-style sources
//!
//! The pipeline: a character-level [`lexer`] feeds a [`semi`]-expression
//! builder, whose statement units run through the [`rules`] grammar engine
//! to populate shared [`context`] state: a type table in pass one, a
//! dependency table in pass two. The [`graph`] module decomposes the
//! resulting dependency graph into strongly connected components, and
//! [`analysis`] orchestrates the whole batch.

pub mod analysis;
pub mod config;
pub mod context;
pub mod graph;
pub mod lexer;
pub mod model;
pub mod rules;
pub mod semi;

pub use analysis::{AnalysisReport, Analyzer};
pub use config::Config;
pub use context::AnalysisContext;
pub use lexer::{LexError, Token, Tokenizer};
pub use model::{DependencyTable, ScopeKind, ScopeRecord, TypeTable};
pub use semi::{SemiBuilder, SemiExpr};
