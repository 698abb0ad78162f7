//! Shared analysis state
//!
//! One [`AnalysisContext`] is created per batch run and passed by mutable
//! reference into every rule test and action. It carries the state the two
//! passes accumulate: the scope stack and location list of the file being
//! analyzed, and the type and dependency tables spanning the whole batch.

use std::collections::HashSet;

use crate::model::{DependencyTable, ScopeRecord, TypeTable};

/// Modifier, qualifier, and well-known-type tokens stripped from candidate
/// declarations before the `type name ;` shape test.
#[derive(Debug, Clone)]
pub struct QualifierSet {
    tokens: HashSet<&'static str>,
}

impl Default for QualifierSet {
    fn default() -> Self {
        let tokens = [
            "public", "protected", "private", "internal", "abstract", "async", "const", "event",
            "extern", "new", "override", "partial", "readonly", "sealed", "static", "unsafe",
            "virtual", "volatile", "return", "++", "--", "bool", "int", "string", "double", "List",
            "Dictionary", "Action", "Func",
        ]
        .into_iter()
        .collect();
        Self { tokens }
    }
}

impl QualifierSet {
    pub fn contains(&self, tok: &str) -> bool {
        self.tokens.contains(tok)
    }

    pub fn insert(&mut self, tok: &'static str) {
        self.tokens.insert(tok);
    }
}

/// Mutable state threaded through the grammar engine for one batch run.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    pub current_file: String,
    pub current_namespace: String,
    /// Line the in-flight semi-expression ended on; the driver refreshes it
    /// before each parse dispatch.
    pub current_line: usize,
    /// Monotone count of scopes entered in the current file.
    pub scope_count: usize,
    /// Scope pushes fired for the statement being parsed. The engine resets
    /// this per statement; a statement's brace contributes one stack entry
    /// no matter how many detectors claim it, while every push still deepens
    /// `scope_count`.
    pub statement_pushes: usize,
    pub stack: Vec<ScopeRecord>,
    pub locations: Vec<ScopeRecord>,
    pub qualifiers: QualifierSet,
    pub types: TypeTable,
    pub dependencies: DependencyTable,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the file-scoped state before analyzing `file`. Batch-wide
    /// tables are untouched.
    pub fn begin_file(&mut self, file: &str) {
        self.current_file = file.to_string();
        self.current_namespace.clear();
        self.current_line = 0;
        self.scope_count = 0;
        self.stack.clear();
    }

    /// Drains the per-file location list, leaving it empty for the next
    /// file.
    pub fn take_locations(&mut self) -> Vec<ScopeRecord> {
        std::mem::take(&mut self.locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScopeKind, TypeLocation};

    #[test]
    fn qualifier_set_contains_modifiers_and_known_types() {
        let quals = QualifierSet::default();
        assert!(quals.contains("public"));
        assert!(quals.contains("readonly"));
        assert!(quals.contains("++"));
        assert!(quals.contains("List"));
        assert!(!quals.contains("Widget"));
    }

    #[test]
    fn qualifier_set_accepts_additions() {
        let mut quals = QualifierSet::default();
        quals.insert("Span");
        assert!(quals.contains("Span"));
    }

    #[test]
    fn begin_file_resets_file_scoped_state_only() {
        let mut ctx = AnalysisContext::new();
        ctx.types.add(
            "Widget",
            TypeLocation {
                file: "w.cs".into(),
                namespace: "N".into(),
            },
        );
        ctx.current_namespace = "Old".into();
        ctx.scope_count = 7;
        ctx.stack.push(ScopeRecord {
            kind: ScopeKind::Class,
            name: "X".into(),
            file: "old.cs".into(),
            namespace: "Old".into(),
            begin_line: 1,
            end_line: None,
            begin_scope: 1,
            end_scope: None,
        });

        ctx.begin_file("new.cs");

        assert_eq!(ctx.current_file, "new.cs");
        assert!(ctx.current_namespace.is_empty());
        assert_eq!(ctx.scope_count, 0);
        assert!(ctx.stack.is_empty());
        assert!(ctx.types.contains("Widget"), "batch tables must survive");
    }

    #[test]
    fn take_locations_drains_the_list() {
        let mut ctx = AnalysisContext::new();
        ctx.locations.push(ScopeRecord {
            kind: ScopeKind::Namespace,
            name: "N".into(),
            file: "a.cs".into(),
            namespace: String::new(),
            begin_line: 1,
            end_line: None,
            begin_scope: 1,
            end_scope: None,
        });

        let taken = ctx.take_locations();
        assert_eq!(taken.len(), 1);
        assert!(ctx.locations.is_empty());
    }
}
