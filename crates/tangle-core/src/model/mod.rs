//! Analysis result data structures
//!
//! Scope records with location and complexity spans, the type table built
//! during type discovery, and the dependency table built during dependency
//! discovery.

use indexmap::IndexMap;
use serde::Serialize;

/// Kind of a discovered lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Namespace,
    Class,
    Interface,
    Struct,
    Delegate,
    Function,
    Control,
}

impl ScopeKind {
    pub fn from_token(tok: &str) -> Option<Self> {
        match tok {
            "namespace" => Some(Self::Namespace),
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "delegate" => Some(Self::Delegate),
            "function" => Some(Self::Function),
            "control" => Some(Self::Control),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Delegate => "delegate",
            Self::Function => "function",
            Self::Control => "control",
        }
    }

    /// Kinds recorded in the type table during type discovery.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Struct | Self::Delegate
        )
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered lexical scope. The end fields stay unset until the
/// matching scope exit is seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeRecord {
    pub kind: ScopeKind,
    pub name: String,
    pub file: String,
    pub namespace: String,
    pub begin_line: usize,
    pub end_line: Option<usize>,
    pub begin_scope: usize,
    pub end_scope: Option<usize>,
}

impl ScopeRecord {
    pub fn is_closed(&self) -> bool {
        self.end_line.is_some()
    }

    /// Lines spanned, once closed.
    pub fn size(&self) -> Option<usize> {
        self.end_line.map(|end| end - self.begin_line + 1)
    }

    /// Scopes entered between open and close, plus the scope itself.
    pub fn complexity(&self) -> Option<usize> {
        self.end_scope.map(|end| end - self.begin_scope + 1)
    }
}

/// Where a type was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeLocation {
    pub file: String,
    pub namespace: String,
}

/// Type name to declaring locations. A name may map to several locations
/// (partial, overloaded, or duplicate definitions); lookups tolerate this.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct TypeTable {
    entries: IndexMap<String, Vec<TypeLocation>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, location: TypeLocation) {
        self.entries.entry(name.into()).or_default().push(location);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn locations(&self, name: &str) -> &[TypeLocation] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves the declaring file for a referenced type: a
    /// namespace-qualified match wins, otherwise the first recorded
    /// location stands in.
    pub fn declaring_file(&self, name: &str, namespace: &str) -> Option<&str> {
        let locations = self.entries.get(name)?;
        locations
            .iter()
            .find(|loc| loc.namespace == namespace)
            .or_else(|| locations.first())
            .map(|loc| loc.file.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TypeLocation])> {
        self.entries
            .iter()
            .map(|(name, locs)| (name.as_str(), locs.as_slice()))
    }
}

/// File to the distinct files it depends on, in discovery order. Every
/// analyzed file is registered as a key even with no dependencies.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DependencyTable {
    entries: IndexMap<String, Vec<String>>,
}

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file as a graph node, with no dependencies yet.
    pub fn add_parent(&mut self, parent: impl Into<String>) {
        self.entries.entry(parent.into()).or_default();
    }

    /// Records that `parent` depends on `child`. Self-dependencies and
    /// duplicates are suppressed.
    pub fn add(&mut self, parent: &str, child: &str) {
        if parent == child {
            return;
        }
        let children = self.entries.entry(parent.to_string()).or_default();
        if !children.iter().any(|c| c == child) {
            children.push(child.to_string());
        }
    }

    pub fn contains_parent(&self, parent: &str) -> bool {
        self.entries.contains_key(parent)
    }

    pub fn children(&self, parent: &str) -> &[String] {
        self.entries.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(parent, children)| (parent.as_str(), children.as_slice()))
    }
}
