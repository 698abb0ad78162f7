//! Analysis engine driving the two discovery passes
//!
//! Pass one runs the type-discovery rules over every candidate file to
//! populate the type table and per-file scope records. Pass two, with the
//! type table complete, runs the dependency-discovery rules to populate the
//! dependency table. The dependency graph is then built and decomposed into
//! strong components. The passes are strictly sequential and share one
//! mutable context; nothing here is safe to run concurrently.

use std::path::Path;

use regex::RegexSet;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::AnalysisContext;
use crate::graph::{Graph, Node, WalkOps};
use crate::lexer::{LexError, Tokenizer};
use crate::model::{DependencyTable, ScopeRecord, TypeTable};
use crate::rules::actions::{PopScope, PushScope, RecordDeclaration};
use crate::rules::declaration_rules::{BaseClassRule, DeclarationRule, ParamDeclarationRule};
use crate::rules::scope_rules::{
    AnonymousScopeRule, FunctionRule, LeavingScopeRule, NamespaceRule, TypeRule,
};
use crate::rules::{BoundRule, RuleSet};
use crate::semi::SemiBuilder;

/// The dependency graph carries no edge payload; the nodes and their
/// adjacency are the interesting part.
pub type DepGraph = Graph<()>;

/// Rule chain for pass one: namespaces, types, functions, anonymous scopes,
/// and scope exits, in that order.
pub fn type_discovery_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add(BoundRule::new(Box::new(NamespaceRule)).with_action(Box::new(PushScope)));
    rules.add(BoundRule::new(Box::new(TypeRule)).with_action(Box::new(PushScope)));
    rules.add(BoundRule::new(Box::new(FunctionRule)).with_action(Box::new(PushScope)));
    rules.add(BoundRule::new(Box::new(AnonymousScopeRule)).with_action(Box::new(PushScope)));
    rules.add(BoundRule::new(Box::new(LeavingScopeRule)).with_action(Box::new(PopScope)));
    rules
}

/// Rule chain for pass two: direct declarations, parameter declarations,
/// and inheritance.
pub fn dependency_discovery_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.add(BoundRule::new(Box::new(DeclarationRule)).with_action(Box::new(RecordDeclaration)));
    rules.add(
        BoundRule::new(Box::new(ParamDeclarationRule)).with_action(Box::new(RecordDeclaration)),
    );
    rules.add(BoundRule::new(Box::new(BaseClassRule)).with_action(Box::new(RecordDeclaration)));
    rules
}

/// Scope records discovered in one file.
#[derive(Debug, Serialize)]
pub struct FileScopes {
    pub file: String,
    pub scopes: Vec<ScopeRecord>,
}

/// One file's dependencies, by file name.
#[derive(Debug, Serialize)]
pub struct DependencyListing {
    pub file: String,
    pub depends_on: Vec<String>,
}

/// One graph node and the names of its children.
#[derive(Debug, Serialize)]
pub struct AdjacencyListing {
    pub node: String,
    pub children: Vec<String>,
}

/// One strongly connected component, members in Tarjan pop order.
#[derive(Debug, Serialize)]
pub struct ComponentListing {
    pub id: usize,
    pub members: Vec<String>,
}

/// Everything a batch run produces, ready for the report layer.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub files: Vec<FileScopes>,
    pub types: TypeTable,
    pub dependencies: Vec<DependencyListing>,
    pub adjacency: Vec<AdjacencyListing>,
    pub components: Vec<ComponentListing>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Batch analyzer over a list of candidate files.
pub struct Analyzer {
    config: Config,
    excludes: RegexSet,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let excludes = match RegexSet::new(&config.exclude) {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, "invalid exclude pattern, skip policy disabled");
                RegexSet::empty()
            }
        };
        Self {
            config: config.clone(),
            excludes,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Skip policy: paths carrying a generated-code or build-metadata
    /// marker are not analyzed.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excludes.is_match(&path.to_string_lossy())
    }

    /// Runs both passes over the candidate files and assembles the report.
    /// A file that cannot be opened, or whose tokenization fails, is
    /// reported and skipped; the batch continues.
    pub fn run<P: AsRef<Path>>(&self, files: &[P]) -> AnalysisReport {
        let mut ctx = AnalysisContext::new();
        let mut file_scopes = Vec::new();

        debug!("type discovery pass");
        let type_rules = type_discovery_rules();
        for path in files {
            let path = path.as_ref();
            if self.is_excluded(path) {
                debug!(file = %path.display(), "excluded by policy");
                continue;
            }
            let file_name = path.to_string_lossy().to_string();
            let toker = match Tokenizer::from_path(path) {
                Ok(toker) => toker,
                Err(err) => {
                    warn!(file = %file_name, error = %err, "cannot open file, skipping");
                    continue;
                }
            };
            ctx.begin_file(&file_name);
            if let Err(err) = drive(toker, &type_rules, &mut ctx) {
                warn!(file = %file_name, error = %err, "abandoning analysis of file");
            }
            file_scopes.push(FileScopes {
                file: file_name,
                scopes: ctx.take_locations(),
            });
        }

        debug!("dependency discovery pass");
        let dep_rules = dependency_discovery_rules();
        for path in files {
            let path = path.as_ref();
            if self.is_excluded(path) {
                continue;
            }
            let file_name = path.to_string_lossy().to_string();
            let toker = match Tokenizer::from_path(path) {
                Ok(toker) => toker,
                Err(err) => {
                    warn!(file = %file_name, error = %err, "cannot open file, skipping");
                    continue;
                }
            };
            ctx.begin_file(&file_name);
            ctx.dependencies.add_parent(file_name.clone());
            if let Err(err) = drive(toker, &dep_rules, &mut ctx) {
                warn!(file = %file_name, error = %err, "abandoning analysis of file");
            }
        }

        let mut graph = build_graph(&ctx.dependencies);
        if self.config.graph.show_backtracking {
            graph.set_show_backtrack(true);
            graph.walk(&mut WalkTracer);
        }
        graph.strong_components();

        assemble(file_scopes, ctx, &graph)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds every semi-expression of one source through a rule chain.
fn drive(toker: Tokenizer, rules: &RuleSet, ctx: &mut AnalysisContext) -> Result<(), LexError> {
    let mut builder = SemiBuilder::new(toker).return_newlines(false);
    while let Some(unit) = builder.next()? {
        ctx.current_line = builder.line_count();
        rules.parse(&unit, ctx);
    }
    Ok(())
}

/// One graph node per dependency-table parent (by file name), one edge per
/// recorded dependency whose target is a known node.
pub fn build_graph(dependencies: &DependencyTable) -> DepGraph {
    let mut graph = DepGraph::new("dependencies");
    for (parent, _) in dependencies.iter() {
        let name = file_name(parent);
        if graph.find_node(&name).is_none() {
            graph.add_node(name);
        }
    }
    for (parent, children) in dependencies.iter() {
        let Some(from) = graph.find_node(&file_name(parent)) else {
            continue;
        };
        for child in children {
            if let Some(to) = graph.find_node(&file_name(child)) {
                graph.add_edge(from, to, ());
            }
        }
    }
    graph
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn assemble(files: Vec<FileScopes>, ctx: AnalysisContext, graph: &DepGraph) -> AnalysisReport {
    let dependencies = ctx
        .dependencies
        .iter()
        .map(|(parent, children)| DependencyListing {
            file: file_name(parent),
            depends_on: children.iter().map(|c| file_name(c)).collect(),
        })
        .collect();

    let adjacency = graph
        .nodes()
        .map(|(_, node)| AdjacencyListing {
            node: node.name().to_string(),
            children: node
                .children()
                .iter()
                .map(|edge| graph.node(edge.target).name().to_string())
                .collect(),
        })
        .collect();

    let components = graph
        .components()
        .iter()
        .map(|comp| ComponentListing {
            id: comp.id,
            members: comp
                .members
                .iter()
                .map(|&id| graph.node(id).name().to_string())
                .collect(),
        })
        .collect();

    AnalysisReport {
        files,
        types: ctx.types,
        dependencies,
        adjacency,
        components,
    }
}

/// Debug walk visibility when backtracking display is configured.
struct WalkTracer;

impl WalkOps<()> for WalkTracer {
    fn on_node(&mut self, node: &Node<()>) {
        debug!(node = node.name(), "walk");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScopeKind;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_files(specs: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let paths = specs
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn type_pipeline_records_types_and_scopes() {
        let (_dir, files) = write_files(&[(
            "widget.cs",
            "namespace Store {\n  class Widget {\n  }\n}\n",
        )]);

        let report = Analyzer::new().run(&files);

        assert!(report.types.contains("Widget"));
        let scopes = &report.files[0].scopes;
        let names: Vec<&str> = scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Store", "Widget"]);
        assert!(scopes.iter().all(|s| s.is_closed()));
    }

    #[test]
    fn scope_records_pair_nested_scopes() {
        let (_dir, files) = write_files(&[(
            "a.cs",
            "class A {\n  void f() {\n  }\n}\n",
        )]);

        let report = Analyzer::new().run(&files);
        let scopes = &report.files[0].scopes;

        let class = scopes.iter().find(|s| s.name == "A").expect("class record");
        let func = scopes.iter().find(|s| s.name == "f").expect("function record");
        assert_eq!(func.kind, ScopeKind::Function);
        assert!(class.is_closed() && func.is_closed());
        assert!(func.end_line.unwrap() < class.end_line.unwrap());
        assert!(class.end_line.unwrap() >= class.begin_line);
    }

    #[test]
    fn class_body_deepens_scope_count_twice() {
        let (_dir, files) = write_files(&[(
            "a.cs",
            "class A {\n  void f() {\n  }\n}\n",
        )]);

        let report = Analyzer::new().run(&files);
        let class = report.files[0]
            .scopes
            .iter()
            .find(|s| s.name == "A")
            .expect("class record");
        // class open, its brace, and the function body all count
        assert_eq!(class.complexity(), Some(3));
    }

    #[test]
    fn dependency_pass_links_declaration_to_declaring_file() {
        let (_dir, files) = write_files(&[
            (
                "consumer.cs",
                "namespace Store {\n  class Consumer {\n    void use(Widget w) {\n      Widget other;\n    }\n  }\n}\n",
            ),
            (
                "widget.cs",
                "namespace Store {\n  class Widget {\n  }\n}\n",
            ),
        ]);

        // consumer listed first: only a completed type table lets pass two
        // resolve the reference
        let report = Analyzer::new().run(&files);

        let consumer = report
            .dependencies
            .iter()
            .find(|d| d.file == "consumer.cs")
            .expect("consumer entry");
        assert_eq!(consumer.depends_on, ["widget.cs"], "deduplicated edge");

        let widget = report
            .dependencies
            .iter()
            .find(|d| d.file == "widget.cs")
            .expect("widget entry registered even without dependencies");
        assert!(widget.depends_on.is_empty());
    }

    #[test]
    fn inheritance_records_a_dependency() {
        let (_dir, files) = write_files(&[
            ("base.cs", "class Base {\n}\n"),
            ("derived.cs", "class Derived : Base {\n}\n"),
        ]);

        let report = Analyzer::new().run(&files);
        let derived = report
            .dependencies
            .iter()
            .find(|d| d.file == "derived.cs")
            .expect("derived entry");
        assert_eq!(derived.depends_on, ["base.cs"]);
    }

    #[test]
    fn mutual_dependencies_form_one_strong_component() {
        let (_dir, files) = write_files(&[
            ("alpha.cs", "class Alpha {\n  Beta b;\n}\n"),
            ("beta.cs", "class Beta {\n  Alpha a;\n}\n"),
            ("gamma.cs", "class Gamma {\n  Alpha a;\n}\n"),
        ]);

        let report = Analyzer::new().run(&files);

        let cycle = report
            .components
            .iter()
            .find(|c| c.members.len() == 2)
            .expect("mutual dependency component");
        let mut members = cycle.members.clone();
        members.sort();
        assert_eq!(members, ["alpha.cs", "beta.cs"]);

        let gamma = report
            .components
            .iter()
            .find(|c| c.members == ["gamma.cs"])
            .expect("gamma is its own component");
        assert_eq!(gamma.members.len(), 1);
    }

    #[test]
    fn excluded_files_are_skipped_by_policy() {
        let (_dir, files) = write_files(&[
            ("real.cs", "class Real {\n}\n"),
            ("AssemblyInfo.cs", "class Meta {\n}\n"),
        ]);

        let report = Analyzer::new().run(&files);

        assert_eq!(report.files.len(), 1);
        assert!(!report.types.contains("Meta"));
        assert!(report.dependencies.iter().all(|d| d.file == "real.cs"));
    }

    #[test]
    fn unreadable_file_is_skipped_and_batch_continues() {
        let (dir, mut files) = write_files(&[("good.cs", "class Good {\n}\n")]);
        files.push(dir.path().join("missing.cs"));

        let report = Analyzer::new().run(&files);

        assert_eq!(report.files.len(), 1);
        assert!(report.types.contains("Good"));
    }

    #[test]
    fn unterminated_comment_abandons_that_file_only() {
        let (_dir, files) = write_files(&[
            ("bad.cs", "class Bad {\n/* never closed\n"),
            ("good.cs", "class Good {\n}\n"),
        ]);

        let report = Analyzer::new().run(&files);

        assert!(report.types.contains("Good"));
        // the bad file was abandoned mid-flight but still reported
        assert_eq!(report.files.len(), 2);
        let good = report.files.iter().find(|f| f.file.ends_with("good.cs"));
        assert!(good.is_some());
    }

    #[test]
    fn build_graph_skips_edges_to_unknown_nodes() {
        let mut deps = DependencyTable::new();
        deps.add("a.cs", "vanished.cs");
        deps.add_parent("b.cs");

        let graph = build_graph(&deps);

        assert_eq!(graph.node_count(), 2);
        let a = graph.find_node("a.cs").unwrap();
        assert!(graph.node(a).children().is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let (_dir, files) = write_files(&[("w.cs", "class W {\n}\n")]);
        let report = Analyzer::new().run(&files);
        let json = report.to_json().expect("serializable report");
        assert!(json.contains("\"components\""));
        assert!(json.contains("\"W\""));
    }
}
