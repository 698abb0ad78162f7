//! Pretty formatter for human-readable terminal output
//!
//! Renders the analysis report as columnar tables: per-file scope metrics,
//! the type table, the dependency table, the graph adjacency, and the
//! strong components, with dependency cycles called out.

use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

use tangle_core::analysis::AnalysisReport;

pub struct PrettyFormatter;

impl PrettyFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();
        self.format_scopes(report, &mut out);
        self.format_types(report, &mut out);
        self.format_dependencies(report, &mut out);
        self.format_graph(report, &mut out);
        self.format_components(report, &mut out);
        self.format_summary(report, &mut out);
        out
    }

    fn heading(&self, out: &mut String, title: &str) {
        let _ = writeln!(out, "\n{}", title.bold());
        let _ = writeln!(out, "{}", "-".repeat(title.len()));
    }

    fn format_scopes(&self, report: &AnalysisReport, out: &mut String) {
        self.heading(out, "Scope Metrics");
        for file in &report.files {
            let _ = writeln!(out, "{}", short_name(&file.file).cyan());
            if file.scopes.is_empty() {
                let _ = writeln!(out, "  (no reportable scopes)");
                continue;
            }
            let _ = writeln!(
                out,
                "  {:<10} {:<24} {:<16} {:>5} {:>5} {:>5} {:>6}",
                "kind", "name", "namespace", "begin", "end", "size", "cmplx"
            );
            for scope in &file.scopes {
                let end = scope
                    .end_line
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let size = scope
                    .size()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let complexity = scope
                    .complexity()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(
                    out,
                    "  {:<10} {:<24} {:<16} {:>5} {:>5} {:>5} {:>6}",
                    scope.kind.as_str(),
                    scope.name,
                    scope.namespace,
                    scope.begin_line,
                    end,
                    size,
                    complexity
                );
            }
        }
    }

    fn format_types(&self, report: &AnalysisReport, out: &mut String) {
        self.heading(out, "Type Table");
        for (name, locations) in report.types.iter() {
            let _ = writeln!(out, "{}", name.cyan());
            for loc in locations {
                let _ = writeln!(
                    out,
                    "  file: {:<28} namespace: {}",
                    short_name(&loc.file),
                    loc.namespace
                );
            }
        }
    }

    fn format_dependencies(&self, report: &AnalysisReport, out: &mut String) {
        self.heading(out, "Dependency Table");
        for entry in &report.dependencies {
            let _ = writeln!(out, "{}", entry.file.cyan());
            if entry.depends_on.is_empty() {
                let _ = writeln!(out, "  (no dependencies)");
            } else {
                let _ = writeln!(out, "  {}", entry.depends_on.join(" "));
            }
        }
    }

    fn format_graph(&self, report: &AnalysisReport, out: &mut String) {
        self.heading(out, "Dependency Graph");
        for entry in &report.adjacency {
            let _ = writeln!(out, "{} -> {}", entry.node, entry.children.join(" "));
        }
    }

    fn format_components(&self, report: &AnalysisReport, out: &mut String) {
        self.heading(out, "Strong Components");
        for comp in &report.components {
            let members = comp.members.join(" ");
            if comp.members.len() > 1 {
                let _ = writeln!(
                    out,
                    "component {}: {} {}",
                    comp.id,
                    members,
                    "(cycle)".red().bold()
                );
            } else {
                let _ = writeln!(out, "component {}: {}", comp.id, members);
            }
        }
    }

    fn format_summary(&self, report: &AnalysisReport, out: &mut String) {
        let cycles = report
            .components
            .iter()
            .filter(|c| c.members.len() > 1)
            .count();
        let cycles_str = if cycles == 1 {
            format!("{} cycle", cycles)
        } else {
            format!("{} cycles", cycles)
        };
        let _ = writeln!(
            out,
            "\nAnalyzed {} files, {} types, {} components ({})",
            report.files.len().to_string().bold(),
            report.types.len(),
            report.components.len(),
            if cycles > 0 {
                cycles_str.red().to_string()
            } else {
                cycles_str.green().to_string()
            }
        );
    }
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn short_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
