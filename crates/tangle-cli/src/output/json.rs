//! JSON formatter for machine-readable output

use serde::Serialize;

use tangle_core::analysis::AnalysisReport;

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    tool: &'static str,
    version: &'static str,
    summary: Summary,
    report: &'a AnalysisReport,
}

#[derive(Serialize)]
struct Summary {
    files: usize,
    types: usize,
    components: usize,
    cycles: usize,
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, report: &AnalysisReport) -> serde_json::Result<String> {
        let envelope = JsonEnvelope {
            tool: "tangle",
            version: env!("CARGO_PKG_VERSION"),
            summary: Summary {
                files: report.files.len(),
                types: report.types.len(),
                components: report.components.len(),
                cycles: report
                    .components
                    .iter()
                    .filter(|c| c.members.len() > 1)
                    .count(),
            },
            report,
        };
        serde_json::to_string_pretty(&envelope)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
