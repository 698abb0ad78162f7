//! Actions fired by matching rules
//!
//! Actions receive the minimal semi-expression a rule extracted and mutate
//! the shared analysis context: entering and leaving scopes, and recording
//! type-usage dependencies.

use tracing::debug;

use crate::context::AnalysisContext;
use crate::model::{ScopeKind, ScopeRecord};
use crate::rules::Action;
use crate::semi::SemiExpr;

/// Enters a new scope: bumps the scope counter, pushes a record on the
/// stack, and, for named scopes, appends it to the location list.
pub struct PushScope;

impl Action for PushScope {
    fn name(&self) -> &'static str {
        "push-scope"
    }

    fn apply(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) {
        ctx.scope_count += 1;
        ctx.statement_pushes += 1;
        if ctx.statement_pushes > 1 {
            // a second detector claiming the same brace deepens the scope
            // counter but must not add a second pairing entry
            return;
        }
        let kind = semi
            .get(0)
            .and_then(ScopeKind::from_token)
            .unwrap_or(ScopeKind::Control);
        let name = semi.get(1).unwrap_or("anonymous").to_string();
        let record = ScopeRecord {
            kind,
            name,
            file: ctx.current_file.clone(),
            namespace: ctx.current_namespace.clone(),
            begin_line: ctx.current_line,
            end_line: None,
            begin_scope: ctx.scope_count,
            end_scope: None,
        };
        ctx.stack.push(record.clone());

        // control scopes and the anonymous placeholder are brace-depth
        // bookkeeping only, not reported
        if record.kind == ScopeKind::Control || record.name == "anonymous" {
            return;
        }
        ctx.locations.push(record);
    }
}

/// Leaves a scope: pops the stack and closes the first still-open location
/// record with the popped kind and name.
pub struct PopScope;

impl Action for PopScope {
    fn name(&self) -> &'static str {
        "pop-scope"
    }

    fn apply(&self, _semi: &SemiExpr, ctx: &mut AnalysisContext) {
        // a pop with nothing open indicates malformed nesting; ignore it
        let Some(elem) = ctx.stack.pop() else {
            return;
        };
        let line = ctx.current_line;
        let scope = ctx.scope_count;
        for record in ctx.locations.iter_mut() {
            if record.kind == elem.kind && record.name == elem.name && record.end_line.is_none() {
                record.end_line = Some(line);
                record.end_scope = Some(scope);
                break;
            }
        }
    }
}

/// Records a dependency edge for a declaration whose type is known to the
/// type table. An unresolved type is silently skipped.
pub struct RecordDeclaration;

impl Action for RecordDeclaration {
    fn name(&self) -> &'static str {
        "record-declaration"
    }

    fn apply(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) {
        let (type_name, namespace) = match semi.len() {
            // type name ;
            3 => (semi.get(0), ctx.current_namespace.clone()),
            // namespace . type name ;
            5 => (semi.get(2), semi.get(0).unwrap_or_default().to_string()),
            _ => return,
        };
        let Some(type_name) = type_name else {
            return;
        };
        let Some(source) = ctx.types.declaring_file(type_name, &namespace) else {
            return;
        };
        let source = source.to_string();
        let parent = ctx.current_file.clone();
        ctx.dependencies.add(&parent, &source);
    }
}

/// Debug visibility into the statements a chain sees.
pub struct TraceSemi;

impl Action for TraceSemi {
    fn name(&self) -> &'static str {
        "trace-semi"
    }

    fn apply(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) {
        debug!(line = ctx.current_line, semi = %semi, "semi-expression");
    }
}
