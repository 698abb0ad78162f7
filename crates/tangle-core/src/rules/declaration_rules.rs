//! Declaration and inheritance detectors
//!
//! The dependency-discovery chain. A candidate declaration is stripped of
//! qualifier tokens, its generic-argument span collapsed, and anything after
//! `=` truncated; only units reducing to `type name ;` or
//! `namespace . type name ;` reach the record action.

use crate::context::AnalysisContext;
use crate::rules::{Detection, Rule};
use crate::semi::SemiExpr;

/// Collapses the first `<...>` span to the type token that precedes it, so
/// `List < T > x ;` reduces the same way as `List x ;`.
fn compact_generics(semi: &SemiExpr) -> SemiExpr {
    let (Some(start), Some(stop)) = (semi.find_first("<"), semi.find_first(">")) else {
        return semi.clone();
    };
    if start == 0 || stop < start {
        return semi.clone();
    }
    let mut compact = SemiExpr::new();
    for tok in &semi.tokens()[..start] {
        compact.push(tok.clone());
    }
    for tok in &semi.tokens()[stop + 1..] {
        compact.push(tok.clone());
    }
    compact
}

/// Reduces a candidate unit to declaration shape, or reports it is not a
/// simple declaration.
fn reduce_declaration(semi: &SemiExpr, ctx: &AnalysisContext) -> Option<SemiExpr> {
    if semi.get(0) == Some("using") {
        return None;
    }
    semi.find_first(";")?;

    let mut local = compact_generics(semi);
    local.retain(|tok| !ctx.qualifiers.contains(tok));

    if let Some(eq) = local.find_first("=") {
        // drop the initializer, keeping the terminator
        while local.len() > eq + 1 {
            local.remove(eq);
        }
    }

    if local.contains("(") {
        return None;
    }

    match local.len() {
        3 => Some(local),
        5 if local.get(1) == Some(".") => Some(local),
        _ => None,
    }
}

/// Detects a simple type declaration statement, e.g. `Widget w;` or
/// `UI.Widget w;`. Always continues the chain so the sibling detectors see
/// the same statement.
pub struct DeclarationRule;

impl Rule for DeclarationRule {
    fn name(&self) -> &'static str {
        "declaration"
    }

    fn test(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) -> Detection {
        match reduce_declaration(semi, ctx) {
            Some(local) => Detection::matched_continue(local),
            None => Detection::no_match(),
        }
    }
}

/// Detects a type used as a function parameter, e.g. the `T t` in
/// `void f(T t) {`. The extracted parameter slice is terminated and run
/// through the same reduction as a direct declaration.
pub struct ParamDeclarationRule;

impl Rule for ParamDeclarationRule {
    fn name(&self) -> &'static str {
        "param-declaration"
    }

    fn test(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) -> Detection {
        if semi.find_first("(").is_none() {
            return Detection::no_match();
        }
        let mut params = semi.function_params();
        if params.is_empty() || params.get(0) == Some("using") {
            return Detection::no_match();
        }
        params.push(";");
        match reduce_declaration(&params, ctx) {
            Some(local) => Detection::matched_continue(local),
            None => Detection::no_match(),
        }
    }
}

/// Detects inheritance, the `class X : Y {` pattern, and extracts the base
/// type as a dependency. Last in its chain; always stops.
pub struct BaseClassRule;

impl Rule for BaseClassRule {
    fn name(&self) -> &'static str {
        "base-class"
    }

    fn test(&self, semi: &SemiExpr, _ctx: &mut AnalysisContext) -> Detection {
        if !semi.has_sequence(&["class", ":", "{"]) {
            return Detection::no_match_stop();
        }
        let Some(colon) = semi.find_first(":") else {
            return Detection::no_match_stop();
        };
        let Some(base) = semi.get(colon + 1) else {
            return Detection::no_match_stop();
        };
        let mut payload = SemiExpr::new();
        payload.push(base).push("base").push(";");
        Detection::matched(payload)
    }
}
