//! Scope-opening and scope-closing detectors
//!
//! The type-discovery chain: namespace, type, function, anonymous scope,
//! and scope exit. Ordering matters: the anonymous-scope fallback sits
//! below the specific detectors, and the type detector deliberately keeps
//! the chain going so the fallback also fires for a type-opening brace.

use crate::context::AnalysisContext;
use crate::model::TypeLocation;
use crate::rules::{Detection, Rule};
use crate::semi::SemiExpr;

/// Keywords that open a type scope, in the order they are searched for.
const TYPE_KEYWORDS: &[&str] = &["class", "interface", "struct", "delegate"];

/// Tokens that open a control-flow block rather than a function body.
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "foreach", "while", "catch", "using"];

/// Detects `namespace <name>` and tracks the current namespace.
pub struct NamespaceRule;

impl Rule for NamespaceRule {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn test(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) -> Detection {
        let Some(index) = semi.find_first("namespace") else {
            return Detection::no_match();
        };
        let Some(name) = semi.get(index + 1) else {
            return Detection::no_match();
        };
        ctx.current_namespace = name.to_string();
        let mut payload = SemiExpr::new();
        payload.push("namespace").push(name);
        Detection::matched(payload)
    }
}

/// Detects `class` / `interface` / `struct` / `delegate` definitions and
/// records the type in the type table.
///
/// Always continues the chain, matched or not: the anonymous-scope rule
/// below must also fire for the same opening brace, because scope-depth
/// accounting counts both the type scope and the brace scope.
pub struct TypeRule;

impl Rule for TypeRule {
    fn name(&self) -> &'static str {
        "type"
    }

    fn test(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) -> Detection {
        let earliest = TYPE_KEYWORDS
            .iter()
            .filter_map(|kw| semi.find_first(kw))
            .min();
        let Some(index) = earliest else {
            return Detection::no_match();
        };
        let Some(name) = semi.get(index + 1) else {
            return Detection::no_match();
        };
        let keyword = semi.get(index).unwrap_or_default();
        ctx.types.add(
            name,
            TypeLocation {
                file: ctx.current_file.clone(),
                namespace: ctx.current_namespace.clone(),
            },
        );
        let mut payload = SemiExpr::new();
        payload.push(keyword).push(name);
        Detection::matched_continue(payload)
    }
}

/// Detects a function signature: a unit ending in `{` whose `(` is not
/// preceded by a control-flow keyword.
pub struct FunctionRule;

impl Rule for FunctionRule {
    fn name(&self) -> &'static str {
        "function"
    }

    fn test(&self, semi: &SemiExpr, _ctx: &mut AnalysisContext) -> Detection {
        if semi.last() != Some("{") {
            return Detection::no_match();
        }
        let Some(paren) = semi.find_first("(") else {
            return Detection::no_match();
        };
        if paren == 0 {
            return Detection::no_match();
        }
        let Some(prev) = semi.get(paren - 1) else {
            return Detection::no_match();
        };
        if CONTROL_KEYWORDS.contains(&prev) {
            return Detection::no_match();
        }
        let mut payload = SemiExpr::new();
        payload.push("function").push(prev);
        Detection::matched(payload)
    }
}

/// Fallback for any remaining `{`: an anonymous control scope, tracked for
/// brace-depth bookkeeping only.
pub struct AnonymousScopeRule;

impl Rule for AnonymousScopeRule {
    fn name(&self) -> &'static str {
        "anonymous-scope"
    }

    fn test(&self, semi: &SemiExpr, _ctx: &mut AnalysisContext) -> Detection {
        if !semi.contains("{") {
            return Detection::no_match();
        }
        let mut payload = SemiExpr::new();
        payload.push("control").push("anonymous");
        Detection::matched(payload)
    }
}

/// Detects leaving a scope: any unit containing `}`.
pub struct LeavingScopeRule;

impl Rule for LeavingScopeRule {
    fn name(&self) -> &'static str {
        "leaving-scope"
    }

    fn test(&self, semi: &SemiExpr, _ctx: &mut AnalysisContext) -> Detection {
        if semi.contains("}") {
            Detection::matched(semi.clone())
        } else {
            Detection::no_match()
        }
    }
}
