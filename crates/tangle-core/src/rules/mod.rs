//! Grammar detection engine
//!
//! An ordered chain of pattern-matching rules, each owning the actions it
//! fires on a match. Rules inspect one semi-expression at a time and report
//! whether the chain should keep going; actions mutate the shared
//! [`AnalysisContext`]. A mismatch is the normal "this rule does not apply"
//! outcome, never an error.

pub mod actions;
pub mod declaration_rules;
pub mod scope_rules;

use tracing::trace;

use crate::context::AnalysisContext;
use crate::semi::SemiExpr;

/// Whether the chain keeps evaluating rules after this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Outcome of one rule test: an optional minimal semi-expression to hand to
/// the rule's actions, and the chain flow. Flow is a per-rule policy, not a
/// function of matching: some rules continue the chain even on a match so
/// that later rules can fire for the same statement.
#[derive(Debug)]
pub struct Detection {
    pub payload: Option<SemiExpr>,
    pub flow: Flow,
}

impl Detection {
    pub fn matched(payload: SemiExpr) -> Self {
        Self {
            payload: Some(payload),
            flow: Flow::Stop,
        }
    }

    pub fn matched_continue(payload: SemiExpr) -> Self {
        Self {
            payload: Some(payload),
            flow: Flow::Continue,
        }
    }

    pub fn no_match() -> Self {
        Self {
            payload: None,
            flow: Flow::Continue,
        }
    }

    pub fn no_match_stop() -> Self {
        Self {
            payload: None,
            flow: Flow::Stop,
        }
    }
}

/// A grammar construct detector.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn test(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) -> Detection;
}

/// A side effect fired with the minimal semi-expression a matching rule
/// extracted.
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, semi: &SemiExpr, ctx: &mut AnalysisContext);
}

/// A rule together with the actions it owns, dispatched in registration
/// order.
pub struct BoundRule {
    rule: Box<dyn Rule>,
    actions: Vec<Box<dyn Action>>,
}

impl BoundRule {
    pub fn new(rule: Box<dyn Rule>) -> Self {
        Self {
            rule,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Box<dyn Action>) -> Self {
        self.actions.push(action);
        self
    }
}

/// The ordered rule chain one analysis pass runs every semi-expression
/// through.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<BoundRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bound: BoundRule) {
        self.rules.push(bound);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates the chain against one semi-expression, dispatching every
    /// owned action of each matching rule until a rule stops the chain.
    pub fn parse(&self, semi: &SemiExpr, ctx: &mut AnalysisContext) {
        ctx.statement_pushes = 0;
        for bound in &self.rules {
            let detection = bound.rule.test(semi, ctx);
            if let Some(payload) = &detection.payload {
                trace!(rule = bound.rule.name(), payload = %payload, "rule matched");
                for action in &bound.actions {
                    trace!(action = action.name(), "dispatching action");
                    action.apply(payload, ctx);
                }
            }
            if detection.flow == Flow::Stop {
                break;
            }
        }
    }
}
