//! Rule evaluation and response resolution for autoreply
//!
//! Everything here is synchronous and stateless: the same rules, templates
//! and contexts always resolve to the same response. The free functions use
//! default settings; [`Responder`] carries configured ones.

pub mod error;
pub mod evaluator;
pub mod lint;
pub mod responder;
pub mod selector;

use autoreply_core::{EvaluationContext, RenderContext, Rule, Template};

pub use error::{EngineError, Result};
pub use evaluator::{ConditionEvaluator, DEFAULT_REGEX_SIZE_LIMIT, parse_threshold};
pub use lint::{Finding, FindingKind, Severity, lint};
pub use responder::{Resolution, Responder, RuleTrace, TraceOutcome};

/// Whether `rule`'s condition holds for `ctx`.
pub fn evaluate(rule: &Rule, ctx: &EvaluationContext) -> bool {
    ConditionEvaluator::default().evaluate(rule, ctx)
}

/// Highest-priority active rule whose condition holds; ties go to input order.
pub fn select<'a>(rules: &'a [Rule], ctx: &EvaluationContext) -> Option<&'a Rule> {
    selector::select(&ConditionEvaluator::default(), rules, ctx)
}

/// Select a rule and render its template with `values`.
pub fn resolve<'a>(
    rules: &'a [Rule],
    templates: &'a [Template],
    ctx: &EvaluationContext,
    values: &RenderContext,
) -> Result<Option<Resolution<'a>>> {
    Responder::default().resolve(rules, templates, ctx, values)
}
