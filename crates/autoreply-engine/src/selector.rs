//! Rule selection

use std::cmp::Reverse;

use autoreply_core::{EvaluationContext, Rule};
use tracing::debug;

use crate::evaluator::ConditionEvaluator;

/// Active rules in evaluation order: priority DESC, then input order.
pub fn evaluation_order(rules: &[Rule]) -> Vec<&Rule> {
    let mut ordered: Vec<&Rule> = rules.iter().filter(|r| r.is_active).collect();
    // sort_by_key is stable, which keeps input order among equal priorities
    ordered.sort_by_key(|r| Reverse(r.priority));
    ordered
}

/// First rule in evaluation order whose condition holds.
pub fn select<'a>(
    evaluator: &ConditionEvaluator,
    rules: &'a [Rule],
    ctx: &EvaluationContext,
) -> Option<&'a Rule> {
    let selected = evaluation_order(rules)
        .into_iter()
        .find(|rule| evaluator.evaluate(rule, ctx));

    match selected {
        Some(rule) => debug!("Selected rule {} (priority {})", rule.id, rule.priority),
        None => debug!("No rule matched among {} rules", rules.len()),
    }
    selected
}
