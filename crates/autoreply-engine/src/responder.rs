//! Response resolution: rule selection followed by template rendering

use autoreply_core::{EvaluationContext, RenderContext, Rule, Template, TemplateRenderer};
use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::evaluator::ConditionEvaluator;
use crate::selector::{self, evaluation_order};

/// The outgoing message an event resolved to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution<'a> {
    pub rule: &'a Rule,
    pub template: &'a Template,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceOutcome {
    Matched,
    NotMatched,
    /// Matched, but its template is inactive and active templates are required.
    TemplateInactive,
    /// Matched, but its template was not supplied.
    TemplateMissing,
    Inactive,
}

/// How one rule fared during evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTrace {
    pub rule_id: String,
    pub name: String,
    pub priority: i64,
    pub condition: String,
    pub outcome: TraceOutcome,
    pub selected: bool,
}

/// Resolves events to outgoing messages
#[derive(Debug, Clone, Default)]
pub struct Responder {
    evaluator: ConditionEvaluator,
    renderer: TemplateRenderer,
    require_active_template: bool,
}

impl Responder {
    pub fn new(evaluator: ConditionEvaluator, renderer: TemplateRenderer) -> Self {
        Self {
            evaluator,
            renderer,
            require_active_template: false,
        }
    }

    /// Skip matching rules whose template is inactive and keep looking.
    pub fn require_active_template(mut self, require: bool) -> Self {
        self.require_active_template = require;
        self
    }

    pub fn evaluator(&self) -> &ConditionEvaluator {
        &self.evaluator
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    pub fn evaluate(&self, rule: &Rule, ctx: &EvaluationContext) -> bool {
        self.evaluator.evaluate(rule, ctx)
    }

    pub fn select<'a>(&self, rules: &'a [Rule], ctx: &EvaluationContext) -> Option<&'a Rule> {
        selector::select(&self.evaluator, rules, ctx)
    }

    /// Render a template on demand, whether or not it is active.
    pub fn preview(&self, template: &Template, values: &RenderContext) -> String {
        self.renderer.render(&template.content, values)
    }

    /// Resolve an event to a message.
    ///
    /// `Ok(None)` means no rule applies. A winning rule whose template is
    /// not in `templates` is a data-consistency bug and surfaces as
    /// [`EngineError::TemplateNotFound`].
    pub fn resolve<'a>(
        &self,
        rules: &'a [Rule],
        templates: &'a [Template],
        ctx: &EvaluationContext,
        values: &RenderContext,
    ) -> Result<Option<Resolution<'a>>> {
        for rule in evaluation_order(rules) {
            if !self.evaluator.evaluate(rule, ctx) {
                continue;
            }

            let template = find_template(templates, rule)?;
            if self.require_active_template && !template.is_active {
                debug!(
                    "Rule {} matched but template {} is inactive, continuing",
                    rule.id, template.id
                );
                continue;
            }

            debug!("Resolved rule {} to template {}", rule.id, template.id);
            return Ok(Some(Resolution {
                rule,
                template,
                text: self.renderer.render(&template.content, values),
            }));
        }

        debug!("No rule matched among {} rules", rules.len());
        Ok(None)
    }

    /// Evaluate every rule and report each outcome, marking the one
    /// [`resolve`](Self::resolve) would pick.
    ///
    /// Active rules come first in evaluation order, inactive rules after in
    /// input order. Unlike `resolve`, a missing template is reported rather
    /// than returned as an error.
    pub fn explain(
        &self,
        rules: &[Rule],
        templates: &[Template],
        ctx: &EvaluationContext,
    ) -> Vec<RuleTrace> {
        let mut traces = Vec::with_capacity(rules.len());
        let mut decided = false;

        for rule in evaluation_order(rules) {
            let outcome = if !self.evaluator.evaluate(rule, ctx) {
                TraceOutcome::NotMatched
            } else {
                match templates.iter().find(|t| t.id == rule.template_id) {
                    None => TraceOutcome::TemplateMissing,
                    Some(t) if self.require_active_template && !t.is_active => {
                        TraceOutcome::TemplateInactive
                    }
                    Some(_) => TraceOutcome::Matched,
                }
            };

            // resolve stops at the first match or at a missing template
            let selected = !decided && outcome == TraceOutcome::Matched;
            if matches!(outcome, TraceOutcome::Matched | TraceOutcome::TemplateMissing) {
                decided = true;
            }
            traces.push(trace(rule, outcome, selected));
        }

        for rule in rules.iter().filter(|r| !r.is_active) {
            traces.push(trace(rule, TraceOutcome::Inactive, false));
        }

        traces
    }
}

fn find_template<'a>(templates: &'a [Template], rule: &Rule) -> Result<&'a Template> {
    templates
        .iter()
        .find(|t| t.id == rule.template_id)
        .ok_or_else(|| EngineError::TemplateNotFound {
            rule_id: rule.id.clone(),
            template_id: rule.template_id.clone(),
        })
}

fn trace(rule: &Rule, outcome: TraceOutcome, selected: bool) -> RuleTrace {
    RuleTrace {
        rule_id: rule.id.clone(),
        name: rule.name.clone(),
        priority: rule.priority,
        condition: rule.condition.describe(),
        outcome,
        selected,
    }
}
