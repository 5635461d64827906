//! Simulate command - resolve a synthetic event

use anyhow::Result;
use autoreply_config::Config;
use autoreply_core::{EvaluationContext, RenderContext};
use autoreply_engine::{Resolution, RuleTrace, TraceOutcome};
use autoreply_sources::RulebookSource;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{OutputFormat, SimulateArgs};
use crate::commands::{print_json, responder, rulebook_source};

#[derive(Serialize)]
struct SimulationReport<'a> {
    rulebook: String,
    fingerprint: String,
    context: &'a EvaluationContext,
    resolution: Option<&'a Resolution<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [RuleTrace]>,
}

pub fn handle(args: SimulateArgs, config: &Config) -> Result<()> {
    let source = rulebook_source(args.rulebook, config)?;
    let rulebook = source.load()?;
    let responder = responder(config)?;

    let ctx = EvaluationContext {
        message: args.message,
        user_profile: (!args.profile.is_empty()).then(|| {
            args.profile
                .into_iter()
                .map(|(field, value)| (field, Value::String(value)))
                .collect()
        }),
        time_elapsed: args.elapsed,
        is_new_match: args.new_match.then_some(true),
    };
    let values: RenderContext = args.vars.into_iter().collect();

    let trace = args
        .trace
        .then(|| responder.explain(&rulebook.rules, &rulebook.templates, &ctx));

    if let Some(trace) = &trace
        && args.format == OutputFormat::Text
    {
        print_trace(trace);
    }

    // A dangling template reference aborts here, after the trace is shown
    let resolution = responder.resolve(&rulebook.rules, &rulebook.templates, &ctx, &values)?;

    match args.format {
        OutputFormat::Json => print_json(&SimulationReport {
            rulebook: source.describe(),
            fingerprint: rulebook.fingerprint(),
            context: &ctx,
            resolution: resolution.as_ref(),
            trace: trace.as_deref(),
        }),
        OutputFormat::Text => {
            match &resolution {
                Some(resolution) => {
                    let rule = resolution.rule;
                    let template = resolution.template;
                    println!("✓ Matched rule: {} ({})", rule.name, rule.id);
                    println!("  Condition: {}", rule.condition.describe());
                    println!("  Priority: {}", rule.priority);
                    println!(
                        "  Template: {} [{}]{}",
                        template.id,
                        template.category_label(),
                        if template.is_active { "" } else { " (inactive)" }
                    );
                    println!();
                    println!("{}", resolution.text);
                }
                None => println!("No rule matched."),
            }
            Ok(())
        }
    }
}

fn print_trace(trace: &[RuleTrace]) {
    println!("Evaluation trace:");
    for entry in trace {
        let marker = if entry.selected { "→" } else { " " };
        let outcome = match entry.outcome {
            TraceOutcome::Matched => "matched",
            TraceOutcome::NotMatched => "no match",
            TraceOutcome::TemplateInactive => "matched, template inactive",
            TraceOutcome::TemplateMissing => "matched, template missing",
            TraceOutcome::Inactive => "inactive",
        };
        println!(
            " {} [{:>4}] {:<24} {:<40} {}",
            marker, entry.priority, entry.rule_id, entry.condition, outcome
        );
    }
    println!();
}
