//! Rulebook lint
//!
//! Static checks for problems the engine would otherwise only reveal at
//! evaluation time (as silent non-matches) or as a `TemplateNotFound`.

use std::collections::HashSet;
use std::sync::LazyLock;

use autoreply_core::{Condition, Rulebook, TextOperator, VariableCatalog};
use regex::Regex;
use serde::Serialize;

use crate::evaluator::{ConditionEvaluator, parse_threshold};

/// Matches any `{{...}}` placeholder, known to the catalog or not.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    RejectedRule,
    DuplicateRuleId,
    DuplicateTemplateId,
    DanglingTemplate,
    InvalidPattern,
    MalformedThreshold,
    InactiveTemplate,
    UnknownPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// Id of the rule or template concerned.
    pub subject: String,
    pub message: String,
}

impl Finding {
    fn error(kind: FindingKind, subject: &str, message: String) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            subject: subject.to_string(),
            message,
        }
    }

    fn warning(kind: FindingKind, subject: &str, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            subject: subject.to_string(),
            message,
        }
    }
}

/// Check a rulebook. Findings come back errors first, then in discovery order.
pub fn lint(
    rulebook: &Rulebook,
    evaluator: &ConditionEvaluator,
    catalog: &VariableCatalog,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rejected in &rulebook.rejected {
        findings.push(Finding::error(
            FindingKind::RejectedRule,
            &rejected.raw.id,
            rejected.error.to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &rulebook.rules {
        if !seen.insert(rule.id.as_str()) {
            findings.push(Finding::error(
                FindingKind::DuplicateRuleId,
                &rule.id,
                format!("Rule id {} is used more than once", rule.id),
            ));
        }
    }

    let mut seen = HashSet::new();
    for template in &rulebook.templates {
        if !seen.insert(template.id.as_str()) {
            findings.push(Finding::error(
                FindingKind::DuplicateTemplateId,
                &template.id,
                format!("Template id {} is used more than once", template.id),
            ));
        }
    }

    for rule in &rulebook.rules {
        match rulebook.template(&rule.template_id) {
            None => findings.push(Finding::error(
                FindingKind::DanglingTemplate,
                &rule.id,
                format!("References missing template {}", rule.template_id),
            )),
            Some(template) if rule.is_active && !template.is_active => {
                findings.push(Finding::warning(
                    FindingKind::InactiveTemplate,
                    &rule.id,
                    format!("Active rule uses inactive template {}", template.id),
                ))
            }
            Some(_) => {}
        }

        match &rule.condition {
            Condition::MessageReceived {
                operator: TextOperator::Regex,
                value,
            }
            | Condition::UserProfile {
                operator: TextOperator::Regex,
                value,
                ..
            } => {
                if let Err(e) = evaluator.compile_pattern(value) {
                    findings.push(Finding::error(
                        FindingKind::InvalidPattern,
                        &rule.id,
                        format!("Pattern {:?} never matches: {}", value, e),
                    ));
                }
            }
            Condition::TimeElapsed { value, .. } if parse_threshold(value).is_none() => {
                findings.push(Finding::warning(
                    FindingKind::MalformedThreshold,
                    &rule.id,
                    format!("Threshold {:?} is not a number and compares as 0", value),
                ));
            }
            _ => {}
        }
    }

    for template in &rulebook.templates {
        for name in unknown_placeholders(&template.content, catalog) {
            findings.push(Finding::warning(
                FindingKind::UnknownPlaceholder,
                &template.id,
                format!("Placeholder {{{{{}}}}} is not in the variable catalog", name),
            ));
        }
    }

    // stable: keeps discovery order within each severity
    findings.sort_by_key(|f| f.severity);
    findings
}

/// Placeholder names in `content` the catalog does not know, without duplicates.
pub fn unknown_placeholders(content: &str, catalog: &VariableCatalog) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in PLACEHOLDER_RE.captures_iter(content) {
        let name = &captures[1];
        if !catalog.contains(name) && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoreply_core::{NumericOperator, RawRule, RejectedRule, Rule, Template};

    fn kinds(findings: &[Finding]) -> Vec<(FindingKind, &str)> {
        findings
            .iter()
            .map(|f| (f.kind, f.subject.as_str()))
            .collect()
    }

    #[test]
    fn test_clean_rulebook() {
        let rulebook = Rulebook::new(
            vec![Template::new("{{user_name}}さん、はじめまして", "greeting").with_id("t1")],
            vec![Rule::new(Condition::MatchNew, "t1").with_id("r1")],
        );
        let findings = lint(&rulebook, &ConditionEvaluator::new(), &VariableCatalog::builtin());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_reports_problems() {
        let mut rulebook = Rulebook::new(
            vec![
                Template::new("{{nickname}}さん {{user_name}}", "greeting").with_id("t1"),
                Template::new("またね", "closing").with_id("t2").inactive(),
                Template::new("またあとで", "closing").with_id("t1"),
            ],
            vec![
                Rule::new(
                    Condition::MessageReceived {
                        operator: TextOperator::Regex,
                        value: "(".to_string(),
                    },
                    "t1",
                )
                .with_id("bad-regex"),
                Rule::new(
                    Condition::TimeElapsed {
                        operator: NumericOperator::GreaterThan,
                        value: "1h".to_string(),
                    },
                    "t1",
                )
                .with_id("bad-threshold"),
                Rule::new(Condition::NoResponse, "t404").with_id("dangling"),
                Rule::new(Condition::NoResponse, "t2").with_id("sleepy"),
                Rule::new(Condition::MatchNew, "t1").with_id("sleepy"),
            ],
        );

        let raw = RawRule {
            id: "birthday".to_string(),
            condition_type: "on_birthday".to_string(),
            template_id: "t1".to_string(),
            is_active: true,
            ..RawRule::default()
        };
        let error = Rule::try_from(raw.clone()).unwrap_err();
        rulebook.rejected.push(RejectedRule { raw, error });

        let findings = lint(&rulebook, &ConditionEvaluator::new(), &VariableCatalog::builtin());
        assert_eq!(
            kinds(&findings),
            vec![
                (FindingKind::RejectedRule, "birthday"),
                (FindingKind::DuplicateRuleId, "sleepy"),
                (FindingKind::DuplicateTemplateId, "t1"),
                (FindingKind::InvalidPattern, "bad-regex"),
                (FindingKind::DanglingTemplate, "dangling"),
                (FindingKind::MalformedThreshold, "bad-threshold"),
                (FindingKind::InactiveTemplate, "sleepy"),
                (FindingKind::UnknownPlaceholder, "t1"),
            ]
        );
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("on_birthday"));
        assert_eq!(findings.last().unwrap().severity, Severity::Warning);
        assert!(findings.last().unwrap().message.contains("{{nickname}}"));
    }

    #[test]
    fn test_unknown_placeholders_dedup() {
        let catalog = VariableCatalog::builtin();
        assert_eq!(
            unknown_placeholders("{{a}} {{user_age}} {{a}} {{b c}} {{", &catalog),
            vec!["a", "b c"]
        );
        assert!(unknown_placeholders("", &catalog).is_empty());
    }
}
