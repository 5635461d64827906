//! Condition evaluator - pure logic, no I/O.
//!
//! Evaluation never fails. Anything that prevents a condition from being
//! checked (absent context field, unusable pattern) is a non-match.

use autoreply_core::{Condition, EvaluationContext, NumericOperator, Rule, TextOperator};
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Default cap on the compiled size of a rule's regex, in bytes.
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Decides whether a single rule's condition holds for an event
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    regex_size_limit: usize,
}

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self {
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }

    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    pub fn regex_size_limit(&self) -> usize {
        self.regex_size_limit
    }

    pub fn evaluate(&self, rule: &Rule, ctx: &EvaluationContext) -> bool {
        match &rule.condition {
            Condition::MatchNew => ctx.is_new_match == Some(true),
            Condition::MessageReceived { operator, value } => match &ctx.message {
                Some(message) => self.text_matches(&rule.id, *operator, message, value),
                None => false,
            },
            Condition::TimeElapsed { operator, value } => match ctx.time_elapsed {
                Some(elapsed) => {
                    let threshold = threshold_or_zero(&rule.id, value);
                    match operator {
                        NumericOperator::GreaterThan => elapsed > threshold,
                        NumericOperator::LessThan => elapsed < threshold,
                    }
                }
                None => false,
            },
            Condition::UserProfile {
                field,
                operator,
                value,
            } => match ctx.profile_text(field) {
                Some(actual) => self.text_matches(&rule.id, *operator, &actual, value),
                None => false,
            },
            Condition::NoResponse => true,
        }
    }

    /// Compile a rule pattern under this evaluator's size limit.
    pub fn compile_pattern(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .size_limit(self.regex_size_limit)
            .build()
    }

    fn text_matches(&self, rule_id: &str, operator: TextOperator, subject: &str, value: &str) -> bool {
        match operator {
            TextOperator::Equals => subject == value,
            TextOperator::Contains => subject.contains(value),
            TextOperator::Regex => match self.compile_pattern(value) {
                Ok(pattern) => pattern.is_match(subject),
                Err(e) => {
                    warn!(rule_id, pattern = value, "Invalid regex, treating as no match: {}", e);
                    false
                }
            },
        }
    }
}

impl Default for ConditionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a numeric comparison value. `None` for unparsable or non-finite input.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn threshold_or_zero(rule_id: &str, raw: &str) -> f64 {
    parse_threshold(raw).unwrap_or_else(|| {
        warn!(rule_id, value = raw, "Malformed time threshold, comparing against 0");
        0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(condition: Condition) -> Rule {
        Rule::new(condition, "t1").with_id("r1")
    }

    fn message_rule(operator: TextOperator, value: &str) -> Rule {
        rule(Condition::MessageReceived {
            operator,
            value: value.to_string(),
        })
    }

    fn elapsed_rule(operator: NumericOperator, value: &str) -> Rule {
        rule(Condition::TimeElapsed {
            operator,
            value: value.to_string(),
        })
    }

    fn profile_rule(field: &str, operator: TextOperator, value: &str) -> Rule {
        rule(Condition::UserProfile {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    #[test]
    fn test_match_new() {
        let evaluator = ConditionEvaluator::new();
        let rule = rule(Condition::MatchNew);
        assert!(evaluator.evaluate(&rule, &EvaluationContext::new_match()));
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::default()));

        let not_new = EvaluationContext {
            is_new_match: Some(false),
            ..EvaluationContext::default()
        };
        assert!(!evaluator.evaluate(&rule, &not_new));
    }

    #[test]
    fn test_message_equals_is_exact() {
        let evaluator = ConditionEvaluator::new();
        let rule = message_rule(TextOperator::Equals, "こんにちは");
        assert!(evaluator.evaluate(&rule, &EvaluationContext::message("こんにちは")));
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("こんにちは!")));
    }

    #[test]
    fn test_message_contains() {
        let evaluator = ConditionEvaluator::new();
        let rule = message_rule(TextOperator::Contains, "趣味");
        assert!(evaluator.evaluate(&rule, &EvaluationContext::message("趣味は何ですか")));
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("こんにちは")));
    }

    #[test]
    fn test_message_contains_is_case_sensitive() {
        let evaluator = ConditionEvaluator::new();
        let rule = message_rule(TextOperator::Contains, "Hello");
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("hello there")));
    }

    #[test]
    fn test_message_regex() {
        let evaluator = ConditionEvaluator::new();
        let rule = message_rule(TextOperator::Regex, r"^(おはよう|こんばんは)");
        assert!(evaluator.evaluate(&rule, &EvaluationContext::message("こんばんは〜")));
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("ねえ、おはよう")));
    }

    #[test]
    fn test_invalid_regex_is_no_match() {
        let evaluator = ConditionEvaluator::new();
        for pattern in ["(", "[a-", "*x", "(?P<>a)"] {
            let rule = message_rule(TextOperator::Regex, pattern);
            assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("(anything")));
        }
    }

    #[test]
    fn test_invalid_profile_regex_is_no_match() {
        let evaluator = ConditionEvaluator::new();
        let ctx = EvaluationContext::profile([("location", json!("(東京"))]);
        let rule = profile_rule("location", TextOperator::Regex, "(");
        assert!(!evaluator.evaluate(&rule, &ctx));
    }

    #[test]
    fn test_regex_classes_are_unicode_aware() {
        let evaluator = ConditionEvaluator::new();
        let ctx = EvaluationContext::profile([("age", json!("２９"))]);
        assert!(evaluator.evaluate(&profile_rule("age", TextOperator::Regex, r"^\d+$"), &ctx));
        assert!(!evaluator.evaluate(&profile_rule("age", TextOperator::Regex, r"^[0-9]+$"), &ctx));
        assert!(!evaluator.evaluate(&profile_rule("age", TextOperator::Regex, r"^(?-u:\d)+$"), &ctx));
    }

    #[test]
    fn test_regex_over_size_limit_is_no_match() {
        let evaluator = ConditionEvaluator::new().with_regex_size_limit(64);
        let rule = message_rule(TextOperator::Regex, r"[a-z]{50}");
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message(&"a".repeat(60))));

        let roomy = ConditionEvaluator::new();
        assert!(roomy.evaluate(&rule, &EvaluationContext::message(&"a".repeat(60))));
    }

    #[test]
    fn test_message_missing_from_context() {
        let evaluator = ConditionEvaluator::new();
        let rule = message_rule(TextOperator::Contains, "");
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::new_match()));
    }

    #[test]
    fn test_time_elapsed() {
        let evaluator = ConditionEvaluator::new();
        let gt = elapsed_rule(NumericOperator::GreaterThan, "60");
        assert!(evaluator.evaluate(&gt, &EvaluationContext::elapsed(90.0)));
        assert!(!evaluator.evaluate(&gt, &EvaluationContext::elapsed(30.0)));
        assert!(!evaluator.evaluate(&gt, &EvaluationContext::elapsed(60.0)));

        let lt = elapsed_rule(NumericOperator::LessThan, " 60.5 ");
        assert!(evaluator.evaluate(&lt, &EvaluationContext::elapsed(60.0)));
        assert!(!evaluator.evaluate(&lt, &EvaluationContext::elapsed(61.0)));
    }

    #[test]
    fn test_time_elapsed_malformed_threshold_defaults_to_zero() {
        let evaluator = ConditionEvaluator::new();
        let gt = elapsed_rule(NumericOperator::GreaterThan, "sixty");
        assert!(evaluator.evaluate(&gt, &EvaluationContext::elapsed(1.0)));
        assert!(!evaluator.evaluate(&gt, &EvaluationContext::elapsed(0.0)));

        let lt = elapsed_rule(NumericOperator::LessThan, "NaN");
        assert!(evaluator.evaluate(&lt, &EvaluationContext::elapsed(-1.0)));
    }

    #[test]
    fn test_time_elapsed_missing_from_context() {
        let evaluator = ConditionEvaluator::new();
        let rule = elapsed_rule(NumericOperator::LessThan, "100");
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::message("hi")));
    }

    #[test]
    fn test_user_profile() {
        let evaluator = ConditionEvaluator::new();
        let ctx = EvaluationContext::profile([
            ("location", json!("東京都")),
            ("age", json!(29)),
            ("hobbies", json!(["映画", "キャンプ"])),
        ]);

        assert!(evaluator.evaluate(&profile_rule("location", TextOperator::Contains, "東京"), &ctx));
        assert!(evaluator.evaluate(&profile_rule("age", TextOperator::Equals, "29"), &ctx));
        assert!(evaluator.evaluate(&profile_rule("age", TextOperator::Regex, r"^2\d$"), &ctx));
        assert!(evaluator.evaluate(&profile_rule("hobbies", TextOperator::Contains, "キャンプ"), &ctx));
        assert!(!evaluator.evaluate(&profile_rule("location", TextOperator::Equals, "東京"), &ctx));
    }

    #[test]
    fn test_user_profile_missing_field_or_profile() {
        let evaluator = ConditionEvaluator::new();
        let rule = profile_rule("job", TextOperator::Contains, "");
        let ctx = EvaluationContext::profile([("age", json!(29))]);
        assert!(!evaluator.evaluate(&rule, &ctx));
        assert!(!evaluator.evaluate(&rule, &EvaluationContext::default()));
    }

    #[test]
    fn test_no_response_always_matches() {
        let evaluator = ConditionEvaluator::new();
        let rule = rule(Condition::NoResponse);
        assert!(evaluator.evaluate(&rule, &EvaluationContext::default()));
        assert!(evaluator.evaluate(&rule, &EvaluationContext::message("hi")));
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("60"), Some(60.0));
        assert_eq!(parse_threshold(" 1.5 "), Some(1.5));
        assert_eq!(parse_threshold(""), None);
        assert_eq!(parse_threshold("inf"), None);
        assert_eq!(parse_threshold("10min"), None);
    }
}
