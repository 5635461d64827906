//! Rule domain model
//!
//! A [`Rule`] maps a [`Condition`] to a template. Storage hands rules over
//! as loosely shaped rows ([`RawRule`]); those are converted at the boundary
//! so every condition variant carries exactly the fields it needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::context::coerce_to_string;
use crate::error::{CoreError, Result};

/// Closed set of condition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    MatchNew,
    MessageReceived,
    TimeElapsed,
    UserProfile,
    NoResponse,
}

impl ConditionType {
    pub const ALL: [ConditionType; 5] = [
        ConditionType::MatchNew,
        ConditionType::MessageReceived,
        ConditionType::TimeElapsed,
        ConditionType::UserProfile,
        ConditionType::NoResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::MatchNew => "match_new",
            ConditionType::MessageReceived => "message_received",
            ConditionType::TimeElapsed => "time_elapsed",
            ConditionType::UserProfile => "user_profile",
            ConditionType::NoResponse => "no_response",
        }
    }

    /// Operators accepted by this condition kind (empty when none is needed).
    pub fn operators(&self) -> &'static [&'static str] {
        match self {
            ConditionType::MessageReceived | ConditionType::UserProfile => TextOperator::NAMES,
            ConditionType::TimeElapsed => NumericOperator::NAMES,
            ConditionType::MatchNew | ConditionType::NoResponse => &[],
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ConditionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Comparison applied to message text or a profile value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOperator {
    Equals,
    /// Case-sensitive substring test.
    Contains,
    Regex,
}

impl TextOperator {
    pub const NAMES: &'static [&'static str] = &["equals", "contains", "regex"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextOperator::Equals => "equals",
            TextOperator::Contains => "contains",
            TextOperator::Regex => "regex",
        }
    }
}

impl FromStr for TextOperator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "equals" => Ok(TextOperator::Equals),
            "contains" => Ok(TextOperator::Contains),
            "regex" => Ok(TextOperator::Regex),
            _ => Err(()),
        }
    }
}

/// Comparison applied to elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericOperator {
    GreaterThan,
    LessThan,
}

impl NumericOperator {
    pub const NAMES: &'static [&'static str] = &["greater_than", "less_than"];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOperator::GreaterThan => "greater_than",
            NumericOperator::LessThan => "less_than",
        }
    }
}

impl FromStr for NumericOperator {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "greater_than" => Ok(NumericOperator::GreaterThan),
            "less_than" => Ok(NumericOperator::LessThan),
            _ => Err(()),
        }
    }
}

/// The predicate a rule tests, keyed by `conditionType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "conditionType", rename_all = "snake_case")]
pub enum Condition {
    MatchNew,
    MessageReceived {
        operator: TextOperator,
        value: String,
    },
    /// `value` is kept verbatim; it is parsed as a number when evaluated.
    TimeElapsed {
        operator: NumericOperator,
        value: String,
    },
    UserProfile {
        field: String,
        operator: TextOperator,
        value: String,
    },
    /// Matches whenever reached. The caller decides when a reply is overdue.
    NoResponse,
}

impl Condition {
    pub fn kind(&self) -> ConditionType {
        match self {
            Condition::MatchNew => ConditionType::MatchNew,
            Condition::MessageReceived { .. } => ConditionType::MessageReceived,
            Condition::TimeElapsed { .. } => ConditionType::TimeElapsed,
            Condition::UserProfile { .. } => ConditionType::UserProfile,
            Condition::NoResponse => ConditionType::NoResponse,
        }
    }

    /// Short human description, e.g. `message_received contains "趣味"`.
    pub fn describe(&self) -> String {
        match self {
            Condition::MatchNew | Condition::NoResponse => self.kind().to_string(),
            Condition::MessageReceived { operator, value } => {
                format!("{} {} {:?}", self.kind(), operator.as_str(), value)
            }
            Condition::TimeElapsed { operator, value } => {
                format!("{} {} {}", self.kind(), operator.as_str(), value)
            }
            Condition::UserProfile {
                field,
                operator,
                value,
            } => format!(
                "{}.{} {} {:?}",
                self.kind(),
                field,
                operator.as_str(),
                value
            ),
        }
    }
}

/// A prioritized condition-to-template mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub condition: Condition,
    pub template_id: String,
    /// Higher fires first.
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(
        default,
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Rule {
    pub fn new(condition: Condition, template_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            condition,
            template_id: template_id.into(),
            priority: 0,
            is_active: true,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A rule row as storage hands it over: every condition field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub condition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Strings and numbers are both accepted (`"60"` and `60`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub template_id: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(
        default,
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl RawRule {
    fn required_operator(&self, kind: ConditionType) -> Result<&str> {
        self.operator
            .as_deref()
            .filter(|op| !op.is_empty())
            .ok_or_else(|| CoreError::MissingOperator {
                rule_id: self.id.clone(),
                condition: kind.to_string(),
            })
    }

    fn required_value(&self, kind: ConditionType) -> Result<String> {
        match &self.value {
            None | Some(Value::Null) => Err(CoreError::MissingValue {
                rule_id: self.id.clone(),
                condition: kind.to_string(),
            }),
            Some(value) => Ok(coerce_to_string(value)),
        }
    }

    fn unsupported(&self, kind: ConditionType, operator: &str) -> CoreError {
        CoreError::UnsupportedOperator {
            rule_id: self.id.clone(),
            condition: kind.to_string(),
            operator: operator.to_string(),
        }
    }

    fn text_operator(&self, kind: ConditionType) -> Result<TextOperator> {
        let operator = self.required_operator(kind)?;
        operator
            .parse()
            .map_err(|_| self.unsupported(kind, operator))
    }

    fn condition(&self) -> Result<Condition> {
        let kind: ConditionType =
            self.condition_type
                .parse()
                .map_err(|_| CoreError::UnknownConditionType {
                    rule_id: self.id.clone(),
                    condition_type: self.condition_type.clone(),
                })?;

        let condition = match kind {
            ConditionType::MatchNew => Condition::MatchNew,
            ConditionType::NoResponse => Condition::NoResponse,
            ConditionType::MessageReceived => Condition::MessageReceived {
                operator: self.text_operator(kind)?,
                value: self.required_value(kind)?,
            },
            ConditionType::TimeElapsed => {
                let operator = self.required_operator(kind)?;
                Condition::TimeElapsed {
                    operator: operator
                        .parse()
                        .map_err(|_| self.unsupported(kind, operator))?,
                    value: self.required_value(kind)?,
                }
            }
            ConditionType::UserProfile => {
                let operator = self.text_operator(kind)?;
                let field = self
                    .field
                    .clone()
                    .filter(|f| !f.is_empty())
                    .ok_or_else(|| CoreError::MissingField {
                        rule_id: self.id.clone(),
                    })?;
                Condition::UserProfile {
                    field,
                    operator,
                    value: self.required_value(kind)?,
                }
            }
        };
        Ok(condition)
    }
}

impl TryFrom<RawRule> for Rule {
    type Error = CoreError;

    fn try_from(raw: RawRule) -> Result<Self> {
        let condition = raw.condition()?;
        Ok(Rule {
            id: raw.id,
            name: raw.name,
            condition,
            template_id: raw.template_id,
            priority: raw.priority,
            is_active: raw.is_active,
            updated_at: raw.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(condition_type: &str) -> RawRule {
        RawRule {
            id: "r1".to_string(),
            condition_type: condition_type.to_string(),
            template_id: "t1".to_string(),
            is_active: true,
            ..RawRule::default()
        }
    }

    #[test]
    fn test_match_new_ignores_operator() {
        let mut row = raw("match_new");
        row.operator = Some("regex".to_string());
        row.value = Some(json!("("));
        let rule = Rule::try_from(row).unwrap();
        assert_eq!(rule.condition, Condition::MatchNew);
    }

    #[test]
    fn test_numeric_value_is_stringified() {
        let mut row = raw("time_elapsed");
        row.operator = Some("greater_than".to_string());
        row.value = Some(json!(60));
        let rule = Rule::try_from(row).unwrap();
        assert_eq!(
            rule.condition,
            Condition::TimeElapsed {
                operator: NumericOperator::GreaterThan,
                value: "60".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_condition_type() {
        let err = Rule::try_from(raw("weather")).unwrap_err();
        assert!(matches!(err, CoreError::UnknownConditionType { .. }));
        assert_eq!(err.rule_id(), Some("r1"));
    }

    #[test]
    fn test_missing_operator() {
        let mut row = raw("message_received");
        row.value = Some(json!("hi"));
        let err = Rule::try_from(row).unwrap_err();
        assert!(matches!(err, CoreError::MissingOperator { .. }));
    }

    #[test]
    fn test_numeric_operator_on_text_condition() {
        let mut row = raw("message_received");
        row.operator = Some("greater_than".to_string());
        row.value = Some(json!("hi"));
        let err = Rule::try_from(row).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnsupportedOperator { ref operator, .. } if operator == "greater_than"
        ));
    }

    #[test]
    fn test_text_operator_on_time_condition() {
        let mut row = raw("time_elapsed");
        row.operator = Some("contains".to_string());
        row.value = Some(json!("60"));
        assert!(matches!(
            Rule::try_from(row).unwrap_err(),
            CoreError::UnsupportedOperator { .. }
        ));
    }

    #[test]
    fn test_missing_value() {
        let mut row = raw("time_elapsed");
        row.operator = Some("less_than".to_string());
        assert!(matches!(
            Rule::try_from(row).unwrap_err(),
            CoreError::MissingValue { .. }
        ));
    }

    #[test]
    fn test_user_profile_requires_field() {
        let mut row = raw("user_profile");
        row.operator = Some("equals".to_string());
        row.value = Some(json!("東京"));
        assert!(matches!(
            Rule::try_from(row.clone()).unwrap_err(),
            CoreError::MissingField { .. }
        ));

        row.field = Some("location".to_string());
        let rule = Rule::try_from(row).unwrap();
        assert_eq!(rule.condition.kind(), ConditionType::UserProfile);
    }

    #[test]
    fn test_rule_serializes_flat() {
        let rule = Rule::new(
            Condition::MessageReceived {
                operator: TextOperator::Contains,
                value: "趣味".to_string(),
            },
            "t3",
        )
        .with_id("r3")
        .with_priority(5);

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["conditionType"], "message_received");
        assert_eq!(json["operator"], "contains");
        assert_eq!(json["templateId"], "t3");
        assert_eq!(json["isActive"], true);

        let back: Rule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_describe() {
        let condition = Condition::UserProfile {
            field: "location".to_string(),
            operator: TextOperator::Equals,
            value: "東京".to_string(),
        };
        assert_eq!(condition.describe(), "user_profile.location equals \"東京\"");
        assert_eq!(Condition::NoResponse.describe(), "no_response");
    }

    #[test]
    fn test_operators_per_condition() {
        assert_eq!(
            ConditionType::TimeElapsed.operators(),
            &["greater_than", "less_than"]
        );
        assert!(ConditionType::MatchNew.operators().is_empty());
        assert_eq!(
            "no_response".parse::<ConditionType>(),
            Ok(ConditionType::NoResponse)
        );
    }
}
