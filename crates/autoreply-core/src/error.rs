use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Rule {rule_id}: unknown condition type '{condition_type}'")]
    UnknownConditionType {
        rule_id: String,
        condition_type: String,
    },

    #[error("Rule {rule_id}: condition '{condition}' requires an operator")]
    MissingOperator { rule_id: String, condition: String },

    #[error("Rule {rule_id}: operator '{operator}' is not supported by condition '{condition}'")]
    UnsupportedOperator {
        rule_id: String,
        condition: String,
        operator: String,
    },

    #[error("Rule {rule_id}: condition '{condition}' requires a comparison value")]
    MissingValue { rule_id: String, condition: String },

    #[error("Rule {rule_id}: condition 'user_profile' requires a profile field")]
    MissingField { rule_id: String },

    #[error("Invalid variable name: {0:?}")]
    InvalidVariableName(String),
}

impl CoreError {
    /// Id of the rule the error refers to, if any.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            CoreError::UnknownConditionType { rule_id, .. }
            | CoreError::MissingOperator { rule_id, .. }
            | CoreError::UnsupportedOperator { rule_id, .. }
            | CoreError::MissingValue { rule_id, .. }
            | CoreError::MissingField { rule_id } => Some(rule_id),
            CoreError::InvalidVariableName(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
