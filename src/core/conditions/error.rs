//! Validation errors for condition input values and modifier invariants.

use thiserror::Error;

/// Result type alias for condition validation.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// A condition's input values or a modifier's declared invariants are
/// malformed.
///
/// Validation failures never abort a run: the offending modifier or
/// interaction contributes nothing to the unified model and is reported
/// as a warning. At load time the stores wrap these in a fatal
/// `DataError` instead, since data files must be trusted up front.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No condition with this identifier exists in the catalog.
    #[error("unknown condition identifier '{0}'")]
    UnknownIdentifier(String),

    /// A placeholder required by the syntax template was not supplied.
    #[error("condition '{identifier}' is missing a value for placeholder '{placeholder}'")]
    MissingPlaceholder {
        identifier: String,
        placeholder: String,
    },

    /// A comparison operator outside the allowed set was supplied.
    #[error("condition '{identifier}' got invalid operator '{operator}' (allowed: <, <=, =, !=, >, >=)")]
    InvalidOperator {
        identifier: String,
        operator: String,
    },

    /// A boolean condition got a value other than `yes`/`no`.
    #[error("boolean condition '{identifier}' requires 'yes' or 'no', got '{value}'")]
    InvalidBooleanValue { identifier: String, value: String },

    /// A threshold value did not parse as a number.
    #[error("condition '{identifier}' requires a numeric value for '{key}', got '{value}'")]
    InvalidNumericValue {
        identifier: String,
        key: String,
        value: String,
    },

    /// A modifier declared a weight adjustment of zero.
    #[error("modifier weight_adjustment must be a non-zero integer")]
    ZeroAdjustment,

    /// A modifier's weight adjustment is outside the accepted range.
    #[error("modifier weight_adjustment {value} is outside the accepted range ±{limit}")]
    AdjustmentOutOfRange { value: i64, limit: i64 },

    /// A modifier declared neither a raw condition nor an identifier.
    #[error("modifier has an empty condition")]
    EmptyCondition,

    /// A modifier declared both a raw condition and an identifier.
    #[error("modifier sets both 'condition' and 'condition_identifier'")]
    AmbiguousCondition,

    /// An interaction names fewer than two traits.
    #[error("interaction '{description}' must combine at least two traits")]
    InteractionTooSmall { description: String },

    /// A conditional interaction carries no gate conditions.
    #[error("conditional interaction '{description}' must declare at least one condition")]
    ConditionalWithoutConditions { description: String },

    /// A synergy/antagonism interaction carries gate conditions.
    #[error("{kind} interaction '{description}' must not declare conditions")]
    UnexpectedConditions { kind: String, description: String },
}
