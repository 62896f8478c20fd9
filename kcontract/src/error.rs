//! Contract validation errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    Parse,
    NotAnObject,
    MissingField,
    WrongType,
    UnknownVariant,
    Constraint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
    /// Dotted path of the offending field, e.g. `text_analysis.confidence`.
    pub field: Option<String>,
}

impl ContractError {
    pub fn new(kind: ContractErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ContractErrorKind::Parse, message)
    }

    pub fn not_an_object(message: impl Into<String>) -> Self {
        Self::new(ContractErrorKind::NotAnObject, message)
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ContractErrorKind::MissingField,
            format!("missing required field: '{field}'"),
        )
        .with_field(field)
    }

    pub fn wrong_type(field: impl Into<String>, expected: &str) -> Self {
        let field = field.into();
        Self::new(
            ContractErrorKind::WrongType,
            format!("field '{field}' must be {expected}"),
        )
        .with_field(field)
    }

    pub fn unknown_variant(field: impl Into<String>, value: &str, allowed: &[&str]) -> Self {
        let field = field.into();
        Self::new(
            ContractErrorKind::UnknownVariant,
            format!(
                "field '{field}' has unknown value '{value}', expected one of: {}",
                allowed.join(", ")
            ),
        )
        .with_field(field)
    }

    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ContractErrorKind::Constraint, message).with_field(field)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl Display for ContractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ContractError {}
