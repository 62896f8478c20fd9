//! Contract validation of normalized model payloads into typed reports.
//!
//! ```rust
//! use kcontract::{Contract, FieldKind, ShapeDescriptor, parse_contract};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct TitleSummary {
//!     title_summary: String,
//! }
//!
//! impl Contract for TitleSummary {
//!     fn shape() -> ShapeDescriptor {
//!         ShapeDescriptor::new().required("title_summary", FieldKind::String)
//!     }
//! }
//!
//! let summary: TitleSummary =
//!     parse_contract("```json\n{\"title_summary\":\"A cat video\"}\n```").expect("valid payload");
//! assert_eq!(summary.title_summary, "A cat video");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{ContractError, NormalizedPayload, ShapeDescriptor, normalize};

/// A typed report a model response must satisfy.
pub trait Contract: DeserializeOwned + Send + 'static {
    fn shape() -> ShapeDescriptor;

    /// Semantic constraints beyond field shape, such as numeric ranges.
    fn check(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

pub fn parse_json_value(payload: &str) -> Result<Value, ContractError> {
    serde_json::from_str(payload)
        .map_err(|err| ContractError::parse(format!("payload is not valid JSON: {err}")))
}

/// Checks `payload` against `shape` and deserializes it. Never returns a
/// partially populated value.
pub fn validate_with<T: DeserializeOwned>(
    payload: &str,
    shape: &ShapeDescriptor,
) -> Result<T, ContractError> {
    let value = parse_json_value(payload)?;
    let object = value
        .as_object()
        .ok_or_else(|| ContractError::not_an_object("payload must be a JSON object"))?;
    shape.check(object)?;

    serde_json::from_value(value).map_err(|err| {
        ContractError::new(
            crate::ContractErrorKind::WrongType,
            format!("payload does not match the report type: {err}"),
        )
    })
}

pub fn validate<T: Contract>(payload: &NormalizedPayload) -> Result<T, ContractError> {
    let report: T = validate_with(payload.as_str(), &T::shape())?;
    report.check()?;
    Ok(report)
}

/// Normalizes raw model text, then validates it.
pub fn parse_contract<T: Contract>(raw: &str) -> Result<T, ContractError> {
    validate(&normalize(raw))
}
