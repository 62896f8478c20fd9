//! Recovery of structured JSON reports from free-form model text.
//!
//! Raw text is first [`normalize`]d (one outer code fence removed), then
//! validated against a tool's [`ShapeDescriptor`] before it is deserialized
//! into the tool's report type.
//!
//! ```rust
//! use kcontract::{ContractErrorKind, FieldKind, ShapeDescriptor, normalize, validate_with};
//! use serde_json::Value;
//!
//! let shape = ShapeDescriptor::new()
//!     .required("findings", FieldKind::String)
//!     .required("diagnosis", FieldKind::String);
//! let payload = normalize("```json\n{\"findings\":\"x\"}\n```");
//!
//! let error = validate_with::<Value>(payload.as_str(), &shape).expect_err("diagnosis missing");
//! assert_eq!(error.kind, ContractErrorKind::MissingField);
//! ```

mod error;
mod normalize;
mod shape;
mod validate;

pub use error::{ContractError, ContractErrorKind};
pub use normalize::{NormalizedPayload, normalize};
pub use shape::{FieldKind, FieldSpec, ShapeDescriptor};
pub use validate::{Contract, parse_contract, parse_json_value, validate, validate_with};
