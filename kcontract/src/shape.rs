//! Declarative field-shape descriptors checked against parsed JSON objects.
//!
//! ```rust
//! use kcontract::{FieldKind, ShapeDescriptor};
//! use serde_json::json;
//!
//! let shape = ShapeDescriptor::new()
//!     .required("findings", FieldKind::String)
//!     .required("diagnosis", FieldKind::String);
//!
//! let payload = json!({"findings": "x"});
//! let error = shape
//!     .check(payload.as_object().expect("object"))
//!     .expect_err("diagnosis is missing");
//! assert_eq!(error.field.as_deref(), Some("diagnosis"));
//! ```

use serde_json::{Map, Value};

use crate::ContractError;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Array(Box<FieldKind>),
    Object(ShapeDescriptor),
    /// String restricted to a closed set of literals.
    Enum(&'static [&'static str]),
    /// Present, any JSON type.
    Any,
}

impl FieldKind {
    pub fn array_of(item: FieldKind) -> Self {
        Self::Array(Box::new(item))
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
            Self::Enum(_) => "a string literal",
            Self::Any => "present",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Required and optional fields a tool expects in a model's JSON object.
///
/// Fields not listed are tolerated and ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeDescriptor {
    fields: Vec<FieldSpec>,
}

impl ShapeDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: true,
        });
        self
    }

    /// Checked only when present and not `null`.
    pub fn optional(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name,
            kind,
            required: false,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
    }

    pub fn check(&self, object: &Map<String, Value>) -> Result<(), ContractError> {
        self.check_at(object, "")
    }

    fn check_at(&self, object: &Map<String, Value>, prefix: &str) -> Result<(), ContractError> {
        for field in &self.fields {
            let path = join_path(prefix, field.name);
            match object.get(field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ContractError::missing_field(path));
                }
                None | Some(Value::Null) => {}
                Some(value) => check_value(&field.kind, value, &path)?,
            }
        }

        Ok(())
    }
}

fn check_value(kind: &FieldKind, value: &Value, path: &str) -> Result<(), ContractError> {
    match (kind, value) {
        (FieldKind::Any, _)
        | (FieldKind::String, Value::String(_))
        | (FieldKind::Number, Value::Number(_))
        | (FieldKind::Boolean, Value::Bool(_)) => Ok(()),
        (FieldKind::Enum(allowed), Value::String(literal)) => {
            if allowed.contains(&literal.as_str()) {
                Ok(())
            } else {
                Err(ContractError::unknown_variant(path, literal, allowed))
            }
        }
        (FieldKind::Array(item), Value::Array(values)) => {
            for (index, value) in values.iter().enumerate() {
                check_value(item, value, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        (FieldKind::Object(shape), Value::Object(object)) => shape.check_at(object, path),
        (kind, _) => Err(ContractError::wrong_type(path, kind.describe())),
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ContractErrorKind;

    const CONFIDENCE: &[&str] = &["High", "Medium", "Low"];

    fn check(shape: &ShapeDescriptor, value: Value) -> Result<(), ContractError> {
        shape.check(value.as_object().expect("fixture should be an object"))
    }

    #[test]
    fn accepts_matching_payload_and_ignores_unknown_fields() {
        let shape = ShapeDescriptor::new()
            .required("title", FieldKind::String)
            .required("score", FieldKind::Number)
            .required("ok", FieldKind::Boolean)
            .optional("notes", FieldKind::String);

        check(
            &shape,
            json!({"title": "t", "score": 0.5, "ok": true, "extra": [1, 2]}),
        )
        .expect("payload should match");
    }

    #[test]
    fn missing_or_null_required_field_fails() {
        let shape = ShapeDescriptor::new()
            .required("findings", FieldKind::String)
            .required("diagnosis", FieldKind::String);

        let missing = check(&shape, json!({"findings": "x"})).expect_err("missing diagnosis");
        assert_eq!(missing.kind, ContractErrorKind::MissingField);

        let null = check(&shape, json!({"findings": "x", "diagnosis": null}))
            .expect_err("null diagnosis");
        assert_eq!(null.kind, ContractErrorKind::MissingField);
    }

    #[test]
    fn wrong_primitive_kind_fails() {
        let shape = ShapeDescriptor::new().required("is_consistent", FieldKind::Boolean);
        let error = check(&shape, json!({"is_consistent": "yes"})).expect_err("string is not bool");
        assert_eq!(error.kind, ContractErrorKind::WrongType);
        assert_eq!(error.field.as_deref(), Some("is_consistent"));
    }

    #[test]
    fn enum_outside_declared_set_fails() {
        let shape = ShapeDescriptor::new().required("confidence", FieldKind::Enum(CONFIDENCE));
        check(&shape, json!({"confidence": "High"})).expect("declared literal");

        let error = check(&shape, json!({"confidence": "Certain"})).expect_err("unknown literal");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);

        let error = check(&shape, json!({"confidence": 3})).expect_err("non-string literal");
        assert_eq!(error.kind, ContractErrorKind::WrongType);
    }

    #[test]
    fn optional_fields_are_checked_only_when_present() {
        let shape = ShapeDescriptor::new().optional("quality", FieldKind::Enum(CONFIDENCE));
        check(&shape, json!({})).expect("absent optional");
        check(&shape, json!({"quality": null})).expect("null optional");

        let error = check(&shape, json!({"quality": "Great"})).expect_err("bad optional");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
    }

    #[test]
    fn nested_paths_are_reported() {
        let operation = ShapeDescriptor::new().required("type", FieldKind::Enum(&["add_row"]));
        let shape = ShapeDescriptor::new()
            .required("operations", FieldKind::array_of(FieldKind::Object(operation)))
            .required(
                "text_analysis",
                FieldKind::Object(ShapeDescriptor::new().required("confidence", FieldKind::String)),
            );

        let error = check(
            &shape,
            json!({
                "operations": [{"type": "add_row"}, {"type": "drop_table"}],
                "text_analysis": {"confidence": "High"}
            }),
        )
        .expect_err("second operation is invalid");
        assert_eq!(error.field.as_deref(), Some("operations[1].type"));

        let error = check(
            &shape,
            json!({"operations": [], "text_analysis": {}}),
        )
        .expect_err("nested field missing");
        assert_eq!(error.field.as_deref(), Some("text_analysis.confidence"));
    }
}
