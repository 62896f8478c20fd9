use kcontract::{
    Contract, ContractErrorKind, FieldKind, ShapeDescriptor, normalize, parse_contract,
};
use serde::Deserialize;

const CONFIDENCE: &[&str] = &["High", "Medium", "Low"];

#[derive(Debug, Deserialize)]
struct Translation {
    translated_text: String,
    translation_confidence: String,
    #[serde(default)]
    cultural_notes: Option<String>,
}

impl Contract for Translation {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("translated_text", FieldKind::String)
            .required("translation_confidence", FieldKind::Enum(CONFIDENCE))
            .optional("cultural_notes", FieldKind::String)
    }
}

#[test]
fn scenario_tagged_fence_normalizes_to_inner_json() {
    assert_eq!(normalize("```json\n{\"a\":1}\n```").as_str(), "{\"a\":1}");
}

#[test]
fn chatty_model_output_in_fence_is_accepted() {
    let raw = "\n```json\n{\n  \"translated_text\": \"Bonjour\",\n  \"translation_confidence\": \"High\",\n  \"model_commentary\": \"easy one\"\n}\n```\n";

    let report: Translation = parse_contract(raw).expect("payload should validate");
    assert_eq!(report.translated_text, "Bonjour");
    assert_eq!(report.translation_confidence, "High");
    assert!(report.cultural_notes.is_none());
}

#[test]
fn enum_literal_outside_set_is_rejected() {
    let error = parse_contract::<Translation>(
        "{\"translated_text\":\"Hola\",\"translation_confidence\":\"Very High\"}",
    )
    .expect_err("unknown confidence literal");
    assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
}

#[test]
fn prose_before_the_fence_is_not_repaired() {
    let error = parse_contract::<Translation>(
        "Sure! Here is the JSON:\n```json\n{\"translated_text\":\"Hola\",\"translation_confidence\":\"Low\"}\n```",
    )
    .expect_err("leading prose keeps the fence in place");
    assert_eq!(error.kind, ContractErrorKind::Parse);
}

#[test]
fn fence_tagged_with_another_language_fails_to_parse() {
    let raw = "```javascript\n{\"translated_text\":\"Hola\",\"translation_confidence\":\"Low\"}\n```";
    assert_eq!(normalize(raw).as_str(), raw);

    let error = parse_contract::<Translation>(raw)
        .expect_err("only json or untagged fences are stripped");
    assert_eq!(error.kind, ContractErrorKind::Parse);
}
