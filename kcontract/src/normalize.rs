//! Best-effort removal of code-fence wrapping around model output.
//!
//! ```rust
//! use kcontract::normalize;
//!
//! assert_eq!(normalize("```json\n{\"a\":1}\n```").as_str(), "{\"a\":1}");
//! assert_eq!(normalize("```\n[1,2]\n```").as_str(), "[1,2]");
//! assert_eq!(normalize("  {\"a\":1}  ").as_str(), "{\"a\":1}");
//! ```

use std::fmt::{Display, Formatter};

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Model text with at most one outer fence removed. Not guaranteed to be JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload(String);

impl NormalizedPayload {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for NormalizedPayload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPayload {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Trims `raw` and strips one enclosing code fence tagged `json` or untagged.
///
/// Never fails. Text that is not fully enclosed by such a fence, including a
/// fence tagged with any other info string, comes back trimmed but otherwise
/// untouched. No repair of the inner JSON is attempted.
pub fn normalize(raw: &str) -> NormalizedPayload {
    let trimmed = raw.trim();
    let inner = strip_outer_fence(trimmed).unwrap_or(trimmed);
    NormalizedPayload(inner.to_string())
}

fn strip_outer_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix(FENCE)?.strip_suffix(FENCE)?;

    let body = match body.strip_prefix(JSON_TAG) {
        Some(rest) if !starts_with_tag_char(rest) => rest,
        _ if starts_with_tag_char(body) => return None,
        _ => body,
    };

    Some(body.trim())
}

/// An info string directly after the opening backticks marks a tagged fence.
fn starts_with_tag_char(text: &str) -> bool {
    text.starts_with(|ch: char| ch.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_tagged_fence() {
        assert_eq!(normalize("```json\n{\"a\":1}\n```").as_str(), "{\"a\":1}");
        assert_eq!(normalize("```json{\"a\":1}```").as_str(), "{\"a\":1}");
    }

    #[test]
    fn strips_untagged_fence() {
        assert_eq!(normalize("```\n{\"a\":1}\n```").as_str(), "{\"a\":1}");
        assert_eq!(normalize("```{\"a\":1}```").as_str(), "{\"a\":1}");
    }

    #[test]
    fn other_info_strings_leave_the_text_unchanged() {
        for raw in [
            "```javascript\n{\"a\":1}\n```",
            "```JSON\n{\"a\":1}\n```",
            "```ts\n{\"a\":1}\n```",
            "```jsonc\n{\"a\":1}\n```",
        ] {
            assert_eq!(normalize(raw).as_str(), raw);
        }
        assert_eq!(
            normalize("  ```Json\n{}\n```\n").as_str(),
            "```Json\n{}\n```"
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_first() {
        assert_eq!(
            normalize("\n\n  ```json\n  {\"a\":1}  \n```  \n").as_str(),
            "{\"a\":1}"
        );
    }

    #[test]
    fn strips_only_one_layer() {
        let nested = "```\n```json\n{\"a\":1}\n```\n```";
        assert_eq!(normalize(nested).as_str(), "```json\n{\"a\":1}\n```");
    }

    #[test]
    fn unfenced_or_half_fenced_text_is_only_trimmed() {
        assert_eq!(normalize("  {\"a\":1} ").as_str(), "{\"a\":1}");
        assert_eq!(
            normalize("Here you go: {\"a\":1}").as_str(),
            "Here you go: {\"a\":1}"
        );
        assert_eq!(normalize("```json\n{\"a\":1}").as_str(), "```json\n{\"a\":1}");
        assert_eq!(normalize("{\"a\":1}\n```").as_str(), "{\"a\":1}\n```");
    }

    #[test]
    fn degenerate_inputs_are_total() {
        assert_eq!(normalize("").as_str(), "");
        assert_eq!(normalize("   ").as_str(), "");
        assert_eq!(normalize("```").as_str(), "```");
        assert_eq!(normalize("````").as_str(), "````");
        assert_eq!(normalize("``````").as_str(), "");
        assert_eq!(normalize("```json```").as_str(), "");
    }

    #[test]
    fn fence_round_trip_preserves_valid_json() {
        let documents = [
            r#"{"a":1}"#,
            r#"{"findings":"clear","possibleDiagnoses":["none"],"recommendations":"rest"}"#,
            r#"{"nested":{"list":[1,2,3],"flag":true}}"#,
            r#"[{"type":"add_row","details":{}}]"#,
        ];

        for document in documents {
            let expected: serde_json::Value =
                serde_json::from_str(document).expect("fixture should be valid JSON");

            for wrapped in [
                format!("```json\n{document}\n```"),
                format!("```\n{document}\n```"),
                format!("  ```json {document} ```  "),
            ] {
                let parsed: serde_json::Value = serde_json::from_str(normalize(&wrapped).as_str())
                    .expect("normalized payload should parse");
                assert_eq!(parsed, expected, "wrapped as {wrapped:?}");
            }
        }
    }
}
