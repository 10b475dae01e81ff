//! Response parsing
//!
//! Backends are told to answer with a bare JSON array but routinely
//! prepend prose. Everything before the first `[` is dropped and the
//! rest must be an array of objects, each carrying string `subject`,
//! `relation` and `object` values; otherwise nothing is returned. There
//! is no per-object salvage. A key repeated inside an object keeps its
//! last value and other keys are ignored.

use relgraph_core::Triplet;
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a backend response produced no triplets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The response contains no `[` at all
    #[error("response contains no JSON array")]
    NoArray,

    /// The text from the first `[` on is not an array of triplets
    #[error("malformed triplet array: {0}")]
    Malformed(String),
}

/// Strip any leading prose up to the first `[`
pub fn strip_preamble(response: &str) -> Option<&str> {
    response.find('[').map(|start| &response[start..])
}

/// Parse a raw backend response into triplets, reporting why it failed
pub fn parse_response(response: &str) -> Result<Vec<Triplet>, ParseError> {
    let body = strip_preamble(response).ok_or(ParseError::NoArray)?;
    // Objects go through a map so a repeated key keeps its last value
    let objects: Vec<Map<String, Value>> =
        serde_json::from_str(body).map_err(|e| ParseError::Malformed(e.to_string()))?;

    objects
        .iter()
        .enumerate()
        .map(|(i, object)| triplet_from_object(i, object))
        .collect()
}

fn triplet_from_object(index: usize, object: &Map<String, Value>) -> Result<Triplet, ParseError> {
    let field = |key: &str| match object.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ParseError::Malformed(format!(
            "element {index}: `{key}` is not a string"
        ))),
        None => Err(ParseError::Malformed(format!(
            "element {index}: missing field `{key}`"
        ))),
    };

    Ok(Triplet::new(field("subject")?, field("relation")?, field("object")?))
}

/// Parse a raw backend response, treating any failure as "no triplets"
pub fn parse_relations(response: &str) -> Vec<Triplet> {
    match parse_response(response) {
        Ok(triplets) => triplets,
        Err(e) => {
            tracing::debug!(error = %e, len = response.len(), "Discarding unparseable response");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_array() {
        let triplets =
            parse_relations(r#"[{"subject":"Paris","relation":"is capital of","object":"France"}]"#);
        assert_eq!(
            triplets,
            vec![Triplet::new("Paris", "is capital of", "France")]
        );
    }

    #[test]
    fn test_prose_prefix_is_discarded() {
        let response = "Sure! Here you go: [{\"subject\":\"A\",\"relation\":\"r\",\"object\":\"B\"}]";
        assert_eq!(parse_relations(response), vec![Triplet::new("A", "r", "B")]);
    }

    #[test]
    fn test_no_array() {
        assert_eq!(parse_response("no valid data"), Err(ParseError::NoArray));
        assert!(parse_relations("no valid data").is_empty());
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert_eq!(parse_response("[]"), Ok(vec![]));
    }

    #[test]
    fn test_malformed_inputs_are_empty() {
        let cases = [
            "[",
            "[{\"subject\":\"A\"",
            "[{\"subject\":\"A\",\"relation\":\"r\"}]",
            "[{\"subject\":1,\"relation\":\"r\",\"object\":\"B\"}]",
            "[1, 2, 3]",
            "[\"A\", \"r\", \"B\"]",
            "```json\n[{\"subject\":\"A\",\"relation\":\"r\",\"object\":\"B\"}]\n```",
            "[{\"subject\":\"A\",\"relation\":\"r\",\"object\":\"B\"},]",
        ];

        for case in cases {
            assert!(
                matches!(parse_response(case), Err(ParseError::Malformed(_))),
                "expected malformed: {case}"
            );
            assert!(parse_relations(case).is_empty());
        }
    }

    #[test]
    fn test_non_array_json_before_bracket() {
        // The object's opening is prose from the parser's point of view
        let response = "{\"items\": [1]}";
        assert!(parse_relations(response).is_empty());
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let response = r#"[{"subject":"A","subject":"B","relation":"r","object":"C"}]"#;
        assert_eq!(parse_response(response), Ok(vec![Triplet::new("B", "r", "C")]));
    }

    #[test]
    fn test_repeated_key_with_wrong_type_is_malformed() {
        let response = r#"[{"subject":"A","relation":"r","object":"B","object":7}]"#;
        assert!(matches!(
            parse_response(response),
            Err(ParseError::Malformed(msg)) if msg.contains("`object`")
        ));
    }

    #[test]
    fn test_no_partial_recovery() {
        let response = r#"[{"subject":"A","relation":"r","object":"B"}, {"subject":"C"}]"#;
        assert!(parse_relations(response).is_empty());
    }

    #[test]
    fn test_duplicates_and_extra_keys_kept() {
        let response = r#"[
            {"subject":"A","relation":"r","object":"B","confidence":0.4},
            {"subject":"A","relation":"r","object":"B"}
        ]"#;
        let triplets = parse_relations(response);
        assert_eq!(triplets.len(), 2);
        assert_eq!(triplets[0], triplets[1]);
    }

    fn triplet_strategy() -> impl Strategy<Value = Triplet> {
        ("\\PC{1,12}", "\\PC{0,12}", "\\PC{1,12}")
            .prop_map(|(s, r, o)| Triplet::new(s, r, o))
    }

    proptest! {
        #[test]
        fn prop_prefix_is_ignored(
            prefix in "[^\\[]{0,40}",
            triplets in prop::collection::vec(triplet_strategy(), 0..8),
        ) {
            let json = serde_json::to_string(&triplets).unwrap();
            let with_prefix = format!("{prefix}{json}");

            prop_assert_eq!(parse_relations(&json), triplets.clone());
            prop_assert_eq!(parse_relations(&with_prefix), triplets);
        }

        #[test]
        fn prop_never_panics(response in "\\PC{0,200}") {
            let _ = parse_relations(&response);
        }

        #[test]
        fn prop_without_bracket_is_empty(response in "[^\\[]{0,100}") {
            prop_assert!(parse_relations(&response).is_empty());
        }
    }
}
