// ABOUTME: Rule failures as reported by a rule engine
// ABOUTME: Includes the adapter from the validator crate's error map

use serde::{Deserialize, Serialize};

/// One rule violation, tied to the field it was raised for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    /// Name of the property on the validated data type
    pub field_name: String,
    /// Human-readable message
    pub message: String,
}

impl Failure {
    /// Failure reported by the rule engine against `field_name`
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
        }
    }
}

/// Messages of the given failures, in engine order
pub fn messages(failures: &[Failure]) -> Vec<String> {
    failures.iter().map(|f| f.message.clone()).collect()
}

/// Flatten `validator` field errors into failures.
///
/// `validator` keeps errors in a hash map, so fields come out sorted by name;
/// errors within one field keep their declaration order. A rule without a
/// custom message falls back to its code (e.g. `length`, `range`).
/// Nested struct and list errors are not field-level and are skipped.
pub fn failures_from_validator(errors: &validator::ValidationErrors) -> Vec<Failure> {
    let mut fields: Vec<(String, &Vec<validator::ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                Failure::new(field.clone(), message)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Beer {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1, max = 10))]
        rating: i32,
        #[validate(email)]
        contact: String,
    }

    #[test]
    fn test_failure_json_is_camel_case() {
        let failure = Failure::new("rating", "out of range");
        let json = serde_json::to_string(&failure).unwrap();
        assert_eq!(json, r#"{"fieldName":"rating","message":"out of range"}"#);
    }

    #[test]
    fn test_messages_keep_order() {
        let failures = vec![Failure::new("b", "second"), Failure::new("a", "first")];
        assert_eq!(messages(&failures), vec!["second", "first"]);
    }

    #[test]
    fn test_failures_from_validator() {
        let beer = Beer {
            name: String::new(),
            rating: 11,
            contact: "nope".to_string(),
        };
        let errors = beer.validate().unwrap_err();
        let failures = failures_from_validator(&errors);

        assert_eq!(
            failures,
            vec![
                Failure::new("contact", "email"),
                Failure::new("name", "Name is required"),
                Failure::new("rating", "range"),
            ]
        );
    }

    #[test]
    fn test_failures_from_validator_valid_model() {
        let beer = Beer {
            name: "Stout".to_string(),
            rating: 7,
            contact: "brewer@example.com".to_string(),
        };
        assert!(beer.validate().is_ok());
    }
}
