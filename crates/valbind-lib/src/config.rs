// ABOUTME: Declarative JSON rule configuration validated against an embedded schema
// ABOUTME: Compiles into a RuleSet over JSON objects for use by the CLI and forms

use crate::rules::{checks, Cascade, RuleSet};
use crate::{Result, ValbindError};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// JSON Schema every rules document must satisfy
pub const RULES_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["schemaVersion", "fields"],
  "properties": {
    "schemaVersion": { "type": "string" },
    "fields": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["name", "rules"],
        "properties": {
          "name": { "type": "string", "minLength": 1 },
          "cascade": { "enum": ["continue", "stopOnFirstFailure"] },
          "whenPresent": { "type": "boolean" },
          "rules": {
            "type": "array",
            "items": {
              "type": "object",
              "required": ["kind"],
              "properties": {
                "kind": {
                  "enum": ["notEmpty", "minLength", "maxLength", "range", "email", "contains", "pattern"]
                },
                "message": { "type": "string" }
              }
            }
          }
        }
      }
    }
  }
}"#;

static NULL: Value = Value::Null;

/// One check in a field's rule chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleConfig {
    NotEmpty {
        message: Option<String>,
    },
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Range {
        min: f64,
        max: f64,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
    Contains {
        needle: String,
        message: Option<String>,
    },
    Pattern {
        regex: String,
        message: Option<String>,
    },
}

impl RuleConfig {
    /// Check name as reported in rule descriptors
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotEmpty { .. } => "not_empty",
            Self::MinLength { .. } => "min_length",
            Self::MaxLength { .. } => "max_length",
            Self::Range { .. } => "inclusive_between",
            Self::Email { .. } => "email",
            Self::Contains { .. } => "contains",
            Self::Pattern { .. } => "matches",
        }
    }

    fn custom_message(&self) -> Option<&str> {
        match self {
            Self::NotEmpty { message }
            | Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Range { message, .. }
            | Self::Email { message }
            | Self::Contains { message, .. }
            | Self::Pattern { message, .. } => message.as_deref(),
        }
    }

    /// Build the check closure for `field`.
    ///
    /// Only `notEmpty` fails on a missing value; every other kind passes null.
    fn compile(&self, field: &str) -> Result<Box<dyn Fn(&Value) -> Option<String>>> {
        let field = field.to_string();
        let custom = self.custom_message().map(str::to_string);
        let fail = move |default: String| Some(custom.clone().unwrap_or(default));

        let check: Box<dyn Fn(&Value) -> Option<String>> = match self.clone() {
            Self::NotEmpty { .. } => Box::new(move |data: &Value| {
                let value = lookup(data, &field);
                if is_present(value) {
                    None
                } else {
                    fail(format!("'{field}' must not be empty."))
                }
            }),
            Self::MinLength { min, .. } => Box::new(move |data: &Value| {
                let text = lookup(data, &field).as_str()?;
                if checks::min_length(text, min) {
                    None
                } else {
                    fail(format!(
                        "The length of '{field}' must be at least {min} characters. You entered {} characters.",
                        text.chars().count()
                    ))
                }
            }),
            Self::MaxLength { max, .. } => Box::new(move |data: &Value| {
                let text = lookup(data, &field).as_str()?;
                if checks::max_length(text, max) {
                    None
                } else {
                    fail(format!(
                        "The length of '{field}' must be {max} characters or fewer. You entered {} characters.",
                        text.chars().count()
                    ))
                }
            }),
            Self::Range { min, max, .. } => Box::new(move |data: &Value| {
                let value = lookup(data, &field);
                if value.is_null() {
                    return None;
                }
                match value.as_f64() {
                    Some(n) if checks::in_range(n, min, max) => None,
                    _ => fail(format!(
                        "'{field}' must be between {min} and {max}. You entered {value}."
                    )),
                }
            }),
            Self::Email { .. } => Box::new(move |data: &Value| {
                let text = lookup(data, &field).as_str()?;
                if checks::is_email(text) {
                    None
                } else {
                    fail(format!("'{field}' is not a valid email address."))
                }
            }),
            Self::Contains { needle, .. } => Box::new(move |data: &Value| {
                let text = lookup(data, &field).as_str()?;
                if checks::contains(text, &needle) {
                    None
                } else {
                    fail(format!("'{field}' must contain '{needle}'."))
                }
            }),
            Self::Pattern { regex, .. } => {
                let pattern = Regex::new(&regex).map_err(|e| {
                    ValbindError::RulesConfig(format!("invalid pattern for '{field}': {e}"))
                })?;
                Box::new(move |data: &Value| {
                    let text = lookup(data, &field).as_str()?;
                    if pattern.is_match(text) {
                        None
                    } else {
                        fail(format!("'{field}' is not in the correct format."))
                    }
                })
            }
        };
        Ok(check)
    }
}

/// Rule chain for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRulesConfig {
    /// Property name in the validated JSON object
    pub name: String,
    #[serde(default)]
    pub cascade: Cascade,
    /// Only run the chain when the property is present and not null
    #[serde(default)]
    pub when_present: bool,
    pub rules: Vec<RuleConfig>,
}

/// Top-level rules document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    /// Schema version
    pub schema_version: String,
    /// Rule chains in declaration order
    pub fields: Vec<FieldRulesConfig>,
}

impl RulesConfig {
    /// Load rules config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Parse rules config from a JSON string, checking it against [`RULES_SCHEMA`]
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        validate_schema(&document)?;
        Ok(serde_json::from_value(document)?)
    }

    /// Distinct field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for field in &self.fields {
            if !names.contains(&field.name.as_str()) {
                names.push(&field.name);
            }
        }
        names
    }

    /// Compile into a rule set validating JSON objects
    pub fn to_rule_set(&self) -> Result<RuleSet<Value>> {
        let mut rule_set = RuleSet::new();
        for field in &self.fields {
            let mut chain = rule_set.rule_for(&field.name).cascade(field.cascade);
            if field.when_present {
                let name = field.name.clone();
                chain = chain.when(move |data| !lookup(data, &name).is_null());
            }
            for rule in &field.rules {
                chain = chain.custom(rule.name(), rule.compile(&field.name)?);
            }
        }
        Ok(rule_set)
    }
}

fn validate_schema(document: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(RULES_SCHEMA)?;
    let compiled = jsonschema::JSONSchema::compile(&schema)
        .map_err(|e| ValbindError::Schema(e.to_string()))?;

    let messages: Vec<String> = match compiled.validate(document) {
        Ok(()) => return Ok(()),
        Err(errors) => errors
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect(),
    };
    Err(ValbindError::Schema(messages.join("; ")))
}

fn lookup<'a>(data: &'a Value, field: &str) -> &'a Value {
    data.get(field).unwrap_or(&NULL)
}

/// Mirrors the usual "not empty" notion: not null, blank, zero, false or empty
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => checks::not_empty(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
