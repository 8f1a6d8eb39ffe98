// ABOUTME: 'valbind check' command implementation
// ABOUTME: Validates a JSON object with configured rules and splits failures per field

use crate::report::{field_group, Report};
use serde_json::Value;
use std::fs;
use std::process;
use tracing::{debug, warn};
use valbind_lib::{Form, Result, RulesConfig};

/// Configuration for check command
pub struct CheckConfig {
    pub rules: String,
    pub input: String,
    pub fields: Option<Vec<String>>,
    pub json: bool,
}

/// Validate the input object and report per-field results
pub fn run(config: &CheckConfig) -> Result<()> {
    let rules = RulesConfig::from_file(&config.rules)?;
    let rule_set = rules.to_rule_set()?;
    let input: Value = serde_json::from_str(&fs::read_to_string(&config.input)?)?;

    if !input.is_object() {
        warn!(input = %config.input, "input is not a JSON object, all fields bind to null");
    }

    let names: Vec<String> = match &config.fields {
        Some(fields) => fields.clone(),
        None => rules.field_names().into_iter().map(str::to_string).collect(),
    };
    debug!(fields = ?names, "binding fields");

    let mut form: Form<Value, _> = Form::new(rule_set, field_group(&names, Some(&input)));
    let result = match config.fields {
        Some(_) => form.validate_scoped()?.clone(),
        None => form.validate()?.clone(),
    };

    Report::new(form.fields(), &result).print(config.json)?;

    if !result.is_valid_overall() {
        process::exit(1);
    }
    Ok(())
}
