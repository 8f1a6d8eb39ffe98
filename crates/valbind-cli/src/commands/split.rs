// ABOUTME: 'valbind split' command implementation
// ABOUTME: Applies a raw failure list from a rule engine onto named fields

use crate::report::{field_group, Report};
use std::fs;
use valbind_lib::{split_group, Failure, Result};

/// Configuration for split command
pub struct SplitConfig {
    pub failures: String,
    pub fields: Vec<String>,
    pub json: bool,
}

/// Split failures onto the given fields and print the report
pub fn run(config: &SplitConfig) -> Result<()> {
    let mut failures: Vec<Failure> = serde_json::from_str(&fs::read_to_string(&config.failures)?)?;
    let mut group = field_group(&config.fields, None);

    let result = split_group(&mut failures, &mut group);
    Report::new(&group, &result).print(config.json)
}
