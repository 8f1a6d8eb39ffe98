// ABOUTME: 'valbind rules' command implementation
// ABOUTME: Lists declared rule chains, optionally scoped to some fields

use valbind_lib::{Result, RuleEngine};

/// Configuration for rules command
pub struct RulesConfig {
    pub rules: String,
    pub fields: Option<Vec<String>>,
}

/// Print descriptors of the rules that apply to the selected fields
pub fn run(config: &RulesConfig) -> Result<()> {
    let rules = valbind_lib::RulesConfig::from_file(&config.rules)?;
    let rule_set = rules.to_rule_set()?;

    let names: Vec<&str> = match &config.fields {
        Some(fields) => fields.iter().map(String::as_str).collect(),
        None => rules.field_names(),
    };

    let descriptors = rule_set.rules_for_fields(&names);
    if descriptors.is_empty() {
        println!("No rules declared for the selected fields.");
        return Ok(());
    }

    println!("📋 Rules ({})\n", descriptors.len());
    for descriptor in &descriptors {
        let conditional = if descriptor.conditional { " (conditional)" } else { "" };
        println!(
            "  {} [{}]{conditional}",
            descriptor.field_name,
            descriptor.checks.join(", ")
        );
    }
    Ok(())
}
