// ABOUTME: 'valbind parse-clear' command implementation
// ABOUTME: Shows how a clear directive is interpreted

use valbind_lib::{parse_clear_options, Result};

/// Configuration for parse-clear command
pub struct ParseClearConfig {
    pub directive: String,
}

/// Parse the directive and print the resulting options
pub fn run(config: &ParseClearConfig) -> Result<()> {
    let options = parse_clear_options(&config.directive)?;

    println!("Only validation: {}", options.only_validation);
    match &options.fields {
        Some(fields) => println!("Fields: {}", fields.join(", ")),
        None => println!("Fields: (all)"),
    }
    Ok(())
}
