// ABOUTME: valbind CLI entry point for checking data against rule configs
// ABOUTME: Provides subcommands: check, split, parse-clear, rules

mod commands;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// valbind CLI - Apply rule validation results to individual form fields
#[derive(Parser)]
#[command(name = "valbind")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON object against a rules file and report per-field results
    Check {
        /// Path to the rules JSON file
        #[arg(long)]
        rules: String,
        /// Path to the JSON object to validate
        #[arg(long)]
        input: String,
        /// Only bind and validate these fields (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a raw failure list to a set of fields
    Split {
        /// Path to a JSON array of {"fieldName", "message"} failures
        #[arg(long)]
        failures: String,
        /// Fields to bind (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a clear directive such as "false | name, rating"
    ParseClear {
        /// The directive to parse
        #[arg(allow_hyphen_values = true)]
        directive: String,
    },
    /// List declared rules, optionally only for some fields
    Rules {
        /// Path to the rules JSON file
        #[arg(long)]
        rules: String,
        /// Only list rules for these fields (comma-separated)
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            rules,
            input,
            fields,
            json,
        } => commands::check::run(&commands::check::CheckConfig {
            rules,
            input,
            fields,
            json,
        }),
        Commands::Split {
            failures,
            fields,
            json,
        } => commands::split::run(&commands::split::SplitConfig {
            failures,
            fields,
            json,
        }),
        Commands::ParseClear { directive } => {
            commands::parse_clear::run(&commands::parse_clear::ParseClearConfig { directive })
        }
        Commands::Rules { rules, fields } => {
            commands::rules::run(&commands::rules::RulesConfig { rules, fields })
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
