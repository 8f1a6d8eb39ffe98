// ABOUTME: Parser for compact clear directives such as "false | name, rating"
// ABOUTME: Produces ClearOptions telling a group what to reset and for which fields

use crate::{Result, ValbindError};
use std::str::FromStr;

/// Parsed clear directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOptions {
    /// When true only validation state is cleared; values are kept
    pub only_validation: bool,
    /// Target field names, or `None` for every field
    pub fields: Option<Vec<String>>,
}

impl Default for ClearOptions {
    fn default() -> Self {
        Self {
            only_validation: true,
            fields: None,
        }
    }
}

impl ClearOptions {
    /// Whether wrapper values should be reset as well
    pub fn reset_values(&self) -> bool {
        !self.only_validation
    }
}

impl FromStr for ClearOptions {
    type Err = ValbindError;

    fn from_str(s: &str) -> Result<Self> {
        parse_clear_options(s)
    }
}

/// Parse a clear directive.
///
/// Accepted forms are `BOOL`, `NAMES` and `BOOL | NAMES`, where `BOOL` is
/// `true` or `false` in any case and `NAMES` is a comma-separated list.
/// Blank input is an error: callers wanting defaults skip the parser.
pub fn parse_clear_options(directive: &str) -> Result<ClearOptions> {
    if directive.trim().is_empty() {
        return Err(ValbindError::ClearOptions(
            "no options to parse out of an empty string".to_string(),
        ));
    }

    if let Some((left, right)) = directive.split_once('|') {
        let only_validation = parse_bool(left).ok_or_else(|| {
            ValbindError::ClearOptions(format!(
                "'{}' left of the '|' separator must be true or false",
                left.trim()
            ))
        })?;

        if right.trim().is_empty() {
            return Err(ValbindError::ClearOptions(
                "field list right of the '|' separator must not be empty".to_string(),
            ));
        }

        return Ok(ClearOptions {
            only_validation,
            fields: Some(parse_names(right)?),
        });
    }

    if let Some(only_validation) = parse_bool(directive) {
        return Ok(ClearOptions {
            only_validation,
            fields: None,
        });
    }

    Ok(ClearOptions {
        only_validation: true,
        fields: Some(parse_names(directive)?),
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_names(list: &str) -> Result<Vec<String>> {
    list.split(',')
        .map(|name| {
            let name = name.trim();
            if name.is_empty() {
                Err(ValbindError::ClearOptions(format!(
                    "empty field name in '{}'",
                    list.trim()
                )))
            } else if name.contains('|') {
                Err(ValbindError::ClearOptions(format!(
                    "only one '|' separator is allowed, found another in '{name}'"
                )))
            } else {
                Ok(name.to_string())
            }
        })
        .collect()
}
