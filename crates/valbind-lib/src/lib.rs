// ABOUTME: Core library binding rule-engine validation results onto validatable form fields
// ABOUTME: Includes field wrappers, groups, result splitting, clear-option parsing and rule sets

pub mod clear_options;
pub mod config;
pub mod error;
pub mod failure;
pub mod field;
pub mod form;
pub mod group;
pub mod observe;
pub mod rules;
pub mod split;

pub use clear_options::{parse_clear_options, ClearOptions};
pub use config::{FieldRulesConfig, RuleConfig, RulesConfig};
pub use error::ValbindError;
pub use failure::{failures_from_validator, Failure};
pub use field::{update, Shared, SharedValidity, Validatable, Validity};
pub use form::Form;
pub use group::{Validatables, ValidatablesBuilder};
pub use observe::{Notifications, Property, PropertyChanged, SubscriptionId};
pub use rules::{Cascade, RuleDescriptor, RuleEngine, RuleSet, ValidatorEngine};
pub use split::{split_field, split_group, ApplyResults, OverallResult};

/// Result type alias using [`ValbindError`]
pub type Result<T> = std::result::Result<T, ValbindError>;
