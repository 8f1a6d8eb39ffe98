// ABOUTME: Splits a flat rule failure list onto validatable fields and groups
// ABOUTME: Produces an OverallResult summarizing claimed and unclaimed errors

use crate::failure::{messages, Failure};
use crate::field::{update, Validity};
use crate::group::Validatables;
use serde::Serialize;
use tracing::debug;

/// Summary of one split call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallResult {
    is_valid_overall: bool,
    all_errors: Vec<String>,
    is_valid_for_unclaimed: bool,
    unclaimed_errors: Vec<String>,
}

impl Default for OverallResult {
    fn default() -> Self {
        Self {
            is_valid_overall: true,
            all_errors: Vec::new(),
            is_valid_for_unclaimed: true,
            unclaimed_errors: Vec::new(),
        }
    }
}

impl OverallResult {
    fn new(all_errors: Vec<String>, unclaimed_errors: Vec<String>) -> Self {
        Self {
            is_valid_overall: all_errors.is_empty(),
            all_errors,
            is_valid_for_unclaimed: unclaimed_errors.is_empty(),
            unclaimed_errors,
        }
    }

    /// Whether the rule engine reported no failures at all
    pub fn is_valid_overall(&self) -> bool {
        self.is_valid_overall
    }

    /// Every failure message, in engine order
    pub fn all_errors(&self) -> &[String] {
        &self.all_errors
    }

    /// Whether every failure was claimed by a field
    pub fn is_valid_for_unclaimed(&self) -> bool {
        self.is_valid_for_unclaimed
    }

    /// Messages of failures no field claimed
    pub fn unclaimed_errors(&self) -> &[String] {
        &self.unclaimed_errors
    }

    pub fn first_of_all(&self) -> &str {
        self.all_errors.first().map_or("", String::as_str)
    }

    pub fn first_of_unclaimed(&self) -> &str {
        self.unclaimed_errors.first().map_or("", String::as_str)
    }

    /// Reset to the all-valid, empty state
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Remove failures for `field_name` from the working list, returning their messages
fn claim(failures: &mut Vec<Failure>, field_name: &str) -> Vec<String> {
    let mut claimed = Vec::new();
    failures.retain(|f| {
        if f.field_name == field_name {
            claimed.push(f.message.clone());
            false
        } else {
            true
        }
    });
    claimed
}

/// Apply failures to a single field.
///
/// Matching failures are written onto the field and removed from `failures`,
/// so chained calls never claim the same failure twice.
pub fn split_field(failures: &mut Vec<Failure>, field: &mut dyn Validity) -> OverallResult {
    let all_errors = messages(failures);
    let claimed = claim(failures, field.field_name());
    field.apply_errors(claimed);
    OverallResult::new(all_errors, messages(failures))
}

/// Apply failures to every member of a group, in member order.
///
/// Each member claims its failures from the shared working list; if two
/// members share a field name the first one claims everything, the same
/// first-member rule [`Validatables::populate`] applies. Group errors are
/// recomputed from all members afterwards. Member listeners fire once that
/// member's borrow is released.
pub fn split_group(failures: &mut Vec<Failure>, group: &mut Validatables) -> OverallResult {
    let all_errors = messages(failures);

    for member in group.members() {
        update(member, |member| {
            let claimed = claim(failures, member.field_name());
            member.apply_errors(claimed);
        });
    }
    group.refresh_errors();

    let result = OverallResult::new(all_errors, messages(failures));
    debug!(
        total = result.all_errors.len(),
        claimed = result.all_errors.len() - result.unclaimed_errors.len(),
        unclaimed = result.unclaimed_errors.len(),
        "split failures onto validatables"
    );
    result
}

/// Method-style access to the splitters on a failure list
pub trait ApplyResults {
    fn apply_to_field(&mut self, field: &mut dyn Validity) -> OverallResult;
    fn apply_to_group(&mut self, group: &mut Validatables) -> OverallResult;
}

impl ApplyResults for Vec<Failure> {
    fn apply_to_field(&mut self, field: &mut dyn Validity) -> OverallResult {
        split_field(self, field)
    }

    fn apply_to_group(&mut self, group: &mut Validatables) -> OverallResult {
        split_group(self, group)
    }
}
