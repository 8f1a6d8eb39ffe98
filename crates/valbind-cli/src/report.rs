// ABOUTME: Builds JSON-valued field groups and renders per-field validation reports
// ABOUTME: Shared by the check and split commands

use serde::Serialize;
use serde_json::Value;
use valbind_lib::{OverallResult, Result, Shared, Validatable, Validatables, Validity};

/// Bind one JSON-valued wrapper per field name, taking values from `input`
pub fn field_group(names: &[String], input: Option<&Value>) -> Validatables {
    names
        .iter()
        .map(|name| {
            let field: Shared<Validatable<Value>> = Validatable::shared(name.as_str());
            if let Some(value) = input.and_then(|i| i.get(name)) {
                field.borrow_mut().set_value(value.clone());
            }
            field
        })
        .fold(Validatables::builder(), |builder, field| builder.with(&field))
        .build()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub field_name: String,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub fields: Vec<FieldReport>,
    pub result: &'a OverallResult,
}

impl<'a> Report<'a> {
    pub fn new(group: &Validatables, result: &'a OverallResult) -> Self {
        let fields = group
            .members()
            .iter()
            .map(|member| {
                let member = member.borrow();
                FieldReport {
                    field_name: member.field_name().to_string(),
                    is_valid: member.is_valid(),
                    errors: member.errors().to_vec(),
                }
            })
            .collect();
        Self { fields, result }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }

        for field in &self.fields {
            let icon = if field.is_valid { "✅" } else { "❌" };
            println!("{icon} {}", field.field_name);
            for error in &field.errors {
                println!("    • {error}");
            }
        }

        if !self.result.unclaimed_errors().is_empty() {
            println!();
            println!("⚠️  Unclaimed errors:");
            for error in self.result.unclaimed_errors() {
                println!("    • {error}");
            }
        }

        println!();
        if self.result.is_valid_overall() {
            println!("Overall: ✅ valid");
        } else {
            println!(
                "Overall: ❌ {} error(s), {} unclaimed",
                self.result.all_errors().len(),
                self.result.unclaimed_errors().len()
            );
        }
        Ok(())
    }
}
