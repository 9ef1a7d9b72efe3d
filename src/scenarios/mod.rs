//! Guided complaint drafting from fill-in templates.
//!
//! A scenario template names its fields as `{{FieldName}}`. Compiling swaps
//! each declared field for the user's value, or for `[FieldName]` while the
//! value is still missing. The compiler keeps no state, so a live preview can
//! simply recompile on every keystroke.

mod catalog;

pub use catalog::{builtin_scenarios, ScenarioCatalog};

use crate::models::NewComplaint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub category: Option<String>,
    pub fields: Vec<String>,
    pub template: String,
}

impl Scenario {
    pub fn placeholder(field: &str) -> String {
        format!("{{{{{field}}}}}")
    }

    pub fn missing_marker(field: &str) -> String {
        format!("[{field}]")
    }

    /// Renders the template. Replacement is literal, not pattern based.
    pub fn compile(&self, values: &HashMap<String, String>) -> String {
        let mut rendered = self.template.clone();
        for field in &self.fields {
            let replacement = match provided(values, field) {
                Some(value) => value.to_string(),
                None => Self::missing_marker(field),
            };
            rendered = rendered.replace(&Self::placeholder(field), &replacement);
        }
        rendered
    }

    /// Declared fields without a usable value, in declaration order.
    pub fn missing_fields(&self, values: &HashMap<String, String>) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| provided(values, field).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn is_complete(&self, values: &HashMap<String, String>) -> bool {
        self.missing_fields(values).is_empty()
    }

    /// Complaint request pre-filled from this scenario, ready for review.
    pub fn draft(&self, values: &HashMap<String, String>, company_name: &str) -> NewComplaint {
        NewComplaint {
            title: self.label.clone(),
            description: self.compile(values),
            category: self.category.clone().unwrap_or_else(|| "General".to_string()),
            company_name: company_name.to_string(),
            attachment: None,
            tags: vec![self.id.clone()],
        }
    }
}

/// Whitespace-only input counts as not provided.
fn provided<'a>(values: &'a HashMap<String, String>, field: &str) -> Option<&'a str> {
    values
        .get(field)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
