use super::Scenario;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Ordered set of scenarios offered by the drafting wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioCatalog {
    pub scenarios: Vec<Scenario>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self {
            scenarios: builtin_scenarios(),
        }
    }
}

impl ScenarioCatalog {
    /// Parses a YAML catalog (`scenarios: [...]`). Ids must be unique and
    /// every template must use each declared field at least once.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let catalog: ScenarioCatalog =
            serde_yaml::from_str(yaml).context("Failed to parse scenario catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario catalog {}", path.display()))?;
        Self::from_yaml_str(&data)
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn for_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Scenario> + 'a {
        self.scenarios.iter().filter(move |s| {
            s.category
                .as_deref()
                .map(|c| c.eq_ignore_ascii_case(category))
                .unwrap_or(false)
        })
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if !seen.insert(scenario.id.as_str()) {
                bail!("Duplicate scenario id '{}'", scenario.id);
            }
            for field in &scenario.fields {
                if !scenario.template.contains(&Scenario::placeholder(field)) {
                    bail!(
                        "Scenario '{}' declares field '{}' but its template never uses it",
                        scenario.id,
                        field
                    );
                }
            }
        }
        Ok(())
    }
}

fn scenario(id: &str, label: &str, category: &str, fields: &[&str], template: &str) -> Scenario {
    Scenario {
        id: id.to_string(),
        label: label.to_string(),
        category: Some(category.to_string()),
        fields: fields.iter().map(|f| f.to_string()).collect(),
        template: template.to_string(),
    }
}

/// Scenarios shipped with the drafting wizard.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        scenario(
            "late-delivery",
            "Delivery never arrived",
            "Retail",
            &["OrderNumber", "OrderDate", "ExpectedDate"],
            "I placed order {{OrderNumber}} on {{OrderDate}} and was promised delivery by {{ExpectedDate}}. The package has still not arrived and I would like it delivered or refunded.",
        ),
        scenario(
            "billing-error",
            "Incorrect charge on my bill",
            "Utilities",
            &["AccountNumber", "ChargedAmount", "ExpectedAmount", "BillingPeriod"],
            "My account {{AccountNumber}} was charged {{ChargedAmount}} for {{BillingPeriod}}, but the agreed amount was {{ExpectedAmount}}. Please correct the bill and refund the difference.",
        ),
        scenario(
            "slow-internet",
            "Internet slower than advertised",
            "Telecom",
            &["Plan", "AdvertisedSpeed", "MeasuredSpeed"],
            "I pay for the {{Plan}} plan advertised at {{AdvertisedSpeed}}, yet my connection consistently measures {{MeasuredSpeed}}. I expect the service I am paying for.",
        ),
        scenario(
            "defective-product",
            "Product arrived defective",
            "Retail",
            &["ProductName", "PurchaseDate", "Defect"],
            "The {{ProductName}} I bought on {{PurchaseDate}} is defective: {{Defect}}. I would like a replacement or a full refund.",
        ),
        scenario(
            "poor-service",
            "Unhelpful customer service",
            "Services",
            &["ContactDate", "Channel", "Issue"],
            "On {{ContactDate}} I contacted support via {{Channel}} about {{Issue}}. The issue was not resolved and I received no follow-up.",
        ),
    ]
}
