use crate::support::StoreFixture;
use anyhow::Result;
use complaintdesk::scenarios::ScenarioCatalog;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

#[test]
fn builtin_scenario_drafts_a_complaint() -> Result<()> {
    let mut fx = StoreFixture::new();
    let catalog = ScenarioCatalog::default();
    let scenario = catalog.get("slow-internet").expect("builtin scenario");

    let mut values = HashMap::new();
    values.insert("Plan".to_string(), "Fibre 500".to_string());
    values.insert("AdvertisedSpeed".to_string(), "500 Mbps".to_string());
    assert_eq!(scenario.missing_fields(&values), vec!["MeasuredSpeed"]);
    let preview = scenario.compile(&values);
    assert!(preview.contains("[MeasuredSpeed]"));

    values.insert("MeasuredSpeed".to_string(), "40 Mbps".to_string());
    assert!(scenario.is_complete(&values));
    let draft = scenario.draft(&values, "TechCorp");
    let alice = fx.alice.id;
    let complaint = fx.store.create_complaint(&alice, draft)?;

    assert_eq!(complaint.title, "Internet slower than advertised");
    assert_eq!(complaint.category, "Telecom");
    assert!(complaint.description.contains("Fibre 500"));
    assert!(!complaint.description.contains("{{"));
    assert!(complaint.tags.contains("slow-internet"));
    Ok(())
}

#[test]
fn catalog_loads_from_a_yaml_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("scenarios.yaml");
    fs::write(
        &path,
        r#"
scenarios:
  - id: lost-luggage
    label: Lost luggage
    category: Travel
    fields: [Flight, Date]
    template: "My bag from flight {{Flight}} on {{Date}} never arrived."
"#,
    )?;
    let catalog = ScenarioCatalog::load(&path)?;
    let scenario = catalog.get("lost-luggage").expect("loaded");
    assert_eq!(catalog.for_category("travel").count(), 1);
    assert_eq!(
        scenario.compile(&HashMap::new()),
        "My bag from flight [Flight] on [Date] never arrived."
    );

    assert!(ScenarioCatalog::load(&dir.path().join("missing.yaml")).is_err());
    Ok(())
}
