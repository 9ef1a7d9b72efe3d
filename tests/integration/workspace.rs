use super::IntegrationHarness;
use anyhow::Result;
use complaintdesk::activity::ActivityLog;
use complaintdesk::config::{self, AppConfig};
use complaintdesk::models::{ComplaintStatus, NewComplaint, NewUser};
use complaintdesk::store::StoreEvent;

// The workspace root is process-wide, so everything touching it lives in
// one test.
#[test]
fn workspace_store_round_trips_config_snapshot_and_activity() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut settings = AppConfig::default();
    settings.store.task_key_prefix = "CMP".into();
    settings.enrichment.enabled = false;
    config::save(&settings)?;
    assert_eq!(config::load_or_default()?, settings);

    let complaint_id = {
        let mut store = harness.open_store();
        let alice = store.register_user(NewUser::customer("Alice", "alice@example.com", "pw"))?;
        let admin = store.register_user(NewUser::admin("Ada", "admin@example.com", "pw"))?;
        let complaint = store.create_complaint(
            &alice.id,
            NewComplaint::new("No hot water", "Boiler broke again.", "Housing", "HomeFix"),
        )?;
        store.update_status(&complaint.id, ComplaintStatus::Escalated, &admin.id)?;
        assert_eq!(complaint.task_key, "CMP-1");
        complaint.id
    };

    let root = harness.workspace_path();
    assert!(root.join("data").join("snapshot.json").exists());
    let reopened = harness.open_store();
    assert_eq!(
        reopened.complaint(&complaint_id).map(|c| c.status),
        Some(ComplaintStatus::Escalated)
    );
    assert_eq!(reopened.next_task_seq(), 2);

    let log = ActivityLog::new(root.join("logs").join("events.jsonl"));
    let records = log.load_events()?;
    assert_eq!(
        records
            .iter()
            .filter(|r| matches!(r.event, StoreEvent::UserRegistered { .. }))
            .count(),
        2
    );
    let trail = log.complaint_trail(&complaint_id)?;
    assert!(matches!(
        trail.first().map(|r| &r.event),
        Some(StoreEvent::ComplaintCreated { .. })
    ));
    assert!(trail
        .iter()
        .any(|r| matches!(r.event, StoreEvent::StatusChanged { to: ComplaintStatus::Escalated, .. })));
    Ok(())
}
