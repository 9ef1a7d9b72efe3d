use anyhow::Result;
use complaintdesk::config::AppConfig;
use complaintdesk::enrichment::{BusinessListing, DisabledEnricher, Enricher, LexiconEnricher};
use complaintdesk::models::{Complaint, NewComplaint, NewUser, SentimentData, User};
use complaintdesk::persistence::MemorySnapshot;
use complaintdesk::store::{StoreEvent, StoreObserver};
use complaintdesk::ComplaintStore;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Store seeded with two customers, one business and one admin, backed by an
/// in-memory snapshot slot.
pub struct StoreFixture {
    pub store: ComplaintStore,
    pub snapshots: Arc<MemorySnapshot>,
    pub events: Arc<Mutex<Vec<StoreEvent>>>,
    pub alice: User,
    pub bob: User,
    pub techcorp: User,
    pub admin: User,
}

impl StoreFixture {
    /// Enrichment switched off: every job resolves to the sentinel inline.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.enrichment.enabled = false;
        Self::with(config, Arc::new(DisabledEnricher))
    }

    pub fn with_lexicon() -> Self {
        Self::with(AppConfig::default(), Arc::new(LexiconEnricher::new()))
    }

    pub fn with(config: AppConfig, enricher: Arc<dyn Enricher>) -> Self {
        let snapshots = Arc::new(MemorySnapshot::new());
        let mut store = ComplaintStore::open(config, Box::new(Arc::clone(&snapshots)), enricher)
            .expect("store opens");
        let events = Arc::new(Mutex::new(Vec::new()));
        store.subscribe(Box::new(Recorder(Arc::clone(&events))));
        let alice = store
            .register_user(NewUser::customer("Alice", "alice@example.com", "pw-alice"))
            .expect("register alice");
        let bob = store
            .register_user(NewUser::customer("Bob", "bob@example.com", "pw-bob"))
            .expect("register bob");
        let techcorp = store
            .register_user(NewUser::business(
                "Tess Corp",
                "support@techcorp.example",
                "TechCorp",
                "pw-tech",
            ))
            .expect("register business");
        let admin = store
            .register_user(NewUser::admin("Ada Admin", "admin@example.com", "pw-admin"))
            .expect("register admin");
        Self {
            store,
            snapshots,
            events,
            alice,
            bob,
            techcorp,
            admin,
        }
    }

    pub fn file(&mut self, title: &str, company: &str) -> Result<Complaint> {
        let author = self.alice.id;
        Ok(self.store.create_complaint(
            &author,
            NewComplaint::new(title, "Details to follow.", "General", company),
        )?)
    }

    pub fn current(&self, complaint: &Complaint) -> Complaint {
        self.store
            .complaint(&complaint.id)
            .cloned()
            .expect("complaint still stored")
    }

    pub fn recorded_events(&self) -> Vec<StoreEvent> {
        self.events.lock().expect("event lock").clone()
    }
}

struct Recorder(Arc<Mutex<Vec<StoreEvent>>>);

impl StoreObserver for Recorder {
    fn on_event(&self, event: &StoreEvent) {
        self.0.lock().expect("event lock").push(event.clone());
    }
}

/// Answers like the lexicon enricher, but only after a delay.
pub struct SlowEnricher {
    pub delay: Duration,
}

impl Enricher for SlowEnricher {
    fn analyze(&self, text: &str) -> Result<SentimentData> {
        thread::sleep(self.delay);
        LexiconEnricher.analyze(text)
    }

    fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        thread::sleep(self.delay);
        LexiconEnricher.translate(text, target_language)
    }

    fn draft_response(&self, complaint_text: &str, company_name: &str) -> Result<String> {
        LexiconEnricher.draft_response(complaint_text, company_name)
    }

    fn lookup_businesses(&self, country: &str, industry: &str) -> Result<Vec<BusinessListing>> {
        LexiconEnricher.lookup_businesses(country, industry)
    }

    fn resolve_country(&self, latitude: f64, longitude: f64) -> Result<String> {
        LexiconEnricher.resolve_country(latitude, longitude)
    }
}
