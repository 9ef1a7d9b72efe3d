use crate::support::StoreFixture;
use anyhow::Result;
use complaintdesk::models::{ComplaintStatus, NewComplaint, SentimentLabel};
use complaintdesk::store::{ComplaintFilter, SortOrder};

#[test]
fn filters_combine_and_text_search_ignores_case() -> Result<()> {
    let mut fx = StoreFixture::new();
    let router = fx.file("Router overheating", "TechCorp")?;
    let bill = fx.file("Wrong bill", "PowerCo")?;
    let bob = fx.bob.id;
    let from_bob = fx.store.create_complaint(
        &bob,
        NewComplaint::new("Router lights blinking", "Details", "Telecom", "TechCorp"),
    )?;

    let techcorp = fx
        .store
        .list(&ComplaintFilter::by_company("techcorp"), SortOrder::Oldest);
    let ids: Vec<_> = techcorp.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![router.id, from_bob.id]);

    let mine = fx.store.list(
        &ComplaintFilter::by_author(fx.alice.id).with_text("ROUTER"),
        SortOrder::Newest,
    );
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, router.id);

    let by_company_text = fx
        .store
        .list(&ComplaintFilter::default().with_text("powerco"), SortOrder::Newest);
    assert_eq!(by_company_text.len(), 1);
    assert_eq!(by_company_text[0].id, bill.id);

    let admin = fx.admin.id;
    fx.store
        .update_status(&bill.id, ComplaintStatus::Resolved, &admin)?;
    let resolved = fx.store.list(
        &ComplaintFilter::default().with_status(ComplaintStatus::Resolved),
        SortOrder::Newest,
    );
    assert_eq!(resolved.len(), 1);

    // Offline store: every complaint carries the neutral sentinel.
    let neutral = fx.store.list(
        &ComplaintFilter::default().with_sentiment(SentimentLabel::Neutral),
        SortOrder::Newest,
    );
    assert_eq!(neutral.len(), 3);
    Ok(())
}

#[test]
fn sort_orders_rank_by_votes_and_age() -> Result<()> {
    let mut fx = StoreFixture::new();
    let first = fx.file("First", "Co")?;
    let second = fx.file("Second", "Co")?;
    let third = fx.file("Third", "Co")?;
    let (alice, bob, business) = (fx.alice.id, fx.bob.id, fx.techcorp.id);
    fx.store.toggle_upvote(&third.id, &alice)?;
    fx.store.toggle_upvote(&third.id, &bob)?;
    fx.store.toggle_upvote(&second.id, &business)?;
    fx.store.toggle_downvote(&first.id, &bob)?;

    let ranked: Vec<_> = fx
        .store
        .list(&ComplaintFilter::default(), SortOrder::MostUpvoted)
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ranked, vec![third.id, second.id, first.id]);

    let newest: Vec<_> = fx
        .store
        .list(&ComplaintFilter::default(), SortOrder::Newest)
        .iter()
        .map(|c| c.task_seq)
        .collect();
    assert_eq!(newest, vec![3, 2, 1]);

    let by_impact = fx
        .store
        .list(&ComplaintFilter::default(), SortOrder::HighestImpact);
    assert!(by_impact
        .windows(2)
        .all(|pair| pair[0].impact_score >= pair[1].impact_score));
    Ok(())
}

#[test]
fn company_stats_count_statuses_and_ratings() -> Result<()> {
    let mut fx = StoreFixture::new();
    let a = fx.file("A", "TechCorp")?;
    let b = fx.file("B", "TechCorp")?;
    fx.file("C", "TechCorp")?;
    fx.file("D", "Elsewhere")?;
    let admin = fx.admin.id;
    fx.store.update_status(&a.id, ComplaintStatus::Resolved, &admin)?;
    fx.store.update_status(&b.id, ComplaintStatus::Resolved, &admin)?;
    fx.store.submit_feedback(&a.id, 4, "")?;
    fx.store.submit_feedback(&b.id, 2, "slow")?;

    let stats = fx.store.company_stats("TechCorp");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_status.get("RESOLVED"), Some(&2));
    assert_eq!(stats.by_status.get("OPEN"), Some(&1));
    assert_eq!(stats.by_status.get("ESCALATED"), Some(&0));
    assert!((stats.resolution_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.average_rating, Some(3.0));

    let empty = fx.store.company_stats("Nobody");
    assert_eq!(empty.total, 0);
    assert_eq!(empty.resolution_rate, 0.0);
    assert_eq!(empty.average_rating, None);
    Ok(())
}

#[test]
fn task_keys_resolve_to_complaints() -> Result<()> {
    let mut fx = StoreFixture::new();
    fx.file("First", "Co")?;
    let second = fx.file("Second", "Co")?;
    assert_eq!(
        fx.store.complaint_by_task_key("task-2").map(|c| c.id),
        Some(second.id)
    );
    assert!(fx.store.complaint_by_task_key("TASK-99").is_none());
    Ok(())
}
