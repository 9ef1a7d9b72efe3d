use crate::support::StoreFixture;
use anyhow::Result;
use complaintdesk::models::{NewComment, SentimentData, SentimentLabel};
use complaintdesk::threads;
use complaintdesk::Outcome;
use uuid::Uuid;

#[test]
fn business_comments_are_official_responses() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Invoice shows extra fees", "TechCorp")?;
    let (bob, business) = (fx.bob.id, fx.techcorp.id);

    let from_customer = fx
        .store
        .add_comment(&complaint.id, &bob, NewComment::text("Same here."))?;
    let from_business = fx.store.add_comment(
        &complaint.id,
        &business,
        NewComment::text("We are reviewing the invoice."),
    )?;

    assert!(!from_customer.is_official_response);
    assert!(from_business.is_official_response);
    let stored = fx.current(&complaint);
    assert_eq!(stored.comments.len(), 2);
    assert_eq!(stored.comments[0].id, from_customer.id);
    assert_eq!(stored.comments[1].author_name, "Tess Corp");
    Ok(())
}

#[test]
fn nested_reply_lands_under_its_parent() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Cold food delivered", "FoodNow")?;
    let (alice, bob) = (fx.alice.id, fx.bob.id);

    let root = fx
        .store
        .add_comment(&complaint.id, &bob, NewComment::text("Happened to me too"))?;
    let reply = fx.store.add_comment(
        &complaint.id,
        &alice,
        NewComment::reply_to(root.id, "Did they refund you?"),
    )?;
    let before = threads::count(&fx.current(&complaint).comments);
    let nested = fx.store.add_comment(
        &complaint.id,
        &bob,
        NewComment::reply_to(reply.id, "Only partially"),
    )?;

    let comments = fx.current(&complaint).comments;
    assert_eq!(threads::count(&comments), before + 1);
    assert_eq!(comments.len(), 1, "replies never become roots");
    assert_eq!(threads::depth_of(&comments, &nested.id), Some(2));
    let parent = threads::find(&comments, &reply.id).expect("reply stored");
    assert_eq!(parent.replies.last().map(|c| c.id), Some(nested.id));
    Ok(())
}

#[test]
fn reply_to_unknown_parent_is_rejected_without_side_effects() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Package lost", "ShipIt")?;
    let bob = fx.bob.id;
    fx.store
        .add_comment(&complaint.id, &bob, NewComment::text("Any update?"))?;
    let before = fx.current(&complaint);
    let saves = fx.snapshots.save_count();

    let err = fx
        .store
        .add_comment(
            &complaint.id,
            &bob,
            NewComment::reply_to(Uuid::new_v4(), "hello?"),
        )
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(fx.current(&complaint), before);
    assert_eq!(fx.snapshots.save_count(), saves);
    Ok(())
}

#[test]
fn supplied_sentiment_is_kept_and_missing_one_gets_the_sentinel() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Rude staff", "ShopCo")?;
    let bob = fx.bob.id;
    let tagged = SentimentData::new(-0.8, SentimentLabel::Negative, "Angry", "English");

    let with_sentiment = fx.store.add_comment(
        &complaint.id,
        &bob,
        NewComment::text("Unacceptable").with_sentiment(tagged.clone()),
    )?;
    let without = fx
        .store
        .add_comment(&complaint.id, &bob, NewComment::text("Agreed"))?;

    let comments = fx.current(&complaint).comments;
    let stored = threads::find(&comments, &with_sentiment.id).expect("stored");
    assert_eq!(stored.sentiment.as_ref(), Some(&tagged));
    let stored = threads::find(&comments, &without.id).expect("stored");
    assert!(stored
        .sentiment
        .as_ref()
        .is_some_and(SentimentData::is_unavailable));
    Ok(())
}

#[test]
fn comment_upvotes_toggle_and_reports_are_idempotent() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Noisy line", "TechCorp")?;
    let (alice, bob) = (fx.alice.id, fx.bob.id);
    let comment = fx
        .store
        .add_comment(&complaint.id, &bob, NewComment::text("Static all day"))?;

    fx.store
        .toggle_comment_upvote(&complaint.id, &comment.id, &alice)?;
    let comments = fx.current(&complaint).comments;
    assert_eq!(threads::find(&comments, &comment.id).map(|c| c.upvote_count()), Some(1));
    fx.store
        .toggle_comment_upvote(&complaint.id, &comment.id, &alice)?;
    let comments = fx.current(&complaint).comments;
    assert_eq!(threads::find(&comments, &comment.id).map(|c| c.upvote_count()), Some(0));

    assert_eq!(
        fx.store.report_comment(&complaint.id, &comment.id, &alice)?,
        Outcome::Applied
    );
    assert_eq!(
        fx.store.report_comment(&complaint.id, &comment.id, &alice)?,
        Outcome::Unchanged
    );
    let comments = fx.current(&complaint).comments;
    let reported = threads::find(&comments, &comment.id).expect("stored");
    assert_eq!(reported.reported_by.len(), 1);

    let missing = Uuid::new_v4();
    assert!(fx
        .store
        .report_comment(&complaint.id, &missing, &alice)
        .unwrap_err()
        .is_not_found());
    assert!(fx
        .store
        .toggle_comment_upvote(&complaint.id, &missing, &alice)
        .unwrap_err()
        .is_not_found());
    Ok(())
}

#[test]
fn top_contributor_ignores_official_responses() -> Result<()> {
    let mut fx = StoreFixture::new();
    let complaint = fx.file("Outage all weekend", "TechCorp")?;
    let (alice, bob, business, admin) = (fx.alice.id, fx.bob.id, fx.techcorp.id, fx.admin.id);

    assert_eq!(fx.store.top_contributor(&complaint.id)?, None);

    let community = fx
        .store
        .add_comment(&complaint.id, &bob, NewComment::text("Down here as well"))?;
    let official = fx.store.add_comment(
        &complaint.id,
        &business,
        NewComment::reply_to(community.id, "Engineers are on site."),
    )?;
    for voter in [alice, admin, business] {
        fx.store
            .toggle_comment_upvote(&complaint.id, &community.id, &voter)?;
    }
    // Five upvotes on the official reply would win if it counted.
    let extra: Vec<Uuid> = (0..2)
        .map(|i| {
            fx.store
                .register_user(complaintdesk::models::NewUser::customer(
                    &format!("Voter {i}"),
                    &format!("voter{i}@example.com"),
                    "pw",
                ))
                .map(|user| user.id)
        })
        .collect::<Result<_, _>>()?;
    for voter in [alice, bob, admin].into_iter().chain(extra) {
        fx.store
            .toggle_comment_upvote(&complaint.id, &official.id, &voter)?;
    }

    let top = fx.store.top_contributor(&complaint.id)?.expect("a contributor");
    assert_eq!(top.user_id, bob);
    assert_eq!(top.score, 3);
    Ok(())
}

#[test]
fn flagged_comments_reach_the_moderation_queue() -> Result<()> {
    let mut fx = StoreFixture::new();
    let first = fx.file("Spam calls", "TechCorp")?;
    let second = fx.file("Spam texts", "TechCorp")?;
    let (alice, bob) = (fx.alice.id, fx.bob.id);
    let root = fx
        .store
        .add_comment(&first.id, &bob, NewComment::text("buy cheap watches"))?;
    let reply = fx.store.add_comment(
        &second.id,
        &bob,
        NewComment::text("click this link"),
    )?;
    fx.store
        .add_comment(&second.id, &alice, NewComment::text("Legit comment"))?;
    fx.store.report_comment(&first.id, &root.id, &alice)?;
    fx.store.report_comment(&second.id, &reply.id, &alice)?;

    let flagged = fx.store.flagged_comments();
    assert_eq!(flagged.len(), 2);
    assert_eq!(flagged[0].complaint_id, first.id);
    assert_eq!(flagged[0].comment.id, root.id);
    assert_eq!(flagged[1].comment.id, reply.id);
    Ok(())
}
