//! Integration tests: per-contact lead scores.

use commission_core::{
    config::LeadScoringConfig,
    lead_scoring_stage::{score_contact, score_leads},
    records::{ActionType, MarketingTouch},
};

fn touch(email: &str, action: ActionType) -> MarketingTouch {
    MarketingTouch {
        contact_email:   email.into(),
        touched_at:      None,
        campaign_source: "Organic Search".into(),
        action,
        associated_deal: None,
    }
}

fn website_visit() -> ActionType {
    ActionType::Other("Website Visit".into())
}

#[test]
fn actions_score_on_presence_not_count() {
    let config = LeadScoringConfig::default();
    let actions = vec![
        ActionType::DemoRequested,
        ActionType::DemoRequested,
        ActionType::DemoRequested,
    ];

    // 50 once, plus 1 per touch.
    assert_eq!(score_contact(&actions, &config), 53);
}

#[test]
fn low_intent_touches_add_one_point_each() {
    let config = LeadScoringConfig::default();
    let actions = vec![website_visit(), website_visit(), ActionType::WebinarAttended];

    assert_eq!(score_contact(&actions, &config), 13);
}

#[test]
fn score_is_capped() {
    let config = LeadScoringConfig::default();
    let actions = vec![
        ActionType::DemoRequested,
        ActionType::TrialStarted,
        ActionType::ContactUsFormSubmitted,
        ActionType::PricingPageViewed,
    ];

    assert_eq!(score_contact(&actions, &config), 100);
}

#[test]
fn touch_order_does_not_matter() {
    let config = LeadScoringConfig::default();
    let forward = vec![ActionType::PricingPageViewed, website_visit(), ActionType::CaseStudyDownloaded];
    let mut backward = forward.clone();
    backward.reverse();

    assert_eq!(score_contact(&forward, &config), score_contact(&backward, &config));
}

#[test]
fn leads_sorted_by_score_then_email() {
    let touches = vec![
        touch("zoe@example.com", ActionType::PricingPageViewed),
        touch("amy@example.com", website_visit()),
        touch("bob@example.com", ActionType::PricingPageViewed),
        touch("amy@example.com", ActionType::DemoRequested),
    ];

    let scores = score_leads(&touches, &LeadScoringConfig::default());

    let ranked: Vec<(&str, u32)> = scores
        .iter()
        .map(|s| (s.contact_email.as_str(), s.lead_score))
        .collect();
    assert_eq!(
        ranked,
        vec![("amy@example.com", 52), ("bob@example.com", 21), ("zoe@example.com", 21)]
    );
}

#[test]
fn no_touches_no_scores() {
    assert!(score_leads(&[], &LeadScoringConfig::default()).is_empty());
}
