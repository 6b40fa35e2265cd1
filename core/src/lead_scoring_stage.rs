//! Lead scoring: one intent score per contact email.
//!
//! score = Σ points of each scored action PRESENT in the history
//!       + points_per_touch × number of touches
//! capped at max_score. Presence, not count: three demo requests
//! earn the demo points once. Order of touches does not matter.

use crate::{
    config::LeadScoringConfig,
    error::ReportResult,
    event::BatchEvent,
    records::{ActionType, MarketingTouch},
    stage::{BatchStage, BatchState},
    types::ContactEmail,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeadScore {
    pub contact_email: ContactEmail,
    pub lead_score:    u32,
}

/// Score one contact's touch history.
pub fn score_contact<'a, I>(actions: I, config: &LeadScoringConfig) -> u32
where
    I: IntoIterator<Item = &'a ActionType>,
{
    let mut present: BTreeSet<&ActionType> = BTreeSet::new();
    let mut touches: u32 = 0;
    for action in actions {
        present.insert(action);
        touches = touches.saturating_add(1);
    }

    let intent: u32 = present.iter().map(|a| config.points_for(a)).sum();
    let volume = touches.saturating_mul(config.points_per_touch);
    intent.saturating_add(volume).min(config.max_score)
}

/// Scores for every contact, highest first; ties by email.
pub fn score_leads(touches: &[MarketingTouch], config: &LeadScoringConfig) -> Vec<LeadScore> {
    let mut by_contact: BTreeMap<&str, Vec<&ActionType>> = BTreeMap::new();
    for touch in touches {
        by_contact
            .entry(touch.contact_email.as_str())
            .or_default()
            .push(&touch.action);
    }

    let mut scores: Vec<LeadScore> = by_contact
        .into_iter()
        .map(|(email, actions)| LeadScore {
            contact_email: email.to_string(),
            lead_score:    score_contact(actions, config),
        })
        .collect();

    scores.sort_by(|a, b| {
        b.lead_score
            .cmp(&a.lead_score)
            .then_with(|| a.contact_email.cmp(&b.contact_email))
    });
    scores
}

pub struct LeadScoringStage {
    config: LeadScoringConfig,
}

impl LeadScoringStage {
    pub fn new(config: LeadScoringConfig) -> Self {
        Self { config }
    }
}

impl BatchStage for LeadScoringStage {
    fn name(&self) -> &'static str {
        "lead_scoring"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let scores = score_leads(state.touches()?, &self.config);
        log::debug!("lead_scoring: scored {} contacts", scores.len());

        let rows = scores.len();
        state.lead_scores = Some(scores);
        Ok(vec![BatchEvent::LeadScoresBuilt { rows }])
    }
}
