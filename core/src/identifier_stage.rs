//! Identifier extraction: pulls an embedded CRM opportunity id out of
//! free-text payment descriptions.
//!
//! Pattern: literal `006` followed by 12–15 alphanumerics, case-insensitive,
//! first match wins. There is no fuzzy fallback: an id that is truncated,
//! split across words or broken up by punctuation is simply not found, and
//! the payment stays unmatched.

use crate::{
    error::ReportResult,
    event::BatchEvent,
    records::Payment,
    stage::{BatchStage, BatchState},
    types::DealId,
};
use regex::Regex;
use std::sync::OnceLock;

fn re_opportunity_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)006[a-z0-9]{12,15}").expect("opportunity id pattern"))
}

/// First embedded opportunity id in `description`, if any.
pub fn extract_deal_id(description: &str) -> Option<DealId> {
    re_opportunity_id()
        .find(description)
        .map(|m| m.as_str().to_string())
}

/// A payment enriched with the id found in its description.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPayment {
    pub payment: Payment,
    pub deal_id: Option<DealId>,
}

pub fn extract_all(payments: &[Payment]) -> Vec<ExtractedPayment> {
    payments
        .iter()
        .map(|p| ExtractedPayment {
            payment: p.clone(),
            deal_id: extract_deal_id(&p.description),
        })
        .collect()
}

pub struct IdentifierStage;

impl BatchStage for IdentifierStage {
    fn name(&self) -> &'static str {
        "identifier"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let extracted = extract_all(state.payments()?);
        let found = extracted.iter().filter(|e| e.deal_id.is_some()).count();

        log::debug!(
            "identifier: extracted ids from {found} of {} payment descriptions",
            extracted.len()
        );

        let event = BatchEvent::IdentifiersExtracted {
            payments:  extracted.len(),
            extracted: found,
        };
        state.extracted = Some(extracted);
        Ok(vec![event])
    }
}
