//! Clawback detection: flags every reconciled payment whose deal has
//! at least one refund.
//!
//! Deal-level, all-or-nothing: one refund of any size or date marks ALL
//! payments of that deal, and the aggregation stage claws back their
//! full base commission. There is no proportional partial clawback.

use crate::{
    error::ReportResult,
    event::BatchEvent,
    identifier_stage::ExtractedPayment,
    reconciliation_stage::ReconciledPayment,
    records::PaymentStatus,
    stage::{BatchStage, BatchState},
    types::DealId,
};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClawbackOutcome {
    pub rows:              Vec<ReconciledPayment>,
    /// Every id found in a refund description, matched to a deal or not.
    pub refunded_deal_ids: BTreeSet<DealId>,
}

/// Ids extracted from refund-status payment descriptions.
pub fn refunded_deal_ids(extracted: &[ExtractedPayment]) -> BTreeSet<DealId> {
    extracted
        .iter()
        .filter(|e| e.payment.status == PaymentStatus::Refunded)
        .filter_map(|e| e.deal_id.clone())
        .collect()
}

/// New rows with `deal_has_refund` set from the refunded-id set.
pub fn flag_refunds(
    rows: &[ReconciledPayment],
    refunded: &BTreeSet<DealId>,
) -> Vec<ReconciledPayment> {
    rows.iter()
        .map(|row| ReconciledPayment {
            deal_has_refund: row.deal_id().is_some_and(|id| refunded.contains(id)),
            ..row.clone()
        })
        .collect()
}

pub struct ClawbackStage;

impl BatchStage for ClawbackStage {
    fn name(&self) -> &'static str {
        "clawback"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let extracted = BatchState::upstream(&state.extracted, "identifier")?;
        let commissioned = BatchState::upstream(&state.commissioned, "commission")?;

        let refunded = refunded_deal_ids(extracted);
        let rows = flag_refunds(commissioned, &refunded);

        let mut flagged: BTreeMap<&str, usize> = BTreeMap::new();
        for id in rows.iter().filter(|r| r.deal_has_refund).filter_map(|r| r.deal_id()) {
            *flagged.entry(id).or_insert(0) += 1;
        }

        log::info!(
            "clawback: {} refunded deal ids, {} deals with clawed-back payments",
            refunded.len(),
            flagged.len()
        );

        let events = flagged
            .into_iter()
            .map(|(deal_id, payments)| BatchEvent::ClawbackFlagged {
                deal_id: deal_id.to_string(),
                payments,
            })
            .collect();

        state.clawback = Some(ClawbackOutcome {
            rows,
            refunded_deal_ids: refunded,
        });
        Ok(events)
    }
}
