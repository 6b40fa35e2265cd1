//! Rep/quarter aggregation: the final commission report.
//!
//! Groups matched, succeeded payments by (owner, calendar quarter of the
//! payment date). Per group:
//!   total_paid            = Σ payment amount
//!   total_base_commission = Σ base commission
//!   tier_bonus            = apply_tier(total_paid)
//!   total_clawback        = Σ base commission of refund-flagged payments
//!   final_commission      = base + tier − clawback   (no floor at zero)
//!
//! Tiering is scoped to the (rep, quarter) group of this run, not a
//! year-to-date running total.

use crate::{
    config::TierConfig,
    error::ReportResult,
    event::BatchEvent,
    money::round_cents,
    quarter::FiscalQuarter,
    reconciliation_stage::ReconciledPayment,
    stage::{BatchStage, BatchState},
    types::{Money, RepName},
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommissionReportRow {
    pub owner_name:            RepName,
    pub quarter:               FiscalQuarter,
    pub total_paid:            Money,
    pub total_base_commission: Money,
    pub tier_bonus:            Money,
    pub total_clawback:        Money,
    pub final_commission:      Money,
}

/// Accelerator bonus on a group's total paid.
///
/// ≤ threshold_1: nothing. Up to threshold_2: tier_1_rate on the excess
/// over threshold_1. Above threshold_2: the full tier-1 band plus
/// tier_2_rate on the excess over threshold_2.
pub fn apply_tier(total_paid: Money, tier: &TierConfig) -> Money {
    let bonus = if total_paid > tier.threshold_2 {
        (total_paid - tier.threshold_2) * tier.tier_2_rate
            + (tier.threshold_2 - tier.threshold_1) * tier.tier_1_rate
    } else if total_paid > tier.threshold_1 {
        (total_paid - tier.threshold_1) * tier.tier_1_rate
    } else {
        0.0
    };
    round_cents(bonus)
}

#[derive(Default)]
struct Bucket {
    paid:      Money,
    base:      Money,
    clawback:  Money,
}

pub fn aggregate(rows: &[ReconciledPayment], tier: &TierConfig) -> Vec<CommissionReportRow> {
    let mut buckets: BTreeMap<(RepName, FiscalQuarter), Bucket> = BTreeMap::new();
    let mut undated = 0usize;

    for row in rows.iter().filter(|r| r.is_matched()) {
        let (Some(owner), Some(quarter)) = (row.owner(), row.quarter()) else {
            undated += 1;
            continue;
        };
        let bucket = buckets.entry((owner.to_string(), quarter)).or_default();
        bucket.paid += row.payment.amount;
        bucket.base += row.base_commission;
        if row.deal_has_refund {
            bucket.clawback += row.base_commission;
        }
    }

    if undated > 0 {
        log::warn!("aggregation: {undated} matched payments have no payment date and were left out");
    }

    buckets
        .into_iter()
        .map(|((owner_name, quarter), b)| {
            let total_paid = round_cents(b.paid);
            let total_base_commission = round_cents(b.base);
            let tier_bonus = apply_tier(total_paid, tier);
            let total_clawback = round_cents(b.clawback);
            CommissionReportRow {
                owner_name,
                quarter,
                total_paid,
                total_base_commission,
                tier_bonus,
                total_clawback,
                final_commission: round_cents(
                    total_base_commission + tier_bonus - total_clawback,
                ),
            }
        })
        .collect()
}

pub struct AggregationStage {
    tier: TierConfig,
}

impl AggregationStage {
    pub fn new(tier: TierConfig) -> Self {
        Self { tier }
    }
}

impl BatchStage for AggregationStage {
    fn name(&self) -> &'static str {
        "aggregation"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let clawback = BatchState::upstream(&state.clawback, "clawback")?;
        let report = aggregate(&clawback.rows, &self.tier);

        let negative = report.iter().filter(|r| r.final_commission < 0.0).count();
        if negative > 0 {
            log::info!("aggregation: {negative} rep/quarter rows end negative after clawbacks");
        }
        log::debug!("aggregation: {} rep/quarter rows", report.len());

        let rows = report.len();
        state.commission_report = Some(report);
        Ok(vec![BatchEvent::CommissionReportBuilt { rows }])
    }
}
