//! Deal-payment reconciliation: joins succeeded finance payments to
//! Closed Won CRM deals on the extracted opportunity id.
//!
//! Rules:
//!   - Left outer join: every succeeded payment yields exactly one row,
//!     matched (deal attached) or unmatched (deal = None).
//!   - Refunded and failed payments never enter the join.
//!   - Unmatched rows are kept for visibility; they carry no rep, so
//!     they earn no commission and are left out of rep/quarter totals.
//!   - Duplicate Closed Won ids: the first deal in input order wins,
//!     unless `strict_deal_ids` is set.

use crate::{
    config::ReconciliationConfig,
    error::{ReportError, ReportResult},
    event::BatchEvent,
    identifier_stage::ExtractedPayment,
    money::round_cents,
    quarter::FiscalQuarter,
    records::{Deal, Payment, PaymentStatus},
    stage::{BatchStage, BatchState},
    types::{DealId, Money},
};
use std::collections::{BTreeMap, HashMap};

/// A succeeded payment with its 0-or-1 matched deal and derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledPayment {
    pub payment:           Payment,
    pub extracted_deal_id: Option<DealId>,
    pub deal:              Option<Deal>,
    /// Set by the commission stage.
    pub base_commission:   Money,
    /// Set by the clawback stage.
    pub deal_has_refund:   bool,
}

impl ReconciledPayment {
    pub fn is_matched(&self) -> bool {
        self.deal.is_some()
    }

    pub fn deal_id(&self) -> Option<&str> {
        self.deal.as_ref().map(|d| d.deal_id.as_str())
    }

    pub fn owner(&self) -> Option<&str> {
        self.deal.as_ref().map(|d| d.owner_name.as_str())
    }

    pub fn quarter(&self) -> Option<FiscalQuarter> {
        self.payment.payment_date.map(FiscalQuarter::from_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationSummary {
    pub succeeded_payments: usize,
    pub matched:            usize,
    pub unmatched:          usize,
    pub unmatched_amount:   Money,
    /// Closed Won ids shared by more than one deal, with their counts.
    pub duplicate_deal_ids: Vec<(DealId, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub rows:    Vec<ReconciledPayment>,
    pub summary: ReconciliationSummary,
}

/// Index Closed Won deals by id, first occurrence wins.
/// Returns the index and any ids seen more than once.
fn index_closed_won(deals: &[Deal]) -> (HashMap<&str, &Deal>, Vec<(DealId, usize)>) {
    let mut index: HashMap<&str, &Deal> = HashMap::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

    for deal in deals.iter().filter(|d| d.is_closed_won()) {
        *counts.entry(deal.deal_id.as_str()).or_insert(0) += 1;
        index.entry(deal.deal_id.as_str()).or_insert(deal);
    }

    let duplicates = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, count)| (id.to_string(), count))
        .collect();

    (index, duplicates)
}

pub fn reconcile(
    extracted: &[ExtractedPayment],
    deals: &[Deal],
    config: &ReconciliationConfig,
) -> ReportResult<Reconciliation> {
    let (index, duplicate_deal_ids) = index_closed_won(deals);

    if config.strict_deal_ids {
        if let Some((deal_id, count)) = duplicate_deal_ids.first() {
            return Err(ReportError::MatchAmbiguity {
                deal_id: deal_id.clone(),
                count:   *count,
            });
        }
    }

    let rows: Vec<ReconciledPayment> = extracted
        .iter()
        .filter(|e| e.payment.status == PaymentStatus::Succeeded)
        .map(|e| ReconciledPayment {
            payment:           e.payment.clone(),
            extracted_deal_id: e.deal_id.clone(),
            deal:              e
                .deal_id
                .as_deref()
                .and_then(|id| index.get(id))
                .map(|d| (*d).clone()),
            base_commission:   0.0,
            deal_has_refund:   false,
        })
        .collect();

    let matched = rows.iter().filter(|r| r.is_matched()).count();
    let unmatched_amount = round_cents(
        rows.iter()
            .filter(|r| !r.is_matched())
            .map(|r| r.payment.amount)
            .sum(),
    );

    let summary = ReconciliationSummary {
        succeeded_payments: rows.len(),
        matched,
        unmatched: rows.len() - matched,
        unmatched_amount,
        duplicate_deal_ids,
    };

    Ok(Reconciliation { rows, summary })
}

pub struct ReconciliationStage {
    config: ReconciliationConfig,
}

impl ReconciliationStage {
    pub fn new(config: ReconciliationConfig) -> Self {
        Self { config }
    }
}

impl BatchStage for ReconciliationStage {
    fn name(&self) -> &'static str {
        "reconciliation"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let deals = state.deals()?;
        let extracted = BatchState::upstream(&state.extracted, "identifier")?;
        let reconciliation = reconcile(extracted, deals, &self.config)?;

        let mut events = Vec::new();
        for (deal_id, count) in &reconciliation.summary.duplicate_deal_ids {
            log::warn!(
                "reconciliation: deal id {deal_id} appears on {count} Closed Won deals; matching the first"
            );
            events.push(BatchEvent::DuplicateDealId {
                deal_id: deal_id.clone(),
                count:   *count,
            });
        }

        let summary = &reconciliation.summary;
        log::debug!(
            "reconciliation: {} succeeded payments, {} matched",
            summary.succeeded_payments,
            summary.matched
        );
        if summary.unmatched > 0 {
            log::info!(
                "reconciliation: {} of {} succeeded payments unmatched (${:.2})",
                summary.unmatched,
                summary.succeeded_payments,
                summary.unmatched_amount
            );
        }
        events.push(BatchEvent::PaymentsReconciled {
            matched:          summary.matched,
            unmatched:        summary.unmatched,
            unmatched_amount: summary.unmatched_amount,
        });

        state.reconciliation = Some(reconciliation);
        Ok(events)
    }
}
