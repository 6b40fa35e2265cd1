//! Base commission per reconciled payment.
//!
//! rate = base_rate + product modifier (SaaS +2%, Hardware −2%, else 0)
//! commission = round_cents(payment amount × rate)
//!
//! Per payment, not per deal: three installments earn three independent
//! amounts. Unmatched or non-succeeded payments earn zero, and no
//! payment earns less than zero.

use crate::{
    config::CommissionConfig,
    error::ReportResult,
    event::BatchEvent,
    money::round_cents,
    reconciliation_stage::ReconciledPayment,
    records::PaymentStatus,
    stage::{BatchStage, BatchState},
    types::Money,
};

pub fn base_commission(row: &ReconciledPayment, config: &CommissionConfig) -> Money {
    let deal = match &row.deal {
        Some(d) if row.payment.status == PaymentStatus::Succeeded => d,
        _ => return 0.0,
    };
    round_cents((row.payment.amount * config.rate_for(&deal.product_type)).max(0.0))
}

/// New rows carrying their base commission.
pub fn apply_commissions(
    rows: &[ReconciledPayment],
    config: &CommissionConfig,
) -> Vec<ReconciledPayment> {
    rows.iter()
        .map(|row| ReconciledPayment {
            base_commission: base_commission(row, config),
            ..row.clone()
        })
        .collect()
}

pub struct CommissionStage {
    config: CommissionConfig,
}

impl CommissionStage {
    pub fn new(config: CommissionConfig) -> Self {
        Self { config }
    }
}

impl BatchStage for CommissionStage {
    fn name(&self) -> &'static str {
        "commission"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let reconciliation = BatchState::upstream(&state.reconciliation, "reconciliation")?;
        let rows = apply_commissions(&reconciliation.rows, &self.config);

        let earning = rows.iter().filter(|r| r.base_commission != 0.0).count();
        let total_commission = round_cents(rows.iter().map(|r| r.base_commission).sum());

        log::debug!("commission: {earning} payments earn ${total_commission:.2} base commission");

        state.commissioned = Some(rows);
        Ok(vec![BatchEvent::CommissionsComputed {
            payments: earning,
            total_commission,
        }])
    }
}
