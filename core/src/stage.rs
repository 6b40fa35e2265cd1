//! Stage trait and the shared batch state.
//!
//! RULE: Every pipeline step implements BatchStage.
//! The engine calls run() on each registered stage once per batch,
//! in registration order. Order is fixed and documented in engine.rs.
//!
//! A stage reads the input tables and the outputs of earlier stages,
//! and fills exactly one output slot of its own. Slots are written
//! once; no stage rewrites another stage's output.

use crate::{
    aggregation_stage::CommissionReportRow,
    attribution_stage::RoiReportRow,
    error::{ReportError, ReportResult},
    event::BatchEvent,
    identifier_stage::ExtractedPayment,
    lead_scoring_stage::LeadScore,
    reconciliation_stage::{ReconciledPayment, Reconciliation},
    records::{AdSpendRecord, Deal, InputTables, MarketingTouch, Payment},
    clawback_stage::ClawbackOutcome,
};

/// The contract every stage must fulfill.
pub trait BatchStage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Run once per batch. Returns the events to append to the log.
    ///
    /// A missing input surfaces as an error for which
    /// `ReportError::is_missing_input` holds; the engine then skips
    /// this stage and carries on with the rest.
    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>>;
}

/// Input tables plus every derived table, filled stage by stage.
#[derive(Debug, Default)]
pub struct BatchState {
    pub inputs:            InputTables,
    pub extracted:         Option<Vec<ExtractedPayment>>,
    pub reconciliation:    Option<Reconciliation>,
    pub commissioned:      Option<Vec<ReconciledPayment>>,
    pub clawback:          Option<ClawbackOutcome>,
    pub commission_report: Option<Vec<CommissionReportRow>>,
    pub roi_report:        Option<Vec<RoiReportRow>>,
    pub lead_scores:       Option<Vec<LeadScore>>,
}

impl BatchState {
    pub fn new(inputs: InputTables) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn deals(&self) -> ReportResult<&[Deal]> {
        self.inputs
            .deals
            .as_deref()
            .ok_or(ReportError::MissingTable { table: "deals" })
    }

    pub fn payments(&self) -> ReportResult<&[Payment]> {
        self.inputs
            .payments
            .as_deref()
            .ok_or(ReportError::MissingTable { table: "payments" })
    }

    pub fn touches(&self) -> ReportResult<&[MarketingTouch]> {
        self.inputs
            .touches
            .as_deref()
            .ok_or(ReportError::MissingTable { table: "marketing_touches" })
    }

    pub fn ad_spend(&self) -> ReportResult<&[AdSpendRecord]> {
        self.inputs
            .ad_spend
            .as_deref()
            .ok_or(ReportError::MissingTable { table: "ad_spend" })
    }

    /// Look up an earlier stage's output, or report it as skipped.
    pub fn upstream<'a, T>(slot: &'a Option<T>, stage: &'static str) -> ReportResult<&'a T> {
        slot.as_ref().ok_or(ReportError::UpstreamSkipped { stage })
    }
}
