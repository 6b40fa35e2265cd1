//! The batch engine. Runs every stage once over one input set.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Identifier extraction   (payments)
//!   2. Reconciliation          (extracted payments + deals)
//!   3. Commission              (reconciled rows)
//!   4. Clawback                (commissioned rows + refunds)
//!   5. Aggregation             (flagged rows → commission report)
//!   6. Attribution / ROI       (ad spend + deals)
//!   7. Lead scoring            (marketing touches)
//!
//! RULES:
//!   - Later stages depend on derived tables of earlier ones.
//!   - A stage whose input is missing is skipped, and so is everything
//!     downstream of it; independent pipelines still run.
//!   - Any other stage error aborts the batch.
//!   - The batch is stateless: same input, same reports, same event log.

use crate::{
    aggregation_stage::{AggregationStage, CommissionReportRow},
    attribution_stage::{AttributionStage, RoiReportRow},
    clawback_stage::ClawbackStage,
    commission_stage::CommissionStage,
    config::AnalyzerConfig,
    error::ReportResult,
    event::{BatchEvent, EventLogEntry},
    identifier_stage::IdentifierStage,
    lead_scoring_stage::{LeadScore, LeadScoringStage},
    reconciliation_stage::{ReconciledPayment, ReconciliationSummary, ReconciliationStage},
    records::InputTables,
    stage::{BatchStage, BatchState},
};

/// Everything a batch produces, for the report writers.
#[derive(Debug)]
pub struct BatchOutcome {
    pub commission_report: Option<Vec<CommissionReportRow>>,
    pub roi_report:        Option<Vec<RoiReportRow>>,
    pub lead_scores:       Option<Vec<LeadScore>>,
    /// Final reconciled rows, with commission and refund flags.
    pub reconciled:        Option<Vec<ReconciledPayment>>,
    pub summary:           Option<ReconciliationSummary>,
    pub events:            Vec<EventLogEntry>,
}

/// Appends events with a running sequence number.
struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn append(&mut self, stage: &str, event: &BatchEvent) -> ReportResult<()> {
        let entry = EventLogEntry {
            seq:        self.entries.len() as u64,
            stage:      stage.to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(event)?,
        };
        self.entries.push(entry);
        Ok(())
    }
}

pub struct ReportEngine {
    stages: Vec<Box<dyn BatchStage>>,
}

impl ReportEngine {
    /// An engine with no stages registered.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Build a fully wired engine with all stages registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(config: &AnalyzerConfig) -> Self {
        let mut engine = Self::new();

        // EXECUTION ORDER: fixed, see module docs.
        engine.register(Box::new(IdentifierStage));
        engine.register(Box::new(ReconciliationStage::new(config.reconciliation.clone())));
        engine.register(Box::new(CommissionStage::new(config.commission.clone())));
        engine.register(Box::new(ClawbackStage));
        engine.register(Box::new(AggregationStage::new(config.commission.tier.clone())));
        engine.register(Box::new(AttributionStage::new(config.attribution.clone())));
        engine.register(Box::new(LeadScoringStage::new(config.lead_scoring.clone())));
        engine
    }

    /// Register a stage. Call in the documented execution order.
    pub fn register(&mut self, stage: Box<dyn BatchStage>) {
        self.stages.push(stage);
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage once over `inputs`.
    pub fn run(&self, inputs: InputTables) -> ReportResult<BatchOutcome> {
        let mut log = EventLog::new();

        log.append(
            "engine",
            &BatchEvent::BatchStarted {
                deals:    inputs.deals.as_ref().map_or(0, Vec::len),
                payments: inputs.payments.as_ref().map_or(0, Vec::len),
                touches:  inputs.touches.as_ref().map_or(0, Vec::len),
                ad_spend: inputs.ad_spend.as_ref().map_or(0, Vec::len),
            },
        )?;

        for (table, present) in [
            ("deals", inputs.deals.is_some()),
            ("payments", inputs.payments.is_some()),
            ("marketing_touches", inputs.touches.is_some()),
            ("ad_spend", inputs.ad_spend.is_some()),
        ] {
            if !present {
                log::error!("engine: input table {table} is missing; dependent reports will be skipped");
                log.append("engine", &BatchEvent::TableMissing { table: table.to_string() })?;
            }
        }

        for dropped in &inputs.dropped {
            log.append(
                "loader",
                &BatchEvent::RowDropped {
                    table:  dropped.table.to_string(),
                    row:    dropped.row,
                    reason: dropped.reason.clone(),
                },
            )?;
        }

        let mut state = BatchState::new(inputs);
        let mut stages_run = 0;
        let mut stages_skipped = 0;

        for stage in &self.stages {
            match stage.run(&mut state) {
                Ok(events) => {
                    stages_run += 1;
                    for event in &events {
                        log.append(stage.name(), event)?;
                    }
                }
                Err(e) if e.is_missing_input() => {
                    stages_skipped += 1;
                    log::warn!("engine: stage {} skipped: {e}", stage.name());
                    log.append(
                        "engine",
                        &BatchEvent::StageSkipped {
                            stage:  stage.name().to_string(),
                            reason: e.to_string(),
                        },
                    )?;
                }
                Err(e) => return Err(e),
            }
        }

        log.append(
            "engine",
            &BatchEvent::BatchCompleted {
                stages_run,
                stages_skipped,
            },
        )?;
        log::info!("engine: batch complete ({stages_run} stages run, {stages_skipped} skipped)");

        Ok(BatchOutcome {
            commission_report: state.commission_report,
            roi_report:        state.roi_report,
            lead_scores:       state.lead_scores,
            summary:           state.reconciliation.map(|r| r.summary),
            reconciled:        state.clawback.map(|c| c.rows),
            events:            log.entries,
        })
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::build(&AnalyzerConfig::default())
    }
}
