//! The batch event log.
//!
//! RULE: stages report what they did ONLY through events.
//! The engine stamps each event with a sequence number and the
//! emitting stage, so two runs over the same input can be diffed.

use crate::types::{DealId, Money};
use serde::{Deserialize, Serialize};

/// Every event emitted during a batch run.
/// Variants are appended, never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    // ── Engine events ──────────────────────────────
    BatchStarted {
        deals:    usize,
        payments: usize,
        touches:  usize,
        ad_spend: usize,
    },
    TableMissing {
        table: String,
    },
    StageSkipped {
        stage:  String,
        reason: String,
    },
    BatchCompleted {
        stages_run:     usize,
        stages_skipped: usize,
    },

    // ── Data quality ───────────────────────────────
    RowDropped {
        table:  String,
        row:    usize,
        reason: String,
    },

    // ── Commission pipeline ────────────────────────
    IdentifiersExtracted {
        payments:  usize,
        extracted: usize,
    },
    DuplicateDealId {
        deal_id: DealId,
        count:   usize,
    },
    PaymentsReconciled {
        matched:          usize,
        unmatched:        usize,
        unmatched_amount: Money,
    },
    CommissionsComputed {
        payments:        usize,
        total_commission: Money,
    },
    ClawbackFlagged {
        deal_id:  DealId,
        payments: usize,
    },
    CommissionReportBuilt {
        rows: usize,
    },

    // ── Marketing pipelines ────────────────────────
    RoiReportBuilt {
        rows:             usize,
        attributed_deals: usize,
    },
    LeadScoresBuilt {
        rows: usize,
    },
}

impl BatchEvent {
    /// Stable string name, used for the `event_type` column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. }          => "batch_started",
            Self::TableMissing { .. }          => "table_missing",
            Self::StageSkipped { .. }          => "stage_skipped",
            Self::BatchCompleted { .. }        => "batch_completed",
            Self::RowDropped { .. }            => "row_dropped",
            Self::IdentifiersExtracted { .. }  => "identifiers_extracted",
            Self::DuplicateDealId { .. }       => "duplicate_deal_id",
            Self::PaymentsReconciled { .. }    => "payments_reconciled",
            Self::CommissionsComputed { .. }   => "commissions_computed",
            Self::ClawbackFlagged { .. }       => "clawback_flagged",
            Self::CommissionReportBuilt { .. } => "commission_report_built",
            Self::RoiReportBuilt { .. }        => "roi_report_built",
            Self::LeadScoresBuilt { .. }       => "lead_scores_built",
        }
    }
}

/// A persisted event log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub seq:        u64,
    pub stage:      String,
    pub event_type: String,
    pub payload:    String,
}
