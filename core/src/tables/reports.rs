use super::TableStore;
use crate::{
    aggregation_stage::CommissionReportRow,
    attribution_stage::RoiReportRow,
    error::ReportResult,
    event::EventLogEntry,
    lead_scoring_stage::LeadScore,
    records::InputTables,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    log::info!("tables: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

impl TableStore {
    pub fn write_commission_report(&self, rows: &[CommissionReportRow]) -> ReportResult<PathBuf> {
        let path = self.output_path(&self.names.commission_report)?;
        write_rows(&path, rows)?;
        Ok(path)
    }

    pub fn write_roi_report(&self, rows: &[RoiReportRow]) -> ReportResult<PathBuf> {
        let path = self.output_path(&self.names.roi_report)?;
        write_rows(&path, rows)?;
        Ok(path)
    }

    pub fn write_lead_scores(&self, rows: &[LeadScore]) -> ReportResult<PathBuf> {
        let path = self.output_path(&self.names.lead_scores)?;
        write_rows(&path, rows)?;
        Ok(path)
    }

    /// Write the batch event log as a JSON array.
    pub fn write_event_log(&self, path: &Path, events: &[EventLogEntry]) -> ReportResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write every present input table into the input directory.
    pub fn save_inputs(&self, tables: &InputTables) -> ReportResult<()> {
        if let Some(deals) = &tables.deals {
            self.save_deals(deals)?;
        }
        if let Some(payments) = &tables.payments {
            self.save_payments(payments)?;
        }
        if let Some(touches) = &tables.touches {
            self.save_touches(touches)?;
        }
        if let Some(ad_spend) = &tables.ad_spend {
            self.save_ad_spend(ad_spend)?;
        }
        Ok(())
    }
}
