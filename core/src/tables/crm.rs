use super::{cell, csv_reader, decode_record, line_of, non_empty, parse_amount, parse_date, Columns, Loaded, TableStore};
use crate::{
    error::ReportResult,
    records::{Deal, DealStage, ProductType},
};
use std::io::Read;

const TABLE: &str = "deals";

/// Parse the CRM deals table (OpportunityID … LeadSource).
pub fn read_deals<R: Read>(reader: R) -> ReportResult<Loaded<Deal>> {
    let mut rdr = csv_reader(reader);
    let cols = Columns::from_reader(TABLE, &mut rdr)?;

    let id_idx      = cols.index("OpportunityID")?;
    let account_idx = cols.index("AccountName")?;
    let amount_idx  = cols.index("Amount")?;
    let close_idx   = cols.index("CloseDate")?;
    let owner_idx   = cols.index("OwnerName")?;
    let stage_idx   = cols.index("StageName")?;
    let product_idx = cols.index("ProductType")?;
    let source_idx  = cols.index("LeadSource")?;

    let mut loaded = Loaded::new();
    for (i, raw) in rdr.byte_records().enumerate() {
        let line = line_of(i);
        let Some(record) = decode_record(raw, TABLE, line, &mut loaded)? else {
            continue;
        };

        let Some(deal_id) = non_empty(cell(&record, id_idx)) else {
            loaded.drop_row(TABLE, line, "blank OpportunityID".into());
            continue;
        };
        let Some(amount) = parse_amount(cell(&record, amount_idx)) else {
            loaded.drop_row(TABLE, line, format!("unparseable Amount '{}'", cell(&record, amount_idx)));
            continue;
        };

        let raw_close = cell(&record, close_idx);
        let close_date = parse_date(raw_close);
        if close_date.is_none() {
            log::warn!("tables: deals line {line}: unparseable CloseDate '{raw_close}'");
        }

        loaded.rows.push(Deal {
            deal_id,
            account_name: cell(&record, account_idx).to_string(),
            amount,
            close_date,
            owner_name:   cell(&record, owner_idx).to_string(),
            stage:        DealStage::parse(cell(&record, stage_idx)),
            product_type: ProductType::parse(cell(&record, product_idx)),
            lead_source:  cell(&record, source_idx).to_string(),
        });
    }
    Ok(loaded)
}

impl TableStore {
    pub fn load_deals(&self) -> ReportResult<Loaded<Deal>> {
        read_deals(self.open_input(&self.names.deals, TABLE)?)
    }

    /// Write deals in the CRM export layout.
    pub fn save_deals(&self, deals: &[Deal]) -> ReportResult<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        let mut wtr = csv::Writer::from_path(self.input_path(&self.names.deals))?;
        wtr.write_record([
            "OpportunityID", "AccountName", "Amount", "CloseDate",
            "OwnerName", "StageName", "ProductType", "LeadSource",
        ])?;
        for d in deals {
            wtr.write_record([
                d.deal_id.clone(),
                d.account_name.clone(),
                format!("{:.2}", d.amount),
                d.close_date.map(|c| c.format("%Y-%m-%d").to_string()).unwrap_or_default(),
                d.owner_name.clone(),
                d.stage.as_str().to_string(),
                d.product_type.as_str().to_string(),
                d.lead_source.clone(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
