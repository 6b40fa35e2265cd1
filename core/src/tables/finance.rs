use super::{cell, csv_reader, decode_record, line_of, parse_amount, parse_date, Columns, Loaded, TableStore};
use crate::{
    error::ReportResult,
    records::{Payment, PaymentStatus},
};
use std::io::Read;

const TABLE: &str = "payments";

/// Parse the finance payments table (PaymentID … Status).
pub fn read_payments<R: Read>(reader: R) -> ReportResult<Loaded<Payment>> {
    let mut rdr = csv_reader(reader);
    let cols = Columns::from_reader(TABLE, &mut rdr)?;

    let id_idx     = cols.index("PaymentID")?;
    let amount_idx = cols.index("Amount")?;
    let date_idx   = cols.index("PaymentDate")?;
    let desc_idx   = cols.index("Description")?;
    let status_idx = cols.index("Status")?;

    let mut loaded = Loaded::new();
    for (i, raw) in rdr.byte_records().enumerate() {
        let line = line_of(i);
        let Some(record) = decode_record(raw, TABLE, line, &mut loaded)? else {
            continue;
        };

        let Some(amount) = parse_amount(cell(&record, amount_idx)) else {
            loaded.drop_row(TABLE, line, format!("unparseable Amount '{}'", cell(&record, amount_idx)));
            continue;
        };

        let raw_date = cell(&record, date_idx);
        let payment_date = parse_date(raw_date);
        if payment_date.is_none() {
            log::warn!("tables: payments line {line}: unparseable PaymentDate '{raw_date}'");
        }

        loaded.rows.push(Payment {
            payment_id:  cell(&record, id_idx).to_string(),
            amount,
            payment_date,
            description: cell(&record, desc_idx).to_string(),
            status:      PaymentStatus::parse(cell(&record, status_idx)),
        });
    }
    Ok(loaded)
}

impl TableStore {
    pub fn load_payments(&self) -> ReportResult<Loaded<Payment>> {
        read_payments(self.open_input(&self.names.payments, TABLE)?)
    }

    /// Write payments in the finance export layout.
    pub fn save_payments(&self, payments: &[Payment]) -> ReportResult<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        let mut wtr = csv::Writer::from_path(self.input_path(&self.names.payments))?;
        wtr.write_record(["PaymentID", "Amount", "PaymentDate", "Description", "Status"])?;
        for p in payments {
            wtr.write_record([
                p.payment_id.clone(),
                format!("{:.2}", p.amount),
                p.payment_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
                p.description.clone(),
                p.status.as_str().to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
