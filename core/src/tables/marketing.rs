use super::{
    cell, csv_reader, decode_record, line_of, non_empty, parse_amount, parse_count, parse_date, parse_timestamp,
    Columns, Loaded, TableStore,
};
use crate::{
    error::ReportResult,
    records::{ActionType, AdSpendRecord, MarketingTouch},
};
use std::io::Read;

const TOUCHES: &str = "marketing_touches";
const AD_SPEND: &str = "ad_spend";

/// Parse the marketing touches table (ContactEmail … AssociatedOpportunityID).
pub fn read_touches<R: Read>(reader: R) -> ReportResult<Loaded<MarketingTouch>> {
    let mut rdr = csv_reader(reader);
    let cols = Columns::from_reader(TOUCHES, &mut rdr)?;

    let email_idx    = cols.index("ContactEmail")?;
    let date_idx     = cols.index("TouchpointDate")?;
    let campaign_idx = cols.index("CampaignSource")?;
    let action_idx   = cols.index("ActionType")?;
    let opp_idx      = cols.index("AssociatedOpportunityID")?;

    let mut loaded = Loaded::new();
    for (i, raw) in rdr.byte_records().enumerate() {
        let line = line_of(i);
        let Some(record) = decode_record(raw, TOUCHES, line, &mut loaded)? else {
            continue;
        };

        let Some(contact_email) = non_empty(cell(&record, email_idx)) else {
            loaded.drop_row(TOUCHES, line, "blank ContactEmail".into());
            continue;
        };

        loaded.rows.push(MarketingTouch {
            contact_email,
            touched_at:      parse_timestamp(cell(&record, date_idx)),
            campaign_source: cell(&record, campaign_idx).to_string(),
            action:          ActionType::parse(cell(&record, action_idx)),
            associated_deal: non_empty(cell(&record, opp_idx)),
        });
    }
    Ok(loaded)
}

/// Parse the ad spend table (CampaignID … Clicks).
pub fn read_ad_spend<R: Read>(reader: R) -> ReportResult<Loaded<AdSpendRecord>> {
    let mut rdr = csv_reader(reader);
    let cols = Columns::from_reader(AD_SPEND, &mut rdr)?;

    let id_idx          = cols.index("CampaignID")?;
    let name_idx        = cols.index("CampaignName")?;
    let date_idx        = cols.index("Date")?;
    let spend_idx       = cols.index("Spend")?;
    let platform_idx    = cols.index("SourcePlatform")?;
    let impressions_idx = cols.index("Impressions")?;
    let clicks_idx      = cols.index("Clicks")?;

    let mut loaded = Loaded::new();
    for (i, raw) in rdr.byte_records().enumerate() {
        let line = line_of(i);
        let Some(record) = decode_record(raw, AD_SPEND, line, &mut loaded)? else {
            continue;
        };

        let spend = parse_amount(cell(&record, spend_idx));
        let impressions = parse_count(cell(&record, impressions_idx));
        let clicks = parse_count(cell(&record, clicks_idx));
        let (Some(spend), Some(impressions), Some(clicks)) = (spend, impressions, clicks) else {
            loaded.drop_row(AD_SPEND, line, "unparseable Spend, Impressions or Clicks".into());
            continue;
        };

        loaded.rows.push(AdSpendRecord {
            campaign_id:   cell(&record, id_idx).to_string(),
            campaign_name: cell(&record, name_idx).to_string(),
            date:          parse_date(cell(&record, date_idx)),
            spend,
            platform:      cell(&record, platform_idx).to_string(),
            impressions,
            clicks,
        });
    }
    Ok(loaded)
}

impl TableStore {
    pub fn load_touches(&self) -> ReportResult<Loaded<MarketingTouch>> {
        read_touches(self.open_input(&self.names.touches, TOUCHES)?)
    }

    pub fn load_ad_spend(&self) -> ReportResult<Loaded<AdSpendRecord>> {
        read_ad_spend(self.open_input(&self.names.ad_spend, AD_SPEND)?)
    }

    pub fn save_touches(&self, touches: &[MarketingTouch]) -> ReportResult<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        let mut wtr = csv::Writer::from_path(self.input_path(&self.names.touches))?;
        wtr.write_record([
            "ContactEmail", "TouchpointDate", "CampaignSource", "ActionType", "AssociatedOpportunityID",
        ])?;
        for t in touches {
            wtr.write_record([
                t.contact_email.clone(),
                t.touched_at.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_default(),
                t.campaign_source.clone(),
                t.action.as_str().to_string(),
                t.associated_deal.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_ad_spend(&self, records: &[AdSpendRecord]) -> ReportResult<()> {
        std::fs::create_dir_all(&self.input_dir)?;
        let mut wtr = csv::Writer::from_path(self.input_path(&self.names.ad_spend))?;
        wtr.write_record([
            "CampaignID", "CampaignName", "Date", "Spend", "SourcePlatform", "Impressions", "Clicks",
        ])?;
        for r in records {
            wtr.write_record([
                r.campaign_id.clone(),
                r.campaign_name.clone(),
                r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
                format!("{:.2}", r.spend),
                r.platform.clone(),
                r.impressions.to_string(),
                r.clicks.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
