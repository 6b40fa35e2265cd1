//! Campaign attribution and marketing ROI.
//!
//! Spend side: ad spend rows summed per campaign name.
//! Revenue side: Closed Won deals credited to a campaign by lead source,
//! either a direct campaign-name match or one of the configured generic
//! sources. Any other lead source is not attributed anywhere.
//!
//! Every campaign with spend gets a row; revenue credited to a campaign
//! with no spend has nothing to be measured against and is dropped.

use crate::{
    config::AttributionConfig,
    error::ReportResult,
    event::BatchEvent,
    money::{ratio_or_zero, round_cents},
    records::{AdSpendRecord, Deal},
    stage::{BatchStage, BatchState},
    types::{CampaignName, Money},
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignSpend {
    pub spend:       Money,
    pub impressions: u64,
    pub clicks:      u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiReportRow {
    #[serde(rename = "CampaignName")]
    pub campaign_name:     CampaignName,
    #[serde(rename = "TotalSpend")]
    pub total_spend:       Money,
    #[serde(rename = "TotalImpressions")]
    pub total_impressions: u64,
    #[serde(rename = "TotalClicks")]
    pub total_clicks:      u64,
    #[serde(rename = "AvgCPC")]
    pub avg_cpc:           Money,
    #[serde(rename = "TotalRevenue")]
    pub total_revenue:     Money,
    #[serde(rename = "TotalDeals")]
    pub total_deals:       usize,
    #[serde(rename = "ROAS")]
    pub roas:              f64,
    #[serde(rename = "AvgCPA")]
    pub avg_cpa:           Money,
}

pub fn summarize_spend(records: &[AdSpendRecord]) -> BTreeMap<CampaignName, CampaignSpend> {
    let mut summary: BTreeMap<CampaignName, CampaignSpend> = BTreeMap::new();
    for r in records {
        let entry = summary.entry(r.campaign_name.clone()).or_default();
        entry.spend += r.spend;
        entry.impressions += r.impressions;
        entry.clicks += r.clicks;
    }
    summary
}

/// Campaign a lead source is credited to, if any.
pub fn attribute_campaign<'a>(
    lead_source: &'a str,
    campaigns: &BTreeMap<CampaignName, CampaignSpend>,
    config: &'a AttributionConfig,
) -> Option<&'a str> {
    if campaigns.contains_key(lead_source) {
        return Some(lead_source);
    }
    config
        .generic_sources
        .get(lead_source)
        .map(|campaign| campaign.as_str())
}

pub fn build_roi_report(
    ad_spend: &[AdSpendRecord],
    deals: &[Deal],
    config: &AttributionConfig,
) -> Vec<RoiReportRow> {
    let campaigns = summarize_spend(ad_spend);

    let mut revenue: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
    for deal in deals.iter().filter(|d| d.is_closed_won()) {
        if let Some(campaign) = attribute_campaign(&deal.lead_source, &campaigns, config) {
            let entry = revenue.entry(campaign).or_insert((0.0, 0));
            entry.0 += deal.amount;
            entry.1 += 1;
        }
    }

    campaigns
        .iter()
        .map(|(name, spend)| {
            let (deal_revenue, total_deals) = revenue.get(name.as_str()).copied().unwrap_or((0.0, 0));
            // Ratios come from the raw sums and are rounded once.
            RoiReportRow {
                campaign_name: name.clone(),
                total_spend: round_cents(spend.spend),
                total_impressions: spend.impressions,
                total_clicks: spend.clicks,
                avg_cpc: round_cents(ratio_or_zero(spend.spend, spend.clicks as f64)),
                total_revenue: round_cents(deal_revenue),
                total_deals,
                roas: round_cents(ratio_or_zero(deal_revenue, spend.spend)),
                avg_cpa: round_cents(ratio_or_zero(spend.spend, total_deals as f64)),
            }
        })
        .collect()
}

pub struct AttributionStage {
    config: AttributionConfig,
}

impl AttributionStage {
    pub fn new(config: AttributionConfig) -> Self {
        Self { config }
    }
}

impl BatchStage for AttributionStage {
    fn name(&self) -> &'static str {
        "attribution"
    }

    fn run(&self, state: &mut BatchState) -> ReportResult<Vec<BatchEvent>> {
        let report = build_roi_report(state.ad_spend()?, state.deals()?, &self.config);

        let attributed_deals: usize = report.iter().map(|r| r.total_deals).sum();
        log::debug!(
            "attribution: {} campaigns, {attributed_deals} attributed deals",
            report.len()
        );

        let rows = report.len();
        state.roi_report = Some(report);
        Ok(vec![BatchEvent::RoiReportBuilt {
            rows,
            attributed_deals,
        }])
    }
}
