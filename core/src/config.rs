use crate::records::{ActionType, ProductType};
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Commission rules ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub threshold_1: Money,
    pub threshold_2: Money,
    pub tier_1_rate: f64,
    pub tier_2_rate: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            threshold_1: 50_000.0,
            threshold_2: 100_000.0,
            tier_1_rate: 0.01,
            tier_2_rate: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionConfig {
    pub base_rate: f64,
    /// Rate delta keyed by CRM product-type label. Absent types get +0.
    pub product_modifiers: BTreeMap<String, f64>,
    pub tier: TierConfig,
}

impl Default for CommissionConfig {
    fn default() -> Self {
        let mut product_modifiers = BTreeMap::new();
        product_modifiers.insert("SaaS License".to_string(), 0.02);
        product_modifiers.insert("Hardware".to_string(), -0.02);
        Self {
            base_rate: 0.05,
            product_modifiers,
            tier: TierConfig::default(),
        }
    }
}

impl CommissionConfig {
    /// Effective rate for one product type: base plus modifier, never
    /// below zero.
    pub fn rate_for(&self, product: &ProductType) -> f64 {
        let modifier = self
            .product_modifiers
            .get(product.as_str())
            .copied()
            .unwrap_or(0.0);
        (self.base_rate + modifier).max(0.0)
    }
}

// ── Reconciliation ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Fail the batch on duplicate Closed Won ids instead of
    /// matching the first deal.
    pub strict_deal_ids: bool,
}

// ── Attribution ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionConfig {
    /// Generic CRM lead sources → the campaign they are credited to.
    pub generic_sources: BTreeMap<String, String>,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        let generic_sources = [
            ("Google Ads", "Google Search - Core Keywords"),
            ("Facebook Ads", "Facebook - Retargeting Q4"),
            ("LinkedIn Ads", "LinkedIn Ads - Prospecting"),
        ]
        .into_iter()
        .map(|(source, campaign)| (source.to_string(), campaign.to_string()))
        .collect();
        Self { generic_sources }
    }
}

// ── Lead scoring ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadScoringConfig {
    /// Points for the presence of an action anywhere in a contact's history.
    pub action_points: BTreeMap<String, u32>,
    pub points_per_touch: u32,
    pub max_score: u32,
}

impl Default for LeadScoringConfig {
    fn default() -> Self {
        let action_points = [
            (ActionType::DemoRequested, 50),
            (ActionType::TrialStarted, 40),
            (ActionType::ContactUsFormSubmitted, 30),
            (ActionType::PricingPageViewed, 20),
            (ActionType::CaseStudyDownloaded, 10),
            (ActionType::WebinarAttended, 10),
        ]
        .into_iter()
        .map(|(action, points)| (action.as_str().to_string(), points))
        .collect();
        Self {
            action_points,
            points_per_touch: 1,
            max_score: 100,
        }
    }
}

impl LeadScoringConfig {
    pub fn points_for(&self, action: &ActionType) -> u32 {
        self.action_points.get(action.as_str()).copied().unwrap_or(0)
    }
}

// ── File names ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub deals:             String,
    pub payments:          String,
    pub touches:           String,
    pub ad_spend:          String,
    pub commission_report: String,
    pub roi_report:        String,
    pub lead_scores:       String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            deals:             "crm_closed_deals.csv".into(),
            payments:          "finance_payments.csv".into(),
            touches:           "marketing_touches.csv".into(),
            ad_spend:          "ad_spend.csv".into(),
            commission_report: "final_commission_report.csv".into(),
            roi_report:        "marketing_roi_report.csv".into(),
            lead_scores:       "top_lead_scores.csv".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub commission:     CommissionConfig,
    pub reconciliation: ReconciliationConfig,
    pub attribution:    AttributionConfig,
    pub lead_scoring:   LeadScoringConfig,
    pub tables:         TableNames,
}

impl AnalyzerConfig {
    /// Load from a JSON file. Sections left out of the file keep their
    /// defaults. In tests, use `AnalyzerConfig::default()`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: AnalyzerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::info!(
            "config: loaded {path} (base_rate={}, {} generic sources)",
            config.commission.base_rate,
            config.attribution.generic_sources.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sections_keep_their_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"commission": {"tier": {"threshold_1": 40000}}}"#).unwrap();

        let tier = &config.commission.tier;
        assert_eq!(tier.threshold_1, 40_000.0);
        assert_eq!(tier.threshold_2, 100_000.0);
        assert_eq!(tier.tier_1_rate, 0.01);
        assert_eq!(tier.tier_2_rate, 0.02);
        assert_eq!(config.commission.base_rate, 0.05);
        assert_eq!(config.tables.deals, "crm_closed_deals.csv");
    }

    #[test]
    fn rate_is_clamped_at_zero() {
        let mut config = CommissionConfig::default();
        config.product_modifiers.insert("Hardware".into(), -0.25);

        assert_eq!(config.rate_for(&ProductType::Hardware), 0.0);
        assert!((config.rate_for(&ProductType::SaasLicense) - 0.07).abs() < 1e-12);
    }
}
