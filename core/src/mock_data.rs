//! Deterministic mock input set: CRM deals, finance payments, marketing
//! touches and ad spend, shaped like messy real exports.
//!
//! Payment descriptions come in several inconsistent styles (clean id, partial
//! id, account name, invoice number, mixed) so the identifier extractor
//! and reconciler have realistic unmatched cases to deal with.
//! Same seed → identical tables.

use crate::{
    name_generator::NameGenerator,
    quarter::FiscalQuarter,
    records::{
        ActionType, AdSpendRecord, Deal, DealStage, InputTables, MarketingTouch, Payment,
        PaymentStatus, ProductType,
    },
    money::round_cents,
    rng::{DataRng, RngBank, TableSlot},
    types::DealId,
};
use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed:              u64,
    pub deals:             usize,
    pub reps:              usize,
    pub payments_per_deal: (i64, i64),
    pub touches_per_lead:  (i64, i64),
    pub ad_spend_days:     i64,
    pub start_date:        NaiveDate,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed:              42,
            deals:             150,
            reps:              5,
            payments_per_deal: (1, 3),
            touches_per_lead:  (2, 7),
            ad_spend_days:     90,
            start_date:        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

const PRODUCT_TYPES: [&str; 3] = ["SaaS License", "Consulting Hours", "Hardware"];

const LEAD_SOURCES: [&str; 6] = [
    "Google Ads", "Referral", "Cold Outreach", "Webinar", "LinkedIn Ads", "Organic Search",
];

const ACTION_TYPES: [&str; 9] = [
    "Website Visit", "Email Opened", "Form Submitted", "Webinar Attended",
    "Case Study Downloaded", "Pricing Page Viewed", "Demo Requested", "Trial Started",
    "Contact Us Form Submitted",
];

const LOW_INTENT_ACTIONS: [&str; 3] = ["Website Visit", "Email Opened", "Form Submitted"];

const CAMPAIGN_SOURCES: [&str; 10] = [
    "Google Search CPC", "Google Ads Display", "Facebook - Retargeting Q3",
    "Facebook - Retargeting Q4", "LinkedIn Ads - Prospecting", "Q4 Webinar",
    "Cold Email Sequence", "Referral Program", "Organic Search", "Direct Sales",
];

/// (CampaignID, CampaignName, SourcePlatform)
const CAMPAIGNS: [(&str, &str, &str); 6] = [
    ("GA_123", "Google Search - Core Keywords", "Google Ads"),
    ("GA_456", "Google Ads Display", "Google Ads"),
    ("GA_789", "Google Search - New Feature", "Google Ads"),
    ("FB_ABC", "Facebook - Retargeting Q4", "Facebook Ads"),
    ("FB_DEF", "Facebook - Lookalike Audience", "Facebook Ads"),
    ("LI_XYZ", "LinkedIn Ads - Prospecting", "LinkedIn Ads"),
];

const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_token(rng: &mut DataRng, alphabet: &[u8], len: usize) -> String {
    (0..len).map(|_| *rng.pick(alphabet) as char).collect()
}

/// A 15-character CRM opportunity id.
pub fn mock_opportunity_id(rng: &mut DataRng) -> DealId {
    format!("006{}", random_token(rng, UPPER_ALNUM, 12))
}

/// A processor-style payment id (`py_` + 24 chars).
pub fn mock_payment_id(rng: &mut DataRng) -> String {
    format!("py_{}", random_token(rng, LOWER_ALNUM, 24))
}

pub struct MockDataGenerator {
    config: GeneratorConfig,
    bank:   RngBank,
}

impl MockDataGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let bank = RngBank::new(config.seed);
        Self { config, bank }
    }

    pub fn generate(&self) -> InputTables {
        let mut names = self.bank.for_table(TableSlot::Names);
        let reps: Vec<String> = (0..self.config.reps.max(1))
            .map(|_| NameGenerator::generate_full_name(&mut names))
            .collect();
        let accounts: Vec<String> = (0..(self.config.deals / 2).max(1))
            .map(|_| NameGenerator::generate_company_name(&mut names))
            .collect();
        let emails: Vec<String> = (0..(self.config.deals * 2).max(1))
            .map(|_| NameGenerator::generate_email(&mut names))
            .collect();

        let deals = self.generate_deals(&reps, &accounts);
        let payments = self.generate_payments(&deals);
        let touches = self.generate_touches(&deals, &emails);
        let ad_spend = self.generate_ad_spend();

        log::info!(
            "mock_data: seed={} generated {} deals, {} payments, {} touches, {} ad spend rows",
            self.config.seed,
            deals.len(),
            payments.len(),
            touches.len(),
            ad_spend.len()
        );

        InputTables {
            deals:    Some(deals),
            payments: Some(payments),
            touches:  Some(touches),
            ad_spend: Some(ad_spend),
            dropped:  Vec::new(),
        }
    }

    fn generate_deals(&self, reps: &[String], accounts: &[String]) -> Vec<Deal> {
        let mut rng = self.bank.for_table(TableSlot::Deals);
        let window = self.config.ad_spend_days + 30;

        (0..self.config.deals)
            .map(|_| {
                let deal_id = mock_opportunity_id(&mut rng);
                let account_name = rng.pick(accounts).clone();
                let amount = round_cents(rng.uniform(1_500.0, 25_000.0));
                let close_date = self.config.start_date + Duration::days(rng.range_inclusive(0, window));
                let owner_name = rng.pick(reps).clone();
                let stage = if rng.chance(0.75) {
                    DealStage::ClosedWon
                } else {
                    DealStage::ClosedLost
                };
                let product_type = ProductType::parse(*rng.pick(&PRODUCT_TYPES));
                let mut lead_source = rng.pick(&LEAD_SOURCES).to_string();
                if lead_source == "Google Ads" && rng.chance(0.3) {
                    lead_source = "Google Search CPC".into();
                }

                Deal {
                    deal_id,
                    account_name,
                    amount,
                    close_date: Some(close_date),
                    owner_name,
                    stage,
                    product_type,
                    lead_source,
                }
            })
            .collect()
    }

    fn generate_payments(&self, deals: &[Deal]) -> Vec<Payment> {
        let mut rng = self.bank.for_table(TableSlot::Payments);
        let mut payments: Vec<Payment> = Vec::new();
        let (min_payments, max_payments) = self.config.payments_per_deal;

        for deal in deals.iter().filter(|d| d.is_closed_won()) {
            let Some(close_date) = deal.close_date else {
                continue;
            };
            let count = rng.range_inclusive(min_payments, max_payments);
            let mut total_paid = 0.0;

            for p in 0..count {
                let amount = if p == count - 1 {
                    let variance = rng.uniform(-deal.amount * 0.05, deal.amount * 0.05);
                    round_cents((deal.amount - total_paid + variance).max(0.0))
                } else {
                    round_cents(rng.uniform(deal.amount * 0.1, deal.amount / count as f64))
                };
                if amount <= 0.0 {
                    continue;
                }
                total_paid += amount;
                let payment_date = close_date + Duration::days(rng.range_inclusive(1, 45));

                // Occasionally refund an earlier payment in full.
                if !payments.is_empty() && rng.chance(0.05) {
                    let target = rng.pick(&payments).clone();
                    let refund_date = target
                        .payment_date
                        .map(|d| d + Duration::days(rng.range_inclusive(5, 29)));
                    payments.push(Payment {
                        payment_id:   mock_payment_id(&mut rng),
                        amount:       target.amount,
                        payment_date: refund_date,
                        description:  format!("REFUND {}", target.description),
                        status:       PaymentStatus::Refunded,
                    });
                }

                let description = match rng.next_u64_below(5) {
                    0 => format!("Payment for OppID {}", deal.deal_id),
                    1 => format!("{} Pymt Ref:{}", deal.account_name, &deal.deal_id[5..]),
                    2 => format!(
                        "{} Service Fee Q{}",
                        deal.account_name,
                        FiscalQuarter::from_date(payment_date).quarter
                    ),
                    3 => format!("INV#{} Payment", rng.range_inclusive(1000, 9999)),
                    _ => format!("{} Pymt {} (Opp {})", deal.account_name, p + 1, deal.deal_id),
                };

                payments.push(Payment {
                    payment_id: mock_payment_id(&mut rng),
                    amount,
                    payment_date: Some(payment_date),
                    description,
                    status: PaymentStatus::Succeeded,
                });
            }
        }

        // Unmatched noise, roughly one per ten deals.
        let mut names = self.bank.for_table(TableSlot::Names);
        for _ in 0..self.config.deals / 10 {
            let payment_date = self.config.start_date
                + Duration::days(rng.range_inclusive(0, self.config.ad_spend_days + 60));
            let status = if rng.chance(0.95) {
                PaymentStatus::Succeeded
            } else {
                PaymentStatus::Failed
            };
            payments.push(Payment {
                payment_id:   mock_payment_id(&mut rng),
                amount:       round_cents(rng.uniform(100.0, 5_000.0)),
                payment_date: Some(payment_date),
                description:  format!(
                    "Misc Payment - {} Services",
                    NameGenerator::generate_company_suffix(&mut names)
                ),
                status,
            });
        }

        payments
    }

    fn generate_touches(&self, deals: &[Deal], emails: &[String]) -> Vec<MarketingTouch> {
        let mut rng = self.bank.for_table(TableSlot::Touches);
        let mut touches = Vec::new();
        let (min_touches, max_touches) = self.config.touches_per_lead;

        for deal in deals.iter().filter(|d| d.is_closed_won()) {
            // About 80% of won deals have a marketing history.
            if !rng.chance(0.8) {
                continue;
            }
            let Some(close_date) = deal.close_date else {
                continue;
            };
            let email = rng.pick(emails).clone();

            for _ in 0..rng.range_inclusive(min_touches, max_touches) {
                let mut action = ActionType::parse(*rng.pick(&ACTION_TYPES));
                let high_intent = matches!(
                    action,
                    ActionType::DemoRequested
                        | ActionType::TrialStarted
                        | ActionType::ContactUsFormSubmitted
                );
                if high_intent && rng.chance(0.8) {
                    action = ActionType::parse(*rng.pick(&LOW_INTENT_ACTIONS[..2]));
                }

                let day = close_date - Duration::days(rng.range_inclusive(5, 90));
                let campaign_source = if rng.chance(0.6) {
                    deal.lead_source.clone()
                } else {
                    rng.pick(&CAMPAIGN_SOURCES).to_string()
                };
                let associated_deal = if rng.chance(0.85) {
                    Some(deal.deal_id.clone())
                } else if rng.chance(0.5) {
                    Some(mock_opportunity_id(&mut rng))
                } else {
                    None
                };

                touches.push(MarketingTouch {
                    contact_email: email.clone(),
                    touched_at: self.time_of_day(&mut rng, day),
                    campaign_source,
                    action,
                    associated_deal,
                });
            }
        }

        // Low-intent touches from leads with no deal yet.
        let avg_touches = ((min_touches + max_touches) / 2).max(0) as usize;
        let target = self.config.deals * avg_touches;
        let extra = target.saturating_sub(touches.len()) / 2;
        for _ in 0..extra {
            let day = self.config.start_date
                + Duration::days(rng.range_inclusive(0, self.config.ad_spend_days + 30));
            touches.push(MarketingTouch {
                contact_email:   rng.pick(emails).clone(),
                touched_at:      self.time_of_day(&mut rng, day),
                campaign_source: rng.pick(&CAMPAIGN_SOURCES).to_string(),
                action:          ActionType::parse(*rng.pick(&LOW_INTENT_ACTIONS)),
                associated_deal: None,
            });
        }

        touches
    }

    fn time_of_day(&self, rng: &mut DataRng, day: NaiveDate) -> Option<chrono::NaiveDateTime> {
        let secs = rng.range_inclusive(0, 86_399) as u32;
        day.and_hms_opt(secs / 3600, (secs / 60) % 60, secs % 60)
    }

    fn generate_ad_spend(&self) -> Vec<AdSpendRecord> {
        let mut rng = self.bank.for_table(TableSlot::AdSpend);
        let mut records = Vec::new();

        for offset in 0..self.config.ad_spend_days {
            let date = self.config.start_date + Duration::days(offset);
            let weekday = date.weekday().num_days_from_monday() as f64;
            let active = rng.range_inclusive(2, CAMPAIGNS.len() as i64 - 1) as usize;

            for idx in rng.sample_indices(CAMPAIGNS.len(), active) {
                let (campaign_id, campaign_name, platform) = CAMPAIGNS[idx];
                // Spend runs slightly higher later in the week.
                let spend = round_cents(rng.uniform(20.0, 150.0) * (1.0 + weekday / 10.0));
                let clicks = rng.range_inclusive((spend * 0.5) as i64, (spend * 3.0) as i64) as u64;
                let impressions = clicks * rng.range_inclusive(30, 100) as u64;

                records.push(AdSpendRecord {
                    campaign_id:   campaign_id.to_string(),
                    campaign_name: campaign_name.to_string(),
                    date:          Some(date),
                    spend,
                    platform:      platform.to_string(),
                    impressions,
                    clicks,
                });
            }
        }

        records
    }
}
