//! Input records as loaded from the four source tables.
//!
//! RULE: records are immutable once loaded. Stages derive new tables
//! from them; nothing writes back into a record.

use crate::types::{CampaignName, ContactEmail, DealId, Money};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ── CRM ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStage {
    ClosedWon,
    ClosedLost,
    Other(String),
}

impl DealStage {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Closed Won"  => Self::ClosedWon,
            "Closed Lost" => Self::ClosedLost,
            other         => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ClosedWon  => "Closed Won",
            Self::ClosedLost => "Closed Lost",
            Self::Other(s)   => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    SaasLicense,
    ConsultingHours,
    Hardware,
    Other(String),
}

impl ProductType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "SaaS License"     => Self::SaasLicense,
            "Consulting Hours" => Self::ConsultingHours,
            "Hardware"         => Self::Hardware,
            other              => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SaasLicense     => "SaaS License",
            Self::ConsultingHours => "Consulting Hours",
            Self::Hardware        => "Hardware",
            Self::Other(s)        => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub deal_id:      DealId,
    pub account_name: String,
    pub amount:       Money,
    pub close_date:   Option<NaiveDate>,
    pub owner_name:   String,
    pub stage:        DealStage,
    pub product_type: ProductType,
    pub lead_source:  String,
}

impl Deal {
    pub fn is_closed_won(&self) -> bool {
        self.stage == DealStage::ClosedWon
    }
}

// ── Finance ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Succeeded,
    Refunded,
    Failed,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "succeeded" => Self::Succeeded,
            "refunded"  => Self::Refunded,
            "failed"    => Self::Failed,
            other       => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Refunded  => "refunded",
            Self::Failed    => "failed",
            Self::Other(s)  => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub payment_id:   String,
    pub amount:       Money,
    /// `None` when the source date did not parse. Such payments are
    /// reconciled but cannot be bucketed into a quarter.
    pub payment_date: Option<NaiveDate>,
    pub description:  String,
    pub status:       PaymentStatus,
}

// ── Marketing ───────────────────────────────────────────────────────

/// Touch actions. Only the scored ones get their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionType {
    DemoRequested,
    TrialStarted,
    ContactUsFormSubmitted,
    PricingPageViewed,
    CaseStudyDownloaded,
    WebinarAttended,
    Other(String),
}

impl ActionType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Demo Requested"            => Self::DemoRequested,
            "Trial Started"             => Self::TrialStarted,
            "Contact Us Form Submitted" => Self::ContactUsFormSubmitted,
            "Pricing Page Viewed"       => Self::PricingPageViewed,
            "Case Study Downloaded"     => Self::CaseStudyDownloaded,
            "Webinar Attended"          => Self::WebinarAttended,
            other                       => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DemoRequested          => "Demo Requested",
            Self::TrialStarted           => "Trial Started",
            Self::ContactUsFormSubmitted => "Contact Us Form Submitted",
            Self::PricingPageViewed      => "Pricing Page Viewed",
            Self::CaseStudyDownloaded    => "Case Study Downloaded",
            Self::WebinarAttended        => "Webinar Attended",
            Self::Other(s)               => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketingTouch {
    pub contact_email:   ContactEmail,
    pub touched_at:      Option<NaiveDateTime>,
    pub campaign_source: String,
    pub action:          ActionType,
    pub associated_deal: Option<DealId>,
}

// ── Ad platforms ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct AdSpendRecord {
    pub campaign_id:   String,
    pub campaign_name: CampaignName,
    pub date:          Option<NaiveDate>,
    pub spend:         Money,
    pub platform:      String,
    pub impressions:   u64,
    pub clicks:        u64,
}

/// A source row left out of the batch, kept as a data-quality signal.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub table:  &'static str,
    /// Line number in the source file (header is line 1).
    pub row:    usize,
    pub reason: String,
}

/// The four source tables for one batch. `None` marks a table that
/// could not be loaded; only the reports that need it are skipped.
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub deals:    Option<Vec<Deal>>,
    pub payments: Option<Vec<Payment>>,
    pub touches:  Option<Vec<MarketingTouch>>,
    pub ad_spend: Option<Vec<AdSpendRecord>>,
    pub dropped:  Vec<DroppedRow>,
}
