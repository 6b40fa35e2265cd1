//! Shared primitive types used across the entire batch.

/// Monetary amount in the single reporting currency.
pub type Money = f64;

/// A CRM opportunity identifier (`006…`, 15 or 18 chars).
pub type DealId = String;

/// A sales rep, keyed by the CRM owner name.
pub type RepName = String;

/// A campaign, keyed by its ad-platform display name.
pub type CampaignName = String;

/// A contact, keyed by email address.
pub type ContactEmail = String;
