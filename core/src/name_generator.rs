//! Deterministic names for mock reps, accounts and contacts.
//!
//! All generation is deterministic (same RNG seed = same names).

use crate::rng::DataRng;

/// Deterministic name generator using curated name lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn generate_full_name(rng: &mut DataRng) -> String {
        format!("{} {}", rng.pick(Self::first_names()), rng.pick(Self::last_names()))
    }

    /// Generate an account (company) name
    pub fn generate_company_name(rng: &mut DataRng) -> String {
        // Format: "Prefix Industry Suffix" or "LastName Industry Suffix"
        let lead = if rng.chance(0.5) {
            *rng.pick(Self::company_prefixes())
        } else {
            *rng.pick(Self::last_names())
        };
        format!(
            "{} {} {}",
            lead,
            rng.pick(Self::industries()),
            rng.pick(Self::company_suffixes())
        )
    }

    /// Generate a contact email like `jordan.reyes42@example.net`
    pub fn generate_email(rng: &mut DataRng) -> String {
        let first = rng.pick(Self::first_names()).to_lowercase();
        let last = rng.pick(Self::last_names()).to_lowercase();
        let n = rng.next_u64_below(100);
        format!("{first}.{last}{n}@{}", rng.pick(Self::email_domains()))
    }

    pub fn generate_company_suffix(rng: &mut DataRng) -> &'static str {
        *rng.pick(Self::company_suffixes())
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Maria", "Robert", "Aisha", "Michael", "Wei", "David", "Priya",
            "Daniel", "Sofia", "Thomas", "Hannah", "Kevin", "Amara", "Jordan", "Elena",
            "Marcus", "Grace", "Samuel", "Leila", "Nathan", "Chloe", "Victor", "Yuki",
            "Patrick", "Olivia", "Andre", "Fatima", "Henry", "Isabel", "Omar", "Ruth",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Garcia", "Chen", "Okafor", "Johnson", "Patel", "Williams", "Nguyen",
            "Brown", "Kim", "Jones", "Rossi", "Miller", "Haddad", "Davis", "Kowalski",
            "Reyes", "Tanaka", "Wilson", "Moreau", "Anderson", "Silva", "Taylor", "Novak",
        ]
    }

    fn company_prefixes() -> &'static [&'static str] {
        &[
            "Summit", "Harbor", "Northwind", "Bluepeak", "Ironwood", "Clearwater",
            "Redstone", "Evergreen", "Brightline", "Keystone", "Silverleaf", "Oakridge",
        ]
    }

    fn industries() -> &'static [&'static str] {
        &[
            "Logistics", "Analytics", "Health", "Manufacturing", "Software",
            "Energy", "Retail", "Financial", "Media", "Robotics",
        ]
    }

    fn company_suffixes() -> &'static [&'static str] {
        &["Inc", "LLC", "Group", "Corp", "Partners", "Ltd", "Holdings"]
    }

    fn email_domains() -> &'static [&'static str] {
        &["example.com", "example.net", "example.org", "mail.test"]
    }
}
