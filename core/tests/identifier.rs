//! Integration tests: opportunity id extraction from payment descriptions.

use commission_core::{
    identifier_stage::{extract_all, extract_deal_id},
    records::{Payment, PaymentStatus},
};

fn payment(id: &str, description: &str) -> Payment {
    Payment {
        payment_id:   id.into(),
        amount:       100.0,
        payment_date: None,
        description:  description.into(),
        status:       PaymentStatus::Succeeded,
    }
}

#[test]
fn finds_fifteen_character_id() {
    assert_eq!(
        extract_deal_id("Payment for OppID 006ABC123DEF456"),
        Some("006ABC123DEF456".to_string())
    );
}

#[test]
fn finds_eighteen_character_id() {
    assert_eq!(
        extract_deal_id("Acme Pymt 2 (Opp 006ABC123DEF456GHI)"),
        Some("006ABC123DEF456GHI".to_string())
    );
}

#[test]
fn match_is_case_insensitive_and_keeps_original_case() {
    assert_eq!(
        extract_deal_id("payment for oppid 006abc123def456"),
        Some("006abc123def456".to_string())
    );
}

#[test]
fn no_id_yields_none() {
    assert_eq!(extract_deal_id("INV#4821 Payment"), None);
    assert_eq!(extract_deal_id(""), None);
}

#[test]
fn truncated_id_is_not_found() {
    // "Pymt Ref:" carries the id minus its first five characters.
    assert_eq!(extract_deal_id("Acme Corp Pymt Ref:C123DEF456"), None);
    // Eleven alphanumerics after the prefix is one short.
    assert_eq!(extract_deal_id("Payment 006ABC123DEF4"), None);
}

#[test]
fn id_broken_by_punctuation_is_not_found() {
    assert_eq!(extract_deal_id("Payment 006ABC-123DEF456"), None);
}

#[test]
fn first_match_wins() {
    assert_eq!(
        extract_deal_id("006AAAAAAAAAAAA and 006BBBBBBBBBBBB"),
        Some("006AAAAAAAAAAAA".to_string())
    );
}

#[test]
fn extract_all_keeps_every_payment_in_order() {
    let payments = vec![
        payment("py_1", "Payment for OppID 006ABC123DEF456"),
        payment("py_2", "Misc Payment - Global Services"),
        payment("py_3", "REFUND Payment for OppID 006XYZ123DEF456"),
    ];

    let extracted = extract_all(&payments);

    assert_eq!(extracted.len(), 3);
    assert_eq!(extracted[0].payment.payment_id, "py_1");
    assert_eq!(extracted[0].deal_id.as_deref(), Some("006ABC123DEF456"));
    assert_eq!(extracted[1].deal_id, None);
    assert_eq!(extracted[2].deal_id.as_deref(), Some("006XYZ123DEF456"));
}
