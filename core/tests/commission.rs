//! Integration tests: per-payment base commission.

use chrono::NaiveDate;
use commission_core::{
    commission_stage::{apply_commissions, base_commission},
    config::CommissionConfig,
    reconciliation_stage::ReconciledPayment,
    records::{Deal, DealStage, Payment, PaymentStatus, ProductType},
};

fn row(amount: f64, product: ProductType, matched: bool) -> ReconciledPayment {
    let deal = Deal {
        deal_id:      "006AAAAAAAAAAAA".into(),
        account_name: "Acme Corp".into(),
        amount:       10_000.0,
        close_date:   NaiveDate::from_ymd_opt(2025, 1, 10),
        owner_name:   "Alice".into(),
        stage:        DealStage::ClosedWon,
        product_type: product,
        lead_source:  "Referral".into(),
    };
    ReconciledPayment {
        payment: Payment {
            payment_id:   "py_1".into(),
            amount,
            payment_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            description:  "Payment for OppID 006AAAAAAAAAAAA".into(),
            status:       PaymentStatus::Succeeded,
        },
        extracted_deal_id: matched.then(|| deal.deal_id.clone()),
        deal:              matched.then_some(deal),
        base_commission:   0.0,
        deal_has_refund:   false,
    }
}

#[test]
fn product_type_sets_the_rate() {
    let config = CommissionConfig::default();
    assert_eq!(base_commission(&row(10_000.0, ProductType::SaasLicense, true), &config), 700.0);
    assert_eq!(base_commission(&row(10_000.0, ProductType::Hardware, true), &config), 300.0);
    assert_eq!(
        base_commission(&row(10_000.0, ProductType::ConsultingHours, true), &config),
        500.0
    );
    assert_eq!(
        base_commission(&row(10_000.0, ProductType::Other("Training".into()), true), &config),
        500.0
    );
}

#[test]
fn commission_is_rounded_to_cents() {
    let config = CommissionConfig::default();
    // 1234.56 × 0.07 = 86.4192
    assert_eq!(base_commission(&row(1_234.56, ProductType::SaasLicense, true), &config), 86.42);
}

#[test]
fn unmatched_payment_earns_nothing() {
    let config = CommissionConfig::default();
    assert_eq!(base_commission(&row(10_000.0, ProductType::SaasLicense, false), &config), 0.0);
}

#[test]
fn each_installment_earns_independently() {
    let config = CommissionConfig::default();
    let rows = vec![
        row(3_000.0, ProductType::SaasLicense, true),
        row(3_000.0, ProductType::SaasLicense, true),
        row(4_000.0, ProductType::SaasLicense, true),
    ];

    let out = apply_commissions(&rows, &config);

    let amounts: Vec<f64> = out.iter().map(|r| r.base_commission).collect();
    assert_eq!(amounts, vec![210.0, 210.0, 280.0]);
}

#[test]
fn applying_twice_gives_the_same_result() {
    let config = CommissionConfig::default();
    let rows = vec![
        row(1_234.56, ProductType::Hardware, true),
        row(99.99, ProductType::SaasLicense, false),
    ];

    let once = apply_commissions(&rows, &config);
    let twice = apply_commissions(&once, &config);

    assert_eq!(once, twice);
}

#[test]
fn modifiers_come_from_config() {
    let mut config = CommissionConfig::default();
    config.base_rate = 0.10;
    config.product_modifiers.insert("Consulting Hours".into(), 0.05);

    assert_eq!(
        base_commission(&row(1_000.0, ProductType::ConsultingHours, true), &config),
        150.0
    );
}

#[test]
fn commission_never_goes_below_zero() {
    let mut config = CommissionConfig::default();
    config.product_modifiers.insert("Hardware".into(), -0.20);

    assert_eq!(base_commission(&row(10_000.0, ProductType::Hardware, true), &config), 0.0);
    assert_eq!(
        base_commission(&row(-2_500.0, ProductType::SaasLicense, true), &CommissionConfig::default()),
        0.0
    );
}
