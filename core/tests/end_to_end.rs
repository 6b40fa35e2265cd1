//! Integration tests: the full batch through `ReportEngine`.

use chrono::NaiveDate;
use commission_core::{
    config::AnalyzerConfig,
    engine::ReportEngine,
    records::{AdSpendRecord, Deal, DealStage, InputTables, Payment, PaymentStatus, ProductType},
};

const DEAL_ID: &str = "006ALICE0000001";

/// Route library logs through the test harness (`RUST_LOG=debug` to see them).
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn alice_inputs() -> InputTables {
    InputTables {
        deals: Some(vec![Deal {
            deal_id:      DEAL_ID.into(),
            account_name: "Acme Corp".into(),
            amount:       10_000.0,
            close_date:   NaiveDate::from_ymd_opt(2025, 1, 10),
            owner_name:   "Alice".into(),
            stage:        DealStage::ClosedWon,
            product_type: ProductType::SaasLicense,
            lead_source:  "Google Ads".into(),
        }]),
        payments: Some(vec![Payment {
            payment_id:   "py_alice".into(),
            amount:       10_000.0,
            payment_date: NaiveDate::from_ymd_opt(2025, 2, 14),
            description:  format!("Payment for OppID {DEAL_ID}"),
            status:       PaymentStatus::Succeeded,
        }]),
        touches: Some(Vec::new()),
        ad_spend: Some(vec![AdSpendRecord {
            campaign_id:   "GA_123".into(),
            campaign_name: "Google Search - Core Keywords".into(),
            date:          NaiveDate::from_ymd_opt(2025, 1, 5),
            spend:         1_000.0,
            platform:      "Google Ads".into(),
            impressions:   40_000,
            clicks:        800,
        }]),
        dropped: Vec::new(),
    }
}

#[test]
fn single_saas_payment_pays_seven_percent() {
    init_logging();
    let engine = ReportEngine::default();

    let outcome = engine.run(alice_inputs()).unwrap();

    let report = outcome.commission_report.expect("commission report");
    assert_eq!(report.len(), 1);
    let row = &report[0];
    assert_eq!(row.owner_name, "Alice");
    assert_eq!(row.quarter.to_string(), "2025-Q1");
    assert_eq!(row.total_paid, 10_000.0);
    assert_eq!(row.total_base_commission, 700.0);
    assert_eq!(row.tier_bonus, 0.0);
    assert_eq!(row.total_clawback, 0.0);
    assert_eq!(row.final_commission, 700.0);

    let roi = outcome.roi_report.expect("roi report");
    assert_eq!(roi[0].total_revenue, 10_000.0);
    assert_eq!(roi[0].roas, 10.0);

    assert_eq!(outcome.lead_scores, Some(Vec::new()));
}

#[test]
fn stages_run_in_documented_order() {
    let engine = ReportEngine::build(&AnalyzerConfig::default());
    assert_eq!(
        engine.stage_names(),
        vec![
            "identifier",
            "reconciliation",
            "commission",
            "clawback",
            "aggregation",
            "attribution",
            "lead_scoring",
        ]
    );
}

#[test]
fn missing_payments_skip_commission_chain_only() {
    init_logging();
    let mut inputs = alice_inputs();
    inputs.payments = None;

    let outcome = ReportEngine::default().run(inputs).unwrap();

    assert!(outcome.commission_report.is_none());
    assert!(outcome.summary.is_none());
    assert!(outcome.roi_report.is_some(), "attribution does not need payments");
    assert!(outcome.lead_scores.is_some());

    let skipped = outcome
        .events
        .iter()
        .filter(|e| e.event_type == "stage_skipped")
        .count();
    assert_eq!(skipped, 5);
    assert!(outcome.events.iter().any(|e| e.event_type == "table_missing"));
}

#[test]
fn missing_touches_skip_lead_scoring_only() {
    let mut inputs = alice_inputs();
    inputs.touches = None;

    let outcome = ReportEngine::default().run(inputs).unwrap();

    assert!(outcome.lead_scores.is_none());
    assert!(outcome.commission_report.is_some());
    assert!(outcome.roi_report.is_some());
}

#[test]
fn duplicate_ids_in_strict_mode_abort_the_batch() {
    let mut inputs = alice_inputs();
    if let Some(deals) = inputs.deals.as_mut() {
        let mut copy = deals[0].clone();
        copy.owner_name = "Mallory".into();
        deals.push(copy);
    }
    let mut config = AnalyzerConfig::default();
    config.reconciliation.strict_deal_ids = true;

    let result = ReportEngine::build(&config).run(inputs);

    assert!(result.is_err());
}

#[test]
fn event_log_is_sequenced_and_bracketed() {
    let outcome = ReportEngine::default().run(alice_inputs()).unwrap();

    let seqs: Vec<u64> = outcome.events.iter().map(|e| e.seq).collect();
    let expected: Vec<u64> = (0..outcome.events.len() as u64).collect();
    assert_eq!(seqs, expected);

    assert_eq!(outcome.events.first().map(|e| e.event_type.as_str()), Some("batch_started"));
    assert_eq!(outcome.events.last().map(|e| e.event_type.as_str()), Some("batch_completed"));
}
