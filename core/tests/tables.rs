//! Integration tests: CSV loading, row coercion and report writing.

use commission_core::{
    config::TableNames,
    error::ReportError,
    mock_data::{GeneratorConfig, MockDataGenerator},
    records::{ActionType, DealStage, PaymentStatus, ProductType},
    tables::{read_ad_spend, read_deals, read_payments, read_touches, TableStore},
};

#[test]
fn deals_parse_with_columns_in_any_order() {
    let csv = "\
StageName,OpportunityID,Amount,AccountName,CloseDate,OwnerName,ProductType,LeadSource
Closed Won,006ABC123DEF456,12500.50,\"Acme, Inc.\",2025-03-15,Alice,SaaS License,Google Ads
";
    let loaded = read_deals(csv.as_bytes()).unwrap();

    assert_eq!(loaded.rows.len(), 1);
    let d = &loaded.rows[0];
    assert_eq!(d.deal_id, "006ABC123DEF456");
    assert_eq!(d.account_name, "Acme, Inc.");
    assert_eq!(d.amount, 12_500.5);
    assert_eq!(d.stage, DealStage::ClosedWon);
    assert_eq!(d.product_type, ProductType::SaasLicense);
    assert_eq!(d.close_date.map(|c| c.to_string()).as_deref(), Some("2025-03-15"));
}

#[test]
fn bad_amount_drops_row_but_bad_date_keeps_it() {
    let csv = "\
OpportunityID,AccountName,Amount,CloseDate,OwnerName,StageName,ProductType,LeadSource
006AAAAAAAAAAAA,Acme,n/a,2025-03-15,Alice,Closed Won,Hardware,Referral
006BBBBBBBBBBBB,Acme,500,someday,Bob,Closed Won,Hardware,Referral
,Acme,500,2025-03-15,Bob,Closed Won,Hardware,Referral
";
    let loaded = read_deals(csv.as_bytes()).unwrap();

    assert_eq!(loaded.rows.len(), 1);
    assert_eq!(loaded.rows[0].deal_id, "006BBBBBBBBBBBB");
    assert_eq!(loaded.rows[0].close_date, None);

    let dropped: Vec<usize> = loaded.dropped.iter().map(|d| d.row).collect();
    assert_eq!(dropped, vec![2, 4]);
    assert!(loaded.dropped.iter().all(|d| d.table == "deals"));
}

#[test]
fn missing_column_is_missing_data() {
    let csv = "PaymentID,Amount,PaymentDate,Description\npy_1,10,2025-01-01,x\n";

    let err = read_payments(csv.as_bytes()).unwrap_err();

    match err {
        ReportError::MissingData { table, column } => {
            assert_eq!(table, "payments");
            assert_eq!(column, "Status");
        }
        other => panic!("expected MissingData, got {other:?}"),
    }
}

#[test]
fn payment_status_is_parsed() {
    let csv = "\
PaymentID,Amount,PaymentDate,Description,Status
py_1,100,2025-01-01,Payment for OppID 006AAAAAAAAAAAA,succeeded
py_2,100,2025-01-02,REFUND Payment for OppID 006AAAAAAAAAAAA,refunded
py_3,100,2025-01-03,Misc,failed
";
    let loaded = read_payments(csv.as_bytes()).unwrap();

    let statuses: Vec<PaymentStatus> = loaded.rows.into_iter().map(|p| p.status).collect();
    assert_eq!(
        statuses,
        vec![PaymentStatus::Succeeded, PaymentStatus::Refunded, PaymentStatus::Failed]
    );
}

#[test]
fn undecodable_record_is_dropped_not_fatal() {
    let mut csv = b"PaymentID,Amount,PaymentDate,Description,Status\n".to_vec();
    csv.extend_from_slice(b"py_1,100,2025-01-01,Caf\xe9 Lumiere Pymt,succeeded\n");
    csv.extend_from_slice(b"py_2,250,2025-01-02,Payment for OppID 006AAAAAAAAAAAA,succeeded\n");

    let loaded = read_payments(&csv[..]).unwrap();

    assert_eq!(loaded.rows.len(), 1);
    assert_eq!(loaded.rows[0].payment_id, "py_2");
    assert_eq!(loaded.dropped.len(), 1);
    assert_eq!(loaded.dropped[0].table, "payments");
    assert_eq!(loaded.dropped[0].row, 2);
}

#[test]
fn bad_bytes_in_one_table_keep_the_others_loading() {
    let dir = tempfile::tempdir().unwrap();
    let names = TableNames::default();
    let mut payments = b"PaymentID,Amount,PaymentDate,Description,Status\n".to_vec();
    payments.extend_from_slice(b"py_1,100,2025-01-01,Caf\xe9,succeeded\n");
    std::fs::write(dir.path().join(&names.payments), payments).unwrap();
    std::fs::write(
        dir.path().join(&names.touches),
        "ContactEmail,TouchpointDate,CampaignSource,ActionType,AssociatedOpportunityID\n\
         amy@example.com,2025-08-14 09:30:00,Q4 Webinar,Demo Requested,\n",
    )
    .unwrap();
    let store = TableStore::new(dir.path(), dir.path(), names);

    let inputs = store.load_inputs().unwrap();

    assert_eq!(inputs.payments.map(|p| p.len()), Some(0));
    assert_eq!(inputs.touches.map(|t| t.len()), Some(1));
    assert_eq!(inputs.dropped.len(), 1);
    assert_eq!(inputs.dropped[0].table, "payments");
}

#[test]
fn touches_keep_optional_opportunity() {
    let csv = "\
ContactEmail,TouchpointDate,CampaignSource,ActionType,AssociatedOpportunityID
amy@example.com,2025-08-14 09:30:00,Q4 Webinar,Demo Requested,006AAAAAAAAAAAA
bob@example.com,2025-08-15 10:00:00,Organic Search,Website Visit,
,2025-08-15 10:00:00,Organic Search,Website Visit,
";
    let loaded = read_touches(csv.as_bytes()).unwrap();

    assert_eq!(loaded.rows.len(), 2);
    assert_eq!(loaded.rows[0].action, ActionType::DemoRequested);
    assert_eq!(loaded.rows[0].associated_deal.as_deref(), Some("006AAAAAAAAAAAA"));
    assert_eq!(loaded.rows[1].associated_deal, None);
    assert_eq!(loaded.dropped.len(), 1);
}

#[test]
fn ad_spend_accepts_float_counts() {
    let csv = "\
CampaignID,CampaignName,Date,Spend,SourcePlatform,Impressions,Clicks
GA_123,Google Search - Core Keywords,2025-08-01,120.50,Google Ads,4000.0,80
GA_456,Google Ads Display,2025-08-01,abc,Google Ads,4000,80
";
    let loaded = read_ad_spend(csv.as_bytes()).unwrap();

    assert_eq!(loaded.rows.len(), 1);
    assert_eq!(loaded.rows[0].impressions, 4_000);
    assert_eq!(loaded.rows[0].spend, 120.5);
    assert_eq!(loaded.dropped.len(), 1);
}

#[test]
fn missing_file_loads_as_absent_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = TableStore::new(dir.path(), dir.path(), TableNames::default());

    let inputs = store.load_inputs().unwrap();

    assert!(inputs.deals.is_none());
    assert!(inputs.payments.is_none());
    assert!(inputs.touches.is_none());
    assert!(inputs.ad_spend.is_none());
}

#[test]
fn saved_inputs_load_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = TableStore::new(dir.path(), dir.path().join("reports"), TableNames::default());
    let generated = MockDataGenerator::new(GeneratorConfig {
        seed: 11,
        deals: 20,
        ..GeneratorConfig::default()
    })
    .generate();

    store.save_inputs(&generated).unwrap();
    let loaded = store.load_inputs().unwrap();

    assert!(loaded.dropped.is_empty());
    assert_eq!(loaded.deals, generated.deals);
    assert_eq!(loaded.payments, generated.payments);
    assert_eq!(loaded.touches, generated.touches);
    assert_eq!(loaded.ad_spend, generated.ad_spend);
}

#[test]
fn reports_are_written_with_header_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = TableStore::new(dir.path(), dir.path().join("out"), TableNames::default());
    let generated = MockDataGenerator::new(GeneratorConfig::default()).generate();
    let outcome = commission_core::engine::ReportEngine::default()
        .run(generated)
        .unwrap();

    let path = store
        .write_commission_report(outcome.commission_report.as_deref().unwrap())
        .unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(
        "OwnerName,Quarter,TotalPaid,TotalBaseCommission,TierBonus,TotalClawback,FinalCommission"
    ));

    let path = store.write_roi_report(outcome.roi_report.as_deref().unwrap()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with(
        "CampaignName,TotalSpend,TotalImpressions,TotalClicks,AvgCPC,TotalRevenue,TotalDeals,ROAS,AvgCPA"
    ));

    let path = store.write_lead_scores(outcome.lead_scores.as_deref().unwrap()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ContactEmail,LeadScore"));

    let log_path = dir.path().join("logs").join("events.json");
    store.write_event_log(&log_path, &outcome.events).unwrap();
    let entries: Vec<commission_core::event::EventLogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&log_path).unwrap()).unwrap();
    assert_eq!(entries, outcome.events);
}
