//! report-runner: headless batch runner for the commission and ROI reports.
//!
//! Usage:
//!   report-runner analyze --data-dir ./data --out-dir ./reports
//!   report-runner analyze --config analyzer.json --event-log run_events.json
//!   report-runner generate --seed 42 --deals 150 --out-dir ./data

use anyhow::{bail, Result};
use commission_core::{
    config::AnalyzerConfig,
    engine::{BatchOutcome, ReportEngine},
    mock_data::{GeneratorConfig, MockDataGenerator},
    tables::TableStore,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mode = args
        .get(1)
        .map(String::as_str)
        .filter(|a| !a.starts_with("--"))
        .unwrap_or("analyze");

    match mode {
        "analyze" => run_analyze(&args),
        "generate" => run_generate(&args),
        other => bail!("unknown mode '{other}' (expected 'analyze' or 'generate')"),
    }
}

fn run_analyze(args: &[String]) -> Result<()> {
    let data_dir = flag_value(args, "--data-dir").unwrap_or("./data");
    let out_dir = flag_value(args, "--out-dir").unwrap_or("./reports");
    let event_log = flag_value(args, "--event-log");

    let config = match flag_value(args, "--config") {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    println!("report-runner: analyze");
    println!("  data_dir:  {data_dir}");
    println!("  out_dir:   {out_dir}");
    println!();

    let store = TableStore::new(data_dir, out_dir, config.tables.clone());
    let inputs = store.load_inputs()?;
    let engine = ReportEngine::build(&config);
    let outcome = engine.run(inputs)?;

    if let Some(rows) = &outcome.commission_report {
        store.write_commission_report(rows)?;
    }
    if let Some(rows) = &outcome.roi_report {
        store.write_roi_report(rows)?;
    }
    if let Some(rows) = &outcome.lead_scores {
        store.write_lead_scores(rows)?;
    }
    if let Some(path) = event_log {
        store.write_event_log(Path::new(path), &outcome.events)?;
    }

    log::info!("report-runner: reports written to {}", store.output_dir().display());
    print_summary(&outcome);
    Ok(())
}

fn run_generate(args: &[String]) -> Result<()> {
    let defaults = GeneratorConfig::default();
    let config = GeneratorConfig {
        seed: parse_arg(args, "--seed", defaults.seed),
        deals: parse_arg(args, "--deals", defaults.deals),
        ..defaults
    };
    let out_dir = flag_value(args, "--out-dir").unwrap_or("./data");

    println!("report-runner: generate");
    println!("  seed:      {}", config.seed);
    println!("  deals:     {}", config.deals);
    println!("  out_dir:   {out_dir}");
    println!();

    let tables = MockDataGenerator::new(config).generate();
    let app_config = AnalyzerConfig::default();
    let store = TableStore::new(out_dir, out_dir, app_config.tables);
    store.save_inputs(&tables)?;
    log::info!("report-runner: mock inputs written to {}", store.input_dir().display());

    println!("=== GENERATED ===");
    println!("  deals:     {}", tables.deals.as_ref().map_or(0, Vec::len));
    println!("  payments:  {}", tables.payments.as_ref().map_or(0, Vec::len));
    println!("  touches:   {}", tables.touches.as_ref().map_or(0, Vec::len));
    println!("  ad spend:  {}", tables.ad_spend.as_ref().map_or(0, Vec::len));
    Ok(())
}

fn print_summary(outcome: &BatchOutcome) {
    println!("=== RECONCILIATION ===");
    match &outcome.summary {
        Some(s) => {
            println!("  succeeded payments: {}", s.succeeded_payments);
            println!("  matched:            {}", s.matched);
            println!("  unmatched:          {}", s.unmatched);
            println!("  unmatched amount:   ${:.2}", s.unmatched_amount);
            if !s.duplicate_deal_ids.is_empty() {
                println!("  duplicate deal ids: {}", s.duplicate_deal_ids.len());
            }
        }
        None => println!("  (skipped)"),
    }

    println!();
    println!("=== COMMISSIONS ===");
    match &outcome.commission_report {
        Some(rows) if rows.is_empty() => println!("  (no matched payments)"),
        Some(rows) => {
            for r in rows {
                println!(
                    "  {} | {} (ends {}) | Paid: ${:.2} | Final: ${:.2}",
                    r.owner_name,
                    r.quarter,
                    r.quarter.end_date(),
                    r.total_paid,
                    r.final_commission
                );
            }
        }
        None => println!("  (skipped)"),
    }

    println!();
    println!("=== CAMPAIGN ROI ===");
    match &outcome.roi_report {
        Some(rows) => {
            for r in rows {
                println!(
                    "  {} | Spend: ${:.2} | Revenue: ${:.2} | ROAS: {:.2}",
                    r.campaign_name, r.total_spend, r.total_revenue, r.roas
                );
            }
        }
        None => println!("  (skipped)"),
    }

    println!();
    println!("=== TOP LEADS ===");
    match &outcome.lead_scores {
        Some(rows) => {
            for l in rows.iter().take(10) {
                println!("  {:>3}  {}", l.lead_score, l.contact_email);
            }
        }
        None => println!("  (skipped)"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
