use membound_core::scan::rules::RuleSet;
use membound_core::{scan_file, ScanReport};
use serde_json::json;

use crate::cli::args::{OutputFormat, ScanArgs};
use crate::exit_codes;

pub fn run(args: ScanArgs) -> anyhow::Result<i32> {
    // 1. Rules: built-in plus config extras
    let cfg = match super::resolve_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let mut rules = RuleSet::builtin();
    rules.extend_from_specs(&cfg.rules)?;

    // 2. Validate + scan
    let report = match scan_file(&args.file, &rules) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Sorry, the provided file is not valid.");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    // 3. Exit code, then output
    let exit_code = decide_scan_exit(&report);
    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => {
            let doc = json!({
                "file": report.file,
                "findings": report.findings,
                "highest_severity": report.highest_severity(),
                "exit_code": exit_code,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(exit_code)
}

fn decide_scan_exit(report: &ScanReport) -> i32 {
    if report.has_findings() {
        exit_codes::FINDINGS
    } else {
        exit_codes::SUCCESS
    }
}

fn print_text(report: &ScanReport) {
    for f in &report.findings {
        println!(
            "{}:{}:{}: {} [{}] {}",
            report.file, f.line, f.column, f.severity, f.rule, f.snippet
        );
    }
    // Summary is always printed to stderr (human-readable)
    match report.highest_severity() {
        Some(highest) => {
            let counts = report.count_by_severity();
            let summary: Vec<String> = counts
                .iter()
                .rev()
                .map(|(sev, n)| format!("{n} {sev}"))
                .collect();
            eprintln!(
                "{} finding(s) in {} (highest {highest}): {}",
                report.findings.len(),
                report.file,
                summary.join(", ")
            );
        }
        None => eprintln!("No findings in {}", report.file),
    }
}
