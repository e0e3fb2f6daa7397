use std::io::Write;

use membound_core::{run_session, GuardConfig, GuardError, SessionOptions, SessionReport};
use serde_json::json;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::exit_codes;

pub fn run(args: RunArgs) -> anyhow::Result<i32> {
    // 1. Config file, then flag overrides
    let cfg = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let mut opts = SessionOptions::from(&cfg);
    opts.source = args.source.as_ref().map(|s| s.as_bytes().to_vec());

    if args.prompt {
        eprint!("Enter your name: ");
        std::io::stderr().flush()?;
    }

    // 2. Single pass over stdin
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let result = run_session(&mut input, &opts);

    // 3. Report
    let exit_code = match &result {
        Ok(_) => exit_codes::SUCCESS,
        Err(e) => exit_codes::for_error(e),
    };
    match args.format {
        OutputFormat::Text => print_text(&result),
        OutputFormat::Json => {
            let doc = build_run_json(&result, exit_code);
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(exit_code)
}

fn build_config(args: &RunArgs) -> anyhow::Result<GuardConfig> {
    let mut cfg = super::resolve_config(args.config.as_deref())?;
    if let Some(n) = args.capacity {
        cfg.input_capacity = n;
    }
    if let Some(m) = args.dest_capacity {
        cfg.source_capacity = m;
    }
    if let Some(size) = args.alloc_size {
        cfg.alloc_size = size;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn print_text(result: &Result<SessionReport, GuardError>) {
    match result {
        Ok(report) => println!("{}", report.copied),
        Err(e @ GuardError::Truncated { kept, .. }) => {
            eprintln!("error: {e} (kept \"{kept}\")");
        }
        Err(e @ GuardError::Rejected(_)) => {
            eprintln!("error: {e}; destination left unchanged");
        }
        Err(e) => eprintln!("error: {e}"),
    }
}

fn build_run_json(result: &Result<SessionReport, GuardError>, exit_code: i32) -> serde_json::Value {
    match result {
        Ok(report) => json!({
            "status": "ok",
            "line": report.line.to_string(),
            "copied": report.copied.to_string(),
            "value": report.value,
            "exit_code": exit_code,
        }),
        Err(e) => {
            let mut doc = json!({
                "status": "error",
                "code": e.code(),
                "message": e.to_string(),
                "exit_code": exit_code,
            });
            if let GuardError::Truncated { kept, .. } = e {
                doc["kept"] = json!(kept.to_string());
            }
            doc
        }
    }
}
