use membound_core::scan::rules::{RuleSet, RuleSummary};

use crate::cli::args::{OutputFormat, RulesArgs};
use crate::exit_codes;

pub fn run(args: RulesArgs) -> anyhow::Result<i32> {
    let cfg = match super::resolve_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let mut set = RuleSet::builtin();
    set.extend_from_specs(&cfg.rules)?;

    match args.format {
        OutputFormat::Text => println!("{set}"),
        OutputFormat::Json => {
            let summaries: Vec<RuleSummary> = set.rules().iter().map(RuleSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }
    Ok(exit_codes::SUCCESS)
}
