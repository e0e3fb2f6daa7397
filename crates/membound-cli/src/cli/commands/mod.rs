use std::path::Path;

use membound_core::GuardConfig;

use super::args::*;
use crate::exit_codes::SUCCESS;

pub mod rules;
pub mod run;
pub mod scan;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args),
        Command::Scan(args) => scan::run(args),
        Command::Rules(args) => rules::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Loads `path` when given, otherwise the defaults.
pub(crate) fn resolve_config(path: Option<&Path>) -> Result<GuardConfig, membound_core::ConfigError> {
    match path {
        Some(p) => membound_core::load_config(p),
        None => Ok(GuardConfig::default()),
    }
}
