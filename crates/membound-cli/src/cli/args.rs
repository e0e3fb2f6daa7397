use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "membound",
    version,
    about = "Bounded line reading, capacity-checked copies and use-after-release checks, plus a scanner for the unsafe C calls they replace"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read one line from stdin, copy it, touch an allocation, print the result
    Run(RunArgs),
    /// Scan a C/C++ source file for unbounded reads, unchecked copies and use-after-free
    Scan(ScanArgs),
    /// List the scanner rules
    Rules(RulesArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Input buffer capacity N; at most N-1 bytes of the line are kept
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Text to copy instead of the line read from stdin
    #[arg(long)]
    pub source: Option<String>,

    /// Destination capacity M for the copy step
    #[arg(long)]
    pub dest_capacity: Option<usize>,

    /// Size in bytes of the allocation touched after the copy
    #[arg(long)]
    pub alloc_size: Option<usize>,

    /// Optional YAML config (input_capacity, source_capacity, alloc_size, rules)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print "Enter your name: " to stderr before reading
    #[arg(long)]
    pub prompt: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Source file (.c or .cpp)
    pub file: PathBuf,

    /// Optional YAML config; its `rules` are added to the built-in set
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RulesArgs {
    /// Optional YAML config; its `rules` are listed after the built-in set
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "membound",
            "run",
            "--capacity",
            "16",
            "--source",
            "hello",
            "--dest-capacity",
            "4",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Run(args) = cli.cmd else {
            panic!("expected run");
        };
        assert_eq!(args.capacity, Some(16));
        assert_eq!(args.source.as_deref(), Some("hello"));
        assert_eq!(args.dest_capacity, Some(4));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(!args.prompt);
    }

    #[test]
    fn scan_requires_a_file() {
        assert!(Cli::try_parse_from(["membound", "scan"]).is_err());
    }
}
