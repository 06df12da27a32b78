//! Argument parsing: `--min-support`/`--min-support-decimal`, `-r`/`--runner`,
//! `--max-iterations`, `--clean`, split into an absolute/decimal min-support choice via
//! a `clap` `ArgGroup` (see `DESIGN.md` for the `derive(Parser)` grounding).

use std::path::PathBuf;

use apriori_dataflow::Runner;
use clap::{ArgGroup, Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "apriori",
    about = "Mines frequent itemsets from transaction files with a MapReduce-style Apriori pipeline",
    group(ArgGroup::new("min_support").required(true).args(["min_support", "min_support_decimal"]))
)]
pub struct Cli {
    /// Transaction files, each line formatted as "tid\titem1 item2 ...".
    #[arg(required = true)]
    pub input_files: Vec<PathBuf>,

    /// Absolute minimum support (a transaction count).
    #[arg(long)]
    pub min_support: Option<u64>,

    /// Decimal minimum support in [0, 1.0], resolved to an absolute count by counting
    /// transactions once before the main loop.
    #[arg(long)]
    pub min_support_decimal: Option<f64>,

    /// MapReduce execution backend.
    #[arg(short = 'r', long, value_enum, default_value_t = RunnerArg::Inline)]
    pub runner: RunnerArg,

    /// Worker threads used by the `local` runner.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Maximum number of levels to run before giving up.
    #[arg(long, default_value_t = 100)]
    pub max_iterations: u32,

    /// Remove prior per-level artifacts before running.
    #[arg(long)]
    pub clean: bool,

    /// Base directory for `frequent-itemsets/` and `candidate-itemsets/`.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Increase log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum RunnerArg {
    Inline,
    Local,
    Hadoop,
}

impl RunnerArg {
    pub fn resolve(self, workers: usize) -> Runner {
        match self {
            RunnerArg::Inline => Runner::Inline,
            RunnerArg::Local => Runner::Local { workers },
            RunnerArg::Hadoop => Runner::Hadoop,
        }
    }
}
