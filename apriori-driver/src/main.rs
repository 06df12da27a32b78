//! Binary entry point: parse arguments, configure logging, run the Apriori loop, and
//! translate the result into a process exit code.

use clap::Parser;

use apriori_driver::cli::Cli;
use apriori_driver::driver::{self, DriverConfig, MinSupportSpec};
use apriori_driver::error::DriverError;
use apriori_driver::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let min_support = match (cli.min_support, cli.min_support_decimal) {
        (Some(n), None) => MinSupportSpec::Absolute(n),
        (None, Some(p)) => MinSupportSpec::Decimal(p),
        // The `min_support` ArgGroup already enforces exactly one of the two being
        // present; this arm only guards against that contract changing underneath us.
        _ => {
            eprintln!("{}", DriverError::ConflictingMinSupport);
            std::process::exit(2);
        }
    };

    let config = DriverConfig {
        input_files: cli.input_files,
        min_support,
        runner: cli.runner.resolve(cli.workers),
        max_iterations: cli.max_iterations,
        clean: cli.clean,
        output_dir: cli.output_dir,
    };

    match driver::run(config) {
        Ok(report) => {
            log::info!(
                "wrote {} frequent itemsets to {}",
                report.total_frequent_itemsets,
                report.final_file.display(),
            );
        }
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
