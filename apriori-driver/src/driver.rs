//! The Apriori iteration loop: find frequent `k`-itemsets, generate `(k+1)`-candidates,
//! repeat until a level turns up nothing or `max_iterations` is reached.
//!
//! A direct re-expression of `frequent_itemsets_mining`'s step-function decomposition
//! (see `DESIGN.md`), with emoji `print()` banners replaced by `log::info!`/
//! `log::debug!` calls carrying the same information (per-level counts, timing, file
//! paths).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use apriori_dataflow::jobs;
use apriori_dataflow::model::{FrequentItemset, Itemset, MinSupport};
use apriori_dataflow::runtime::{self, Runner};

use crate::error::DriverError;
use crate::layout::Layout;

/// How the caller specified the minimum-support threshold.
#[derive(Debug, Clone, Copy)]
pub enum MinSupportSpec {
    Absolute(u64),
    Decimal(f64),
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub input_files: Vec<PathBuf>,
    pub min_support: MinSupportSpec,
    pub runner: Runner,
    pub max_iterations: u32,
    pub clean: bool,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DriverReport {
    pub levels_processed: u32,
    pub total_frequent_itemsets: usize,
    pub final_file: PathBuf,
    pub duration: Duration,
}

fn validate(config: &DriverConfig) -> Result<(), DriverError> {
    if config.max_iterations < 1 {
        return Err(DriverError::InvalidMaxIterations);
    }
    match config.min_support {
        MinSupportSpec::Decimal(p) if !(0.0..=1.0).contains(&p) => {
            return Err(DriverError::InvalidDecimalSupport);
        }
        MinSupportSpec::Absolute(0) => {
            return Err(DriverError::InvalidAbsoluteSupport);
        }
        _ => {}
    }
    for path in &config.input_files {
        if !path.exists() {
            return Err(DriverError::MissingInput(path.clone()));
        }
    }
    Ok(())
}

/// Runs the full Apriori loop and returns a summary report.
pub fn run(config: DriverConfig) -> Result<DriverReport, DriverError> {
    validate(&config)?;

    let layout = Layout::new(&config.output_dir);
    if config.clean {
        log::info!("cleaning prior output in {}", config.output_dir.display());
        layout.clean()?;
    }
    layout.ensure_dirs()?;

    let start = Instant::now();

    let min_support = resolve_min_support(&config, &layout)?;
    log::info!(
        "starting Apriori mining over {} input file(s), min-support={}, runner={}",
        config.input_files.len(),
        min_support.get(),
        config.runner,
    );

    let mut level: u32 = 1;
    let mut iteration: u32 = 0;
    let mut total_frequent_itemsets: usize = 0;

    while iteration < config.max_iterations {
        log::info!("finding frequent {level}-itemsets");

        let frequent = find_frequent_itemsets(&config, &layout, level, min_support)?;
        persist_frequent_level(&layout, level, &frequent)?;
        total_frequent_itemsets += frequent.len();

        if frequent.is_empty() {
            log::info!("no frequent {level}-itemsets found; algorithm complete");
            break;
        }
        log::info!("found {} frequent {level}-itemsets", frequent.len());

        let next_level = level + 1;
        log::debug!("generating candidate {next_level}-itemsets");
        let candidates = generate_candidates(&config, &layout, level)?;
        persist_candidate_level(&layout, next_level, &candidates)?;

        if candidates.is_empty() {
            log::info!("no candidate {next_level}-itemsets generated; algorithm complete");
            break;
        }
        log::info!("generated {} candidate {next_level}-itemsets", candidates.len());

        level = next_level;
        iteration += 1;
    }

    let final_file = layout.final_frequent_itemsets_file();
    combine_levels(&layout, level, &final_file)?;
    let duration = start.elapsed();

    log::info!(
        "Apriori mining completed in {:.2}s: {} total frequent itemsets across {} level(s)",
        duration.as_secs_f64(),
        total_frequent_itemsets,
        level,
    );

    Ok(DriverReport {
        levels_processed: level,
        total_frequent_itemsets,
        final_file,
        duration,
    })
}

fn resolve_min_support(config: &DriverConfig, _layout: &Layout) -> Result<MinSupport, DriverError> {
    match config.min_support {
        MinSupportSpec::Absolute(n) => Ok(MinSupport(n)),
        MinSupportSpec::Decimal(p) => {
            log::info!("counting transactions to resolve decimal min-support {p}");
            let total = jobs::convert::count_transactions(&config.input_files, config.runner)?;
            let resolved = MinSupport::from_decimal(p, total);
            log::info!(
                "resolved min-support {} from {} transactions at p={p}",
                resolved.get(),
                total,
            );
            Ok(resolved)
        }
    }
}

fn find_frequent_itemsets(
    config: &DriverConfig,
    layout: &Layout,
    level: u32,
    min_support: MinSupport,
) -> Result<Vec<FrequentItemset>, DriverError> {
    if level == 1 {
        Ok(jobs::count::count_singletons(
            &config.input_files,
            min_support,
            config.runner,
        )?)
    } else {
        let candidate_file = layout.candidate_itemsets_file(level);
        let candidates = jobs::count::load_candidate_file(&candidate_file)?;
        Ok(jobs::count::count_candidates(
            &config.input_files,
            &candidates,
            min_support,
            config.runner,
        )?)
    }
}

fn generate_candidates(
    config: &DriverConfig,
    layout: &Layout,
    level: u32,
) -> Result<Vec<Itemset>, DriverError> {
    let frequent_file = layout.frequent_itemsets_file(level);
    if level == 1 {
        Ok(jobs::candidates2::generate_candidate_2_itemsets(&[
            frequent_file,
        ])?)
    } else {
        Ok(jobs::candgen::generate_candidate_itemsets(
            &[frequent_file],
            config.runner,
        )?)
    }
}

/// Writes the level's frequent itemsets as a single part file, then consolidates the
/// parts directory into the level's flat `frequent_itemsets_<level>.txt`.
fn persist_frequent_level(
    layout: &Layout,
    level: u32,
    records: &[FrequentItemset],
) -> Result<(), DriverError> {
    let lines: Vec<String> = records.iter().map(FrequentItemset::to_wire).collect();
    runtime::write_part_file(&layout.frequent_itemsets_dir(), level, 0, &lines)?;
    let parts_dir = layout.frequent_itemsets_dir().join(format!("_parts_{level}"));
    runtime::combine_parts(&parts_dir, &layout.frequent_itemsets_file(level))?;
    Ok(())
}

fn persist_candidate_level(
    layout: &Layout,
    level: u32,
    candidates: &[Itemset],
) -> Result<(), DriverError> {
    let lines: Vec<String> = candidates.iter().map(Itemset::to_wire).collect();
    runtime::write_part_file(&layout.candidate_itemsets_dir(), level, 0, &lines)?;
    let parts_dir = layout.candidate_itemsets_dir().join(format!("_parts_{level}"));
    runtime::combine_parts(&parts_dir, &layout.candidate_itemsets_file(level))?;
    Ok(())
}

/// Concatenates every level's consolidated frequent-itemsets file, in level order, into
/// the final combined file.
fn combine_levels(layout: &Layout, final_level: u32, dest: &std::path::Path) -> Result<(), DriverError> {
    let mut out = String::new();
    for level in 1..=final_level {
        let path = layout.frequent_itemsets_file(level);
        if let Ok(content) = std::fs::read_to_string(&path) {
            for line in content.lines() {
                if line.is_empty() {
                    continue;
                }
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    std::fs::write(dest, out).map_err(|e| apriori_dataflow::JobError::io(dest, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_transactions(dir: &std::path::Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn zero_absolute_min_support_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let transactions = write_transactions(tmp.path(), "t.txt", &["t01\ta b"]);
        let config = DriverConfig {
            input_files: vec![transactions],
            min_support: MinSupportSpec::Absolute(0),
            runner: Runner::Inline,
            max_iterations: 10,
            clean: false,
            output_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(
            run(config),
            Err(DriverError::InvalidAbsoluteSupport)
        ));
    }

    #[test]
    fn missing_input_file_is_rejected_before_any_job_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let config = DriverConfig {
            input_files: vec![tmp.path().join("does-not-exist.txt")],
            min_support: MinSupportSpec::Absolute(1),
            runner: Runner::Inline,
            max_iterations: 10,
            clean: false,
            output_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(run(config), Err(DriverError::MissingInput(_))));
    }

    #[test]
    fn zero_max_iterations_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let transactions = write_transactions(tmp.path(), "t.txt", &["t01\ta b"]);
        let config = DriverConfig {
            input_files: vec![transactions],
            min_support: MinSupportSpec::Absolute(1),
            runner: Runner::Inline,
            max_iterations: 0,
            clean: false,
            output_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(run(config), Err(DriverError::InvalidMaxIterations)));
    }
}
