//! Drives `driver::run` through the compiled `apriori_driver` library, exercising the
//! full level-by-level loop against real files in a temporary directory rather than
//! just the job functions it calls.

use std::io::Write;
use std::path::{Path, PathBuf};

use apriori_driver::driver::{run, DriverConfig, MinSupportSpec};

fn write_transactions(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

#[test]
fn end_to_end_three_levels() {
    let tmp = tempfile::tempdir().unwrap();
    let transactions = write_transactions(
        tmp.path(),
        "transactions.txt",
        &[
            "t01\thotdogs buns ketchup",
            "t02\thotdogs buns",
            "t03\thotdogs buns ketchup mustard",
            "t04\tbuns ketchup",
            "t05\thotdogs ketchup mustard",
        ],
    );

    let config = DriverConfig {
        input_files: vec![transactions],
        min_support: MinSupportSpec::Absolute(2),
        runner: apriori_dataflow::Runner::Inline,
        max_iterations: 100,
        clean: false,
        output_dir: tmp.path().to_path_buf(),
    };

    let report = run(config).unwrap();
    assert!(report.levels_processed >= 1);
    assert!(report.final_file.exists());
    let content = std::fs::read_to_string(&report.final_file).unwrap();
    assert!(content.contains("hotdogs"));
}

#[test]
fn terminates_cleanly_when_no_items_meet_support() {
    let tmp = tempfile::tempdir().unwrap();
    let transactions = write_transactions(
        tmp.path(),
        "transactions.txt",
        &["t01\thotdogs", "t02\tbuns"],
    );

    let config = DriverConfig {
        input_files: vec![transactions],
        min_support: MinSupportSpec::Absolute(10),
        runner: apriori_dataflow::Runner::Inline,
        max_iterations: 100,
        clean: false,
        output_dir: tmp.path().to_path_buf(),
    };

    let report = run(config).unwrap();
    assert_eq!(report.total_frequent_itemsets, 0);
    assert_eq!(report.levels_processed, 1);
}
