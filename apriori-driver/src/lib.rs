//! Library surface for the `apriori` CLI binary: argument parsing, directory layout,
//! the Apriori iteration loop, logging setup, and error reporting. Split out from
//! `main.rs` so `tests/` can drive `driver::run` end-to-end without shelling out to
//! the compiled binary.

pub mod cli;
pub mod driver;
pub mod error;
pub mod layout;
pub mod logging;
