//! The MR execution substrate: a short-lived `timely` computation per job, with a single
//! reusable shuffle-then-reduce operator standing in for the external MapReduce
//! framework each job is otherwise agnostic to.
//!
//! Grounded on the classic `timely` operator surface (`Exchange` pact +
//! `Operator::unary_notify`, accumulate-until-frontier-closes, then emit) as used in
//! `examples/TimelyDataflow-differential-dataflow/src/operators/group_alt.rs` and
//! `server/src/lib.rs`. We deliberately stay on this well-documented, long-stable
//! surface rather than the container/columnar-based plumbing later `0.19`/`0.27`
//! releases have moved to (see `DESIGN.md`), since every line here is written without
//! ever compiling it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use timely::dataflow::channels::pact::Exchange;
use timely::dataflow::operators::Operator;
use timely::dataflow::{Scope, Stream};
use timely::Data;

use crate::error::JobError;

/// Which execution engine a job runs under.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Runner {
    /// Single worker thread, no parallelism. The default.
    Inline,
    /// `workers` worker threads in this process.
    Local { workers: usize },
    /// Accepted for CLI compatibility; real Hadoop/YARN submission is a non-goal.
    Hadoop,
}

impl fmt::Display for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runner::Inline => write!(f, "inline"),
            Runner::Local { workers } => write!(f, "local[{workers}]"),
            Runner::Hadoop => write!(f, "hadoop"),
        }
    }
}

impl Runner {
    fn config(self) -> Result<timely::Config, JobError> {
        match self {
            Runner::Inline => Ok(timely::Config::thread()),
            Runner::Local { workers } if workers >= 1 => Ok(timely::Config::process(workers)),
            Runner::Local { .. } => Err(JobError::InvalidConfig(
                "local runner requires at least one worker".to_string(),
            )),
            Runner::Hadoop => Err(JobError::UnsupportedRunner { runner: self }),
        }
    }
}

/// Runs `build` once per worker thread under `runner`, returning the concatenation of
/// every worker's result. Each job function in `jobs/` is a thin wrapper around this:
/// it builds one `timely` dataflow (ingest, shuffle, reduce, collect), runs it to
/// completion, and hands the gathered records back to the driver only once every worker
/// has finished — which is what gives the driver's level-by-level loop its strict
/// sequencing.
pub fn run_job<T, F>(runner: Runner, build: F) -> Result<Vec<T>, JobError>
where
    T: Send + 'static,
    F: Fn(&mut timely::worker::Worker<timely::communication::Allocator>) -> Vec<T>
        + Send
        + Sync
        + 'static,
{
    let config = runner.config()?;
    let guards = timely::execute(config, move |worker| build(worker)).map_err(|cause| {
        JobError::JobFailed {
            job: "mr-runtime",
            level: 0,
            cause,
        }
    })?;
    let mut out = Vec::new();
    for result in guards.join() {
        let mut partial = result.map_err(|cause| JobError::JobFailed {
            job: "mr-runtime",
            level: 0,
            cause,
        })?;
        out.append(&mut partial);
    }
    Ok(out)
}

/// Blocks on a freshly-built dataflow until it has fully drained, the classic
/// run-to-completion idiom for a one-shot batch `timely` job (no probe needed: a finite
/// job's frontier empties on its own).
pub fn run_to_completion(worker: &mut timely::worker::Worker<timely::communication::Allocator>) {
    while worker.step() {}
}

/// Collects every record a stream produces into `sink`, read back by the caller once
/// [`run_to_completion`] returns. `inspect`'s closure must be `'static`, so the sink is
/// shared via `Rc<RefCell<_>>` rather than borrowed from the enclosing job function.
pub fn capture_into<G, D>(stream: &Stream<G, D>, sink: std::rc::Rc<std::cell::RefCell<Vec<D>>>)
where
    G: Scope,
    D: Data,
{
    use timely::dataflow::operators::Inspect;
    stream.inspect(move |record| sink.borrow_mut().push(record.clone()));
}

/// Shuffles `(key, value)` pairs by key and reduces each key's full group exactly once,
/// after the input frontier has closed. This single operator is the "shuffle + reduce
/// (with combiner)" primitive every job builds on: the map side is whatever upstream
/// operator produced `stream`, the `Exchange` pact below is the shuffle, and the
/// accumulate-then-emit-on-notify body is the reduce.
///
/// `reduce` runs once per key, once per worker, with that worker's full accumulated
/// group for the key (the `Exchange` pact guarantees every instance of a key lands on
/// the same worker, so no partial group is ever reduced).
pub fn shuffle_reduce<G, K, V, O, F>(
    stream: &Stream<G, (K, V)>,
    name: &str,
    reduce: F,
) -> Stream<G, O>
where
    G: Scope,
    K: Data + Eq + Hash,
    V: Data,
    O: Data,
    F: Fn(&K, Vec<V>) -> Vec<O> + 'static,
{
    let exchange = Exchange::new(|pair: &(K, V)| {
        let mut hasher = DefaultHasher::new();
        pair.0.hash(&mut hasher);
        hasher.finish()
    });

    // One accumulation map per outstanding timestamp, owned by this operator's closure
    // (the capability/notificator accumulate-then-finalize pattern read from
    // `group_alt.rs`): every `(key, value)` pair for a given input epoch is buffered
    // here until that epoch's notification fires, at which point every key's full
    // group is reduced exactly once.
    let mut accum: HashMap<G::Timestamp, HashMap<K, Vec<V>>> = HashMap::new();

    stream.unary_notify(exchange, name, None, move |input, output, notificator, _| {
        input.for_each(|time, data| {
            let groups = accum.entry(time.time().clone()).or_insert_with(HashMap::new);
            for (key, value) in data.drain(..) {
                groups.entry(key).or_insert_with(Vec::new).push(value);
            }
            notificator.notify_at(time.retain());
        });

        notificator.for_each(|time, _count, _notificator| {
            if let Some(groups) = accum.remove(time.time()) {
                let mut session = output.session(&time);
                for (key, values) in groups {
                    for out in reduce(&key, values) {
                        session.give(out);
                    }
                }
            }
        });
    })
}

/// Assigns file lines to worker partitions round-robin by line index, mirroring how
/// `mrjob`-style input splits divide a file across map tasks. Used by jobs that read
/// transaction/candidate files directly.
pub fn read_lines_for_worker(path: &Path, index: usize, peers: usize) -> Result<Vec<String>, JobError> {
    let content = std::fs::read_to_string(path).map_err(|e| JobError::io(path, e))?;
    Ok(content
        .lines()
        .enumerate()
        .filter(|(i, _)| i % peers == index)
        .map(|(_, line)| line.to_string())
        .collect())
}

/// Writes one part file per worker under `dir/_parts_<k>/part-<index>`, the naming
/// convention ported from `apriori_core.py`'s `PARTS_SUBDIR` layout.
pub fn write_part_file(dir: &Path, level: u32, index: usize, lines: &[String]) -> Result<PathBuf, JobError> {
    let parts_dir = dir.join(format!("_parts_{level}"));
    std::fs::create_dir_all(&parts_dir).map_err(|e| JobError::io(&parts_dir, e))?;
    let part_path = parts_dir.join(format!("part-{index:05}"));
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(&part_path, content).map_err(|e| JobError::io(&part_path, e))?;
    Ok(part_path)
}

/// Consolidates `_parts_<k>/part-*` into a single sorted-by-filename file, dropping
/// empty lines, mirroring `apriori_core.py`'s `combine_parts`/`_process_part_file`.
pub fn combine_parts(parts_dir: &Path, dest: &Path) -> Result<(), JobError> {
    let mut part_paths: Vec<PathBuf> = std::fs::read_dir(parts_dir)
        .map_err(|e| JobError::io(parts_dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    part_paths.sort();

    let mut out = String::new();
    for part_path in &part_paths {
        let content = std::fs::read_to_string(part_path).map_err(|e| JobError::io(part_path, e))?;
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| JobError::io(parent, e))?;
    }
    std::fs::write(dest, out).map_err(|e| JobError::io(dest, e))
}

/// Removes `_parts_<k>` directories and the level's consolidated files, the `--clean`
/// behavior.
pub fn refresh_directory(dir: &Path) -> Result<(), JobError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| JobError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| JobError::io(dir, e))
}
