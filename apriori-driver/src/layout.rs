//! Directory and file-naming conventions, ported from `apriori_core.py`'s naming
//! constants (`FREQUENT_ITEMSETS_DIR`, `CANDIDATE_ITEMSETS_DIR`, `PARTS_SUBDIR`, the
//! `frequent_itemsets`/`candidate_itemsets` file prefixes).

use std::path::PathBuf;

use apriori_dataflow::JobError;

const FREQUENT_ITEMSETS_DIR: &str = "frequent-itemsets";
const CANDIDATE_ITEMSETS_DIR: &str = "candidate-itemsets";
const FREQUENT_ITEMSETS_FILE_PREFIX: &str = "frequent_itemsets";
const CANDIDATE_ITEMSETS_FILE_PREFIX: &str = "candidate_itemsets";

pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Layout {
        Layout { root: root.into() }
    }

    pub fn frequent_itemsets_dir(&self) -> PathBuf {
        self.root.join(FREQUENT_ITEMSETS_DIR)
    }

    pub fn candidate_itemsets_dir(&self) -> PathBuf {
        self.root.join(CANDIDATE_ITEMSETS_DIR)
    }

    pub fn frequent_itemsets_file(&self, level: u32) -> PathBuf {
        self.frequent_itemsets_dir()
            .join(format!("{FREQUENT_ITEMSETS_FILE_PREFIX}_{level}.txt"))
    }

    pub fn candidate_itemsets_file(&self, level: u32) -> PathBuf {
        self.candidate_itemsets_dir()
            .join(format!("{CANDIDATE_ITEMSETS_FILE_PREFIX}_{level}.txt"))
    }

    /// The final consolidated file written once the main loop terminates: every
    /// per-level frequent-itemsets file, concatenated in level order.
    pub fn final_frequent_itemsets_file(&self) -> PathBuf {
        self.frequent_itemsets_dir()
            .join(format!("{FREQUENT_ITEMSETS_FILE_PREFIX}.txt"))
    }

    pub fn ensure_dirs(&self) -> Result<(), JobError> {
        let frequent = self.frequent_itemsets_dir();
        let candidate = self.candidate_itemsets_dir();
        std::fs::create_dir_all(&frequent).map_err(|e| JobError::io(&frequent, e))?;
        std::fs::create_dir_all(&candidate).map_err(|e| JobError::io(&candidate, e))
    }

    /// `--clean`: wipes both base directories (and, with them, every level's part-file
    /// subdirectory and consolidated file) before the loop starts.
    pub fn clean(&self) -> Result<(), JobError> {
        apriori_dataflow::runtime::refresh_directory(&self.frequent_itemsets_dir())?;
        apriori_dataflow::runtime::refresh_directory(&self.candidate_itemsets_dir())
    }
}
