//! Workspace layout for solve-run artifacts.
//!
//! Every artifact of a run lands in one directory: sample blocks, the
//! generated test stream, per-attempt solution sources, captured outputs,
//! and the final report. Attempt artifacts are numbered and never
//! overwritten, so a finished workspace is a full audit trail of the run.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::FileNames;

/// A created run workspace with its canonical artifact paths.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    files: FileNames,
}

impl Workspace {
    /// Creates the workspace directory (and parents) at `root`.
    pub fn create(root: impl Into<PathBuf>, files: FileNames) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Workspace created");
        Ok(Self { root, files })
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extracted sample input block.
    pub fn sample_input(&self) -> PathBuf {
        self.root.join("sample_input.txt")
    }

    /// Extracted sample output block.
    pub fn sample_output(&self) -> PathBuf {
        self.root.join("sample_output.txt")
    }

    /// Candidate stdout captured while validating against the sample.
    pub fn sample_run_output(&self) -> PathBuf {
        self.root.join("sample_run_output.txt")
    }

    /// Generated test-input stream.
    pub fn test_inputs(&self) -> PathBuf {
        self.root.join(&self.files.test_inputs)
    }

    /// Latest brute-force solution source.
    pub fn brute_solution(&self) -> PathBuf {
        self.root.join(&self.files.brute_solution)
    }

    /// Brute-force outputs over the generated tests.
    pub fn brute_outputs(&self) -> PathBuf {
        self.root.join(&self.files.brute_outputs)
    }

    /// Latest optimal solution source.
    pub fn optimal_solution(&self) -> PathBuf {
        self.root.join(&self.files.optimal_solution)
    }

    /// Optimal outputs over the generated tests.
    pub fn optimal_outputs(&self) -> PathBuf {
        self.root.join(&self.files.optimal_outputs)
    }

    /// Numbered brute-force attempt source.
    pub fn brute_attempt(&self, attempt: u32) -> PathBuf {
        self.root.join(format!("brute_attempt_{}.py", attempt))
    }

    /// Numbered optimal attempt source.
    pub fn optimal_attempt(&self, attempt: u32) -> PathBuf {
        self.root.join(format!("optimal_attempt_{}.py", attempt))
    }

    /// Captured stdout of a numbered optimal attempt.
    pub fn optimal_attempt_output(&self, attempt: u32) -> PathBuf {
        self.root
            .join(format!("optimal_attempt_{}_output.txt", attempt))
    }

    /// Accepted optimal solution, numbered by acceptance order.
    pub fn optimal_success(&self, rank: u32) -> PathBuf {
        self.root.join(format!("optimal_success_{}.py", rank))
    }

    /// Captured stdout of an accepted optimal solution.
    pub fn optimal_success_output(&self, rank: u32) -> PathBuf {
        self.root
            .join(format!("optimal_success_{}_output.txt", rank))
    }

    /// Final-judge transcript.
    pub fn final_comparator(&self) -> PathBuf {
        self.root.join("final_comparator.txt")
    }

    /// The machine-readable run report.
    pub fn results(&self) -> PathBuf {
        self.root.join("results.json")
    }

    /// Writes an artifact, returning its path.
    pub fn write(&self, path: PathBuf, content: &str) -> std::io::Result<PathBuf> {
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
