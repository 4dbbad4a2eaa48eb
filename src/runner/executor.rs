//! Scoped subprocess execution for generated candidates.
//!
//! Each candidate runs as `interpreter source` with stdin redirected from
//! the input file and stdout captured into the output file, bounded by a
//! wall-clock timeout. On expiry the child is killed and the attempt is
//! recorded as a timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Maximum stderr length carried into feedback prompts.
const MAX_STDERR_LEN: usize = 4000;

/// Errors from the executor itself (not from the candidate).
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one candidate execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The candidate exited with status 0; stdout was written to the
    /// output file.
    Completed,
    /// The candidate exited with a non-zero status or was killed by a
    /// signal.
    Crashed {
        exit_code: Option<i32>,
        stderr: String,
    },
    /// The candidate exceeded the wall-clock limit and was terminated.
    TimedOut { limit: Duration },
}

impl ExecutionOutcome {
    /// Returns true when the candidate completed normally.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed)
    }

    /// Human-readable failure description for feedback prompts.
    pub fn failure_summary(&self) -> Option<String> {
        match self {
            ExecutionOutcome::Completed => None,
            ExecutionOutcome::Crashed { exit_code, stderr } => {
                let code = exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "killed by signal".to_string());
                Some(format!("process exited with {}\n{}", code, stderr))
            }
            ExecutionOutcome::TimedOut { limit } => {
                Some(format!("execution timed out after {:?}", limit))
            }
        }
    }
}

/// Runs generated candidates under an interpreter with a timeout.
#[derive(Debug, Clone)]
pub struct CodeExecutor {
    interpreter: String,
    timeout: Duration,
}

impl CodeExecutor {
    /// Creates a new executor.
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout,
        }
    }

    /// The configured wall-clock limit.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Executes `source` with stdin from `input`, capturing stdout into
    /// `output`.
    ///
    /// Candidate failures (crash, timeout) are part of the
    /// [`ExecutionOutcome`], not errors; `Err` means the executor could not
    /// spawn the process or touch the files.
    pub async fn execute(
        &self,
        source: &Path,
        input: &Path,
        output: &Path,
    ) -> Result<ExecutionOutcome, ExecutorError> {
        let stdin_file = std::fs::File::open(input)?;

        let child = Command::new(&self.interpreter)
            .arg(source)
            .stdin(Stdio::from(stdin_file))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        debug!(
            interpreter = %self.interpreter,
            source = %source.display(),
            timeout = ?self.timeout,
            "Executing candidate"
        );

        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(process_output)) => {
                std::fs::write(output, &process_output.stdout)?;

                if process_output.status.success() {
                    Ok(ExecutionOutcome::Completed)
                } else {
                    let stderr = String::from_utf8_lossy(&process_output.stderr).to_string();
                    Ok(ExecutionOutcome::Crashed {
                        exit_code: process_output.status.code(),
                        stderr: truncate(stderr, MAX_STDERR_LEN),
                    })
                }
            }
            Ok(Err(e)) => Err(e.into()),
            // Dropping the future kills the child (kill_on_drop).
            Err(_) => Ok(ExecutionOutcome::TimedOut {
                limit: self.timeout,
            }),
        }
    }
}

fn truncate(s: String, max_len: usize) -> String {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated]", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    // Tests use /bin/sh as the interpreter so they run without Python.
    fn sh_executor(timeout: Duration) -> CodeExecutor {
        CodeExecutor::new("/bin/sh", timeout)
    }

    #[tokio::test]
    async fn test_completed_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let source = write_script(&dir, "echo.sh", "cat\n");
        let input = write_script(&dir, "input.txt", "1 2 3\n");
        let output = dir.path().join("output.txt");

        let executor = sh_executor(Duration::from_secs(5));
        let outcome = executor.execute(&source, &input, &output).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(fs::read_to_string(&output).unwrap(), "1 2 3\n");
    }

    #[tokio::test]
    async fn test_crash_reports_exit_code_and_stderr() {
        let dir = TempDir::new().unwrap();
        let source = write_script(&dir, "crash.sh", "echo boom >&2\nexit 3\n");
        let input = write_script(&dir, "input.txt", "");
        let output = dir.path().join("output.txt");

        let executor = sh_executor(Duration::from_secs(5));
        let outcome = executor.execute(&source, &input, &output).await.unwrap();

        match outcome {
            ExecutionOutcome::Crashed { exit_code, stderr } => {
                assert_eq!(exit_code, Some(3));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected crash, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let dir = TempDir::new().unwrap();
        let source = write_script(&dir, "hang.sh", "sleep 30\n");
        let input = write_script(&dir, "input.txt", "");
        let output = dir.path().join("output.txt");

        let executor = sh_executor(Duration::from_millis(200));
        let start = std::time::Instant::now();
        let outcome = executor.execute(&source, &input, &output).await.unwrap();

        assert!(matches!(outcome, ExecutionOutcome::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_missing_input_file_is_executor_error() {
        let dir = TempDir::new().unwrap();
        let source = write_script(&dir, "echo.sh", "cat\n");
        let output = dir.path().join("output.txt");

        let executor = sh_executor(Duration::from_secs(5));
        let result = executor
            .execute(&source, &dir.path().join("missing.txt"), &output)
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_failure_summary() {
        assert!(ExecutionOutcome::Completed.failure_summary().is_none());

        let crashed = ExecutionOutcome::Crashed {
            exit_code: Some(1),
            stderr: "Traceback".to_string(),
        };
        assert!(crashed.failure_summary().unwrap().contains("Traceback"));

        let timed_out = ExecutionOutcome::TimedOut {
            limit: Duration::from_secs(2),
        };
        assert!(timed_out.failure_summary().unwrap().contains("timed out"));
    }
}
