//! The solve pipeline: bounded generator loops, the sequential
//! orchestrator, and the run report.

pub mod gen_loop;
pub mod orchestrator;
pub mod report;
pub mod types;

pub use gen_loop::{GeneratorLoop, LoopOutcome};
pub use orchestrator::{Orchestrator, StageProviders};
pub use report::{FinalJudgeSummary, GroupResult, SolveReport};
pub use types::{Attempt, SampleIo, Verdict};
