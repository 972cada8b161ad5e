pub mod api;
pub mod language;
pub mod loaders;
pub mod submission;
pub mod task;
pub mod verdict;

pub use api::{ApiError, ApiResponse, RunHiddenTestsRequest, RunSampleRequest};
pub use language::Language;
pub use loaders::{load_all_toml_files, load_toml_to_task};
pub use submission::{
    JudgeResult, JudgeStatus, StatusInfo, SubmissionCreated, SubmissionRequest, SubmissionToken,
};
pub use task::PracticeTask;
pub use verdict::{Outcome, TestCase, Verdict};
