//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_evaluator` - 隐藏用例批量评测
//! - 每个用例一个任务（JoinSet），并发提交、并发轮询
//! - 按输入下标对齐结果
//! - 首个失败终止整批
//!
//! ### `task_runner` - 题目批量运行器
//! - 管理应用生命周期（初始化、运行）
//! - 从目录加载题目（Vec<PracticeTask>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! task_runner (处理 Vec<PracticeTask>)
//!     ↓
//! api::ExecutionApi (样例 / 隐藏用例)
//!     ↓
//! batch_evaluator (处理 Vec<TestCase>)
//!     ↓
//! workflow::CaseFlow (处理单个用例)
//!     ↓
//! services::Poller (轮询能力)
//!     ↓
//! clients::JudgeClient (评测机 HTTP 调用)
//! ```

pub mod batch_evaluator;
pub mod task_runner;

// 重新导出主要类型
pub use batch_evaluator::BatchEvaluator;
pub use task_runner::{App, TaskReport};
