//! # OA Code Runner
//!
//! 在线笔试练习平台的远程评测模块：把代码提交给第三方评测机，
//! 轮询结果，并与期望输出比较得出判定。
//!
//! 本模块不运行任何代码，只做请求的转发和结果的对比。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端和凭据，只暴露"提交"和"查询"能力
//! - `JudgeClient` - 评测机 API 客户端
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 token
//! - `Poller` - 有上限的轮询状态机
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个用例"的完整评测流程
//! - `CaseCtx` - 上下文封装（用例下标）
//! - `CaseFlow` - 流程编排（提交 → 轮询 → 比较）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_evaluator` - 隐藏用例批量评测，管理并发
//! - `orchestrator/task_runner` - 命令行批量运行题目
//!
//! ### ⑤ 接口层（Api）
//! - `api/` - 面向 HTTP 处理层的"运行样例"和"运行隐藏用例"接口
//!
//! ## 模块结构

pub mod api;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use api::ExecutionApi;
pub use clients::JudgeClient;
pub use config::Config;
pub use error::{AppError, AppResult, ExecutionError, JudgeError};
pub use models::{Language, Outcome, TestCase, Verdict};
pub use orchestrator::{App, BatchEvaluator};
pub use services::{PollPolicy, Poller};
pub use utils::{CancelHandle, CancelSignal};
pub use workflow::{CaseCtx, CaseFlow};
