//! 评测机的请求与响应结构

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Language;

/// 提交请求体（`POST /submissions`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    pub source_code: String,
    pub language_id: u32,
    pub stdin: String,
}

impl SubmissionRequest {
    pub fn new(language: Language, source_code: impl Into<String>, stdin: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            language_id: language.judge_id(),
            stdin: stdin.into(),
        }
    }
}

/// 评测机返回的提交 token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionToken(String);

impl SubmissionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `POST /submissions` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionCreated {
    pub token: SubmissionToken,
}

/// 评测机状态
///
/// 编号 1、2 为非终态，其余均为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeStatus {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    /// 7-12 的各类运行时错误（SIGSEGV、SIGFPE、NZEC 等）
    RuntimeError(u32),
    InternalError,
    ExecFormatError,
    Unknown(u32),
}

impl JudgeStatus {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => JudgeStatus::InQueue,
            2 => JudgeStatus::Processing,
            3 => JudgeStatus::Accepted,
            4 => JudgeStatus::WrongAnswer,
            5 => JudgeStatus::TimeLimitExceeded,
            6 => JudgeStatus::CompilationError,
            7..=12 => JudgeStatus::RuntimeError(id),
            13 => JudgeStatus::InternalError,
            14 => JudgeStatus::ExecFormatError,
            other => JudgeStatus::Unknown(other),
        }
    }

    /// 是否为终态（id > 2）
    pub fn is_terminal(self) -> bool {
        match self {
            JudgeStatus::InQueue | JudgeStatus::Processing => false,
            JudgeStatus::Unknown(id) => id > 2,
            _ => true,
        }
    }
}

/// 状态字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub id: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET /submissions/{token}` 的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResult {
    pub status: StatusInfo,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// 运行时间（秒，评测机以字符串返回）
    #[serde(default)]
    pub time: Option<String>,
    /// 内存占用（KB）
    #[serde(default)]
    pub memory: Option<u64>,
}

impl JudgeResult {
    pub fn status(&self) -> JudgeStatus {
        JudgeStatus::from_id(self.status.id)
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}
