use serde::{Deserialize, Serialize};

use crate::models::{JudgeResult, JudgeStatus};

/// 测试用例（输入 + 期望输出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn expected_output(&self) -> &str {
        &self.output
    }
}

/// 判定类别
///
/// 编译错误、运行时错误与答案错误分开，`passed` 只反映输出比较结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    WrongAnswer,
    CompileError,
    RuntimeError,
    TimeLimitExceeded,
    JudgeError,
}

/// 单个用例的判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub stdout: String,
    pub expected_output: String,
    pub passed: bool,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// 评测机附带的说明（如运行时错误的信号描述）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 运行时间（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// 内存占用（KB）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

impl Verdict {
    /// 根据评测机终态结果和期望输出生成判定
    ///
    /// 两边都先 trim 再做精确比较，缺失的 stdout 视为空字符串。
    pub fn from_result(result: &JudgeResult, expected_output: Option<&str>) -> Self {
        let stdout = result.stdout.as_deref().unwrap_or("").trim().to_string();
        let expected_output = expected_output.unwrap_or("").trim().to_string();
        let passed = stdout == expected_output;

        let status = result.status();
        let outcome = match status {
            JudgeStatus::CompilationError => Outcome::CompileError,
            JudgeStatus::RuntimeError(_) => Outcome::RuntimeError,
            JudgeStatus::TimeLimitExceeded => Outcome::TimeLimitExceeded,
            JudgeStatus::InternalError | JudgeStatus::ExecFormatError | JudgeStatus::Unknown(_) => {
                Outcome::JudgeError
            }
            _ if passed => Outcome::Passed,
            _ => Outcome::WrongAnswer,
        };

        let stderr = match status {
            JudgeStatus::CompilationError => result
                .compile_output
                .clone()
                .or_else(|| result.stderr.clone()),
            _ => result.stderr.clone(),
        };

        Self {
            stdout,
            expected_output,
            passed,
            outcome,
            stderr,
            message: result.message.clone(),
            time: result.time.clone(),
            memory: result.memory,
        }
    }
}
