use std::time::Duration;

use thiserror::Error;

use crate::models::SubmissionToken;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 评测机相关错误
    #[error("评测机错误: {0}")]
    Judge(#[from] JudgeError),
    /// 代码执行错误
    #[error("执行错误: {0}")]
    Execution(#[from] ExecutionError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 与评测机交互时的错误
#[derive(Debug, Error)]
pub enum JudgeError {
    /// 不支持的语言（调用方错误）
    #[error("不支持的语言: {language}")]
    UnsupportedLanguage { language: String },

    /// 网络请求失败或超时
    #[error("评测机不可用 ({endpoint}): {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 评测机返回非 2xx 状态码
    #[error("评测机返回错误状态 ({endpoint}): HTTP {status}")]
    BadStatus { endpoint: String, status: u16 },

    /// 响应体无法解析
    #[error("评测机响应无法解析 ({endpoint}): {source}")]
    InvalidResponse {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 轮询次数用尽仍未得到终态
    #[error("轮询超时: token {token} 在 {attempts} 次轮询后仍未完成")]
    PollTimeout {
        token: SubmissionToken,
        attempts: u32,
    },

    /// 单次评测超过截止时间
    #[error("评测超过截止时间 ({timeout:?})")]
    DeadlineExceeded { timeout: Duration },

    /// 调用方取消
    #[error("评测已被取消")]
    Cancelled,
}

/// 评测的作用范围，决定对外展示的固定错误信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionScope {
    /// 样例运行
    Sample,
    /// 隐藏测试用例，能定位到具体用例时带上下标
    Hidden { case_index: Option<usize> },
}

impl ExecutionScope {
    /// 对调用方展示的固定信息
    pub fn public_message(&self) -> &'static str {
        match self {
            ExecutionScope::Sample => "Error executing code",
            ExecutionScope::Hidden { .. } => "Error running hidden test cases",
        }
    }
}

/// 评测流程失败
///
/// 与"代码运行了但答案错误"严格区分：出现这个错误说明没有得到任何判定。
/// `Display` 只输出固定信息，具体原因通过 `cause()` 取得并只写入日志。
#[derive(Debug, Error)]
#[error("{}", .scope.public_message())]
pub struct ExecutionError {
    pub scope: ExecutionScope,
    #[source]
    pub source: JudgeError,
}

impl ExecutionError {
    pub fn sample(source: JudgeError) -> Self {
        Self {
            scope: ExecutionScope::Sample,
            source,
        }
    }

    pub fn hidden(case_index: Option<usize>, source: JudgeError) -> Self {
        Self {
            scope: ExecutionScope::Hidden { case_index },
            source,
        }
    }

    pub fn public_message(&self) -> &'static str {
        self.scope.public_message()
    }

    pub fn cause(&self) -> &JudgeError {
        &self.source
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_error_hides_cause_in_display() {
        let err = ExecutionError::sample(JudgeError::PollTimeout {
            token: SubmissionToken::new("abc"),
            attempts: 3,
        });
        assert_eq!(err.to_string(), "Error executing code");
        assert!(matches!(err.cause(), JudgeError::PollTimeout { attempts: 3, .. }));
    }

    #[test]
    fn hidden_scope_uses_batch_message() {
        let err = ExecutionError::hidden(Some(2), JudgeError::Cancelled);
        assert_eq!(err.to_string(), "Error running hidden test cases");
        assert_eq!(err.scope, ExecutionScope::Hidden { case_index: Some(2) });
    }
}
