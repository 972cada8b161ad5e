//! 对调用方（HTTP 处理层）暴露的请求与响应结构

use serde::{Deserialize, Serialize};

use crate::models::TestCase;

/// 运行样例请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSampleRequest {
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub input: String,
    /// 期望输出，缺失时按空字符串比较
    #[serde(default)]
    pub output: Option<String>,
}

/// 运行隐藏测试用例请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHiddenTestsRequest {
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub hidden_tests: Vec<TestCase>,
}

/// 成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }
}

/// 失败响应
///
/// 只包含固定信息，不携带底层原因。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            success: false,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}: {}", self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}
