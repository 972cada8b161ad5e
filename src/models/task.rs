use serde::{Deserialize, Serialize};

use crate::models::api::{RunHiddenTestsRequest, RunSampleRequest};
use crate::models::TestCase;

/// 练习题目（从 TOML 文件加载）
///
/// 包含题目的样例输入输出、隐藏测试用例以及要提交的代码。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeTask {
    pub title: String,
    /// 语言标识，原样传给评测流程，由评测流程负责校验
    pub language: String,
    /// 内联代码
    #[serde(default)]
    pub code: Option<String>,
    /// 代码文件路径（相对于 TOML 文件所在目录）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_file: Option<String>,
    /// 样例输入
    #[serde(default)]
    pub input: String,
    /// 样例输出
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub hidden_test_cases: Vec<TestCase>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl PracticeTask {
    pub fn source_code(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    pub fn sample_request(&self) -> RunSampleRequest {
        RunSampleRequest {
            language: self.language.clone(),
            code: self.source_code().to_string(),
            input: self.input.clone(),
            output: Some(self.output.clone()),
        }
    }

    pub fn hidden_tests_request(&self) -> RunHiddenTestsRequest {
        RunHiddenTestsRequest {
            language: self.language.clone(),
            code: self.source_code().to_string(),
            hidden_tests: self.hidden_test_cases.clone(),
        }
    }
}
