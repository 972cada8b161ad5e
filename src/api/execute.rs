//! 评测接口
//!
//! 把评测流程的结果包装成统一的响应结构。
//! 失败时只返回固定信息，具体原因只写入服务端日志。

use tracing::error;

use crate::clients::JudgeClient;
use crate::config::Config;
use crate::error::{ExecutionError, JudgeError};
use crate::models::{ApiError, ApiResponse, RunHiddenTestsRequest, RunSampleRequest, Verdict};
use crate::orchestrator::BatchEvaluator;
use crate::utils::CancelSignal;
use crate::workflow::CaseFlow;

const SAMPLE_SUCCESS_MESSAGE: &str = "Code executed successfully";
const HIDDEN_SUCCESS_MESSAGE: &str = "Hidden test cases executed successfully";

/// 评测接口
#[derive(Debug, Clone)]
pub struct ExecutionApi {
    flow: CaseFlow,
    batch: BatchEvaluator,
}

impl ExecutionApi {
    /// 根据配置创建评测接口（凭据在此注入客户端）
    pub fn new(config: &Config) -> Result<Self, JudgeError> {
        let client = JudgeClient::new(config)?;
        Ok(Self::from_flow(CaseFlow::new(client, config)))
    }

    pub fn from_flow(flow: CaseFlow) -> Self {
        Self {
            batch: BatchEvaluator::new(flow.clone()),
            flow,
        }
    }

    /// 运行样例
    pub async fn execute(
        &self,
        request: RunSampleRequest,
        cancel: &CancelSignal,
    ) -> Result<ApiResponse<Verdict>, ApiError> {
        let verdict = self
            .flow
            .evaluate_with_cancel(
                &request.language,
                &request.code,
                &request.input,
                request.output.as_deref(),
                cancel,
            )
            .await
            .map_err(to_api_error)?;

        Ok(ApiResponse::new(200, verdict, SAMPLE_SUCCESS_MESSAGE))
    }

    /// 运行隐藏测试用例
    pub async fn run_hidden_tests(
        &self,
        request: RunHiddenTestsRequest,
        cancel: &CancelSignal,
    ) -> Result<ApiResponse<Vec<Verdict>>, ApiError> {
        let verdicts = self
            .batch
            .evaluate_batch_with_cancel(&request.language, &request.code, &request.hidden_tests, cancel)
            .await
            .map_err(to_api_error)?;

        Ok(ApiResponse::new(200, verdicts, HIDDEN_SUCCESS_MESSAGE))
    }
}

/// 评测失败 → 对外响应
///
/// 不支持的语言属于调用方错误（400），其余一律 500 + 固定信息。
fn to_api_error(err: ExecutionError) -> ApiError {
    error!("Execution error: {} ({:?}): {}", err, err.scope, err.cause());

    match err.cause() {
        JudgeError::UnsupportedLanguage { language } => {
            ApiError::new(400, format!("Unsupported language: {}", language))
        }
        _ => ApiError::new(500, err.public_message()),
    }
}
