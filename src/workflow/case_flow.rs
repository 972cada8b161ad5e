//! 单用例评测流程 - 流程层
//!
//! 核心职责：定义"一个用例"的完整评测流程
//!
//! 流程顺序：
//! 1. 提交代码 → token
//! 2. 轮询 token → 终态结果
//! 3. trim 后精确比较 → 判定
//!
//! 整个流程受截止时间约束，任何一步失败都以 `ExecutionError` 返回，
//! 不会被折算成"未通过"的判定。

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info};

use crate::clients::JudgeClient;
use crate::config::Config;
use crate::error::{ExecutionError, JudgeError};
use crate::models::{Language, SubmissionRequest, Verdict};
use crate::services::{PollPolicy, Poller};
use crate::utils::CancelSignal;
use crate::workflow::case_ctx::CaseCtx;

/// 单用例评测流程
///
/// - 不持有任何可变状态，可以并发复用
/// - 只依赖评测机客户端和轮询器
#[derive(Debug, Clone)]
pub struct CaseFlow {
    client: JudgeClient,
    poller: Poller,
    evaluation_timeout: Duration,
}

impl CaseFlow {
    /// 创建新的评测流程
    pub fn new(client: JudgeClient, config: &Config) -> Self {
        let poller = Poller::new(client.clone(), PollPolicy::from_config(config));
        Self {
            client,
            poller,
            evaluation_timeout: config.evaluation_timeout(),
        }
    }

    pub fn with_parts(client: JudgeClient, poller: Poller, evaluation_timeout: Duration) -> Self {
        Self {
            client,
            poller,
            evaluation_timeout,
        }
    }

    pub fn client(&self) -> &JudgeClient {
        &self.client
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn evaluation_timeout(&self) -> Duration {
        self.evaluation_timeout
    }

    /// 评测一个样例
    pub async fn evaluate(
        &self,
        language: &str,
        code: &str,
        input: &str,
        expected_output: Option<&str>,
    ) -> Result<Verdict, ExecutionError> {
        self.evaluate_with_cancel(language, code, input, expected_output, &CancelSignal::never())
            .await
    }

    /// 评测一个样例（可取消）
    pub async fn evaluate_with_cancel(
        &self,
        language: &str,
        code: &str,
        input: &str,
        expected_output: Option<&str>,
        cancel: &CancelSignal,
    ) -> Result<Verdict, ExecutionError> {
        let language: Language = language.parse().map_err(ExecutionError::sample)?;
        let ctx = CaseCtx::sample();
        let request = SubmissionRequest::new(language, code, input);

        match timeout(
            self.evaluation_timeout,
            self.run(&request, expected_output, cancel, &ctx),
        )
        .await
        {
            Ok(result) => result.map_err(ExecutionError::sample),
            Err(_) => Err(ExecutionError::sample(JudgeError::DeadlineExceeded {
                timeout: self.evaluation_timeout,
            })),
        }
    }

    /// 提交 → 轮询 → 比较
    ///
    /// 不带截止时间，由调用方决定如何限时。
    pub async fn run(
        &self,
        request: &SubmissionRequest,
        expected_output: Option<&str>,
        cancel: &CancelSignal,
        ctx: &CaseCtx,
    ) -> Result<Verdict, JudgeError> {
        debug!("{} 📤 正在提交代码...", ctx);
        let token = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
            submitted = self.client.submit_request(request) => submitted?,
        };

        debug!("{} ⏳ 等待评测结果, token={}", ctx, token);
        let result = self.poller.await_result(&token, cancel).await?;

        let verdict = Verdict::from_result(&result, expected_output);
        info!(
            "{} {} 判定: {:?}",
            ctx,
            if verdict.passed { "✓" } else { "✗" },
            verdict.outcome
        );

        Ok(verdict)
    }
}
