//! 隐藏用例批量评测 - 编排层
//!
//! ## 流程
//!
//! 1. **并发提交**：每个用例一个任务，同样的代码和语言，各自的输入
//! 2. **汇合**：等待全部 token，任意一个失败则整批失败
//! 3. **并发轮询**：每个 token 独立轮询，互不限速
//! 4. **按下标对齐**：结果按输入顺序放回，与完成顺序无关
//!
//! ## 失败策略
//!
//! 第一个失败的用例终止整批评测，其余任务立即 abort，返回的
//! `ExecutionError` 带上失败用例的下标。不返回部分结果。
//!
//! 每个用例的截止时间从整批开始时计算，覆盖提交和轮询两个阶段。

use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::error::{ExecutionError, JudgeError};
use crate::models::{Language, SubmissionRequest, SubmissionToken, TestCase, Verdict};
use crate::utils::CancelSignal;
use crate::workflow::{CaseCtx, CaseFlow};

/// 隐藏用例批量评测器
#[derive(Debug, Clone)]
pub struct BatchEvaluator {
    flow: CaseFlow,
}

impl BatchEvaluator {
    pub fn new(flow: CaseFlow) -> Self {
        Self { flow }
    }

    /// 批量评测
    ///
    /// 返回的判定与 `test_cases` 一一对应。用例为空时直接返回空列表，不发出任何请求。
    pub async fn evaluate_batch(
        &self,
        language: &str,
        code: &str,
        test_cases: &[TestCase],
    ) -> Result<Vec<Verdict>, ExecutionError> {
        self.evaluate_batch_with_cancel(language, code, test_cases, &CancelSignal::never())
            .await
    }

    /// 批量评测（可取消）
    pub async fn evaluate_batch_with_cancel(
        &self,
        language: &str,
        code: &str,
        test_cases: &[TestCase],
        cancel: &CancelSignal,
    ) -> Result<Vec<Verdict>, ExecutionError> {
        if test_cases.is_empty() {
            return Ok(Vec::new());
        }

        let language: Language = language
            .parse()
            .map_err(|e| ExecutionError::hidden(None, e))?;
        let timeout = self.flow.evaluation_timeout();
        let deadline = Instant::now() + timeout;

        info!("📦 开始批量评测 {} 个隐藏用例", test_cases.len());

        let tokens = self
            .submit_all(language, code, test_cases, deadline, timeout, cancel)
            .await?;
        debug!("全部 {} 个用例提交完成，开始轮询", tokens.len());

        let verdicts = self
            .poll_all(tokens, test_cases, deadline, timeout, cancel)
            .await?;

        let passed = verdicts.iter().filter(|v| v.passed).count();
        info!("✓ 批量评测完成: 通过 {}/{}", passed, verdicts.len());

        Ok(verdicts)
    }

    /// 第一阶段：并发提交
    async fn submit_all(
        &self,
        language: Language,
        code: &str,
        test_cases: &[TestCase],
        deadline: Instant,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> Result<Vec<SubmissionToken>, ExecutionError> {
        let mut submissions = JoinSet::new();

        for (index, case) in test_cases.iter().enumerate() {
            let client = self.flow.client().clone();
            let request = SubmissionRequest::new(language, code, case.input.clone());
            let cancel = cancel.clone();

            submissions.spawn(async move {
                let submitted = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Err(JudgeError::Cancelled),
                    submitted = timeout_at(deadline, client.submit_request(&request)) => {
                        submitted.unwrap_or(Err(JudgeError::DeadlineExceeded { timeout }))
                    }
                };
                (index, submitted)
            });
        }

        collect_indexed(submissions, test_cases.len()).await
    }

    /// 第二阶段：并发轮询并生成判定
    async fn poll_all(
        &self,
        tokens: Vec<SubmissionToken>,
        test_cases: &[TestCase],
        deadline: Instant,
        timeout: Duration,
        cancel: &CancelSignal,
    ) -> Result<Vec<Verdict>, ExecutionError> {
        let mut polls = JoinSet::new();

        for (index, (token, case)) in tokens.into_iter().zip(test_cases).enumerate() {
            let poller = self.flow.poller().clone();
            let expected_output = case.expected_output().to_string();
            let cancel = cancel.clone();

            polls.spawn(async move {
                let ctx = CaseCtx::hidden(index);
                let verdict = match timeout_at(deadline, poller.await_result(&token, &cancel)).await
                {
                    Ok(Ok(result)) => {
                        let verdict = Verdict::from_result(&result, Some(&expected_output));
                        debug!("{} 判定: {:?}", ctx, verdict.outcome);
                        Ok(verdict)
                    }
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(JudgeError::DeadlineExceeded { timeout }),
                };
                (index, verdict)
            });
        }

        collect_indexed(polls, test_cases.len()).await
    }
}

/// 按下标收集任务结果
///
/// 遇到第一个错误时 abort 其余任务并返回该错误。
async fn collect_indexed<T: Send + 'static>(
    mut tasks: JoinSet<(usize, Result<T, JudgeError>)>,
    len: usize,
) -> Result<Vec<T>, ExecutionError> {
    let mut slots: Vec<Option<T>> = (0..len).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((index, Err(e))) => {
                warn!("[隐藏用例 #{}] 评测失败，终止整批: {}", index + 1, e);
                tasks.abort_all();
                return Err(ExecutionError::hidden(Some(index), e));
            }
            Err(join_err) if join_err.is_panic() => {
                tasks.abort_all();
                std::panic::resume_unwind(join_err.into_panic());
            }
            Err(_) => {
                tasks.abort_all();
                return Err(ExecutionError::hidden(None, JudgeError::Cancelled));
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
