//! 结果轮询服务 - 业务能力层
//!
//! 只负责"等一个 token 出结果"，不关心期望输出和用例编号。
//!
//! 轮询是一个显式的状态机：
//!
//! ```text
//! Pending ──tick──▶ Polling{n} ──tick──▶ ... ──▶ Terminal(result)
//!                        │
//!                        └── n 达到上限 ──▶ TimedOut
//! ```
//!
//! 每个 tick 先等待固定间隔再查询一次，等待和查询期间都响应取消。

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::clients::JudgeClient;
use crate::config::Config;
use crate::error::JudgeError;
use crate::models::{JudgeResult, SubmissionToken};
use crate::utils::CancelSignal;

/// 轮询策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 两次查询之间的间隔
    pub interval: Duration,
    /// 最大查询次数，至少为 1
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.poll_interval(), config.max_poll_attempts)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 轮询状态
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// 还没有查询过
    Pending,
    /// 已查询 `attempt` 次，结果仍是非终态
    Polling { attempt: u32 },
    /// 拿到终态结果
    Terminal(JudgeResult),
    /// 查询次数用尽
    TimedOut { attempts: u32 },
}

impl PollState {
    /// 根据一次查询的结果做一次状态转移
    pub fn on_observation(self, observed: JudgeResult, max_attempts: u32) -> PollState {
        let attempts = match self {
            PollState::Pending => 1,
            PollState::Polling { attempt } => attempt + 1,
            done @ (PollState::Terminal(_) | PollState::TimedOut { .. }) => return done,
        };

        if observed.is_terminal() {
            PollState::Terminal(observed)
        } else if attempts >= max_attempts {
            PollState::TimedOut { attempts }
        } else {
            PollState::Polling { attempt: attempts }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PollState::Terminal(_) | PollState::TimedOut { .. })
    }
}

/// 结果轮询器
#[derive(Debug, Clone)]
pub struct Poller {
    client: JudgeClient,
    policy: PollPolicy,
}

impl Poller {
    pub fn new(client: JudgeClient, policy: PollPolicy) -> Self {
        Self { client, policy }
    }

    /// 等待提交进入终态
    ///
    /// # 返回
    /// - 终态结果
    /// - `PollTimeout`：查询次数用尽
    /// - `Cancelled`：调用方取消
    /// - 查询请求本身失败时返回对应的评测机错误
    pub async fn await_result(
        &self,
        token: &SubmissionToken,
        cancel: &CancelSignal,
    ) -> Result<JudgeResult, JudgeError> {
        let mut state = PollState::Pending;

        loop {
            state = match state {
                PollState::Terminal(result) => {
                    debug!("token {} 已完成, status={}", token, result.status.id);
                    return Ok(result);
                }
                PollState::TimedOut { attempts } => {
                    return Err(JudgeError::PollTimeout {
                        token: token.clone(),
                        attempts,
                    });
                }
                in_flight => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
                        _ = sleep(self.policy.interval) => {}
                    }

                    let observed = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(JudgeError::Cancelled),
                        fetched = self.client.fetch_submission(token) => fetched?,
                    };

                    debug!("token {} 当前状态: {}", token, observed.status.id);
                    in_flight.on_observation(observed, self.policy.max_attempts)
                }
            };
        }
    }
}
