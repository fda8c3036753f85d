use std::future::Future;
use std::time::Duration;

use tracing::debug;

use notifier_domain::models::DeliveryOutcome;
use notifier_domain::NotifierResult;

/// 单个收件方的重试策略，取自目标配置而非全局常量
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// 重试状态机的状态。耗尽是终态：不升级、不进死信，
/// 只能通过投递日志观察到
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Pending,
    Attempting(u32),
    Succeeded,
    Exhausted,
}

/// 一轮重试执行的完整结果
#[derive(Debug, Clone)]
pub struct RetryReport {
    pub state: RetryState,
    pub attempts: u32,
    pub last_outcome: DeliveryOutcome,
}

impl RetryReport {
    pub fn succeeded(&self) -> bool {
        self.state == RetryState::Succeeded
    }
}

/// 显式重试状态机：Pending → Attempting → (Succeeded | Exhausted)。
///
/// 每次尝试调用一次attempt闭包；失败后如还有剩余次数，以
/// tokio定时器等待重试间隔（不阻塞调用方执行上下文）再循环。
/// 闭包返回的传输层错误在此归一化为status=0的失败结果，
/// 与远端拒绝走完全相同的重试路径。
pub struct RetryScheduler {
    policy: RetryPolicy,
}

impl RetryScheduler {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn run<F, Fut>(&self, mut attempt: F) -> RetryReport
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = NotifierResult<DeliveryOutcome>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut state = RetryState::Pending;
        let mut attempts = 0;
        let mut last_outcome = DeliveryOutcome::transport_failure("未尝试".to_string());

        for attempt_no in 1..=max_attempts {
            state = RetryState::Attempting(attempt_no);
            attempts = attempt_no;

            let outcome = match attempt(attempt_no).await {
                Ok(outcome) => outcome,
                Err(e) => DeliveryOutcome::transport_failure(e.to_string()),
            };

            let success = outcome.success;
            last_outcome = outcome;

            if success {
                state = RetryState::Succeeded;
                break;
            }

            if attempt_no < max_attempts {
                debug!(
                    "第 {}/{} 次尝试失败 (HTTP {})，{:?} 后重试",
                    attempt_no, max_attempts, last_outcome.status_code, self.policy.retry_delay
                );
                tokio::time::sleep(self.policy.retry_delay).await;
            } else {
                state = RetryState::Exhausted;
            }
        }

        RetryReport {
            state,
            attempts,
            last_outcome,
        }
    }
}
