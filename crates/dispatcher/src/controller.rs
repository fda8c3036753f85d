use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, error, info};

use notifier_domain::models::DispatchReport;
use notifier_domain::repositories::OrderRepository;
use notifier_domain::NotifierResult;

use crate::dispatch_service::NotificationDispatcher;

/// 分发控制器：守护进程的扫描循环。
///
/// 订单行先由看板的创建流程落库，本循环在事务之外按固定间隔
/// 拉取尚未通知的订单并触发分发，调用方的主事务路径不被阻塞。
pub struct DispatchController {
    dispatcher: Arc<NotificationDispatcher>,
    order_repo: Arc<dyn OrderRepository>,
    poll_interval: Duration,
    batch_size: i64,
}

impl DispatchController {
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        order_repo: Arc<dyn OrderRepository>,
        poll_interval: Duration,
        batch_size: i64,
    ) -> Self {
        Self {
            dispatcher,
            order_repo,
            poll_interval,
            batch_size,
        }
    }

    /// 运行扫描循环直到收到关闭信号
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> NotifierResult<()> {
        info!(
            "分发控制器启动，扫描间隔 {:?}，批大小 {}",
            self.poll_interval, self.batch_size
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("分发控制器收到关闭信号，停止扫描");
                    break;
                }
                _ = tokio::time::sleep(self.poll_interval) => {
                    if let Err(e) = self.scan_once().await {
                        error!("扫描未通知订单失败: {}", e);
                    }
                }
            }
        }

        Ok(())
    }

    /// 单轮扫描：拉取未通知订单并逐个分发。
    /// 任一目标成功即回写notified标志；全部失败的订单留待下轮重试
    pub async fn scan_once(&self) -> NotifierResult<usize> {
        let orders = self.order_repo.get_unnotified(Some(self.batch_size)).await?;
        if orders.is_empty() {
            debug!("本轮没有待通知的订单");
            return Ok(0);
        }

        info!("发现 {} 个待通知订单", orders.len());
        let mut dispatched = 0usize;

        for order in &orders {
            match self.dispatcher.notify_order_placed(order).await {
                Ok(reports) => {
                    if reports.iter().any(DispatchReport::overall_success) {
                        self.order_repo.mark_notified(&[order.id]).await?;
                        dispatched += 1;
                    }
                }
                Err(e) => {
                    error!("订单 {} 的通知分发失败: {}", order.id, e);
                }
            }
        }

        Ok(dispatched)
    }
}
