use std::sync::Arc;

use metrics::counter;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use notifier_domain::models::{
    DeliveryAttempt, DeliveryOutcome, DispatchReport, EventType, InspectionAlert,
    IntegrationKind, NotificationTarget, OrderRecord, RecipientAddress,
};
use notifier_domain::repositories::{
    ContactDirectory, DeliveryLogRepository, NotificationTargetRepository, OrderRepository,
    StationRepository,
};
use notifier_domain::{NotifierError, NotifierResult};

use crate::delivery_channel::DeliveryChannel;
use crate::fanout_resolver::FanoutResolver;
use crate::order_aggregator::OrderAggregator;
use crate::payload_formatter::{EventPayload, PayloadFormatter};
use crate::retry_scheduler::{RetryPolicy, RetryReport, RetryScheduler};

/// 通知分发服务：解析收件方 → 格式化载荷 → 每个收件方独立
/// 走重试状态机并发投递 → 每次物理尝试写一行投递日志 →
/// 汇总为部分成功语义的分发结果。
///
/// 收件方之间除只读的目标配置外不共享任何可变状态；
/// 等待响应或重试间隔期间不持有任何独占资源。
pub struct NotificationDispatcher {
    channel: Arc<DeliveryChannel>,
    formatter: PayloadFormatter,
    resolver: FanoutResolver,
    aggregator: OrderAggregator,
    target_repo: Arc<dyn NotificationTargetRepository>,
    order_repo: Arc<dyn OrderRepository>,
    delivery_log: Arc<dyn DeliveryLogRepository>,
    /// contact_fanout目标未自带端点时使用的消息网关URL
    gateway_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        target_repo: Arc<dyn NotificationTargetRepository>,
        order_repo: Arc<dyn OrderRepository>,
        station_repo: Arc<dyn StationRepository>,
        directory: Arc<dyn ContactDirectory>,
        delivery_log: Arc<dyn DeliveryLogRepository>,
        source_system: &str,
        gateway_url: &str,
    ) -> Self {
        Self {
            channel: Arc::new(DeliveryChannel::new()),
            formatter: PayloadFormatter::new(source_system),
            resolver: FanoutResolver::new(directory),
            aggregator: OrderAggregator::new(station_repo),
            target_repo,
            order_repo,
            delivery_log,
            gateway_url: gateway_url.to_string(),
        }
    }

    /// 订单创建事件：分发到所有启用的order_placed目标
    pub async fn notify_order_placed(
        &self,
        order: &OrderRecord,
    ) -> NotifierResult<Vec<DispatchReport>> {
        let targets = self
            .target_repo
            .get_by_event_type(EventType::OrderPlaced)
            .await?;
        if targets.is_empty() {
            debug!("事件order_placed没有启用的通知目标，跳过");
            return Ok(Vec::new());
        }

        let payload = self.formatter.format(&EventPayload::OrderPlaced(order.clone()));
        self.dispatch_to_all(&targets, &payload, Some(order.station_id), Some(order.id))
            .await
    }

    /// 巡检积水告警事件
    pub async fn notify_inspection_alert(
        &self,
        alert: &InspectionAlert,
    ) -> NotifierResult<Vec<DispatchReport>> {
        let targets = self
            .target_repo
            .get_by_event_type(EventType::InspectionAlert)
            .await?;
        if targets.is_empty() {
            debug!("事件inspection_alert没有启用的通知目标，跳过");
            return Ok(Vec::new());
        }

        let payload = self
            .formatter
            .format(&EventPayload::InspectionAlert(alert.clone()));
        self.dispatch_to_all(&targets, &payload, None, None).await
    }

    /// Sophia采购AI批量发送：先聚合再构建单一载荷
    pub async fn notify_sophia_orders(
        &self,
        orders: &[OrderRecord],
    ) -> NotifierResult<Vec<DispatchReport>> {
        let targets = self
            .target_repo
            .get_by_event_type(EventType::SophiaAiOrder)
            .await?;
        if targets.is_empty() {
            debug!("事件sophia_ai_order没有启用的通知目标，跳过");
            return Ok(Vec::new());
        }

        let aggregation = self.aggregator.aggregate(orders).await?;
        let payload = self
            .formatter
            .format(&EventPayload::SophiaOrder(aggregation));
        self.dispatch_to_all(&targets, &payload, None, None).await
    }

    /// 批量创建后的脱离式分发：订单行已先行落库，通知在后台
    /// 任务中进行，调用方立即返回，不等待任何投递完成
    pub fn dispatch_orders_detached(self: &Arc<Self>, orders: Vec<OrderRecord>) -> JoinHandle<()> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            info!("后台分发 {} 个订单的通知", orders.len());
            for order in orders {
                match dispatcher.notify_order_placed(&order).await {
                    Ok(reports) => {
                        if reports.iter().any(DispatchReport::overall_success) {
                            if let Err(e) = dispatcher.order_repo.mark_notified(&[order.id]).await
                            {
                                error!("回写订单 {} 的notified标志失败: {}", order.id, e);
                            }
                        }
                    }
                    Err(e) => {
                        // 单个订单的通知失败不影响其余订单，订单本身保持已创建
                        error!("订单 {} 的通知分发失败: {}", order.id, e);
                    }
                }
            }
        })
    }

    async fn dispatch_to_all(
        &self,
        targets: &[NotificationTarget],
        payload: &Value,
        station_id: Option<i64>,
        order_id: Option<i64>,
    ) -> NotifierResult<Vec<DispatchReport>> {
        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            match self
                .dispatch_to_target(target, payload, station_id, order_id)
                .await
            {
                Ok(report) => reports.push(report),
                Err(e) => {
                    // 配置错误只终止该目标的分发，不波及同事件的其他目标
                    error!("目标 {} 分发失败: {}", target.name, e);
                }
            }
        }
        Ok(reports)
    }

    /// 对单个目标执行完整的分发协议。
    /// 配置错误在任何网络活动之前同步返回；投递层面的失败只体现
    /// 在汇总结果中，本方法不因部分失败报错。
    pub async fn dispatch_to_target(
        &self,
        target: &NotificationTarget,
        payload: &Value,
        station_id: Option<i64>,
        order_id: Option<i64>,
    ) -> NotifierResult<DispatchReport> {
        target.validate()?;
        let recipients = self.resolver.resolve(target).await?;

        if target.integration_kind == IntegrationKind::ContactFanout
            && target.endpoint_url.is_none()
            && self.gateway_url.trim().is_empty()
        {
            return Err(NotifierError::config_error(format!(
                "目标 {} 需要消息网关URL（目标未配置端点且全局网关为空）",
                target.name
            )));
        }

        let target = Arc::new(target.clone());
        let mut handles: Vec<JoinHandle<RetryReport>> = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let url = match &recipient {
                RecipientAddress::Url(url) => url.clone(),
                RecipientAddress::Contact { .. } => target
                    .endpoint_url
                    .clone()
                    .unwrap_or_else(|| self.gateway_url.clone()),
            };

            // 每个收件方持有载荷的独立副本；联系人扇出注入numero字段，
            // 覆盖格式化载荷里的同名字段
            let mut body = payload.clone();
            if let RecipientAddress::Contact { address, .. } = &recipient {
                if let Some(obj) = body.as_object_mut() {
                    obj.insert("numero".to_string(), Value::String(address.clone()));
                }
            }

            handles.push(tokio::spawn(deliver_to_recipient(
                Arc::clone(&self.channel),
                Arc::clone(&self.delivery_log),
                Arc::clone(&target),
                recipient,
                url,
                body,
                station_id,
                order_id,
            )));
        }

        let mut succeeded_count = 0usize;
        let mut failed_count = 0usize;
        let mut attempt_count = 0u32;

        for handle in handles {
            match handle.await {
                Ok(report) => {
                    attempt_count += report.attempts;
                    if report.succeeded() {
                        succeeded_count += 1;
                    } else {
                        failed_count += 1;
                    }
                }
                Err(e) => {
                    error!("收件方投递任务异常退出: {}", e);
                    failed_count += 1;
                }
            }
        }

        counter!("notifier_dispatches_total").increment(1);
        counter!("notifier_recipients_succeeded_total").increment(succeeded_count as u64);
        counter!("notifier_recipients_failed_total").increment(failed_count as u64);

        let report = DispatchReport {
            target_id: target.id,
            event_type: target.event_type,
            succeeded_count,
            failed_count,
            attempt_count,
        };

        info!(
            "目标 {} 分发完成: {} 成功 / {} 失败，共 {} 次物理尝试",
            target.name, report.succeeded_count, report.failed_count, report.attempt_count
        );

        Ok(report)
    }
}

/// 单个收件方的投递：独立的重试状态机，每次物理尝试（含重试）
/// 写一行投递日志。日志写入是尽力而为的：失败只记录，绝不向上
/// 传播，也不取消所描述的投递。
#[allow(clippy::too_many_arguments)]
async fn deliver_to_recipient(
    channel: Arc<DeliveryChannel>,
    delivery_log: Arc<dyn DeliveryLogRepository>,
    target: Arc<NotificationTarget>,
    recipient: RecipientAddress,
    url: String,
    body: Value,
    station_id: Option<i64>,
    order_id: Option<i64>,
) -> RetryReport {
    let policy = RetryPolicy {
        max_attempts: target.max_attempts,
        retry_delay: target.retry_delay(),
    };
    let scheduler = RetryScheduler::new(policy);
    let recipient_label = recipient.as_log_string();
    let request_body = body.to_string();

    let report = scheduler
        .run(|attempt_no| {
            let channel = Arc::clone(&channel);
            let delivery_log = Arc::clone(&delivery_log);
            let target = Arc::clone(&target);
            let url = url.clone();
            let body = body.clone();
            let recipient_label = recipient_label.clone();
            let request_body = request_body.clone();

            async move {
                let result = channel
                    .deliver(
                        &url,
                        target.http_method,
                        &target.headers,
                        &target.auth,
                        &body,
                        target.timeout(),
                    )
                    .await;

                let outcome = match &result {
                    Ok(outcome) => outcome.clone(),
                    Err(e) => DeliveryOutcome::transport_failure(e.to_string()),
                };

                let attempt = DeliveryAttempt::from_outcome(
                    target.id,
                    &recipient_label,
                    target.event_type,
                    &request_body,
                    &outcome,
                )
                .with_station(station_id)
                .with_order(order_id);

                if let Err(e) = delivery_log.record(&attempt).await {
                    error!(
                        "投递日志写入失败 (目标 {}, 第 {} 次尝试): {}",
                        target.id, attempt_no, e
                    );
                }

                result
            }
        })
        .await;

    if !report.succeeded() {
        counter!("notifier_retries_exhausted_total").increment(1);
    }

    report
}
