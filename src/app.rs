use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::info;
use uuid::Uuid;

use notifier_config::AppConfig;
use notifier_dispatcher::{DispatchController, NotificationDispatcher};
use notifier_infrastructure::{
    DatabaseManager, SqliteContactDirectory, SqliteDeliveryLogRepository, SqliteOrderRepository,
    SqliteStationRepository, SqliteTargetRepository,
};

/// 主应用程序：装配数据库连接池、仓储与分发服务，
/// 运行订单扫描循环直到收到关闭信号
pub struct Application {
    config: AppConfig,
    controller: DispatchController,
}

impl Application {
    /// 创建新的应用实例
    pub async fn new(config: AppConfig) -> Result<Self> {
        let instance_id = Uuid::new_v4();
        info!("初始化应用程序，实例 {instance_id}");

        // 创建数据库连接池
        let pool = DatabaseManager::connect(&config.database).await?;

        // 创建Repository实例
        let order_repo = Arc::new(SqliteOrderRepository::new(pool.clone()));
        let station_repo = Arc::new(SqliteStationRepository::new(pool.clone()));
        let directory = Arc::new(SqliteContactDirectory::new(pool.clone()));
        let target_repo = Arc::new(SqliteTargetRepository::new(pool.clone()));
        let delivery_log = Arc::new(SqliteDeliveryLogRepository::new(pool));

        // 创建分发服务与控制器
        let dispatcher = Arc::new(NotificationDispatcher::new(
            target_repo,
            order_repo.clone(),
            station_repo,
            directory,
            delivery_log,
            &config.dispatcher.source_system,
            &config.dispatcher.contact_gateway_url,
        ));

        let controller = DispatchController::new(
            dispatcher,
            order_repo,
            Duration::from_secs(config.dispatcher.poll_interval_seconds),
            config.dispatcher.batch_size,
        );

        Ok(Self { config, controller })
    }

    /// 运行应用程序
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        if !self.config.dispatcher.enabled {
            info!("分发服务在配置中被禁用，应用退出");
            return Ok(());
        }

        self.controller.run(shutdown_rx).await?;
        Ok(())
    }
}
