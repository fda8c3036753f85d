use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use notifier_domain::models::{OrderAggregation, OrderRecord, OrderSummary, Station, StationOrderGroup};
use notifier_domain::repositories::StationRepository;
use notifier_domain::NotifierResult;

/// 订单聚合器：把散落的订单行按目的站点分组，累计每组的油品小计
/// 与全局汇总。与投递完全解耦，在构建Sophia载荷之前调用。
pub struct OrderAggregator {
    station_repo: Arc<dyn StationRepository>,
}

impl OrderAggregator {
    pub fn new(station_repo: Arc<dyn StationRepository>) -> Self {
        Self { station_repo }
    }

    /// 聚合是全函数：每个输入订单恰好落入一个分组，不会静默丢弃。
    /// 分组顺序为站点首次出现顺序，组内油品小计按插入顺序累计。
    /// 站点查找未命中时退化为占位站点，绝不因孤儿订单报错。
    pub async fn aggregate(&self, orders: &[OrderRecord]) -> NotifierResult<OrderAggregation> {
        // 按首次出现顺序收集去重后的站点ID
        let mut station_ids: Vec<i64> = Vec::new();
        for order in orders {
            if !station_ids.contains(&order.station_id) {
                station_ids.push(order.station_id);
            }
        }

        let stations: HashMap<i64, Station> = self
            .station_repo
            .get_by_ids(&station_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut groups: Vec<StationOrderGroup> = Vec::new();
        let mut group_index: HashMap<i64, usize> = HashMap::new();
        let mut summary = OrderSummary::default();

        for order in orders {
            let idx = match group_index.get(&order.station_id) {
                Some(idx) => *idx,
                None => {
                    let station = match stations.get(&order.station_id) {
                        Some(station) => station.clone(),
                        None => {
                            warn!(
                                "订单 {} 引用的站点 {} 不存在，归入占位站点",
                                order.id, order.station_id
                            );
                            Station::unidentified(order.station_id)
                        }
                    };
                    groups.push(StationOrderGroup::new(station));
                    group_index.insert(order.station_id, groups.len() - 1);
                    groups.len() - 1
                }
            };

            *summary
                .fuel_totals
                .entry(order.product_type.clone())
                .or_insert(0.0) += order.quantity;
            summary.total_orders += 1;

            groups[idx].push_order(order.clone());
        }

        summary.total_stations = groups.len();

        debug!(
            "订单聚合完成: {} 个订单归入 {} 个站点分组",
            summary.total_orders, summary.total_stations
        );

        Ok(OrderAggregation { groups, summary })
    }
}
