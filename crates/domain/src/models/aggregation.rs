use indexmap::IndexMap;
use serde::Serialize;

use crate::models::order::OrderRecord;
use crate::models::station::Station;

/// 按目的站点分组的订单集合。
/// fuel_totals按油品首次出现的顺序累计（插入序）
#[derive(Debug, Clone, Serialize)]
pub struct StationOrderGroup {
    pub station: Station,
    pub orders: Vec<OrderRecord>,
    pub fuel_totals: IndexMap<String, f64>,
}

impl StationOrderGroup {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            orders: Vec::new(),
            fuel_totals: IndexMap::new(),
        }
    }

    pub fn push_order(&mut self, order: OrderRecord) {
        *self
            .fuel_totals
            .entry(order.product_type.clone())
            .or_insert(0.0) += order.quantity;
        self.orders.push(order);
    }
}

/// 跨全部分组的全局汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderSummary {
    pub total_stations: usize,
    pub total_orders: usize,
    pub fuel_totals: IndexMap<String, f64>,
}

/// 聚合输出：分组按站点首次出现顺序排列，
/// 每个输入订单恰好出现在一个分组中
#[derive(Debug, Clone, Serialize)]
pub struct OrderAggregation {
    pub groups: Vec<StationOrderGroup>,
    pub summary: OrderSummary,
}
