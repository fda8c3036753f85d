use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use notifier_domain::models::{InspectionAlert, OrderAggregation, OrderRecord};

/// 载荷格式版本，写入每个信封的metadata块
const FORMAT_VERSION: &str = "1.0";

/// 待格式化的领域事件
#[derive(Debug, Clone)]
pub enum EventPayload {
    OrderPlaced(OrderRecord),
    InspectionAlert(InspectionAlert),
    /// Sophia采购AI集成：接收聚合后的分组订单摘要
    SophiaOrder(OrderAggregation),
    /// 未识别的事件类型，原始数据原样包进通用信封
    Raw { event_type: String, data: Value },
}

impl EventPayload {
    pub fn event_type(&self) -> &str {
        match self {
            EventPayload::OrderPlaced(_) => "order_placed",
            EventPayload::InspectionAlert(_) => "inspection_alert",
            EventPayload::SophiaOrder(_) => "sophia_ai_order",
            EventPayload::Raw { event_type, .. } => event_type,
        }
    }
}

/// 载荷格式化器：领域事件到JSON信封的纯映射。
/// 除内嵌的当前时间戳与事件标识外完全确定，无副作用，对任意输入都成功
#[derive(Debug, Clone)]
pub struct PayloadFormatter {
    source_system: String,
}

impl PayloadFormatter {
    pub fn new(source_system: &str) -> Self {
        Self {
            source_system: source_system.to_string(),
        }
    }

    pub fn format(&self, payload: &EventPayload) -> Value {
        self.format_at(payload, Utc::now())
    }

    /// 使用给定时钟格式化，便于冻结时间做字节级确定性断言
    pub fn format_at(&self, payload: &EventPayload, now: DateTime<Utc>) -> Value {
        let event_type = payload.event_type();
        let event_id = format!("{}_{}", event_type, now.timestamp_millis());

        let mut envelope = json!({
            "event_id": event_id,
            "event_type": event_type,
            "timestamp": now.to_rfc3339(),
        });

        let body = match payload {
            EventPayload::OrderPlaced(order) => ("order", Self::order_body(order)),
            EventPayload::InspectionAlert(alert) => ("inspection", Self::inspection_body(alert)),
            EventPayload::SophiaOrder(aggregation) => {
                ("pedido", Self::sophia_body(aggregation, now))
            }
            EventPayload::Raw { data, .. } => ("data", data.clone()),
        };

        if let Some(obj) = envelope.as_object_mut() {
            obj.insert(body.0.to_string(), body.1);
            obj.insert(
                "metadata".to_string(),
                json!({
                    "source": self.source_system,
                    "version": FORMAT_VERSION,
                }),
            );
        }

        envelope
    }

    fn order_body(order: &OrderRecord) -> Value {
        json!({
            "id": order.id,
            "station_id": order.station_id,
            "tank_id": order.tank_id,
            "product_type": order.product_type,
            "quantity": order.quantity,
            "status": order.status.as_str(),
            "notes": order.notes,
            "scheduled_date": order.scheduled_date.map(|d| d.to_rfc3339()),
        })
    }

    fn inspection_body(alert: &InspectionAlert) -> Value {
        json!({
            "id": alert.id,
            "description": alert.description,
            "severity": alert.severity,
            "alertas": serde_json::to_value(&alert.readings).unwrap_or_default(),
        })
    }

    fn sophia_body(aggregation: &OrderAggregation, now: DateTime<Utc>) -> Value {
        let postos: Vec<Value> = aggregation
            .groups
            .iter()
            .map(|group| {
                let pedidos: Vec<Value> = group
                    .orders
                    .iter()
                    .map(|order| {
                        json!({
                            "id": order.id,
                            "tanque_id": order.tank_id,
                            "produto": order.product_type,
                            "quantidade": order.quantity,
                            "status": order.status.as_str(),
                            "observacoes": order.notes,
                            "data_agendada": order.scheduled_date.map(|d| d.to_rfc3339()),
                        })
                    })
                    .collect();

                json!({
                    "nome": group.station.name,
                    "cnpj": group.station.cnpj,
                    "endereco": group.station.address,
                    "cidade": group.station.city,
                    "estado": group.station.state,
                    "telefone": group.station.phone,
                    "pedidos": pedidos,
                    "totais_por_combustivel":
                        serde_json::to_value(&group.fuel_totals).unwrap_or_default(),
                })
            })
            .collect();

        json!({
            "data_solicitacao": now.to_rfc3339(),
            "status": "pendente",
            "postos": postos,
            "resumo_geral": {
                "total_postos": aggregation.summary.total_stations,
                "total_pedidos": aggregation.summary.total_orders,
                "totais_combustiveis":
                    serde_json::to_value(&aggregation.summary.fuel_totals).unwrap_or_default(),
            },
        })
    }
}
