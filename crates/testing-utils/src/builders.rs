//! Test data builders for creating test entities
//!
//! Builder patterns with sensible defaults and easy customization,
//! mirroring the shapes the dashboard's configuration store produces.

use chrono::{DateTime, Utc};

use notifier_domain::models::{
    AuthDescriptor, Contact, EventType, HttpMethod, InspectionAlert, IntegrationKind,
    NotificationTarget, OrderRecord, OrderStatus, RecipientSelection, Station, WaterReading,
};

/// Builder for creating test NotificationTarget entities
pub struct TargetBuilder {
    target: NotificationTarget,
}

impl TargetBuilder {
    pub fn new() -> Self {
        Self {
            target: NotificationTarget {
                id: 1,
                name: "test_target".to_string(),
                event_type: EventType::OrderPlaced,
                integration_kind: IntegrationKind::Generic,
                endpoint_url: Some("https://example.com/hook".to_string()),
                headers: Default::default(),
                auth: AuthDescriptor::None,
                http_method: HttpMethod::Post,
                timeout_seconds: 5,
                max_attempts: 3,
                retry_delay_seconds: 0,
                recipients: RecipientSelection::default(),
                enabled: true,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.target.id = id;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.target.name = name.to_string();
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.target.event_type = event_type;
        self
    }

    pub fn with_integration_kind(mut self, kind: IntegrationKind) -> Self {
        self.target.integration_kind = kind;
        self
    }

    pub fn with_endpoint_url(mut self, url: &str) -> Self {
        self.target.endpoint_url = Some(url.to_string());
        self
    }

    pub fn without_endpoint_url(mut self) -> Self {
        self.target.endpoint_url = None;
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.target.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_auth(mut self, auth: AuthDescriptor) -> Self {
        self.target.auth = auth;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.target.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_delay_seconds(mut self, seconds: u64) -> Self {
        self.target.retry_delay_seconds = seconds;
        self
    }

    pub fn with_recipients(mut self, recipients: RecipientSelection) -> Self {
        self.target.recipients = recipients;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.target.enabled = false;
        self
    }

    pub fn build(self) -> NotificationTarget {
        self.target
    }
}

impl Default for TargetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test OrderRecord entities
pub struct OrderBuilder {
    order: OrderRecord,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self {
            order: OrderRecord {
                id: 1,
                station_id: 1,
                tank_id: 1,
                product_type: "Diesel S10".to_string(),
                quantity: 1000.0,
                status: OrderStatus::Pending,
                scheduled_date: None,
                notes: None,
                notified: false,
                created_at: Utc::now(),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.order.id = id;
        self
    }

    pub fn with_station_id(mut self, station_id: i64) -> Self {
        self.order.station_id = station_id;
        self
    }

    pub fn with_tank_id(mut self, tank_id: i64) -> Self {
        self.order.tank_id = tank_id;
        self
    }

    pub fn with_product_type(mut self, product_type: &str) -> Self {
        self.order.product_type = product_type.to_string();
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.order.quantity = quantity;
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.order.status = status;
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.order.notes = Some(notes.to_string());
        self
    }

    pub fn notified(mut self) -> Self {
        self.order.notified = true;
        self
    }

    pub fn build(self) -> OrderRecord {
        self.order
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test Station entities
pub struct StationBuilder {
    station: Station,
}

impl StationBuilder {
    pub fn new() -> Self {
        Self {
            station: Station {
                id: 1,
                name: "Posto Central".to_string(),
                cnpj: Some("12.345.678/0001-90".to_string()),
                address: Some("Av. Paulista, 1000".to_string()),
                city: Some("São Paulo".to_string()),
                state: Some("SP".to_string()),
                phone: Some("+55 11 3333-4444".to_string()),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.station.id = id;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.station.name = name.to_string();
        self
    }

    pub fn build(self) -> Station {
        self.station
    }
}

impl Default for StationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test Contact entities
pub struct ContactBuilder {
    contact: Contact,
}

impl ContactBuilder {
    pub fn new() -> Self {
        Self {
            contact: Contact {
                id: 1,
                name: "Maria Silva".to_string(),
                phone: Some("+5511999990001".to_string()),
                email: Some("maria@example.com".to_string()),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.contact.id = id;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.contact.name = name.to_string();
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.contact.phone = Some(phone.to_string());
        self
    }

    pub fn without_phone(mut self) -> Self {
        self.contact.phone = None;
        self
    }

    pub fn build(self) -> Contact {
        self.contact
    }
}

impl Default for ContactBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test InspectionAlert entities
pub struct InspectionAlertBuilder {
    alert: InspectionAlert,
}

impl InspectionAlertBuilder {
    pub fn new() -> Self {
        Self {
            alert: InspectionAlert {
                id: 1,
                description: "Água detectada no tanque".to_string(),
                severity: "alta".to_string(),
                readings: Vec::new(),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.alert.id = id;
        self
    }

    pub fn with_reading(
        mut self,
        client: &str,
        tank: &str,
        product: &str,
        water_quantity: f64,
        measured_at: DateTime<Utc>,
    ) -> Self {
        self.alert.readings.push(WaterReading {
            client: client.to_string(),
            unit: client.to_string(),
            tank: tank.to_string(),
            product: product.to_string(),
            water_quantity,
            measured_at,
        });
        self
    }

    pub fn build(self) -> InspectionAlert {
        self.alert
    }
}

impl Default for InspectionAlertBuilder {
    fn default() -> Self {
        Self::new()
    }
}
