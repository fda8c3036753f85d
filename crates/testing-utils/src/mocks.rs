//! Mock implementations for all repository traits
//!
//! In-memory implementations backed by `Mutex<HashMap>` so unit tests run
//! without a database connection. The delivery-log mock records every row
//! for assertion and can be switched into a failing mode to exercise the
//! best-effort logging path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notifier_domain::models::{
    Contact, DeliveryAttempt, EventType, NotificationTarget, OrderRecord, Station,
};
use notifier_domain::repositories::{
    ContactDirectory, DeliveryLogRepository, NotificationTargetRepository, OrderRepository,
    StationRepository,
};
use notifier_domain::{NotifierError, NotifierResult};

/// Mock implementation of OrderRepository for testing
#[derive(Debug, Clone)]
pub struct MockOrderRepository {
    orders: Arc<Mutex<HashMap<i64, OrderRecord>>>,
    next_id: Arc<Mutex<i64>>,
}

impl Default for MockOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    pub fn insert(&self, order: OrderRecord) -> OrderRecord {
        let mut orders = self.orders.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();

        let mut stored = order;
        if stored.id == 0 {
            stored.id = *next_id;
            *next_id += 1;
        } else if stored.id >= *next_id {
            *next_id = stored.id + 1;
        }
        orders.insert(stored.id, stored.clone());
        stored
    }

    pub fn get_all(&self) -> Vec<OrderRecord> {
        self.orders.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<OrderRecord>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn get_unnotified(&self, limit: Option<i64>) -> NotifierResult<Vec<OrderRecord>> {
        let orders = self.orders.lock().unwrap();
        let mut unnotified: Vec<OrderRecord> =
            orders.values().filter(|o| !o.notified).cloned().collect();
        unnotified.sort_by_key(|o| o.id);
        if let Some(limit) = limit {
            unnotified.truncate(limit as usize);
        }
        Ok(unnotified)
    }

    async fn mark_notified(&self, order_ids: &[i64]) -> NotifierResult<()> {
        let mut orders = self.orders.lock().unwrap();
        for id in order_ids {
            if let Some(order) = orders.get_mut(id) {
                order.notified = true;
            }
        }
        Ok(())
    }
}

/// Mock implementation of StationRepository for testing
#[derive(Debug, Clone, Default)]
pub struct MockStationRepository {
    stations: Arc<Mutex<HashMap<i64, Station>>>,
}

impl MockStationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stations(stations: Vec<Station>) -> Self {
        let map = stations.into_iter().map(|s| (s.id, s)).collect();
        Self {
            stations: Arc::new(Mutex::new(map)),
        }
    }

    pub fn insert(&self, station: Station) {
        self.stations.lock().unwrap().insert(station.id, station);
    }
}

#[async_trait]
impl StationRepository for MockStationRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Station>> {
        Ok(self.stations.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Station>> {
        let stations = self.stations.lock().unwrap();
        Ok(ids.iter().filter_map(|id| stations.get(id).cloned()).collect())
    }
}

/// Mock implementation of ContactDirectory for testing
#[derive(Debug, Clone, Default)]
pub struct MockContactDirectory {
    contacts: Arc<Mutex<HashMap<i64, Contact>>>,
}

impl MockContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let map = contacts.into_iter().map(|c| (c.id, c)).collect();
        Self {
            contacts: Arc::new(Mutex::new(map)),
        }
    }

    pub fn insert(&self, contact: Contact) {
        self.contacts.lock().unwrap().insert(contact.id, contact);
    }
}

#[async_trait]
impl ContactDirectory for MockContactDirectory {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<Contact>> {
        Ok(self.contacts.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_ids(&self, ids: &[i64]) -> NotifierResult<Vec<Contact>> {
        let contacts = self.contacts.lock().unwrap();
        Ok(ids.iter().filter_map(|id| contacts.get(id).cloned()).collect())
    }
}

/// Mock implementation of NotificationTargetRepository for testing
#[derive(Debug, Clone)]
pub struct MockTargetRepository {
    targets: Arc<Mutex<HashMap<i64, NotificationTarget>>>,
    next_id: Arc<Mutex<i64>>,
}

impl Default for MockTargetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTargetRepository {
    pub fn new() -> Self {
        Self {
            targets: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    pub fn insert(&self, target: NotificationTarget) -> NotificationTarget {
        let mut targets = self.targets.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();

        let mut stored = target;
        if stored.id == 0 {
            stored.id = *next_id;
            *next_id += 1;
        } else if stored.id >= *next_id {
            *next_id = stored.id + 1;
        }
        targets.insert(stored.id, stored.clone());
        stored
    }
}

#[async_trait]
impl NotificationTargetRepository for MockTargetRepository {
    async fn get_by_id(&self, id: i64) -> NotifierResult<Option<NotificationTarget>> {
        Ok(self.targets.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_event_type(
        &self,
        event_type: EventType,
    ) -> NotifierResult<Vec<NotificationTarget>> {
        let targets = self.targets.lock().unwrap();
        let mut matching: Vec<NotificationTarget> = targets
            .values()
            .filter(|t| t.event_type == event_type && t.enabled)
            .cloned()
            .collect();
        matching.sort_by_key(|t| t.id);
        Ok(matching)
    }

    async fn list(&self) -> NotifierResult<Vec<NotificationTarget>> {
        let targets = self.targets.lock().unwrap();
        let mut all: Vec<NotificationTarget> = targets.values().cloned().collect();
        all.sort_by_key(|t| t.id);
        Ok(all)
    }
}

/// Mock implementation of DeliveryLogRepository for testing
///
/// Records every attempt row in memory. `fail_writes(true)` makes every
/// record call fail, which tests use to verify that logging is
/// best-effort and never cancels the delivery it describes.
#[derive(Debug, Clone)]
pub struct MockDeliveryLog {
    attempts: Arc<Mutex<Vec<DeliveryAttempt>>>,
    next_id: Arc<Mutex<i64>>,
    failing: Arc<AtomicBool>,
}

impl Default for MockDeliveryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDeliveryLog {
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(Mutex::new(1)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get_all_attempts(&self) -> Vec<DeliveryAttempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryLogRepository for MockDeliveryLog {
    async fn record(&self, attempt: &DeliveryAttempt) -> NotifierResult<DeliveryAttempt> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifierError::database_error("simulated log write failure"));
        }

        let mut attempts = self.attempts.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();

        let mut stored = attempt.clone();
        stored.id = *next_id;
        *next_id += 1;
        attempts.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_target(
        &self,
        target_id: i64,
        limit: i64,
    ) -> NotifierResult<Vec<DeliveryAttempt>> {
        let attempts = self.attempts.lock().unwrap();
        Ok(attempts
            .iter()
            .filter(|a| a.target_id == target_id)
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_for_order(&self, order_id: i64) -> NotifierResult<i64> {
        let attempts = self.attempts.lock().unwrap();
        Ok(attempts
            .iter()
            .filter(|a| a.order_id == Some(order_id))
            .count() as i64)
    }
}
