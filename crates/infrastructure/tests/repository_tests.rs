use chrono::Utc;
use sqlx::SqlitePool;

use notifier_config::DatabaseConfig;
use notifier_domain::models::{
    AuthDescriptor, DeliveryAttempt, DeliveryOutcome, EventType, HttpMethod, IntegrationKind,
};
use notifier_domain::repositories::{
    ContactDirectory, DeliveryLogRepository, NotificationTargetRepository, OrderRepository,
    StationRepository,
};
use notifier_infrastructure::{
    DatabaseManager, SqliteContactDirectory, SqliteDeliveryLogRepository, SqliteOrderRepository,
    SqliteStationRepository, SqliteTargetRepository,
};

async fn memory_pool() -> SqlitePool {
    // A single connection keeps every statement on the same in-memory database
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout_seconds: 5,
    };
    DatabaseManager::connect(&config).await.unwrap()
}

async fn seed_order(pool: &SqlitePool, station_id: i64, notified: bool) -> i64 {
    sqlx::query(
        "INSERT INTO orders (station_id, tank_id, product_type, quantity, status, notified, created_at)
         VALUES ($1, 1, 'Diesel S10', 5000.0, 'pending', $2, $3)",
    )
    .bind(station_id)
    .bind(notified)
    .bind(Utc::now())
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

#[tokio::test]
async fn test_order_repository_scan_and_mark_notified() {
    let pool = memory_pool().await;
    let repo = SqliteOrderRepository::new(pool.clone());

    let first = seed_order(&pool, 1, false).await;
    let second = seed_order(&pool, 2, false).await;
    seed_order(&pool, 3, true).await;

    let unnotified = repo.get_unnotified(None).await.unwrap();
    assert_eq!(unnotified.len(), 2);
    assert_eq!(unnotified[0].id, first);
    assert_eq!(unnotified[0].product_type, "Diesel S10");

    repo.mark_notified(&[first, second]).await.unwrap();
    assert!(repo.get_unnotified(None).await.unwrap().is_empty());

    let reloaded = repo.get_by_id(first).await.unwrap().unwrap();
    assert!(reloaded.notified);
}

#[tokio::test]
async fn test_order_repository_mark_notified_rolls_back_on_missing_id() {
    let pool = memory_pool().await;
    let repo = SqliteOrderRepository::new(pool.clone());

    let existing = seed_order(&pool, 1, false).await;
    let result = repo.mark_notified(&[existing, 9999]).await;
    assert!(result.is_err());

    // The transaction rolled back, so the existing order is still unnotified
    let reloaded = repo.get_by_id(existing).await.unwrap().unwrap();
    assert!(!reloaded.notified);
}

#[tokio::test]
async fn test_station_and_contact_lookups_by_id_set() {
    let pool = memory_pool().await;

    sqlx::query("INSERT INTO stations (name, cnpj, city) VALUES ('Posto A', '12.345.678/0001-90', 'São Paulo')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO stations (name) VALUES ('Posto B')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO contacts (name, phone) VALUES ('Ana', '+5511999990001')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO contacts (name) VALUES ('Bruno')")
        .execute(&pool)
        .await
        .unwrap();

    let stations = SqliteStationRepository::new(pool.clone());
    let found = stations.get_by_ids(&[1, 2, 99]).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "Posto A");

    let contacts = SqliteContactDirectory::new(pool.clone());
    let found = contacts.get_by_ids(&[1, 2]).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].phone.as_deref(), Some("+5511999990001"));
    assert!(found[1].phone.is_none());

    assert!(contacts.get_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_target_repository_parses_json_columns() {
    let pool = memory_pool().await;

    sqlx::query(
        r#"
        INSERT INTO notification_targets
            (name, event_type, integration_kind, endpoint_url, headers, auth, http_method,
             timeout_seconds, max_attempts, retry_delay_seconds, recipients, enabled)
        VALUES
            ('webhook-pedidos', 'order_placed', 'generic', 'https://example.com/hook',
             '{"x-api-key":"chave"}', '{"type":"bearer","token":"tok"}', 'POST',
             30, 5, 10, '[]', 1),
            ('sms-alerta', 'inspection_alert', 'contact_fanout', NULL,
             '{}', '{"type":"none"}', 'POST',
             15, 2, 3, '{"3": true, "9": true}', 1),
            ('desligado', 'order_placed', 'generic', 'https://example.com/off',
             '{}', '{"type":"none"}', 'POST', 30, 3, 5, '[]', 0)
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let repo = SqliteTargetRepository::new(pool);

    let order_targets = repo.get_by_event_type(EventType::OrderPlaced).await.unwrap();
    assert_eq!(order_targets.len(), 1); // disabled target filtered out
    let target = &order_targets[0];
    assert_eq!(target.integration_kind, IntegrationKind::Generic);
    assert_eq!(target.http_method, HttpMethod::Post);
    assert_eq!(target.headers["x-api-key"], "chave");
    assert_eq!(
        target.auth,
        AuthDescriptor::Bearer {
            token: "tok".to_string()
        }
    );
    assert_eq!(target.max_attempts, 5);

    let fanout = repo.get_by_id(2).await.unwrap().unwrap();
    assert_eq!(fanout.integration_kind, IntegrationKind::ContactFanout);
    assert_eq!(fanout.recipients.normalize(), vec![3, 9]);

    assert_eq!(repo.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_delivery_log_is_append_only_audit_trail() {
    let pool = memory_pool().await;
    let log = SqliteDeliveryLogRepository::new(pool.clone());

    let outcome = DeliveryOutcome::responded(500, "erro".to_string());
    let attempt = DeliveryAttempt::from_outcome(
        7,
        "https://example.com/hook",
        EventType::OrderPlaced,
        r#"{"event_type":"order_placed"}"#,
        &outcome,
    )
    .with_station(Some(1))
    .with_order(Some(42));

    let first = log.record(&attempt).await.unwrap();
    let second = log.record(&attempt).await.unwrap();
    assert!(first.id > 0);
    assert!(second.id > first.id);

    let rows = log.get_by_target(7, 10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].success);
    assert_eq!(rows[0].status_code, 500);
    assert_eq!(rows[0].event_type, EventType::OrderPlaced);
    assert_eq!(rows[0].order_id, Some(42));

    assert_eq!(log.count_for_order(42).await.unwrap(), 2);
    assert_eq!(log.count_for_order(1).await.unwrap(), 0);
}
