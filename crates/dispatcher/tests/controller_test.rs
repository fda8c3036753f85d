use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use notifier_domain::repositories::OrderRepository;
use notifier_dispatcher::{DispatchController, NotificationDispatcher};
use notifier_testing_utils::{
    MockContactDirectory, MockDeliveryLog, MockOrderRepository, MockStationRepository,
    MockTargetRepository, OrderBuilder, StationBuilder, TargetBuilder,
};

fn build_controller(
    server_uri: Option<&str>,
) -> (DispatchController, Arc<MockOrderRepository>, Arc<MockDeliveryLog>) {
    let target_repo = Arc::new(MockTargetRepository::new());
    if let Some(uri) = server_uri {
        target_repo.insert(TargetBuilder::new().with_id(0).with_endpoint_url(uri).build());
    }

    let order_repo = Arc::new(MockOrderRepository::new());
    let delivery_log = Arc::new(MockDeliveryLog::new());
    let station_repo = Arc::new(MockStationRepository::with_stations(vec![
        StationBuilder::new().with_id(1).build(),
    ]));

    let dispatcher = Arc::new(NotificationDispatcher::new(
        target_repo,
        order_repo.clone(),
        station_repo,
        Arc::new(MockContactDirectory::new()),
        delivery_log.clone(),
        "fuel-notifier",
        "",
    ));

    let controller = DispatchController::new(
        dispatcher,
        order_repo.clone(),
        Duration::from_millis(10),
        50,
    );

    (controller, order_repo, delivery_log)
}

#[tokio::test]
async fn test_scan_once_dispatches_and_marks_unnotified_orders() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let (controller, order_repo, delivery_log) = build_controller(Some(&server.uri()));
    order_repo.insert(OrderBuilder::new().with_id(0).with_station_id(1).build());
    order_repo.insert(OrderBuilder::new().with_id(0).with_station_id(1).build());
    order_repo.insert(OrderBuilder::new().with_id(0).with_station_id(1).notified().build());

    let dispatched = controller.scan_once().await.unwrap();

    assert_eq!(dispatched, 2);
    assert_eq!(delivery_log.count(), 2);
    assert!(order_repo.get_all().iter().all(|o| o.notified));
    server.verify().await;
}

#[tokio::test]
async fn test_scan_once_without_targets_leaves_orders_pending() {
    let (controller, order_repo, delivery_log) = build_controller(None);
    order_repo.insert(OrderBuilder::new().with_id(0).with_station_id(1).build());

    let dispatched = controller.scan_once().await.unwrap();

    assert_eq!(dispatched, 0);
    assert_eq!(delivery_log.count(), 0);
    let orders = order_repo.get_unnotified(None).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn test_run_stops_on_shutdown_signal() {
    let (controller, _order_repo, _delivery_log) = build_controller(None);
    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);

    let handle = tokio::spawn(async move { controller.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    shutdown_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("controller should stop after shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}
