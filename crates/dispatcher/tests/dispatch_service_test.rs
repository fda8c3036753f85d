use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notifier_domain::models::{EventType, IntegrationKind, RecipientSelection};
use notifier_domain::repositories::OrderRepository;
use notifier_domain::NotifierError;
use notifier_dispatcher::{EventPayload, NotificationDispatcher, PayloadFormatter};
use notifier_testing_utils::{
    ContactBuilder, MockContactDirectory, MockDeliveryLog, MockOrderRepository,
    MockStationRepository, MockTargetRepository, OrderBuilder, StationBuilder, TargetBuilder,
};

struct TestHarness {
    dispatcher: Arc<NotificationDispatcher>,
    target_repo: Arc<MockTargetRepository>,
    order_repo: Arc<MockOrderRepository>,
    delivery_log: Arc<MockDeliveryLog>,
}

fn build_harness(gateway_url: &str) -> TestHarness {
    let target_repo = Arc::new(MockTargetRepository::new());
    let order_repo = Arc::new(MockOrderRepository::new());
    let station_repo = Arc::new(MockStationRepository::with_stations(vec![
        StationBuilder::new().with_id(1).with_name("Posto A").build(),
        StationBuilder::new().with_id(2).with_name("Posto B").build(),
    ]));
    let directory = Arc::new(MockContactDirectory::with_contacts(vec![
        ContactBuilder::new().with_id(1).with_name("Ana").with_phone("+5511999990001").build(),
        ContactBuilder::new().with_id(2).with_name("Bruno").with_phone("+5511999990002").build(),
        ContactBuilder::new().with_id(3).with_name("Clara").with_phone("+5511999990003").build(),
    ]));
    let delivery_log = Arc::new(MockDeliveryLog::new());

    let dispatcher = Arc::new(NotificationDispatcher::new(
        target_repo.clone(),
        order_repo.clone(),
        station_repo,
        directory,
        delivery_log.clone(),
        "fuel-notifier",
        gateway_url,
    ));

    TestHarness {
        dispatcher,
        target_repo,
        order_repo,
        delivery_log,
    }
}

#[tokio::test]
async fn test_generic_target_returning_500_logs_exactly_max_attempts_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("erro interno"))
        .expect(3)
        .mount(&server)
        .await;

    let harness = build_harness("");
    let target = TargetBuilder::new()
        .with_endpoint_url(&format!("{}/hook", server.uri()))
        .with_max_attempts(3)
        .with_retry_delay_seconds(0)
        .build();

    let order = OrderBuilder::new()
        .with_station_id(1)
        .with_product_type("Diesel S10")
        .with_quantity(5000.0)
        .build();
    let payload =
        PayloadFormatter::new("fuel-notifier").format(&EventPayload::OrderPlaced(order.clone()));

    let report = harness
        .dispatcher
        .dispatch_to_target(&target, &payload, Some(order.station_id), Some(order.id))
        .await
        .unwrap();

    assert_eq!(report.succeeded_count, 0);
    assert_eq!(report.failed_count, 1);
    assert_eq!(report.attempt_count, 3);
    assert!(!report.overall_success());

    let attempts = harness.delivery_log.get_all_attempts();
    assert_eq!(attempts.len(), 3);
    for attempt in &attempts {
        assert!(!attempt.success);
        assert_eq!(attempt.status_code, 500);
        assert_eq!(attempt.order_id, Some(order.id));
        assert_eq!(attempt.event_type, EventType::OrderPlaced);
    }

    server.verify().await;
}

#[tokio::test]
async fn test_fanout_partial_success_reports_overall_success() {
    let server = MockServer::start().await;

    // Bruno's number is accepted, everyone else is rejected until exhaustion
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"numero": "+5511999990002"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let harness = build_harness(&server.uri());
    let target = TargetBuilder::new()
        .with_integration_kind(IntegrationKind::ContactFanout)
        .without_endpoint_url()
        .with_recipients(RecipientSelection::Ids(vec![1, 2, 3]))
        .with_max_attempts(2)
        .with_retry_delay_seconds(0)
        .build();

    let payload = json!({"event_type": "inspection_alert", "numero": "placeholder"});
    let report = harness
        .dispatcher
        .dispatch_to_target(&target, &payload, None, None)
        .await
        .unwrap();

    assert!(report.overall_success());
    assert_eq!(report.succeeded_count, 1);
    assert_eq!(report.failed_count, 2);
    // one success attempt plus two full exhaustion sequences
    assert_eq!(report.attempt_count, 1 + 2 + 2);
    assert_eq!(harness.delivery_log.count(), 5);
}

#[tokio::test]
async fn test_contact_fanout_injects_numero_into_outgoing_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let harness = build_harness(&server.uri());
    let target = TargetBuilder::new()
        .with_integration_kind(IntegrationKind::ContactFanout)
        .without_endpoint_url()
        .with_recipients(RecipientSelection::Ids(vec![1]))
        .build();

    let report = harness
        .dispatcher
        .dispatch_to_target(&target, &json!({"mensagem": "novo pedido"}), None, None)
        .await
        .unwrap();
    assert!(report.overall_success());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["numero"], "+5511999990001");
    assert_eq!(body["mensagem"], "novo pedido");
}

#[tokio::test]
async fn test_log_write_failure_is_swallowed_and_delivery_still_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let harness = build_harness("");
    harness.delivery_log.fail_writes(true);

    let target = TargetBuilder::new().with_endpoint_url(&server.uri()).build();
    let report = harness
        .dispatcher
        .dispatch_to_target(&target, &json!({}), None, None)
        .await
        .unwrap();

    assert!(report.overall_success());
    assert_eq!(harness.delivery_log.count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_no_valid_recipients_aborts_before_any_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let harness = build_harness(&server.uri());
    let target = TargetBuilder::new()
        .with_integration_kind(IntegrationKind::ContactFanout)
        .without_endpoint_url()
        .with_recipients(RecipientSelection::Ids(vec![404]))
        .build();

    let result = harness
        .dispatcher
        .dispatch_to_target(&target, &json!({}), None, None)
        .await;

    assert!(matches!(result, Err(NotifierError::Configuration(_))));
    assert_eq!(harness.delivery_log.count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn test_sophia_dispatch_sends_single_aggregated_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sophia"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let harness = build_harness("");
    harness.target_repo.insert(
        TargetBuilder::new()
            .with_id(0)
            .with_event_type(EventType::SophiaAiOrder)
            .with_integration_kind(IntegrationKind::Sophia)
            .with_endpoint_url(&format!("{}/sophia", server.uri()))
            .build(),
    );

    let orders = vec![
        OrderBuilder::new().with_id(1).with_station_id(1).with_product_type("Diesel S10").with_quantity(3000.0).build(),
        OrderBuilder::new().with_id(2).with_station_id(1).with_product_type("Diesel S10").with_quantity(2000.0).build(),
        OrderBuilder::new().with_id(3).with_station_id(2).with_product_type("Etanol").with_quantity(1500.0).build(),
    ];

    let reports = harness.dispatcher.notify_sophia_orders(&orders).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].overall_success());

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["event_type"], "sophia_ai_order");
    assert_eq!(body["pedido"]["resumo_geral"]["total_postos"], 2);
    assert_eq!(body["pedido"]["resumo_geral"]["total_pedidos"], 3);
    assert_eq!(
        body["pedido"]["resumo_geral"]["totais_combustiveis"]["Diesel S10"],
        5000.0
    );

    let postos = body["pedido"]["postos"].as_array().unwrap();
    assert_eq!(postos.len(), 2);
    assert_eq!(postos[0]["nome"], "Posto A");
    assert_eq!(postos[0]["totais_por_combustivel"]["Diesel S10"], 5000.0);
    assert_eq!(postos[0]["pedidos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_detached_bulk_dispatch_marks_orders_notified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let harness = build_harness("");
    harness
        .target_repo
        .insert(TargetBuilder::new().with_id(0).with_endpoint_url(&server.uri()).build());

    let order_a = harness
        .order_repo
        .insert(OrderBuilder::new().with_id(0).with_station_id(1).build());
    let order_b = harness
        .order_repo
        .insert(OrderBuilder::new().with_id(0).with_station_id(2).build());

    let handle = harness
        .dispatcher
        .dispatch_orders_detached(vec![order_a.clone(), order_b.clone()]);
    handle.await.unwrap();

    let updated_a = harness.order_repo.get_by_id(order_a.id).await.unwrap().unwrap();
    let updated_b = harness.order_repo.get_by_id(order_b.id).await.unwrap().unwrap();
    assert!(updated_a.notified);
    assert!(updated_b.notified);
    assert_eq!(harness.delivery_log.count(), 2);
}

#[tokio::test]
async fn test_disabled_targets_are_not_dispatched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let harness = build_harness("");
    harness.target_repo.insert(
        TargetBuilder::new()
            .with_id(0)
            .with_endpoint_url(&server.uri())
            .disabled()
            .build(),
    );

    let order = OrderBuilder::new().with_station_id(1).build();
    let reports = harness.dispatcher.notify_order_placed(&order).await.unwrap();

    assert!(reports.is_empty());
    server.verify().await;
}

#[tokio::test]
async fn test_failed_exhaustion_leaves_order_unnotified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let harness = build_harness("");
    harness.target_repo.insert(
        TargetBuilder::new()
            .with_id(0)
            .with_endpoint_url(&server.uri())
            .with_max_attempts(2)
            .with_retry_delay_seconds(0)
            .build(),
    );

    let order = harness
        .order_repo
        .insert(OrderBuilder::new().with_id(0).with_station_id(1).build());

    let handle = harness.dispatcher.dispatch_orders_detached(vec![order.clone()]);
    handle.await.unwrap();

    // The order itself stays created and unnotified; failure is visible
    // only through the delivery log
    let updated = harness.order_repo.get_by_id(order.id).await.unwrap().unwrap();
    assert!(!updated.notified);
    assert_eq!(harness.delivery_log.count(), 2);
}
