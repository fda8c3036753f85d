use std::sync::Arc;

use notifier_dispatcher::OrderAggregator;
use notifier_testing_utils::{MockStationRepository, OrderBuilder, StationBuilder};

#[tokio::test]
async fn test_aggregate_groups_by_station_in_first_seen_order() {
    let station_repo = Arc::new(MockStationRepository::with_stations(vec![
        StationBuilder::new().with_id(1).with_name("Posto A").build(),
        StationBuilder::new().with_id(2).with_name("Posto B").build(),
    ]));
    let aggregator = OrderAggregator::new(station_repo);

    let orders = vec![
        OrderBuilder::new().with_id(10).with_station_id(2).with_product_type("Diesel S10").with_quantity(3000.0).build(),
        OrderBuilder::new().with_id(11).with_station_id(1).with_product_type("Gasolina").with_quantity(1000.0).build(),
        OrderBuilder::new().with_id(12).with_station_id(2).with_product_type("Diesel S10").with_quantity(2000.0).build(),
    ];

    let aggregation = aggregator.aggregate(&orders).await.unwrap();

    // Station 2 was seen first, so its group comes first
    assert_eq!(aggregation.groups.len(), 2);
    assert_eq!(aggregation.groups[0].station.name, "Posto B");
    assert_eq!(aggregation.groups[1].station.name, "Posto A");

    assert_eq!(aggregation.groups[0].orders.len(), 2);
    assert_eq!(aggregation.groups[0].fuel_totals["Diesel S10"], 5000.0);
    assert_eq!(aggregation.groups[1].fuel_totals["Gasolina"], 1000.0);
}

#[tokio::test]
async fn test_aggregate_conserves_totals_and_every_order_appears_once() {
    let station_repo = Arc::new(MockStationRepository::with_stations(vec![
        StationBuilder::new().with_id(1).build(),
        StationBuilder::new().with_id(2).build(),
        StationBuilder::new().with_id(3).build(),
    ]));
    let aggregator = OrderAggregator::new(station_repo);

    let orders: Vec<_> = (0..20)
        .map(|i| {
            let fuel = if i % 2 == 0 { "Diesel S10" } else { "Etanol" };
            OrderBuilder::new()
                .with_id(i + 1)
                .with_station_id((i % 3) + 1)
                .with_product_type(fuel)
                .with_quantity(100.0 * (i + 1) as f64)
                .build()
        })
        .collect();

    let input_total: f64 = orders.iter().map(|o| o.quantity).sum();
    let aggregation = aggregator.aggregate(&orders).await.unwrap();

    // Global fuel totals must equal the input sums
    let global_total: f64 = aggregation.summary.fuel_totals.values().sum();
    assert!((global_total - input_total).abs() < f64::EPSILON);

    // Per-group totals must also add up to the global total
    let group_total: f64 = aggregation
        .groups
        .iter()
        .flat_map(|g| g.fuel_totals.values())
        .sum();
    assert!((group_total - input_total).abs() < f64::EPSILON);

    // Every input order appears in exactly one group
    let mut seen: Vec<i64> = aggregation
        .groups
        .iter()
        .flat_map(|g| g.orders.iter().map(|o| o.id))
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<i64> = orders.iter().map(|o| o.id).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);

    assert_eq!(aggregation.summary.total_orders, 20);
    assert_eq!(aggregation.summary.total_stations, 3);
}

#[tokio::test]
async fn test_aggregate_tolerates_orphaned_orders_with_placeholder_station() {
    let station_repo = Arc::new(MockStationRepository::with_stations(vec![
        StationBuilder::new().with_id(1).with_name("Posto A").build(),
    ]));
    let aggregator = OrderAggregator::new(station_repo);

    let orders = vec![
        OrderBuilder::new().with_id(1).with_station_id(1).build(),
        OrderBuilder::new().with_id(2).with_station_id(99).build(), // orphan
    ];

    let aggregation = aggregator.aggregate(&orders).await.unwrap();

    assert_eq!(aggregation.groups.len(), 2);
    assert_eq!(aggregation.summary.total_orders, 2);
    assert!(aggregation.groups[1].station.name.contains("não identificado"));
    assert_eq!(aggregation.groups[1].station.id, 99);
}

#[tokio::test]
async fn test_aggregate_empty_input_yields_empty_output() {
    let aggregator = OrderAggregator::new(Arc::new(MockStationRepository::new()));
    let aggregation = aggregator.aggregate(&[]).await.unwrap();

    assert!(aggregation.groups.is_empty());
    assert_eq!(aggregation.summary.total_orders, 0);
    assert_eq!(aggregation.summary.total_stations, 0);
    assert!(aggregation.summary.fuel_totals.is_empty());
}
