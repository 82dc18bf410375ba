use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use migration::MigratorTrait;
use tower::ServiceExt;

// base64("alice:password") / base64("alice:wrong")
const AUTH: &str = "Basic YWxpY2U6cGFzc3dvcmQ=";
const BAD_AUTH: &str = "Basic YWxpY2U6d3Jvbmc=";

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::router(engine, db)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, AUTH);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_vehicle(router: &Router) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/vehicles",
        Some(json!({
            "make": "Mazda",
            "model": "3",
            "year": 2018,
            "odometer": 10000.0,
            "mileage_unit": "mi",
            "fuel_type": "Petrol"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_needs_no_auth() {
    let router = test_router().await;
    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let router = test_router().await;
    let response = router
        .oneshot(
            Request::builder()
                .uri("/vehicles")
                .header(header::AUTHORIZATION, BAD_AUTH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_vehicle_is_not_found() {
    let router = test_router().await;
    let (status, _) = send(
        &router,
        "GET",
        "/vehicles/00000000-0000-0000-0000-000000000000/fuel/stats",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fuel_stats_flow() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router).await;

    for (date, gallons, price, odometer) in [
        ("2024-01-05T12:00:00Z", 10.0, 30.0, 11_000.0),
        ("2024-02-05T12:00:00Z", 12.0, 36.0, 11_400.0),
    ] {
        let (status, _) = send(
            &router,
            "POST",
            &format!("/vehicles/{vehicle_id}/fuel"),
            Some(json!({
                "date": date,
                "gallons": gallons,
                "price": price,
                "odometer": odometer
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = send(
        &router,
        "GET",
        &format!("/vehicles/{vehicle_id}/fuel/stats"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_distance"], json!(400.0));
    assert_eq!(stats["total_gallons"], json!(22.0));
    assert_eq!(stats["total_cost"], json!(66.0));
    assert_eq!(stats["monthly_trend"][0]["month"], json!("2024-01"));
    assert_eq!(stats["monthly_trend"][0]["mpg"], json!(40.0));

    // The vehicle list picks up the same totals.
    let (status, list) = send(&router, "GET", "/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["total_miles"], json!(400.0));
    assert_eq!(list[0]["fuel_count"], json!(2));
    assert_eq!(list[0]["vehicle"]["odometer"], json!(11_400.0));
}

#[tokio::test]
async fn odometer_regression_is_unprocessable() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        &format!("/vehicles/{vehicle_id}/fuel"),
        Some(json!({
            "date": "2024-01-05T12:00:00Z",
            "gallons": 10.0,
            "price": 30.0,
            "odometer": 11_000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        "POST",
        &format!("/vehicles/{vehicle_id}/fuel"),
        Some(json!({
            "date": "2024-01-20T12:00:00Z",
            "gallons": 10.0,
            "price": 30.0,
            "odometer": 10_500.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("regression"));
}

#[tokio::test]
async fn fuel_create_reports_triggered_alerts() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        &format!("/vehicles/{vehicle_id}/reminders"),
        Some(json!({
            "name": "Oil Change",
            "interval_miles": 5000.0,
            "last_service_date": "2025-06-01T00:00:00Z",
            "last_service_miles": 10000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        "POST",
        &format!("/vehicles/{vehicle_id}/fuel"),
        Some(json!({
            "date": "2026-02-20T12:00:00Z",
            "gallons": 11.0,
            "price": 40.0,
            "odometer": 15_300.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["alerts"][0]["status"], json!("overdue"));
    assert_eq!(body["alerts"][0]["miles_to_go"], json!(-300.0));

    // The alert was also stored as an unread notification.
    let (status, notifications) = send(&router, "GET", "/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notifications[0]["title"], json!("Oil Change - OVERDUE"));

    let (status, summary) = send(&router, "GET", "/notifications/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["unread_count"], json!(1));
    assert_eq!(summary["overdue_count"], json!(1));

    // Fleet-wide overdue list carries the vehicle display name.
    let (status, overdue) = send(&router, "GET", "/reminders/overdue", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overdue["alerts"][0]["vehicle_name"], json!("2018 Mazda 3"));
}

#[tokio::test]
async fn expense_stats_flow() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router).await;

    for (category, amount, date) in [
        ("Insurance", 100.0, "2024-01-03T12:00:00Z"),
        ("Insurance", 50.0, "2024-02-03T12:00:00Z"),
        ("Parking", 5.0, "2024-02-04T12:00:00Z"),
    ] {
        let (status, _) = send(
            &router,
            "POST",
            &format!("/vehicles/{vehicle_id}/expenses"),
            Some(json!({ "category": category, "amount": amount, "date": date })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = send(
        &router,
        "GET",
        &format!("/vehicles/{vehicle_id}/expenses/stats"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_cost"], json!(155.0));
    assert_eq!(stats["categories"]["Insurance"]["total"], json!(150.0));
    assert_eq!(stats["categories"]["Insurance"]["count"], json!(2));
    assert_eq!(stats["categories"]["Parking"]["count"], json!(1));
}

#[tokio::test]
async fn report_and_fleet_comparison() {
    let router = test_router().await;
    let vehicle_id = create_vehicle(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        &format!("/vehicles/{vehicle_id}/expenses"),
        Some(json!({
            "category": "Repair",
            "amount": 250.0,
            "date": "2024-01-03T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, report) = send(
        &router,
        "GET",
        &format!("/vehicles/{vehicle_id}/report"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_cost"], json!(250.0));
    assert_eq!(report["vehicle"]["name"], json!("2018 Mazda 3"));

    let (status, comparison) = send(&router, "GET", "/reports/fleet?sort=total_cost", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comparison["total_cost"], json!(250.0));
    assert_eq!(comparison["vehicles"][0]["expense_count"], json!(1));
}

#[tokio::test]
async fn hammond_import_creates_vehicle_and_fuel() {
    let router = test_router().await;

    let (status, summary) = send(
        &router,
        "POST",
        "/import/hammond",
        Some(json!({
            "vehicles": [
                { "name": "Daily", "make": "Honda", "model": "Civic", "year": 2015, "odometer": 42000.0 }
            ],
            "fuel_entries": [
                { "date": "2024-01-05", "odometer": 42100.0, "gallons": 9.0, "total_cost": 27.0 },
                { "date": "2023-12-20", "odometer": 41800.0, "gallons": 8.0, "cost_per_unit": 3.0 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["vehicles"], json!(1));
    assert_eq!(summary["fuel"], json!(2));
    assert_eq!(summary["errors"], json!([]));

    let (status, list) = send(&router, "GET", "/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["fuel_count"], json!(2));
    assert_eq!(list[0]["total_miles"], json!(300.0));
}
