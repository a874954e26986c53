//! HTTP integration tests
//!
//! Drive the page, add, save and chart endpoints against a temporary storage
//! root.

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use rate_tracker::series::{today, Observation};
use rate_tracker::server::app::create_app;
use rate_tracker::storage::SeriesStore;
use serde_json::Value;
use tempfile::TempDir;

/// Create a test server storing series in a fresh temporary directory
async fn setup_test_server() -> Result<(TempDir, SeriesStore, TestServer)> {
    let dir = TempDir::new()?;
    let store = SeriesStore::new(dir.path());

    let app = create_app(store.clone()).await?;
    let server = TestServer::new(app)?;

    Ok((dir, store, server))
}

fn location_header(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("ascii location")
        .to_string()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (_dir, _store, server) = setup_test_server().await?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["service"], "rate-tracker");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_landing_page_without_game() -> Result<()> {
    let (dir, _store, server) = setup_test_server().await?;

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Rate Tracker by Game"));
    assert!(!html.contains("/series/add"));
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_entering_name_creates_empty_series() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;

    let response = server.get("/").add_query_param("game", "Foo").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("No data yet."));
    assert!(html.contains("/series/add"));

    let location = store.location("Foo")?;
    assert!(location.exists());
    assert!(store.load(&location)?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_add_edit_save_scenario() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;
    server.get("/").add_query_param("game", "Foo").await;

    let response = server
        .post("/series/add")
        .form(&[("game", "Foo"), ("rate", "1500")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        location_header(&response),
        "/?game=Foo&notice=Added+a+rate+for+Foo%21"
    );

    server
        .post("/series/add")
        .form(&[("game", "Foo"), ("rate", "1600")])
        .await;

    let day = today();
    let location = store.location("Foo")?;
    assert_eq!(
        store.load(&location)?.observations(),
        &[
            Observation::new(day, 1, 1500),
            Observation::new(day, 2, 1600),
        ]
    );

    let date = day.format("%Y-%m-%d").to_string();
    let response = server
        .post("/series/save")
        .form(&[
            ("game", "Foo"),
            ("date", date.as_str()),
            ("race_number", "1"),
            ("rate", "1550"),
            ("date", date.as_str()),
            ("race_number", "2"),
            ("rate", "1600"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        location_header(&response),
        "/?game=Foo&notice=Data+updated%21"
    );

    assert_eq!(
        store.load(&location)?.observations(),
        &[
            Observation::new(day, 1, 1550),
            Observation::new(day, 2, 1600),
        ]
    );

    let response = server
        .get("/")
        .add_query_param("game", "Foo")
        .add_query_param("notice", "Data updated!")
        .await;
    let html = response.text();
    assert!(html.contains("Data updated!"));
    assert!(html.contains("<svg"));
    assert!(html.contains(r#"name="rate" min="0" step="1" value="1550" required"#));

    Ok(())
}

#[tokio::test]
async fn test_save_with_deleted_rows_keeps_remaining_verbatim() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;
    for rate in ["10", "20", "30"] {
        server
            .post("/series/add")
            .form(&[("game", "Bar"), ("rate", rate)])
            .await;
    }

    // first row deleted in the grid, numbering left as edited
    let response = server
        .post("/series/save")
        .form(&[
            ("game", "Bar"),
            ("date", "2025-01-05"),
            ("race_number", "3"),
            ("rate", "30"),
            ("date", "2025-01-04"),
            ("race_number", "3"),
            ("rate", "20"),
        ])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let series = store.load(&store.location("Bar")?)?;
    let numbers: Vec<i64> = series.iter().map(|o| o.race_number).collect();
    let rates: Vec<i64> = series.iter().map(|o| o.rate).collect();
    assert_eq!(numbers, vec![3, 3]);
    assert_eq!(rates, vec![30, 20]);

    Ok(())
}

#[tokio::test]
async fn test_save_with_no_rows_empties_series() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;
    server
        .post("/series/add")
        .form(&[("game", "Baz"), ("rate", "1")])
        .await;

    server.post("/series/save").form(&[("game", "Baz")]).await;

    let location = store.location("Baz")?;
    assert!(location.exists());
    assert!(store.load(&location)?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_invalid_input_is_rejected() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;

    let response = server
        .post("/series/add")
        .form(&[("game", "Foo"), ("rate", "lots")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert_eq!(body["field"], "rate");
    assert!(!store.location("Foo")?.exists());

    let response = server
        .post("/series/add")
        .form(&[("game", "../outside"), ("rate", "1")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "INVALID_NAME");

    Ok(())
}

#[tokio::test]
async fn test_chart_endpoint() -> Result<()> {
    let (_dir, _store, server) = setup_test_server().await?;

    let response = server
        .get("/series/chart.svg")
        .add_query_param("game", "Empty")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/svg+xml");
    assert!(response.text().contains("No data yet."));

    for rate in ["1500", "1600", "1550"] {
        server
            .post("/series/add")
            .form(&[("game", "Foo"), ("rate", rate)])
            .await;
    }
    let response = server
        .get("/series/chart.svg")
        .add_query_param("game", "Foo")
        .await;
    let svg = response.text();
    let date = today().format("%Y-%m-%d").to_string();
    assert!(svg.contains("<polyline"));
    assert!(svg.contains(&format!("({})", date)));
    assert_eq!(svg.matches("<circle").count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_huge_rate_still_renders() -> Result<()> {
    let (_dir, _store, server) = setup_test_server().await?;

    let response = server
        .post("/series/add")
        .form(&[("game", "Huge"), ("rate", "100000000000000000")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let response = server.get("/").add_query_param("game", "Huge").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<svg"));

    let response = server
        .get("/series/chart.svg")
        .add_query_param("game", "Huge")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text().matches("<circle").count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_page_suggests_existing_series() -> Result<()> {
    let (_dir, store, server) = setup_test_server().await?;
    store.open("Chess")?;
    store.open("Tetris")?;

    let html = server.get("/").await.text();

    assert!(html.contains(r#"<option value="Chess">"#));
    assert!(html.contains(r#"<option value="Tetris">"#));

    Ok(())
}
