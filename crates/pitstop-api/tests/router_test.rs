//! Router tests driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pitstop_api::{create_router, AppState};
use pitstop_core::config::LayeredConfig;
use pitstop_core::dashboard::Dashboard;
use pitstop_core::loader::DataLoader;
use pitstop_core::sources::StaticSource;
use serde_json::Value;
use tower::ServiceExt;

const GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"Name": "Silverstone Circuit"},
         "geometry": {"type": "LineString", "coordinates": [[-1.0169, 52.0786], [-1.0200, 52.0700]]}},
        {"type": "Feature", "properties": {"Name": "Circuit de Monaco"},
         "geometry": {"type": "LineString", "coordinates": [[7.4286, 43.7347], [7.4250, 43.7380]]}},
        {"type": "Feature", "properties": {"Name": "Silverstone Circuit"},
         "geometry": {"type": "Point", "coordinates": [-1.0169, 52.0786]}}
    ]
}"#;

const CSV: &str = "\
circuit_name,driver_name,race_date,year,fastestLapTime,positionOrder,statusId,status,grid
Circuit de Monaco,Ayrton Senna,1988-05-15,1988,1:26.321,13,3,Accident,1
Circuit de Monaco,Alain Prost,1988-05-15,1988,1:27.856,1,1,Finished,2
Circuit de Monaco,Gerhard Berger,1988-05-15,1988,\\N,2,1,Finished,3
Silverstone Circuit,Lewis Hamilton,2020-08-02,2020,1:27.097,1,1,Finished,1
";

fn config() -> LayeredConfig {
    let mut config = LayeredConfig::with_defaults();
    config.data_url.value = "mem://".to_string();
    config
}

fn app_with(source: StaticSource) -> Router {
    let config = config();
    let loader = Arc::new(DataLoader::new(Arc::new(source)));
    let dashboard = Dashboard::new(loader, &config);
    create_router(Arc::new(AppState::new(dashboard, config).unwrap()))
}

fn app(geojson: &str) -> Router {
    let config = config();
    app_with(
        StaticSource::new()
            .with_document(config.geojson_url(), geojson)
            .with_document(config.csv_url(), CSV),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(app(GEOJSON), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "pitstop-api");
}

#[tokio::test]
async fn test_circuits_are_sorted_and_unique() {
    let (status, body) = get_json(app(GEOJSON), "/api/v1/circuits").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["circuits"],
        serde_json::json!(["Circuit de Monaco", "Silverstone Circuit"])
    );
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_circuit_summary() {
    let (status, body) =
        get_json(app(GEOJSON), "/api/v1/circuits/Circuit%20de%20Monaco/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["circuit"], "Circuit de Monaco");
    assert_eq!(body["fastest_lap"]["driver"], "Ayrton Senna");
    assert_eq!(body["finish_rate"]["starters"], 3);
    assert_eq!(body["finish_rate"]["finishers"], 2);
}

#[tokio::test]
async fn test_map_defaults_to_first_circuit() {
    let (status, body) = get_json(app(GEOJSON), "/api/v1/map?basemap=stamen-toner").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basemap"], "Stamen Toner");
    assert_eq!(body["viewport"]["mode"], "fit");

    let layers = body["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1]["name"], "selected");
    assert_eq!(layers[1]["data"]["features"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bad_basemap_is_bad_request() {
    let (status, body) = get_json(app(GEOJSON), "/api/v1/map?basemap=satellite").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["details"].as_str().unwrap().contains("basemap"));
}

#[tokio::test]
async fn test_unreachable_data_is_bad_gateway() {
    let (status, body) = get_json(app_with(StaticSource::new()), "/api/v1/circuits").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Circuit data unavailable");
}

#[tokio::test]
async fn test_dashboard_json() {
    let (status, body) =
        get_json(app(GEOJSON), "/api/v1/dashboard?circuit=Silverstone%20Circuit").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"]["state"], "selected");
    assert_eq!(body["selection"]["circuit"], "Silverstone Circuit");
    assert_eq!(body["basemaps"].as_array().unwrap().len(), 3);

    let sections = body["report"]["sections"].as_array().unwrap();
    assert_eq!(sections[0]["kind"], "map");
    assert_eq!(
        sections[1]["text"],
        "The fastest lap time recorded at Silverstone Circuit is 1:27.097, clocked by Lewis Hamilton on 2020-08-02."
    );
}

#[tokio::test]
async fn test_empty_circuit_list() {
    let empty = r#"{"type": "FeatureCollection", "features": []}"#;

    let (status, _) = get_json(app(empty), "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(app(empty), "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("No circuits are available"));
}

#[tokio::test]
async fn test_page_renders_selection() {
    let (status, body) = get(app(GEOJSON), "/?circuit=Circuit+de+Monaco&basemap=Stamen+Terrain").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Formula One - Data Pitstop - 1950 to 2023</title>"));
    assert!(html.contains("<option value=\"Circuit de Monaco\" selected>"));
    assert!(html.contains("<option value=\"Stamen Terrain\" selected>"));
    assert!(html.contains("Lights out and away we go ... !"));
    assert!(html.contains("From a total of 3 drivers who have started a race at Circuit de Monaco, 66.67 % completed the race."));
}

#[tokio::test]
async fn test_page_bad_basemap_is_html_error() {
    let (status, body) = get(app(GEOJSON), "/?basemap=satellite").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("Invalid parameter"));
}

#[tokio::test]
async fn test_page_escapes_circuit_names() {
    let geojson = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"Name": "Circuit <b>Gilles</b>"},
             "geometry": {"type": "Point", "coordinates": [-73.5253, 45.5005]}}
        ]
    }"#;
    let (status, body) = get(app(geojson), "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<option value=\"Circuit &lt;b&gt;Gilles&lt;/b&gt;\" selected>"));
    assert!(html.contains("Circuit <b>Gilles<\\/b>"));
    assert!(!html.contains("Circuit <b>Gilles</b>"));
}

#[tokio::test]
async fn test_basemaps() {
    let (status, body) = get_json(app(GEOJSON), "/api/v1/basemaps").await;
    assert_eq!(status, StatusCode::OK);

    let basemaps = body.as_array().unwrap();
    assert_eq!(basemaps.len(), 3);
    assert_eq!(basemaps[0]["name"], "OpenStreetMap");
    assert_eq!(basemaps[0]["default"], true);
    assert_eq!(basemaps[1]["default"], false);
}
