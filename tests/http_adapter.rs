//! End-to-end tests: axum router in front of a wiremock provider.

use std::net::SocketAddr;
use std::sync::Arc;

use nimbus_core::Config;
use nimbus_weather::WeatherService;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";

async fn spawn_app(upstream: &MockServer) -> SocketAddr {
    let mut config = Config::default();
    config.weather.api_url = format!("{}{}", upstream.uri(), WEATHER_PATH);
    config.weather.api_key = "test-key".to_string();

    let service = Arc::new(WeatherService::from_config(&config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, nimbus::routes::router(service))
            .await
            .unwrap();
    });

    addr
}

async fn mount_karachi(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "karachi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": {"temp": 31.2, "temp_min": 29.0, "temp_max": 33.4, "humidity": 62, "pressure": 1004},
            "weather": [{"description": "haze"}],
            "wind": {"speed": 5.1, "deg": 250}
        })))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn test_base_route_returns_english_record() {
    let upstream = MockServer::start().await;
    mount_karachi(&upstream).await;
    let addr = spawn_app(&upstream).await;

    let response = reqwest::get(format!("http://{}/api/v1/weather/current/Karachi/", addr))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["city_name"], "karachi");
    assert_eq!(body["wind_direction"], "West");
    assert_eq!(body["description"], "haze");
}

#[tokio::test]
async fn test_lang_route_returns_localized_record() {
    let upstream = MockServer::start().await;
    mount_karachi(&upstream).await;
    let addr = spawn_app(&upstream).await;

    let response = reqwest::get(format!("http://{}/api/v1/weather/current/karachi/ur", addr))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["شہر کا نام"], "کراچی");
    assert_eq!(body["ہوا کی سمت"], "مغرب");
    assert_eq!(body["نمی"], 62);
}

#[tokio::test]
async fn test_accept_language_header_is_negotiated() {
    let upstream = MockServer::start().await;
    mount_karachi(&upstream).await;
    let addr = spawn_app(&upstream).await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/api/v1/weather/current/karachi", addr))
        .header("Accept-Language", "ar;q=0.9, de")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["الرطوبة"], 62);
}

#[tokio::test]
async fn test_upstream_404_is_forwarded_with_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&upstream)
        .await;
    let addr = spawn_app(&upstream).await;

    let response = reqwest::get(format!("http://{}/api/v1/weather/current/nowhere/en/", addr))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert_eq!(body.as_object().unwrap().len(), 1);
}
