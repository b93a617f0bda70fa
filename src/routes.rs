//! Thin axum layer over `WeatherService`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use nimbus_weather::{FailureResponse, WeatherRecord, WeatherService};

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/api/v1/weather/current/:city_name", get(current))
        .route("/api/v1/weather/current/:city_name/", get(current))
        .route(
            "/api/v1/weather/current/:city_name/:lang_code",
            get(current_with_lang),
        )
        .route(
            "/api/v1/weather/current/:city_name/:lang_code/",
            get(current_with_lang),
        )
        .with_state(service)
}

async fn current(
    State(service): State<Arc<WeatherService>>,
    Path(city_name): Path<String>,
    headers: HeaderMap,
) -> Response {
    respond(service.current(&city_name, accept_language(&headers)).await)
}

async fn current_with_lang(
    State(service): State<Arc<WeatherService>>,
    Path((city_name, lang_code)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    respond(
        service
            .current_in(&city_name, &lang_code, accept_language(&headers))
            .await,
    )
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
}

fn respond(result: Result<WeatherRecord, FailureResponse>) -> Response {
    match result {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(failure) => (failure_status(failure.status), Json(failure)).into_response(),
    }
}

// Only error statuses can carry the `{"error"}` body; anything else the
// provider sent is reported as a bad gateway.
fn failure_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code)
        .ok()
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}
