//! HTTP-level tests for the OpenWeather client against a mock server.

use dashboard_core::{
    Dashboard, DashboardError, ForecastGrouping, IconCategory, LocationQuery, MalformedInput,
    OpenWeatherClient, Presenter, WeatherSource, WeekdayZone, load_dashboard,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2024-01-01T00:00:00Z, a Monday.
const MONDAY_MIDNIGHT: i64 = 1_704_067_200;

fn current_json() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
        "main": {
            "temp": 15.6,
            "feels_like": 14.9,
            "temp_min": 14.0,
            "temp_max": 17.1,
            "pressure": 1012,
            "humidity": 80
        },
        "wind": { "speed": 5.0, "deg": 230 },
        "dt": MONDAY_MIDNIGHT,
        "sys": { "country": "FR", "sunrise": 1_704_094_500, "sunset": 1_704_124_400 },
        "timezone": 3600,
        "name": "Paris",
        "cod": 200
    })
}

fn forecast_json(entries: usize) -> serde_json::Value {
    let list: Vec<_> = (0..entries)
        .map(|i| {
            serde_json::json!({
                "dt": MONDAY_MIDNIGHT + i as i64 * 10_800,
                "main": { "temp": i as f64 + 0.4, "humidity": 70 },
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04n" }],
                "dt_txt": "ignored"
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "cnt": entries,
        "list": list,
        "city": { "name": "Paris", "country": "FR", "timezone": 3600 }
    })
}

async fn mount_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(40)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetches_current_conditions_by_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let raw = client.current(&LocationQuery::City("Paris".into())).await.unwrap();

    assert_eq!(raw.name, "Paris");
    assert_eq!(raw.main.humidity, 80);
    assert_eq!(raw.weather[0].description, "light rain");
}

#[tokio::test]
async fn fetches_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let query = LocationQuery::Coordinates { lat: 48.85, lon: 2.35 };
    let raw = client.current(&query).await.unwrap();

    assert_eq!(raw.sys.country, "FR");
}

#[tokio::test]
async fn not_found_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let err = client.current(&LocationQuery::City("Atlantis".into())).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Weather data not found"), "{msg}");
    assert!(msg.contains("404"), "{msg}");
    assert!(msg.contains("city not found"), "{msg}");
}

#[tokio::test]
async fn unparseable_body_is_malformed_input() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let err = client.forecast(&LocationQuery::City("Paris".into())).await.unwrap_err();

    let malformed = err.downcast_ref::<MalformedInput>().expect("decode error is malformed input");
    assert!(matches!(malformed, MalformedInput::Payload { context, .. } if context == "OpenWeather forecast data"));
}

async fn load_with_current(current: serde_json::Value) -> Result<Dashboard, DashboardError> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(8)))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    load_dashboard(&client, &LocationQuery::City("Paris".into()), &Presenter::default()).await
}

#[tokio::test]
async fn missing_field_is_malformed_not_fetch_failure() {
    let mut current = current_json();
    current["main"].as_object_mut().unwrap().remove("feels_like");

    let err = load_with_current(current).await.unwrap_err();

    match err {
        DashboardError::Malformed(MalformedInput::Payload { detail, .. }) => {
            assert!(detail.contains("feels_like"), "{detail}");
        }
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[tokio::test]
async fn non_numeric_field_is_malformed_not_fetch_failure() {
    let mut current = current_json();
    current["main"]["temp"] = serde_json::json!("warm");

    let err = load_with_current(current).await.unwrap_err();

    match err {
        DashboardError::Malformed(MalformedInput::Payload { detail, .. }) => {
            assert!(detail.contains("warm"), "{detail}");
        }
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[tokio::test]
async fn forecast_server_error_still_shows_current() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let dashboard =
        load_dashboard(&client, &LocationQuery::City("Paris".into()), &Presenter::default())
            .await
            .unwrap();

    assert_eq!(dashboard.current.location, "Paris, FR");
    assert_eq!(dashboard.current.temperature_c, 16);
    assert!(dashboard.forecast.is_empty());
    let reason = dashboard.forecast_error.unwrap();
    assert!(reason.contains("Forecast data not found"), "{reason}");
    assert!(reason.contains("500"), "{reason}");
}

#[tokio::test]
async fn undecodable_forecast_still_shows_current() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "list": [{ "dt": "soon" }] })),
        )
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let dashboard =
        load_dashboard(&client, &LocationQuery::City("Paris".into()), &Presenter::default())
            .await
            .unwrap();

    assert_eq!(dashboard.current.location, "Paris, FR");
    assert!(dashboard.forecast_error.is_some());
}

#[tokio::test]
async fn dashboard_end_to_end() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let query = LocationQuery::City("Paris".into());
    let presenter = Presenter::new(ForecastGrouping::Stride, WeekdayZone::Location);

    let dashboard = load_dashboard(&client, &query, &presenter).await.unwrap();

    assert_eq!(dashboard.current.location, "Paris, FR");
    assert_eq!(dashboard.current.temperature_c, 16);
    assert_eq!(dashboard.current.feels_like_c, 15);
    assert_eq!(dashboard.current.wind_kmh, 18);
    assert_eq!(dashboard.current.icon, IconCategory::Rain);

    let temps: Vec<_> = dashboard.forecast.iter().map(|d| d.temperature_c).collect();
    assert_eq!(temps, vec![0, 8, 16, 24, 32]);
    let labels: Vec<_> = dashboard.forecast.iter().map(|d| d.weekday.as_str()).collect();
    assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
    assert!(dashboard.forecast.iter().all(|d| d.icon == IconCategory::Cloudy));
}

#[tokio::test]
async fn dashboard_with_empty_forecast_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(0)))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let dashboard =
        load_dashboard(&client, &LocationQuery::City("Paris".into()), &Presenter::default())
            .await
            .unwrap();

    assert!(dashboard.forecast.is_empty());
    assert!(dashboard.forecast_error.is_none());
}

#[tokio::test]
async fn dashboard_with_empty_conditions_is_malformed() {
    let server = MockServer::start().await;

    let mut current = current_json();
    current["weather"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(8)))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server.uri());
    let err = load_dashboard(&client, &LocationQuery::City("Paris".into()), &Presenter::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DashboardError::Malformed(_)));
}
