//! Intervals.icu API client
//!
//! Thin async wrapper over the athlete endpoints the tool needs. Every
//! request is authenticated with the athlete's API key and spaced out to stay
//! well under the service's rate limit.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::models::{EventPayload, RemoteEvent};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const INTERVALS_API_BASE: &str = "https://intervals.icu/api/v1";
const API_KEY_USER: &str = "API_KEY";
/// ~8 req/s, well under the 30/s limit
const REQUEST_INTERVAL: Duration = Duration::from_millis(120);
const DEFAULT_ATHLETE_ID: &str = "0";

#[derive(Debug, Clone)]
pub struct IntervalsConfig {
  pub api_key: String,
  pub athlete_id: String,
}

impl IntervalsConfig {
  pub fn from_env() -> Result<Self, IntervalsError> {
    let api_key = env::var("INTERVALS_API_KEY")
      .ok()
      .filter(|k| !k.is_empty())
      .ok_or_else(|| IntervalsError::MissingConfig("INTERVALS_API_KEY".into()))?;

    Ok(Self {
      api_key,
      athlete_id: env::var("INTERVALS_ATHLETE_ID").unwrap_or_else(|_| DEFAULT_ATHLETE_ID.into()),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IntervalsError {
  #[error("Missing configuration: {0} (copy .env.example to .env and add your key)")]
  MissingConfig(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Intervals.icu returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("Invalid request URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("Unexpected response: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

pub struct IntervalsClient {
  http: Client,
  base_url: String,
  config: IntervalsConfig,
  last_request: Mutex<Option<Instant>>,
}

impl IntervalsClient {
  pub fn new(config: IntervalsConfig) -> Self {
    Self::with_base_url(config, INTERVALS_API_BASE)
  }

  pub fn from_env() -> Result<Self, IntervalsError> {
    Ok(Self::new(IntervalsConfig::from_env()?))
  }

  /// Point the client at another server (tests use a local mock)
  pub fn with_base_url(config: IntervalsConfig, base_url: &str) -> Self {
    Self {
      http: Client::new(),
      base_url: base_url.trim_end_matches('/').to_string(),
      config,
      last_request: Mutex::new(None),
    }
  }

  fn athlete_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, IntervalsError> {
    let mut url = Url::parse(&format!("{}/athlete/{}", self.base_url, self.config.athlete_id))?;
    if !path.is_empty() {
      url = Url::parse(&format!("{}/{}", url, path))?;
    }
    if !query.is_empty() {
      url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
  }

  async fn throttle(&self) {
    let mut last = self.last_request.lock().await;
    if let Some(previous) = *last {
      let elapsed = previous.elapsed();
      if elapsed < REQUEST_INTERVAL {
        tokio::time::sleep(REQUEST_INTERVAL - elapsed).await;
      }
    }
    *last = Some(Instant::now());
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    self
      .http
      .request(method, url)
      .basic_auth(API_KEY_USER, Some(&self.config.api_key))
  }

  async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, IntervalsError> {
    self.throttle().await;
    let response = builder.send().await?;
    let status = response.status();

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(IntervalsError::Api {
        status: status.as_u16(),
        body,
      });
    }
    Ok(response)
  }

  async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, IntervalsError> {
    let response = self.send(builder).await?;
    let response_text = response.text().await?;

    serde_json::from_str(&response_text).map_err(|e| {
      let excerpt: String = response_text.chars().take(500).collect();
      warn!(error = %e, body = %excerpt, "failed to parse Intervals.icu response");
      IntervalsError::Parse(e.to_string())
    })
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, IntervalsError> {
    let url = self.athlete_url(path, query)?;
    debug!(%url, "GET");
    self.send_json(self.request(Method::GET, url)).await
  }

  async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
    query: &[(&str, &str)],
  ) -> Result<T, IntervalsError> {
    let url = self.athlete_url(path, query)?;
    debug!(%url, "POST");
    self.send_json(self.request(Method::POST, url).json(body)).await
  }

  /// ---------------------------------------------------------------------------
  /// Activities and Wellness
  /// ---------------------------------------------------------------------------

  /// Completed activities between two ISO dates (inclusive)
  pub async fn get_activities(&self, oldest: &str, newest: &str) -> Result<Vec<Value>, IntervalsError> {
    self.get("activities", &[("oldest", oldest), ("newest", newest)]).await
  }

  /// Daily wellness records (CTL, ATL, eFTP, subjective scores)
  pub async fn get_wellness(&self, oldest: &str, newest: &str) -> Result<Vec<Value>, IntervalsError> {
    self.get("wellness", &[("oldest", oldest), ("newest", newest)]).await
  }

  /// ---------------------------------------------------------------------------
  /// Athlete Profile and Settings
  /// ---------------------------------------------------------------------------

  pub async fn get_profile(&self) -> Result<Value, IntervalsError> {
    self.get("", &[]).await
  }

  pub async fn get_sport_settings(&self, sport: &str) -> Result<Value, IntervalsError> {
    self.get(&format!("sport-settings/{}", sport), &[]).await
  }

  pub async fn get_power_curves(&self, sport: &str, curves: &str) -> Result<Value, IntervalsError> {
    self.get("power-curves", &[("type", sport), ("curves", curves)]).await
  }

  /// ---------------------------------------------------------------------------
  /// Calendar Events
  /// ---------------------------------------------------------------------------

  pub async fn get_events(&self, oldest: &str, newest: &str) -> Result<Vec<RemoteEvent>, IntervalsError> {
    self.get("events", &[("oldest", oldest), ("newest", newest)]).await
  }

  /// Create or update events, matched on `external_id`
  pub async fn bulk_upsert_events(&self, events: &[EventPayload]) -> Result<Vec<RemoteEvent>, IntervalsError> {
    self.post("events/bulk", events, &[("upsert", "true")]).await
  }

  pub async fn delete_event(&self, event_id: i64) -> Result<(), IntervalsError> {
    let url = self.athlete_url(&format!("events/{}", event_id), &[])?;
    debug!(%url, "DELETE");
    self.send(self.request(Method::DELETE, url)).await?;
    Ok(())
  }

  /// Check credentials by fetching the athlete profile
  pub async fn ping(&self) -> bool {
    match self.get_profile().await {
      Ok(profile) => profile.get("id").is_some(),
      Err(e) => {
        debug!(error = %e, "ping failed");
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::planner::WorkoutType;
  use crate::test_utils::planned_workout;
  use mockito::Matcher;
  use serial_test::serial;

  /// Basic auth header for `API_KEY:test-key`
  const AUTH_HEADER: &str = "Basic QVBJX0tFWTp0ZXN0LWtleQ==";

  fn client_for(server: &mockito::ServerGuard) -> IntervalsClient {
    IntervalsClient::with_base_url(
      IntervalsConfig {
        api_key: "test-key".into(),
        athlete_id: "i42".into(),
      },
      &server.url(),
    )
  }

  #[tokio::test]
  async fn test_get_activities_sends_range_and_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/athlete/i42/activities")
      .match_header("authorization", AUTH_HEADER)
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("oldest".into(), "2026-02-01".into()),
        Matcher::UrlEncoded("newest".into(), "2026-02-28".into()),
      ]))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"id": "i1", "type": "Ride", "start_date_local": "2026-02-10T07:00:00"}]"#)
      .create_async()
      .await;

    let activities = client_for(&server)
      .get_activities("2026-02-01", "2026-02-28")
      .await
      .unwrap();

    mock.assert_async().await;
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["type"], "Ride");
  }

  #[tokio::test]
  async fn test_profile_uses_athlete_root() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/athlete/i42")
      .with_status(200)
      .with_body(r#"{"id": "i42", "name": "Test Athlete"}"#)
      .create_async()
      .await;

    let client = client_for(&server);
    assert!(client.ping().await);
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_api_error_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/athlete/i42/sport-settings/Ride")
      .with_status(403)
      .with_body("Forbidden")
      .create_async()
      .await;

    let client = client_for(&server);
    let err = client.get_sport_settings("Ride").await.unwrap_err();
    match err {
      IntervalsError::Api { status, body } => {
        assert_eq!(status, 403);
        assert_eq!(body, "Forbidden");
      }
      other => panic!("expected Api error, got {other:?}"),
    }
    assert!(!client.ping().await);
  }

  #[tokio::test]
  async fn test_bulk_upsert_posts_events() {
    let mut server = mockito::Server::new_async().await;
    let workout = planned_workout(2, 1, "Tempo", WorkoutType::Ride);
    let payload = EventPayload::from(&workout);

    let mock = server
      .mock("POST", "/athlete/i42/events/bulk")
      .match_query(Matcher::UrlEncoded("upsert".into(), "true".into()))
      .match_body(Matcher::AllOf(vec![
        Matcher::Regex(r#""external_id":"block-w2-tue-tempo""#.into()),
        Matcher::Regex(r#""type":"Ride""#.into()),
      ]))
      .with_status(200)
      .with_body(
        r#"[{"id": 901, "name": "Tempo", "start_date_local": "2030-02-19T00:00:00", "external_id": "block-w2-tue-tempo"}]"#,
      )
      .create_async()
      .await;

    let created = client_for(&server).bulk_upsert_events(&[payload]).await.unwrap();
    mock.assert_async().await;
    assert_eq!(created[0].id, 901);
    assert_eq!(created[0].external_id.as_deref(), Some("block-w2-tue-tempo"));
  }

  #[tokio::test]
  async fn test_delete_event() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("DELETE", "/athlete/i42/events/77")
      .with_status(200)
      .create_async()
      .await;

    client_for(&server).delete_event(77).await.unwrap();
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_unparseable_body_is_parse_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/athlete/i42/events")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body("<html>maintenance</html>")
      .create_async()
      .await;

    let err = client_for(&server)
      .get_events("2026-02-09", "2026-02-15")
      .await
      .unwrap_err();
    assert!(matches!(err, IntervalsError::Parse(_)));
  }

  #[tokio::test]
  async fn test_requests_are_spaced_out() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/athlete/i42/power-curves")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body("{}")
      .expect(2)
      .create_async()
      .await;

    let client = client_for(&server);
    let start = std::time::Instant::now();
    client.get_power_curves("Ride", "42d").await.unwrap();
    client.get_power_curves("Ride", "42d").await.unwrap();
    assert!(start.elapsed() >= REQUEST_INTERVAL);
  }

  #[test]
  #[serial]
  fn test_config_from_env() {
    temp_env::with_vars(
      [
        ("INTERVALS_API_KEY", Some("abc")),
        ("INTERVALS_ATHLETE_ID", None),
      ],
      || {
        let config = IntervalsConfig::from_env().unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.athlete_id, "0");
      },
    );

    temp_env::with_vars(
      [
        ("INTERVALS_API_KEY", Some("")),
        ("INTERVALS_ATHLETE_ID", Some("i9")),
      ],
      || {
        assert!(matches!(
          IntervalsConfig::from_env(),
          Err(IntervalsError::MissingConfig(_))
        ));
      },
    );
  }
}
