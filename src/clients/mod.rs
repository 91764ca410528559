/// External API clients module
use crate::domain::{ApodPayload, ApodSelector, MediaRecord};
use crate::errors::{ApiError, ApiResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("apod-relay/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Upstream answers a range with an array and a single day with an object
#[derive(Debug)]
enum ApodBody {
    Many(Vec<MediaRecord>),
    One(MediaRecord),
}

impl ApodBody {
    /// Branch on the JSON shape first so a bad record reports its own field error
    fn decode(bytes: &[u8]) -> ApiResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.is_array() {
            Ok(ApodBody::Many(serde_json::from_value(value)?))
        } else {
            Ok(ApodBody::One(serde_json::from_value(value)?))
        }
    }
}

/// NASA APOD client
pub struct ApodClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl ApodClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform exactly one upstream call for `selector`
    pub async fn fetch(&self, selector: ApodSelector) -> ApiResult<ApodPayload> {
        let params = selector.query_params();
        info!(url = %self.base_url, ?params, "Fetching from NASA API");

        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str()), ("thumbs", "true")])
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::UpstreamHttp {
                status_code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let body = ApodBody::decode(&bytes)?;
        debug!(bytes = bytes.len(), "NASA API body decoded");

        Ok(normalize(selector, body))
    }
}

fn normalize(selector: ApodSelector, body: ApodBody) -> ApodPayload {
    match (selector, body) {
        (ApodSelector::Range { .. }, ApodBody::One(record)) => ApodPayload::Many(vec![record]),
        (_, ApodBody::Many(records)) => ApodPayload::Many(newest_first(records)),
        (_, ApodBody::One(record)) => ApodPayload::Single(record),
    }
}

/// Stable sort by date, newest first
pub fn newest_first(mut records: Vec<MediaRecord>) -> Vec<MediaRecord> {
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::MediaType;
    use axum::{
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) fn record(date: &str, title: &str) -> MediaRecord {
        MediaRecord {
            date: date.parse().unwrap(),
            title: title.to_string(),
            explanation: format!("{title} explained"),
            media_type: MediaType::Image,
            url: Some(format!("https://apod.nasa.gov/{date}.jpg")),
            thumbnail_url: None,
            hdurl: None,
            copyright: None,
        }
    }

    /// Fake upstream mimicking the APOD endpoint, counting hits
    pub(crate) async fn spawn_fake_nasa(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new()
            .route(
                "/planetary/apod",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        fake_apod(q)
                    }
                }),
            )
            .route("/broken", get(|| async { "<html>not json</html>" }))
            .route(
                "/missing",
                get(|| async { (StatusCode::NOT_FOUND, "gone").into_response() }),
            )
            .route("/with-other", get(|| async { Json(week_with_other()) }))
            .route(
                "/untitled",
                get(|| async {
                    Json(serde_json::json!([{
                        "date": "2024-06-08",
                        "explanation": "e",
                        "media_type": "image",
                        "url": "u"
                    }]))
                }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Json(record("2024-06-10", "Slow"))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn fake_apod(q: HashMap<String, String>) -> Response {
        if q.get("api_key").map(String::as_str) != Some("TEST_KEY") {
            return (StatusCode::FORBIDDEN, "bad key").into_response();
        }
        if let Some(date) = q.get("date") {
            if date.as_str() == "1990-01-01" {
                return (StatusCode::NOT_FOUND, "no apod").into_response();
            }
            return Json(record(date, "On date")).into_response();
        }
        if let (Some(start), Some(end)) = (q.get("start_date"), q.get("end_date")) {
            let start: NaiveDate = start.parse().unwrap();
            let end: NaiveDate = end.parse().unwrap();
            // Deliberately unordered, as upstream does not promise order
            let mut days: Vec<MediaRecord> = start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|d| record(&d.to_string(), "Range"))
                .collect();
            let half = days.len() / 2;
            days.rotate_left(half);
            return Json(days).into_response();
        }
        Json(record("2024-06-10", "Today")).into_response()
    }

    /// An image day plus an `other` day that upstream sends without a `url`
    pub(crate) fn week_with_other() -> serde_json::Value {
        serde_json::json!([
            record("2024-06-09", "Image day"),
            {
                "date": "2024-06-08",
                "title": "Interactive",
                "explanation": "e",
                "media_type": "other"
            }
        ])
    }

    fn client(base: &str, path: &str) -> ApodClient {
        ApodClient::new(
            format!("{base}{path}"),
            "TEST_KEY".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_newest_first_keeps_duplicate_order() {
        let sorted = newest_first(vec![
            record("2024-06-03", "a"),
            record("2024-06-05", "b"),
            record("2024-06-03", "c"),
            record("2024-06-04", "d"),
        ]);
        let titles: Vec<&str> = sorted.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_range_with_single_object_is_wrapped() {
        let payload = normalize(
            ApodSelector::Range {
                start: "2024-06-03".parse().unwrap(),
                end: "2024-06-03".parse().unwrap(),
            },
            ApodBody::One(record("2024-06-03", "x")),
        );
        assert!(matches!(payload, ApodPayload::Many(ref v) if v.len() == 1));
    }

    #[tokio::test]
    async fn test_fetch_on_date_returns_bare_record() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_fake_nasa(hits.clone()).await;
        let payload = client(&base, "/planetary/apod")
            .fetch(ApodSelector::OnDate("2020-01-01".parse().unwrap()))
            .await
            .unwrap();
        match payload {
            ApodPayload::Single(rec) => assert_eq!(rec.date.to_string(), "2020-01-01"),
            other => panic!("expected single record, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_range_sorted_descending() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_fake_nasa(hits).await;
        let payload = client(&base, "/planetary/apod")
            .fetch(ApodSelector::Range {
                start: "2024-06-03".parse().unwrap(),
                end: "2024-06-09".parse().unwrap(),
            })
            .await
            .unwrap();
        let records = payload.into_records();
        assert_eq!(records.len(), 7);
        assert_eq!(records[0].date.to_string(), "2024-06-09");
        assert_eq!(records[6].date.to_string(), "2024-06-03");
        assert!(records.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[tokio::test]
    async fn test_fetch_does_not_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_fake_nasa(hits.clone()).await;
        let client = client(&base, "/planetary/apod");
        client.fetch(ApodSelector::Today).await.unwrap();
        client.fetch(ApodSelector::Today).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let base = spawn_fake_nasa(Arc::new(AtomicUsize::new(0))).await;
        let err = client(&base, "/missing")
            .fetch(ApodSelector::Today)
            .await
            .unwrap_err();
        match err {
            ApiError::UpstreamHttp {
                status_code,
                status_text,
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let base = spawn_fake_nasa(Arc::new(AtomicUsize::new(0))).await;
        let err = client(&base, "/broken")
            .fetch(ApodSelector::Today)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UpstreamDecode(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_transport() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let err = client(&format!("http://{addr}"), "/planetary/apod")
            .fetch(ApodSelector::Today)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn test_range_keeps_entry_without_url() {
        let base = spawn_fake_nasa(Arc::new(AtomicUsize::new(0))).await;
        let records = client(&base, "/with-other")
            .fetch(ApodSelector::Range {
                start: "2024-06-08".parse().unwrap(),
                end: "2024-06-09".parse().unwrap(),
            })
            .await
            .unwrap()
            .into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].media_type, MediaType::Other);
        assert_eq!(records[1].url, None);
    }

    #[tokio::test]
    async fn test_decode_error_names_missing_field() {
        let base = spawn_fake_nasa(Arc::new(AtomicUsize::new(0))).await;
        let err = client(&base, "/untitled")
            .fetch(ApodSelector::Today)
            .await
            .unwrap_err();
        match err {
            ApiError::UpstreamDecode(msg) => assert!(msg.contains("title"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
