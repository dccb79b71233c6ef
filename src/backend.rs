use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::{sync::RwLock, time::Instant};
use tower_http::services::{ServeDir, ServeFile};
use url::Url;

const DEFAULT_FEEDBACK_REQUEST_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_FEEDBACK_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_FEEDBACK_MIN_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_FEEDBACK_MAX_TRACKED_CLIENTS: usize = 1_024;
const DEFAULT_FEEDBACK_MAX_NAME_CHARS: usize = 200;
const DEFAULT_FEEDBACK_MAX_EMAIL_CHARS: usize = 320;
const DEFAULT_FEEDBACK_MAX_MESSAGE_CHARS: usize = 4_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const FEEDBACK_REQUEST_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 120_000);
const FEEDBACK_CONNECT_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 30_000);
const FEEDBACK_MIN_INTERVAL_SECONDS_BOUNDS: (u64, u64) = (1, 3_600);
const FEEDBACK_MAX_TRACKED_CLIENTS_BOUNDS: (usize, usize) = (16, 100_000);
const FEEDBACK_MAX_NAME_CHARS_BOUNDS: (usize, usize) = (1, 1_000);
const FEEDBACK_MAX_EMAIL_CHARS_BOUNDS: (usize, usize) = (3, 1_000);
const FEEDBACK_MAX_MESSAGE_CHARS_BOUNDS: (usize, usize) = (1, 50_000);

const USER_AGENT: &str = "portfolio-feedback-relay/1.0";
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Clone)]
struct FeedbackRuntimeConfig {
    relay_url: Option<Url>,
    relay_service_id: Option<String>,
    relay_template_id: Option<String>,
    relay_public_key: Option<String>,
    request_timeout: Duration,
    connect_timeout: Duration,
    min_interval: Duration,
    max_tracked_clients: usize,
    max_name_chars: usize,
    max_email_chars: usize,
    max_message_chars: usize,
    log_level: LogLevel,
}

impl FeedbackRuntimeConfig {
    fn from_env() -> Self {
        let request_timeout_ms = parse_env_u64_with_bounds(
            "FEEDBACK_REQUEST_TIMEOUT_MS",
            DEFAULT_FEEDBACK_REQUEST_TIMEOUT_MS,
            FEEDBACK_REQUEST_TIMEOUT_MS_BOUNDS,
        );
        let connect_timeout_ms = parse_env_u64_with_bounds(
            "FEEDBACK_CONNECT_TIMEOUT_MS",
            DEFAULT_FEEDBACK_CONNECT_TIMEOUT_MS,
            FEEDBACK_CONNECT_TIMEOUT_MS_BOUNDS,
        );
        let min_interval_seconds = parse_env_u64_with_bounds(
            "FEEDBACK_MIN_INTERVAL_SECONDS",
            DEFAULT_FEEDBACK_MIN_INTERVAL_SECONDS,
            FEEDBACK_MIN_INTERVAL_SECONDS_BOUNDS,
        );
        let max_tracked_clients = parse_env_usize_with_bounds(
            "FEEDBACK_MAX_TRACKED_CLIENTS",
            DEFAULT_FEEDBACK_MAX_TRACKED_CLIENTS,
            FEEDBACK_MAX_TRACKED_CLIENTS_BOUNDS,
        );
        let max_name_chars = parse_env_usize_with_bounds(
            "FEEDBACK_MAX_NAME_CHARS",
            DEFAULT_FEEDBACK_MAX_NAME_CHARS,
            FEEDBACK_MAX_NAME_CHARS_BOUNDS,
        );
        let max_email_chars = parse_env_usize_with_bounds(
            "FEEDBACK_MAX_EMAIL_CHARS",
            DEFAULT_FEEDBACK_MAX_EMAIL_CHARS,
            FEEDBACK_MAX_EMAIL_CHARS_BOUNDS,
        );
        let max_message_chars = parse_env_usize_with_bounds(
            "FEEDBACK_MAX_MESSAGE_CHARS",
            DEFAULT_FEEDBACK_MAX_MESSAGE_CHARS,
            FEEDBACK_MAX_MESSAGE_CHARS_BOUNDS,
        );

        Self {
            relay_url: parse_env_http_url("FEEDBACK_RELAY_URL"),
            relay_service_id: parse_env_non_empty_string("FEEDBACK_RELAY_SERVICE_ID"),
            relay_template_id: parse_env_non_empty_string("FEEDBACK_RELAY_TEMPLATE_ID"),
            relay_public_key: parse_env_non_empty_string("FEEDBACK_RELAY_PUBLIC_KEY"),
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            min_interval: Duration::from_secs(min_interval_seconds),
            max_tracked_clients,
            max_name_chars,
            max_email_chars,
            max_message_chars,
            log_level: parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    recent_submissions: Arc<RwLock<HashMap<String, Instant>>>,
    config: FeedbackRuntimeConfig,
}

#[derive(Deserialize)]
struct FeedbackSubmission {
    name: String,
    email: String,
    feedback: String,
}

struct CleanSubmission {
    name: String,
    email: String,
    feedback: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackPayload {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FeedbackPayload {
    fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            ok: false,
            error: Some(message.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthPayload {
    ok: bool,
    relay_configured: bool,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: RelayTemplateParams<'a>,
}

#[derive(Serialize)]
struct RelayTemplateParams<'a> {
    from_name: &'a str,
    reply_to: &'a str,
    message: &'a str,
}

struct RelayFailure {
    error_class: &'static str,
    status_code: Option<u16>,
    status_class: Option<&'static str>,
    failure_reason: Option<&'static str>,
}

impl RelayFailure {
    fn plain(error_class: &'static str, failure_reason: &'static str) -> Self {
        Self {
            error_class,
            status_code: None,
            status_class: None,
            failure_reason: Some(failure_reason),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ThrottleDecision {
    Allowed,
    TooSoon,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let bind_address = format!("0.0.0.0:{port}");
    let config = FeedbackRuntimeConfig::from_env();

    if config.relay_url.is_none() {
        log_event(
            &config,
            LogLevel::Info,
            "relay_unconfigured",
            serde_json::json!({
                "message": "FEEDBACK_RELAY_URL is not set; submissions will be rejected",
            }),
        );
    }

    let state = AppState {
        recent_submissions: Arc::new(RwLock::new(HashMap::new())),
        config,
    };

    let static_service = ServeDir::new("dist").not_found_service(ServeFile::new("dist/index.html"));

    let app = Router::new()
        .route("/api/feedback", post(post_feedback))
        .route("/api/health", get(get_health))
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    println!("server listening on http://127.0.0.1:{port}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthPayload {
        ok: true,
        relay_configured: state.config.relay_url.is_some(),
    })
}

async fn post_feedback(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(submission): Json<FeedbackSubmission>,
) -> impl IntoResponse {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);
    let client_key = client_key_for(&headers, peer);

    log_event(
        &state.config,
        LogLevel::Info,
        "feedback_request_start",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "method": method.as_str(),
            "path": uri.path(),
        }),
    );

    let clean = match validate_submission(&submission, &state.config) {
        Ok(clean) => clean,
        Err(error_message) => {
            log_event(
                &state.config,
                LogLevel::Info,
                "feedback_request_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": "validation_failed",
                    "message": error_message,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            return json_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                FeedbackPayload::error(error_message),
                &request_id,
            );
        }
    };

    if register_submission(&state, &client_key).await == ThrottleDecision::TooSoon {
        log_event(
            &state.config,
            LogLevel::Info,
            "feedback_request_failed",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "error_class": "throttled",
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        return json_response(
            StatusCode::TOO_MANY_REQUESTS,
            FeedbackPayload::error("too many submissions, try again later"),
            &request_id,
        );
    }

    match send_relay_request(&clean, &state.config).await {
        Ok(()) => {
            log_event(
                &state.config,
                LogLevel::Info,
                "feedback_request_complete",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "status": StatusCode::OK.as_u16(),
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            json_response(StatusCode::OK, FeedbackPayload::success(), &request_id)
        }
        Err(failure) => {
            log_event(
                &state.config,
                LogLevel::Info,
                "feedback_relay_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": failure.error_class,
                    "relay_status_code": failure.status_code,
                    "relay_status_class": failure.status_class,
                    "relay_failure_reason": failure.failure_reason,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            // The client only ever sees a coarse failure.
            json_response(
                StatusCode::BAD_GATEWAY,
                FeedbackPayload::error("failed to send feedback"),
                &request_id,
            )
        }
    }
}

fn validate_submission(
    submission: &FeedbackSubmission,
    config: &FeedbackRuntimeConfig,
) -> Result<CleanSubmission, &'static str> {
    let name = submission.name.trim();
    if name.is_empty() {
        return Err("name is required");
    }
    if name.chars().count() > config.max_name_chars {
        return Err("name is too long");
    }

    let email = submission.email.trim();
    if email.is_empty() {
        return Err("email is required");
    }
    if email.chars().count() > config.max_email_chars {
        return Err("email is too long");
    }

    let feedback = submission.feedback.trim();
    if feedback.is_empty() {
        return Err("feedback is required");
    }
    if feedback.chars().count() > config.max_message_chars {
        return Err("feedback is too long");
    }

    Ok(CleanSubmission {
        name: name.to_string(),
        email: email.to_string(),
        feedback: feedback.to_string(),
    })
}

fn decide_throttle(
    now: Instant,
    last_accepted: Option<Instant>,
    min_interval: Duration,
) -> ThrottleDecision {
    match last_accepted {
        Some(previous) if now.duration_since(previous) < min_interval => ThrottleDecision::TooSoon,
        _ => ThrottleDecision::Allowed,
    }
}

async fn register_submission(state: &AppState, client_key: &str) -> ThrottleDecision {
    let now = Instant::now();
    let mut recent = state.recent_submissions.write().await;

    let decision = decide_throttle(now, recent.get(client_key).copied(), state.config.min_interval);
    if decision == ThrottleDecision::TooSoon {
        return decision;
    }

    purge_expired_entries(&mut recent, now, state.config.min_interval);
    if !recent.contains_key(client_key) && recent.len() >= state.config.max_tracked_clients {
        evict_oldest_entry(&mut recent);
    }
    recent.insert(client_key.to_string(), now);

    decision
}

fn purge_expired_entries(recent: &mut HashMap<String, Instant>, now: Instant, ttl: Duration) {
    recent.retain(|_, accepted_at| now.duration_since(*accepted_at) < ttl);
}

fn evict_oldest_entry(recent: &mut HashMap<String, Instant>) {
    let Some(key_to_remove) = recent
        .iter()
        .min_by_key(|(_, accepted_at)| **accepted_at)
        .map(|(key, _)| key.clone())
    else {
        return;
    };

    recent.remove(&key_to_remove);
}

fn client_key_for(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|raw| raw.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

async fn send_relay_request(
    submission: &CleanSubmission,
    config: &FeedbackRuntimeConfig,
) -> Result<(), RelayFailure> {
    let relay_url = config
        .relay_url
        .as_ref()
        .ok_or_else(|| RelayFailure::plain("relay_unconfigured", "validation"))?;
    let service_id = config
        .relay_service_id
        .as_deref()
        .ok_or_else(|| RelayFailure::plain("relay_unconfigured", "validation"))?;
    let template_id = config
        .relay_template_id
        .as_deref()
        .ok_or_else(|| RelayFailure::plain("relay_unconfigured", "validation"))?;
    let public_key = config
        .relay_public_key
        .as_deref()
        .ok_or_else(|| RelayFailure::plain("relay_unconfigured", "validation"))?;

    let payload = build_relay_request(submission, service_id, template_id, public_key);

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::none())
        .user_agent(USER_AGENT)
        .build()
        .map_err(|_| RelayFailure::plain("relay_failed", "upstream"))?;

    let response = client
        .post(relay_url.clone())
        .json(&payload)
        .send()
        .await
        .map_err(|_| RelayFailure::plain("relay_failed", "upstream"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RelayFailure {
            error_class: "relay_failed",
            status_code: Some(status.as_u16()),
            status_class: Some(http_status_class(status)),
            failure_reason: Some(classify_relay_failure_reason(status)),
        });
    }

    Ok(())
}

fn build_relay_request<'a>(
    submission: &'a CleanSubmission,
    service_id: &'a str,
    template_id: &'a str,
    public_key: &'a str,
) -> RelayRequest<'a> {
    RelayRequest {
        service_id,
        template_id,
        user_id: public_key,
        template_params: RelayTemplateParams {
            from_name: &submission.name,
            reply_to: &submission.email,
            message: &submission.feedback,
        },
    }
}

fn http_status_class(status: StatusCode) -> &'static str {
    if status.is_informational() {
        return "1xx";
    }

    if status.is_success() {
        return "2xx";
    }

    if status.is_redirection() {
        return "3xx";
    }

    if status.is_client_error() {
        return "4xx";
    }

    if status.is_server_error() {
        return "5xx";
    }

    "unknown"
}

fn classify_relay_failure_reason(status: StatusCode) -> &'static str {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return "auth";
    }

    if status.is_client_error() {
        return "validation";
    }

    "upstream"
}

fn json_response(
    status: StatusCode,
    payload: FeedbackPayload,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(status, headers, Json(payload), request_id)
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> axum::response::Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_http_url(name: &str) -> Option<Url> {
    let value = parse_env_non_empty_string(name)?;
    let parsed = Url::parse(&value).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(parsed)
    } else {
        None
    }
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    match parse_env_non_empty_string(name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    let value = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    value.unwrap_or_else(generate_request_id)
}

fn log_event(
    config: &FeedbackRuntimeConfig,
    level: LogLevel,
    event: &str,
    fields: serde_json::Value,
) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert(
        "level".to_string(),
        serde_json::Value::String(level.as_str().to_string()),
    );
    payload.insert(
        "event".to_string(),
        serde_json::Value::String(event.to_string()),
    );

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_runtime_config() -> FeedbackRuntimeConfig {
        FeedbackRuntimeConfig {
            relay_url: None,
            relay_service_id: Some("service_test".to_string()),
            relay_template_id: Some("template_test".to_string()),
            relay_public_key: Some("key_test".to_string()),
            request_timeout: Duration::from_millis(DEFAULT_FEEDBACK_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_FEEDBACK_CONNECT_TIMEOUT_MS),
            min_interval: Duration::from_secs(DEFAULT_FEEDBACK_MIN_INTERVAL_SECONDS),
            max_tracked_clients: DEFAULT_FEEDBACK_MAX_TRACKED_CLIENTS,
            max_name_chars: DEFAULT_FEEDBACK_MAX_NAME_CHARS,
            max_email_chars: DEFAULT_FEEDBACK_MAX_EMAIL_CHARS,
            max_message_chars: DEFAULT_FEEDBACK_MAX_MESSAGE_CHARS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }

    fn submission(name: &str, email: &str, feedback: &str) -> FeedbackSubmission {
        FeedbackSubmission {
            name: name.to_string(),
            email: email.to_string(),
            feedback: feedback.to_string(),
        }
    }

    #[test]
    fn whitespace_only_fields_are_rejected() {
        let config = test_runtime_config();

        let result = validate_submission(&submission("   ", "a@b.c", "hello"), &config);
        assert_eq!(result.err(), Some("name is required"));

        let result = validate_submission(&submission("Ada", "  \t ", "hello"), &config);
        assert_eq!(result.err(), Some("email is required"));

        let result = validate_submission(&submission("Ada", "a@b.c", "\n"), &config);
        assert_eq!(result.err(), Some("feedback is required"));
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let config = test_runtime_config();

        let clean = validate_submission(
            &submission("  Ada Lovelace ", " ada@example.com ", " loved the site "),
            &config,
        )
        .expect("submission should validate");

        assert_eq!(clean.name, "Ada Lovelace");
        assert_eq!(clean.email, "ada@example.com");
        assert_eq!(clean.feedback, "loved the site");
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let config = test_runtime_config();
        let long_name = "x".repeat(config.max_name_chars + 1);

        let result = validate_submission(&submission(&long_name, "a@b.c", "hello"), &config);
        assert_eq!(result.err(), Some("name is too long"));
    }

    #[test]
    fn throttle_allows_first_and_spaced_submissions() {
        let min_interval = Duration::from_secs(30);
        let now = Instant::now();

        assert_eq!(
            decide_throttle(now, None, min_interval),
            ThrottleDecision::Allowed
        );
        assert_eq!(
            decide_throttle(now + Duration::from_secs(31), Some(now), min_interval),
            ThrottleDecision::Allowed
        );
    }

    #[test]
    fn throttle_rejects_rapid_resubmission() {
        let min_interval = Duration::from_secs(30);
        let now = Instant::now();

        assert_eq!(
            decide_throttle(now + Duration::from_secs(5), Some(now), min_interval),
            ThrottleDecision::TooSoon
        );
    }

    #[tokio::test]
    async fn register_submission_evicts_oldest_at_capacity() {
        let mut config = test_runtime_config();
        config.max_tracked_clients = 16;
        // A long interval so the seeded entries never expire during the test.
        config.min_interval = Duration::from_secs(3_600);
        let state = AppState {
            recent_submissions: Arc::new(RwLock::new(HashMap::new())),
            config,
        };

        let base = Instant::now();
        {
            let mut recent = state.recent_submissions.write().await;
            for index in 0..16u64 {
                recent.insert(
                    format!("client-{index}"),
                    base + Duration::from_millis(index),
                );
            }
        }

        let decision = register_submission(&state, "client-overflow").await;
        assert_eq!(decision, ThrottleDecision::Allowed);

        let recent = state.recent_submissions.read().await;
        assert_eq!(recent.len(), 16);
        assert!(recent.contains_key("client-overflow"));
        assert!(
            !recent.contains_key("client-0"),
            "oldest entry should have been evicted"
        );
    }

    #[test]
    fn relay_request_matches_the_relay_wire_shape() {
        let clean = CleanSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            feedback: "loved the marquee".to_string(),
        };

        let request = build_relay_request(&clean, "service_x", "template_y", "key_z");
        let encoded = serde_json::to_value(&request).expect("payload serializes");

        assert_eq!(
            encoded,
            serde_json::json!({
                "service_id": "service_x",
                "template_id": "template_y",
                "user_id": "key_z",
                "template_params": {
                    "from_name": "Ada",
                    "reply_to": "ada@example.com",
                    "message": "loved the marquee",
                },
            })
        );
    }

    #[tokio::test]
    async fn unconfigured_relay_reports_a_plain_failure() {
        let config = test_runtime_config();
        let clean = CleanSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            feedback: "hello".to_string(),
        };

        let failure = send_relay_request(&clean, &config)
            .await
            .expect_err("relay is unconfigured");
        assert_eq!(failure.error_class, "relay_unconfigured");
        assert_eq!(failure.failure_reason, Some("validation"));
        assert_eq!(failure.status_code, None);
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "192.0.2.1:5000".parse().expect("valid address");

        assert_eq!(client_key_for(&headers, peer), "203.0.113.7");
        assert_eq!(client_key_for(&HeaderMap::new(), peer), "192.0.2.1");
    }

    #[test]
    fn status_classification_covers_the_relay_failure_modes() {
        assert_eq!(http_status_class(StatusCode::BAD_REQUEST), "4xx");
        assert_eq!(http_status_class(StatusCode::BAD_GATEWAY), "5xx");
        assert_eq!(classify_relay_failure_reason(StatusCode::UNAUTHORIZED), "auth");
        assert_eq!(classify_relay_failure_reason(StatusCode::BAD_REQUEST), "validation");
        assert_eq!(
            classify_relay_failure_reason(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream"
        );
    }
}
