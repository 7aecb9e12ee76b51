use crate::feed::{parse_entries, FeedEntry, FEED_USER};
use crate::telemetry::{LogLevel, Logger};
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::{sync::RwLock, time::Instant};
use tower_http::services::{ServeDir, ServeFile};
use url::Url;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FEED_UPSTREAM_BASE: &str = "https://api.github.com/";
const DEFAULT_FEED_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_FEED_CACHE_MAX_ENTRIES: usize = 32;
const DEFAULT_FEED_RESPONSE_MAX_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_FEED_REQUEST_TIMEOUT_MS: u64 = 6_000;
const DEFAULT_FEED_CONNECT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

const FEED_CACHE_TTL_SECONDS_BOUNDS: (u64, u64) = (1, 86_400);
const FEED_CACHE_MAX_ENTRIES_BOUNDS: (usize, usize) = (1, 1_000);
const FEED_RESPONSE_MAX_BYTES_BOUNDS: (usize, usize) = (1_024, 16 * 1024 * 1024);
const FEED_REQUEST_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 120_000);
const FEED_CONNECT_TIMEOUT_MS_BOUNDS: (u64, u64) = (100, 30_000);

const PER_PAGE_BOUNDS: (u32, u32) = (1, 100);
const DEFAULT_PER_PAGE: u32 = 100;
const SORT_KEYS: [&str; 4] = ["updated", "pushed", "created", "full_name"];
const DEFAULT_SORT: &str = "updated";

const USER_AGENT: &str = "devfolio-feed-proxy/1.0";
const GITHUB_JSON: &str = "application/vnd.github+json";
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
struct FeedRuntimeConfig {
    feed_user: String,
    upstream_base: Url,
    token: Option<String>,
    cache_ttl_seconds: u64,
    cache_max_entries: usize,
    response_max_bytes: usize,
    request_timeout: Duration,
    connect_timeout: Duration,
    log_level: LogLevel,
}

impl FeedRuntimeConfig {
    fn from_env() -> Result<Self, url::ParseError> {
        let upstream_base = match parse_env_http_url("FEED_UPSTREAM_BASE") {
            Some(url) => with_trailing_slash(url),
            None => Url::parse(DEFAULT_FEED_UPSTREAM_BASE)?,
        };

        Ok(Self {
            feed_user: parse_env_non_empty_string("FEED_USER")
                .unwrap_or_else(|| FEED_USER.to_string()),
            upstream_base,
            token: parse_env_non_empty_string("FEED_TOKEN"),
            cache_ttl_seconds: parse_env_u64_with_bounds(
                "FEED_CACHE_TTL_SECONDS",
                DEFAULT_FEED_CACHE_TTL_SECONDS,
                FEED_CACHE_TTL_SECONDS_BOUNDS,
            ),
            cache_max_entries: parse_env_usize_with_bounds(
                "FEED_CACHE_MAX_ENTRIES",
                DEFAULT_FEED_CACHE_MAX_ENTRIES,
                FEED_CACHE_MAX_ENTRIES_BOUNDS,
            ),
            response_max_bytes: parse_env_usize_with_bounds(
                "FEED_RESPONSE_MAX_BYTES",
                DEFAULT_FEED_RESPONSE_MAX_BYTES,
                FEED_RESPONSE_MAX_BYTES_BOUNDS,
            ),
            request_timeout: Duration::from_millis(parse_env_u64_with_bounds(
                "FEED_REQUEST_TIMEOUT_MS",
                DEFAULT_FEED_REQUEST_TIMEOUT_MS,
                FEED_REQUEST_TIMEOUT_MS_BOUNDS,
            )),
            connect_timeout: Duration::from_millis(parse_env_u64_with_bounds(
                "FEED_CONNECT_TIMEOUT_MS",
                DEFAULT_FEED_CONNECT_TIMEOUT_MS,
                FEED_CONNECT_TIMEOUT_MS_BOUNDS,
            )),
            log_level: parse_env_non_empty_string("LOG_LEVEL")
                .and_then(|value| LogLevel::parse(&value))
                .unwrap_or(DEFAULT_LOG_LEVEL),
        })
    }

    fn repos_url(&self, query: &FeedQuery) -> Option<Url> {
        let mut url = self
            .upstream_base
            .join(&format!("users/{}/repos", self.feed_user))
            .ok()?;
        url.query_pairs_mut()
            .append_pair("per_page", &query.per_page.to_string())
            .append_pair("sort", query.sort);
        Some(url)
    }
}

#[derive(Clone)]
pub struct AppState {
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
    client: reqwest::Client,
    config: FeedRuntimeConfig,
    logger: Logger,
}

#[derive(Clone)]
struct CacheEntry {
    created_at: Instant,
    expires_at: Instant,
    value: Vec<FeedEntry>,
}

#[derive(Deserialize)]
struct RawFeedQuery {
    per_page: Option<String>,
    sort: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FeedQuery {
    per_page: u32,
    sort: &'static str,
}

impl FeedQuery {
    fn normalize(raw: &RawFeedQuery) -> Result<Self, &'static str> {
        let per_page = match raw.per_page.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_PER_PAGE,
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|value| (PER_PAGE_BOUNDS.0..=PER_PAGE_BOUNDS.1).contains(value))
                .ok_or("per_page must be between 1 and 100")?,
        };
        let sort = match raw.sort.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_SORT,
            Some(value) => SORT_KEYS
                .into_iter()
                .find(|key| key.eq_ignore_ascii_case(value))
                .ok_or("unsupported sort key")?,
        };

        Ok(Self { per_page, sort })
    }

    fn cache_key(&self) -> String {
        format!("per_page={}&sort={}", self.per_page, self.sort)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UpstreamError {
    InvalidUrl,
    Request,
    Status(u16),
    TooLarge,
    Malformed,
}

impl UpstreamError {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_upstream_url",
            Self::Request => "request_failed",
            Self::Status(_) => "upstream_status",
            Self::TooLarge => "response_too_large",
            Self::Malformed => "malformed_payload",
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let bind_address = format!("0.0.0.0:{port}");
    let config = FeedRuntimeConfig::from_env()?;
    let client = build_feed_client(&config)?;
    let logger = Logger::new(config.log_level);
    let feed_user = config.feed_user.clone();

    let state = AppState {
        cache: Arc::new(RwLock::new(HashMap::new())),
        client,
        config,
        logger,
    };

    let app = build_router(state, "dist");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    logger.info(
        "server_listening",
        serde_json::json!({ "address": bind_address, "feed_user": feed_user }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, dist_dir: &str) -> Router {
    let static_service = ServeDir::new(dist_dir)
        .not_found_service(ServeFile::new(format!("{dist_dir}/index.html")));

    Router::new()
        .route("/api/repos", get(get_repos))
        .fallback_service(static_service)
        .layer(middleware::from_fn(attach_request_id))
        .with_state(state)
}

/// Static responses get the same `x-request-id` the feed handler sets itself.
async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    let mut response = next.run(request).await;

    if !response.headers().contains_key(REQUEST_ID_HEADER) {
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
    }

    response
}

async fn get_repos(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(raw_query): Query<RawFeedQuery>,
) -> impl IntoResponse {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    state.logger.info(
        "feed_request_start",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "method": method.as_str(),
            "path": uri.path(),
        }),
    );

    let query = match FeedQuery::normalize(&raw_query) {
        Ok(query) => query,
        Err(message) => {
            state.logger.info(
                "feed_request_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": "invalid_query",
                    "message": message,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            return error_response(StatusCode::BAD_REQUEST, message, &request_id);
        }
    };

    let cache_key = query.cache_key();
    if let Some(entries) = read_from_cache(&state, &cache_key).await {
        state.logger.info(
            "feed_request_complete",
            serde_json::json!({
                "request_id": request_id.as_str(),
                "status": StatusCode::OK.as_u16(),
                "cache": "hit",
                "count": entries.len(),
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        return entries_response(entries, state.config.cache_ttl_seconds, &request_id);
    }

    match fetch_upstream_entries(&state, &query).await {
        Ok(entries) => {
            write_to_cache(&state, cache_key, entries.clone()).await;
            state.logger.info(
                "feed_request_complete",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "status": StatusCode::OK.as_u16(),
                    "cache": "miss",
                    "count": entries.len(),
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            entries_response(entries, state.config.cache_ttl_seconds, &request_id)
        }
        Err(error) => {
            let upstream_status = match error {
                UpstreamError::Status(code) => Some(code),
                _ => None,
            };
            state.logger.info(
                "feed_request_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": error.as_str(),
                    "upstream_status": upstream_status,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            error_response(StatusCode::BAD_GATEWAY, error.as_str(), &request_id)
        }
    }
}

async fn fetch_upstream_entries(
    state: &AppState,
    query: &FeedQuery,
) -> Result<Vec<FeedEntry>, UpstreamError> {
    let url = state
        .config
        .repos_url(query)
        .ok_or(UpstreamError::InvalidUrl)?;

    state.logger.debug(
        "feed_upstream_fetch",
        serde_json::json!({ "url": url.as_str(), "authenticated": state.config.token.is_some() }),
    );

    let mut request = state.client.get(url).header(ACCEPT, GITHUB_JSON);
    if let Some(token) = state.config.token.as_deref() {
        request = request.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = request.send().await.map_err(|_| UpstreamError::Request)?;
    if !response.status().is_success() {
        return Err(UpstreamError::Status(response.status().as_u16()));
    }

    let body = read_limited_body(response, state.config.response_max_bytes).await?;
    parse_entries(&body).map_err(|_| UpstreamError::Malformed)
}

async fn read_limited_body(
    response: reqwest::Response,
    max_response_bytes: usize,
) -> Result<Vec<u8>, UpstreamError> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::with_capacity(16 * 1024);

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|_| UpstreamError::Request)?;

        if body.len() + chunk.len() > max_response_bytes {
            return Err(UpstreamError::TooLarge);
        }

        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

async fn read_from_cache(state: &AppState, key: &str) -> Option<Vec<FeedEntry>> {
    let now = Instant::now();
    {
        let cache = state.cache.read().await;
        let entry = cache.get(key)?;

        if entry.expires_at > now {
            return Some(entry.value.clone());
        }
    }

    let mut cache = state.cache.write().await;
    purge_expired_entries(&mut cache, now);
    None
}

async fn write_to_cache(state: &AppState, key: String, value: Vec<FeedEntry>) {
    let now = Instant::now();
    let mut cache = state.cache.write().await;

    purge_expired_entries(&mut cache, now);

    if !cache.contains_key(&key) && cache.len() >= state.config.cache_max_entries {
        evict_oldest_entry(&mut cache);
    }

    cache.insert(
        key,
        CacheEntry {
            created_at: now,
            expires_at: now + Duration::from_secs(state.config.cache_ttl_seconds),
            value,
        },
    );
}

fn purge_expired_entries(cache: &mut HashMap<String, CacheEntry>, now: Instant) {
    cache.retain(|_, entry| entry.expires_at > now);
}

fn evict_oldest_entry(cache: &mut HashMap<String, CacheEntry>) {
    let Some(key_to_remove) = cache
        .iter()
        .min_by_key(|(_, entry)| entry.created_at)
        .map(|(key, _)| key.clone())
    else {
        return;
    };

    cache.remove(&key_to_remove);
}

fn build_feed_client(config: &FeedRuntimeConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(USER_AGENT)
        .build()
}

fn entries_response(
    entries: Vec<FeedEntry>,
    max_age_seconds: u64,
    request_id: &str,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        cache_control(&format!("public, max-age={max_age_seconds}")),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    response_with_request_id(StatusCode::OK, headers, Json(entries), request_id)
}

fn error_response(status: StatusCode, message: &str, request_id: &str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response_with_request_id(
        status,
        headers,
        Json(serde_json::json!({ "error": message })),
        request_id,
    )
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

fn response_with_request_id(
    status: StatusCode,
    mut headers: HeaderMap,
    payload: impl IntoResponse,
    request_id: &str,
) -> Response {
    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }
    (status, headers, payload).into_response()
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    parse_bounded(std::env::var(name).ok().as_deref(), default, bounds)
}

fn parse_env_usize_with_bounds(name: &str, default: usize, bounds: (usize, usize)) -> usize {
    parse_bounded(std::env::var(name).ok().as_deref(), default, bounds)
}

fn parse_bounded<T>(raw: Option<&str>, default: T, bounds: (T, T)) -> T
where
    T: std::str::FromStr + PartialOrd,
{
    raw.and_then(|value| value.trim().parse::<T>().ok())
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

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
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

#[cfg(test)]
mod tests {
    use super::*;

    fn test_runtime_config() -> FeedRuntimeConfig {
        FeedRuntimeConfig {
            feed_user: "octocat".to_string(),
            upstream_base: Url::parse("https://api.github.com/").expect("valid URL"),
            token: None,
            cache_ttl_seconds: DEFAULT_FEED_CACHE_TTL_SECONDS,
            cache_max_entries: 4,
            response_max_bytes: DEFAULT_FEED_RESPONSE_MAX_BYTES,
            request_timeout: Duration::from_millis(DEFAULT_FEED_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_FEED_CONNECT_TIMEOUT_MS),
            log_level: LogLevel::Debug,
        }
    }

    fn test_state() -> AppState {
        let config = test_runtime_config();
        AppState {
            cache: Arc::new(RwLock::new(HashMap::new())),
            client: reqwest::Client::new(),
            logger: Logger::new(config.log_level),
            config,
        }
    }

    fn sample_entries(name: &str) -> Vec<FeedEntry> {
        vec![FeedEntry {
            id: 1,
            name: name.to_string(),
            description: None,
            stargazers_count: 3,
            forks_count: 0,
            language: None,
            pushed_at: None,
            html_url: format!("https://github.com/octocat/{name}"),
        }]
    }

    fn raw(per_page: Option<&str>, sort: Option<&str>) -> RawFeedQuery {
        RawFeedQuery {
            per_page: per_page.map(ToString::to_string),
            sort: sort.map(ToString::to_string),
        }
    }

    #[test]
    fn query_defaults_and_normalizes() {
        assert_eq!(
            FeedQuery::normalize(&raw(None, None)),
            Ok(FeedQuery {
                per_page: 100,
                sort: "updated"
            })
        );
        assert_eq!(
            FeedQuery::normalize(&raw(Some(" 30 "), Some("PUSHED"))).map(|query| query.cache_key()),
            Ok("per_page=30&sort=pushed".to_string())
        );
    }

    #[test]
    fn query_out_of_bounds_is_rejected() {
        assert!(FeedQuery::normalize(&raw(Some("0"), None)).is_err());
        assert!(FeedQuery::normalize(&raw(Some("101"), None)).is_err());
        assert!(FeedQuery::normalize(&raw(None, Some("stars"))).is_err());
    }

    #[test]
    fn upstream_url_targets_user_repos() {
        let config = test_runtime_config();
        let url = config
            .repos_url(&FeedQuery {
                per_page: 100,
                sort: "updated",
            })
            .expect("valid URL");

        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octocat/repos?per_page=100&sort=updated"
        );
    }

    #[test]
    fn base_path_gains_trailing_slash() {
        let url = with_trailing_slash(Url::parse("http://127.0.0.1:9000/github").expect("valid URL"));
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/github/");
    }

    #[test]
    fn bounded_parsing_falls_back_to_default() {
        assert_eq!(parse_bounded(Some("42"), 7_u64, (1, 100)), 42);
        assert_eq!(parse_bounded(Some("420"), 7_u64, (1, 100)), 7);
        assert_eq!(parse_bounded(Some("abc"), 7_usize, (1, 100)), 7);
        assert_eq!(parse_bounded(None, 7_usize, (1, 100)), 7);
    }

    #[test]
    fn request_id_is_echoed_or_generated() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc-123 "));
        assert_eq!(resolve_request_id(&headers), "abc-123");

        assert!(resolve_request_id(&HeaderMap::new()).starts_with("req-"));
    }

    #[tokio::test]
    async fn cache_overwrite_at_capacity_does_not_evict_oldest() {
        let state = test_state();
        let now = Instant::now();

        {
            let mut cache = state.cache.write().await;
            for index in 0..state.config.cache_max_entries {
                cache.insert(
                    format!("key-{index}"),
                    CacheEntry {
                        created_at: now + Duration::from_secs(index as u64),
                        expires_at: now + Duration::from_secs(10_000),
                        value: sample_entries("old"),
                    },
                );
            }
        }

        write_to_cache(&state, "key-2".to_string(), sample_entries("updated")).await;

        let cache = state.cache.read().await;
        assert_eq!(cache.len(), state.config.cache_max_entries);
        assert!(cache.contains_key("key-0"));
        assert_eq!(
            cache.get("key-2").map(|entry| entry.value[0].name.as_str()),
            Some("updated")
        );
    }

    #[tokio::test]
    async fn new_key_at_capacity_evicts_oldest() {
        let state = test_state();
        for index in 0..state.config.cache_max_entries {
            write_to_cache(&state, format!("key-{index}"), sample_entries("entry")).await;
            tokio::time::sleep(Duration::from_millis(2)).await;
        }

        write_to_cache(&state, "fresh".to_string(), sample_entries("fresh")).await;

        let cache = state.cache.read().await;
        assert_eq!(cache.len(), state.config.cache_max_entries);
        assert!(!cache.contains_key("key-0"));
        assert!(cache.contains_key("fresh"));
    }

    fn unreachable_upstream_state() -> AppState {
        let mut state = test_state();
        state.config.upstream_base = Url::parse("http://127.0.0.1:1/").expect("valid URL");
        state
    }

    async fn call_get_repos(
        state: AppState,
        query: RawFeedQuery,
        request_id: Option<&'static str>,
    ) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(request_id) = request_id {
            headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(request_id));
        }

        get_repos(
            State(state),
            Method::GET,
            Uri::from_static("/api/repos"),
            headers,
            Query(query),
        )
        .await
        .into_response()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("readable body");
        serde_json::from_slice(&bytes).expect("JSON body")
    }

    fn request_id_of(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
    }

    #[tokio::test]
    async fn invalid_query_is_rejected_with_json_error() {
        let response = call_get_repos(test_state(), raw(Some("0"), None), Some("req-abc")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(request_id_of(&response), Some("req-abc"));
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "per_page must be between 1 and 100" })
        );
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_bad_gateway() {
        let response = call_get_repos(unreachable_upstream_state(), raw(None, None), None).await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(request_id_of(&response).is_some_and(|id| id.starts_with("req-")));
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "request_failed" })
        );
    }

    #[tokio::test]
    async fn cached_entries_skip_the_upstream() {
        let state = unreachable_upstream_state();
        write_to_cache(&state, "per_page=100&sort=updated".to_string(), sample_entries("cached")).await;

        let response = call_get_repos(state, raw(None, Some("updated")), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["name"], "cached");
    }

    #[tokio::test]
    async fn body_over_the_cap_is_rejected() {
        let oversized = reqwest::Response::from(axum::http::Response::new(vec![b'x'; 64]));
        assert_eq!(
            read_limited_body(oversized, 16).await,
            Err(UpstreamError::TooLarge)
        );

        let fitting = reqwest::Response::from(axum::http::Response::new(b"[]".to_vec()));
        assert_eq!(read_limited_body(fitting, 16).await, Ok(b"[]".to_vec()));
    }

    #[tokio::test]
    async fn every_route_carries_a_request_id() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let address = listener.local_addr().expect("local address");
        let app = build_router(test_state(), "missing-dist-for-tests");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let client = reqwest::Client::new();
        let static_response = client
            .get(format!("http://{address}/no/such/page"))
            .header(REQUEST_ID_HEADER, "req-static")
            .send()
            .await
            .expect("static route answers");
        assert_eq!(
            static_response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("req-static")
        );

        let api_response = client
            .get(format!("http://{address}/api/repos?sort=stars"))
            .send()
            .await
            .expect("api route answers");
        assert_eq!(api_response.status().as_u16(), 400);
        assert!(api_response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn expired_entries_are_not_served() {
        let state = test_state();
        let now = Instant::now();
        state.cache.write().await.insert(
            "per_page=100&sort=updated".to_string(),
            CacheEntry {
                created_at: now,
                expires_at: now,
                value: sample_entries("stale"),
            },
        );

        assert!(read_from_cache(&state, "per_page=100&sort=updated").await.is_none());
        assert!(state.cache.read().await.is_empty());
    }
}
