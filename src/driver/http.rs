//! HTTP Client
//!
//! 트랜잭션 없는 HTTP 인터페이스: 요청 하나에 응답 하나
//!
//! 쿼리는 `POST {uri}/kb/graql/execute`의 본문으로 보내고, 성공하면 JSON 본문을 결과로,
//! 실패하면 본문의 `exception` 필드를 도메인 에러 메시지로 돌려준다.

use std::fmt;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;

use super::client::{TransactionRunner, DEFAULT_KEYSPACE};
use super::error::{DriverError, DriverResult};
use super::types::{Answer, Query};

/// 기본 HTTP 엔진 URI
pub const DEFAULT_HTTP_URI: &str = "http://localhost:4567";

/// Graql JSON 응답 형식
pub const GRAQL_JSON: &str = "application/graql+json";

const EXECUTE_PATH: &str = "/kb/graql/execute";

/// HTTP 클라이언트
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    uri: String,
    keyspace: String,
}

impl HttpClient {
    /// 새 클라이언트 생성
    ///
    /// `uri`는 스킴을 포함해야 한다 (`http://host:port`).
    pub fn new(uri: impl Into<String>, keyspace: impl Into<String>) -> DriverResult<Self> {
        Self::with_http_client(reqwest::Client::new(), uri, keyspace)
    }

    /// 미리 구성한 reqwest 클라이언트로 생성 (프록시, 타임아웃 등)
    pub fn with_http_client(
        http: reqwest::Client,
        uri: impl Into<String>,
        keyspace: impl Into<String>,
    ) -> DriverResult<Self> {
        let uri = uri.into();
        let keyspace = keyspace.into();

        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return Err(DriverError::configuration(format!(
                "HTTP uri must start with http:// or https://: {}",
                uri
            )));
        }
        if keyspace.is_empty() {
            return Err(DriverError::configuration("Keyspace must not be empty"));
        }

        Ok(Self {
            http,
            uri: uri.trim_end_matches('/').to_string(),
            keyspace,
        })
    }

    /// 엔진 URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// 키스페이스
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// 쿼리 실행
    pub async fn execute(&self, query: impl Into<Query>) -> DriverResult<Vec<Answer>> {
        let query = query.into();
        let url = format!("{}{}", self.uri, EXECUTE_PATH);
        let infer = if query.infer.unwrap_or(false) { "true" } else { "false" };

        let response = self
            .http
            .post(&url)
            .query(&[
                ("keyspace", self.keyspace.as_str()),
                ("infer", infer),
                ("materialise", "false"),
            ])
            .header(ACCEPT, GRAQL_JSON)
            .body(query.text.clone())
            .send()
            .await
            .map_err(|e| DriverError::connectivity_from(format!("Failed to reach {}", url), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DriverError::connectivity_from("Failed to read response body", e))?;

        tracing::debug!(query = %query, status = status.as_u16(), "http query executed");

        if status.is_success() {
            decode_body(&body)
        } else {
            Err(rejection(status, &body))
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self {
            http: reqwest::Client::new(),
            uri: DEFAULT_HTTP_URI.to_string(),
            keyspace: DEFAULT_KEYSPACE.to_string(),
        }
    }
}

impl TransactionRunner for HttpClient {
    async fn execute(&self, query: Query) -> DriverResult<Vec<Answer>> {
        HttpClient::execute(self, query).await
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("uri", &self.uri)
            .field("keyspace", &self.keyspace)
            .finish()
    }
}

/// 성공 응답 본문 디코딩
///
/// 배열은 요소마다 결과 하나, `null`이나 빈 본문은 결과 없음, 그 외는 결과 하나.
fn decode_body(body: &str) -> DriverResult<Vec<Answer>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let answers = match serde_json::from_str(body)? {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(items) => items.into_iter().map(Answer::Other).collect(),
        value => vec![Answer::Other(value)],
    };
    Ok(answers)
}

/// 실패 응답을 도메인 에러로 변환
fn rejection(status: StatusCode, body: &str) -> DriverError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("exception").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string());

    DriverError::domain(format!("HTTP {}", status.as_u16()), message)
}

// ============================================================================
// Tests
// ============================================================================
