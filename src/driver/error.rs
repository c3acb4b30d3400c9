//! Driver Error Types
//!
//! 드라이버 에러 정의 및 전송 계층 실패 변환

use thiserror::Error;
use tonic::{Code, Status};

/// 엔진이 진단 정보를 싣는 trailing metadata 키 (gRPC 메타데이터 키는 소문자)
pub const ERROR_TYPE_METADATA_KEY: &str = "errortype";

/// 원본 전송 에러
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// DriverError - 드라이버 에러
// ============================================================================

/// 드라이버 에러
#[derive(Error, Debug)]
pub enum DriverError {
    /// 도메인 에러 (엔진이 거부하고 이유를 제공함)
    #[error("Grakn error ({error_type}): {message}")]
    Domain {
        /// 엔진이 보고한 에러 종류
        error_type: String,
        /// 엔진이 제공한 메시지
        message: String,
    },

    /// 연결 에러 (엔진 메시지 없음)
    #[error("Connectivity error: {message}")]
    Connectivity {
        /// 설명
        message: String,
        /// 원본 전송 에러
        #[source]
        source: Option<BoxError>,
    },

    /// 프로토콜 위반
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 트랜잭션 상태 에러
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// 닫힌 요청 채널에 push
    #[error("Request channel is closed")]
    ChannelClosed,

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 직렬화 에러
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DriverError {
    /// 도메인 에러 생성
    pub fn domain(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Domain {
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    /// 연결 에러 생성 (원본 에러 없음)
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity {
            message: msg.into(),
            source: None,
        }
    }

    /// 원본 에러를 감싼 연결 에러 생성
    pub fn connectivity_from(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connectivity {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 프로토콜 에러 생성
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// 트랜잭션 에러 생성
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// 설정 에러 생성
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 전송 계층 실패를 도메인/연결 에러로 변환
    ///
    /// 엔진은 스트림을 중단할 때 trailing metadata의 `ErrorType` 키에 에러 종류를,
    /// 상태 메시지에 사람이 읽을 수 있는 이유를 담는다. 키가 없으면 엔진이 설명한
    /// 실패가 아니므로 연결 에러로 취급한다.
    pub fn from_status(status: Status) -> Self {
        let error_type = status
            .metadata()
            .get(ERROR_TYPE_METADATA_KEY)
            .map(|value| value.to_str().unwrap_or_default().to_string());

        match error_type {
            Some(error_type) => Self::Domain {
                error_type,
                message: status.message().to_string(),
            },
            None => Self::Connectivity {
                message: describe_status(&status),
                source: Some(Box::new(status)),
            },
        }
    }

    /// 도메인 에러 여부
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// 연결 에러 여부
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// 엔진이 제공한 메시지 (도메인 에러만)
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Domain { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<Status> for DriverError {
    fn from(status: Status) -> Self {
        Self::from_status(status)
    }
}

/// 상태 코드별 설명
fn describe_status(status: &Status) -> String {
    let reason = match status.code() {
        Code::Unavailable => "engine unavailable",
        Code::DeadlineExceeded => "deadline exceeded",
        Code::Cancelled => "stream cancelled",
        Code::Aborted => "stream aborted",
        _ => "stream failed",
    };

    if status.message().is_empty() {
        format!("{} ({:?})", reason, status.code())
    } else {
        format!("{} ({:?}): {}", reason, status.code(), status.message())
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 드라이버 결과 타입
pub type DriverResult<T> = Result<T, DriverError>;

// ============================================================================
// Tests
// ============================================================================
