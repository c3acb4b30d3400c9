//! Driver Types
//!
//! 드라이버에서 사용하는 쿼리 및 결과 타입 정의

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Query - 쿼리
// ============================================================================

/// Graql 쿼리 (드라이버는 내용을 해석하지 않음)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// 쿼리 텍스트
    pub text: String,
    /// 추론 여부 (None이면 엔진 기본값)
    pub infer: Option<bool>,
}

impl Query {
    /// 새 쿼리 생성
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            infer: None,
        }
    }

    /// 추론 여부 설정
    pub fn with_infer(mut self, infer: bool) -> Self {
        self.infer = Some(infer);
        self
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// ============================================================================
// Concept - 개념
// ============================================================================

/// 결과에 바인딩된 개념
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// 개념 ID
    pub id: String,
    /// 레이블 (타입, 역할, 규칙만)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Concept {
    /// ID만 가진 개념 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    /// 레이블 설정
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}({})", label, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

// ============================================================================
// Answer - 쿼리 결과 요소
// ============================================================================

/// 쿼리 결과 요소
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// match 쿼리: 변수 이름 → 개념
    Match(BTreeMap<String, Concept>),
    /// 그 외 쿼리 (insert/delete/aggregate 등): 디코딩된 값
    Other(serde_json::Value),
}

impl Answer {
    /// 변수로 개념 가져오기
    pub fn get(&self, var: &str) -> Option<&Concept> {
        match self {
            Answer::Match(bindings) => bindings.get(var),
            Answer::Other(_) => None,
        }
    }

    /// 바인딩 (match 결과만)
    pub fn bindings(&self) -> Option<&BTreeMap<String, Concept>> {
        match self {
            Answer::Match(bindings) => Some(bindings),
            Answer::Other(_) => None,
        }
    }

    /// 값 (match 외 결과만)
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Answer::Match(_) => None,
            Answer::Other(value) => Some(value),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Match(bindings) => {
                let pairs: Vec<String> = bindings
                    .iter()
                    .map(|(var, concept)| format!("${}: {}", var, concept))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Answer::Other(value) => write!(f, "{}", value),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
