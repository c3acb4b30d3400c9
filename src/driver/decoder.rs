//! Result Decoder
//!
//! 엔진 응답(QueryResult)을 드라이버 결과(Answer)로 변환

use std::collections::BTreeMap;
use std::future::Future;

use crate::rpc::{self, query_result, BaseType};

use super::error::{DriverError, DriverResult};
use super::types::{Answer, Concept};

// ============================================================================
// LabelResolver - 레이블 조회
// ============================================================================

/// 개념 레이블 조회
///
/// 트랜잭션이 구현한다. 조회는 같은 트랜잭션 스트림에서 요청/응답 한 쌍으로 이루어지므로
/// `&mut self`를 받아 다른 교환과 겹치지 않게 한다.
pub trait LabelResolver: Send {
    /// 개념의 레이블 조회
    fn resolve_label(&mut self, concept_id: &str) -> impl Future<Output = DriverResult<String>> + Send;
}

// ============================================================================
// Decoding
// ============================================================================

/// 결과 요소 하나를 디코딩
///
/// 레이블이 있는 종류의 개념마다 `resolver`로 왕복 한 번을 수행한다.
pub async fn decode_query_result<R: LabelResolver>(
    resolver: &mut R,
    result: rpc::QueryResult,
) -> DriverResult<Answer> {
    match result.query_result {
        Some(query_result::QueryResult::Answer(answer)) => {
            let mut bindings = BTreeMap::new();
            for (var, concept) in answer.answer {
                let concept = decode_concept(resolver, concept).await?;
                bindings.insert(var, concept);
            }
            Ok(Answer::Match(bindings))
        }
        Some(query_result::QueryResult::OtherResult(json)) => {
            let value = serde_json::from_str(&json)?;
            Ok(Answer::Other(value))
        }
        None => Err(DriverError::protocol("QUERY_RESULT without payload")),
    }
}

/// 개념 하나를 디코딩
async fn decode_concept<R: LabelResolver>(
    resolver: &mut R,
    concept: rpc::Concept,
) -> DriverResult<Concept> {
    let id = concept
        .id
        .map(|id| id.value)
        .ok_or_else(|| DriverError::protocol("concept without id"))?;

    let base_type = BaseType::try_from(concept.base_type).map_err(|_| {
        DriverError::protocol(format!("unknown base type {} for concept {}", concept.base_type, id))
    })?;

    if base_type.has_label() {
        let label = resolver.resolve_label(&id).await?;
        Ok(Concept::new(id).with_label(label))
    } else {
        Ok(Concept::new(id))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{tx_response, TxResponse};
    use serde_json::json;
    use std::collections::HashMap;

    /// 고정된 레이블을 돌려주고 조회 기록을 남기는 resolver
    #[derive(Default)]
    struct FakeResolver {
        labels: HashMap<String, String>,
        lookups: Vec<String>,
    }

    impl FakeResolver {
        fn with_label(mut self, id: &str, label: &str) -> Self {
            self.labels.insert(id.to_string(), label.to_string());
            self
        }
    }

    impl LabelResolver for FakeResolver {
        async fn resolve_label(&mut self, concept_id: &str) -> DriverResult<String> {
            self.lookups.push(concept_id.to_string());
            self.labels
                .get(concept_id)
                .cloned()
                .ok_or_else(|| DriverError::domain("NOT_FOUND", concept_id))
        }
    }

    fn query_result(response: TxResponse) -> rpc::QueryResult {
        match response.response {
            Some(tx_response::Response::QueryResult(result)) => result,
            _ => unreachable!(),
        }
    }

    fn binding(var: &str, id: &str, base_type: BaseType) -> (String, rpc::Concept) {
        (var.to_string(), rpc::Concept::new(id, base_type))
    }

    #[tokio::test]
    async fn test_label_bearing_concept_gets_label() {
        let mut resolver = FakeResolver::default().with_label("b", "entity");
        let result = query_result(TxResponse::answer(vec![binding("x", "b", BaseType::EntityType)]));

        let answer = decode_query_result(&mut resolver, result).await.unwrap();

        assert_eq!(answer.get("x"), Some(&Concept::new("b").with_label("entity")));
        assert_eq!(resolver.lookups, vec!["b"]);
    }

    #[tokio::test]
    async fn test_instances_and_meta_types_skip_label_lookup() {
        let mut resolver = FakeResolver::default();
        let result = query_result(TxResponse::answer(vec![
            binding("e", "e1", BaseType::Entity),
            binding("m", "m1", BaseType::MetaType),
            binding("r", "r1", BaseType::Relationship),
        ]));

        let answer = decode_query_result(&mut resolver, result).await.unwrap();

        assert_eq!(answer.get("e"), Some(&Concept::new("e1")));
        assert_eq!(answer.get("m"), Some(&Concept::new("m1")));
        assert!(resolver.lookups.is_empty());
    }

    #[tokio::test]
    async fn test_lookups_follow_variable_order() {
        let mut resolver = FakeResolver::default()
            .with_label("t1", "person")
            .with_label("t2", "marriage");
        let result = query_result(TxResponse::answer(vec![
            binding("y", "t2", BaseType::RelationshipType),
            binding("x", "t1", BaseType::EntityType),
        ]));

        decode_query_result(&mut resolver, result).await.unwrap();
        assert_eq!(resolver.lookups, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_other_result_is_decoded_as_json() {
        let mut resolver = FakeResolver::default();
        let result = query_result(TxResponse::other_result(r#"{"count": 3}"#));

        let answer = decode_query_result(&mut resolver, result).await.unwrap();
        assert_eq!(answer, Answer::Other(json!({"count": 3})));
    }

    #[tokio::test]
    async fn test_invalid_other_result_is_serialization_error() {
        let mut resolver = FakeResolver::default();
        let result = query_result(TxResponse::other_result("{oops"));

        let err = decode_query_result(&mut resolver, result).await.unwrap_err();
        assert!(matches!(err, DriverError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_missing_payload_is_protocol_error() {
        let mut resolver = FakeResolver::default();
        let result = rpc::QueryResult { query_result: None };

        let err = decode_query_result(&mut resolver, result).await.unwrap_err();
        assert!(matches!(err, DriverError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_concept_without_id_is_protocol_error() {
        let mut resolver = FakeResolver::default();
        let concept = rpc::Concept {
            id: None,
            base_type: BaseType::Entity as i32,
        };
        let result = query_result(TxResponse::answer(vec![("x".to_string(), concept)]));

        let err = decode_query_result(&mut resolver, result).await.unwrap_err();
        assert!(matches!(err, DriverError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_label_lookup_error_propagates() {
        let mut resolver = FakeResolver::default();
        let result = query_result(TxResponse::answer(vec![binding("x", "t9", BaseType::Rule)]));

        let err = decode_query_result(&mut resolver, result).await.unwrap_err();
        assert!(err.is_domain());
    }
}
