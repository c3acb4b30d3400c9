//! Grakn RPC response messages.
//!
//! Response messages are sent from the engine to the client, one per request,
//! in request order.

use std::collections::BTreeMap;

use super::concept::{Concept, ConceptResponse};
use super::iterator::IteratorId;

/// DONE - acknowledgment, or exhaustion of a result cursor.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Done {}

/// Variable bindings of one match answer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Answer {
    /// Variable name to bound concept
    #[prost(btree_map = "string, message", tag = "1")]
    pub answer: ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, Concept>,
}

/// One element of a result cursor.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResult {
    /// Result payload
    #[prost(oneof = "query_result::QueryResult", tags = "1, 2")]
    pub query_result: ::core::option::Option<query_result::QueryResult>,
}

/// Nested types for [`QueryResult`].
pub mod query_result {
    /// Result payload selector.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum QueryResult {
        /// Variable bindings (match queries)
        #[prost(message, tag = "1")]
        Answer(super::Answer),
        /// JSON-encoded value for every other query kind
        #[prost(string, tag = "2")]
        OtherResult(::prost::alloc::string::String),
    }
}

/// Envelope of every message the engine sends on a `Tx` stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxResponse {
    /// Response kind
    #[prost(oneof = "tx_response::Response", tags = "1, 2, 3, 4")]
    pub response: ::core::option::Option<tx_response::Response>,
}

/// Nested types for [`TxResponse`].
pub mod tx_response {
    /// Response kind selector.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        /// Result cursor element
        #[prost(message, tag = "1")]
        QueryResult(super::QueryResult),
        /// Acknowledgment or cursor exhaustion
        #[prost(message, tag = "2")]
        Done(super::Done),
        /// Concept method answer
        #[prost(message, tag = "3")]
        ConceptResponse(super::ConceptResponse),
        /// Handle of a freshly opened result cursor
        #[prost(message, tag = "4")]
        IteratorId(super::IteratorId),
    }
}

impl TxResponse {
    fn with(response: tx_response::Response) -> Self {
        Self {
            response: Some(response),
        }
    }

    /// Create a DONE response.
    pub fn done() -> Self {
        Self::with(tx_response::Response::Done(Done {}))
    }

    /// Create an ITERATOR_ID response.
    pub fn iterator(id: i32) -> Self {
        Self::with(tx_response::Response::IteratorId(IteratorId::new(id)))
    }

    /// Create a QUERY_RESULT response carrying variable bindings.
    pub fn answer(bindings: impl IntoIterator<Item = (String, Concept)>) -> Self {
        let answer: BTreeMap<String, Concept> = bindings.into_iter().collect();
        Self::with(tx_response::Response::QueryResult(QueryResult {
            query_result: Some(query_result::QueryResult::Answer(Answer { answer })),
        }))
    }

    /// Create a QUERY_RESULT response carrying a JSON value.
    pub fn other_result(json: impl Into<String>) -> Self {
        Self::with(tx_response::Response::QueryResult(QueryResult {
            query_result: Some(query_result::QueryResult::OtherResult(json.into())),
        }))
    }

    /// Create a CONCEPT_RESPONSE carrying a label.
    pub fn label(value: impl Into<String>) -> Self {
        Self::with(tx_response::Response::ConceptResponse(ConceptResponse::label(value)))
    }

    /// Get message name for logging.
    pub fn name(&self) -> &'static str {
        match &self.response {
            Some(tx_response::Response::QueryResult(_)) => "QUERY_RESULT",
            Some(tx_response::Response::Done(_)) => "DONE",
            Some(tx_response::Response::ConceptResponse(_)) => "CONCEPT_RESPONSE",
            Some(tx_response::Response::IteratorId(_)) => "ITERATOR_ID",
            None => "EMPTY",
        }
    }

    /// Check if this is a DONE response.
    pub fn is_done(&self) -> bool {
        matches!(self.response, Some(tx_response::Response::Done(_)))
    }
}

/// Unary response to a keyspace deletion.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct DeleteResponse {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::message::concept::BaseType;
    use prost::Message;

    #[test]
    fn test_response_names() {
        assert_eq!(TxResponse::done().name(), "DONE");
        assert_eq!(TxResponse::iterator(5).name(), "ITERATOR_ID");
        assert_eq!(TxResponse::other_result("{}").name(), "QUERY_RESULT");
        assert_eq!(TxResponse::label("person").name(), "CONCEPT_RESPONSE");
        assert_eq!(TxResponse::default().name(), "EMPTY");
    }

    #[test]
    fn test_is_done() {
        assert!(TxResponse::done().is_done());
        assert!(!TxResponse::iterator(1).is_done());
    }

    #[test]
    fn test_answer_bindings_are_ordered_by_variable() {
        let response = TxResponse::answer(vec![
            ("y".to_string(), Concept::new("b", BaseType::Entity)),
            ("x".to_string(), Concept::new("a", BaseType::Entity)),
        ]);

        let decoded = TxResponse::decode(response.encode_to_vec().as_slice()).unwrap();
        match decoded.response {
            Some(tx_response::Response::QueryResult(QueryResult {
                query_result: Some(query_result::QueryResult::Answer(answer)),
            })) => {
                let vars: Vec<&str> = answer.answer.keys().map(String::as_str).collect();
                assert_eq!(vars, vec!["x", "y"]);
            }
            other => panic!("Expected answer, got {:?}", other),
        }
    }
}
