//! Grakn RPC request messages.
//!
//! Request messages are sent from the client to the engine on a `Tx` stream.

use super::concept::{ConceptId, ConceptMethod};
use super::iterator::{IteratorId, Next};

/// Name of a logical database on the engine.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Keyspace {
    /// Keyspace name
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
}

impl Keyspace {
    /// Create a keyspace reference.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// OPEN - first message of every transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Open {
    /// Keyspace the transaction operates on
    #[prost(message, optional, tag = "1")]
    pub keyspace: ::core::option::Option<Keyspace>,
}

/// COMMIT - commit the transaction.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Commit {}

/// EXEC_QUERY - run a Graql query.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecQuery {
    /// Query text, opaque to the driver
    #[prost(string, tag = "1")]
    pub query: ::prost::alloc::string::String,
    /// Inference flag; unset means the engine's default policy applies
    #[prost(bool, optional, tag = "2")]
    pub infer: ::core::option::Option<bool>,
}

/// RUN_CONCEPT_METHOD - run a method against one concept.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunConceptMethod {
    /// Target concept
    #[prost(message, optional, tag = "1")]
    pub id: ::core::option::Option<ConceptId>,
    /// Method to run
    #[prost(message, optional, tag = "2")]
    pub concept_method: ::core::option::Option<ConceptMethod>,
}

/// Envelope of every message the client sends on a `Tx` stream.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxRequest {
    /// Request kind
    #[prost(oneof = "tx_request::Request", tags = "1, 2, 3, 4, 5")]
    pub request: ::core::option::Option<tx_request::Request>,
}

/// Nested types for [`TxRequest`].
pub mod tx_request {
    /// Request kind selector.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Request {
        /// Open the transaction
        #[prost(message, tag = "1")]
        Open(super::Open),
        /// Commit the transaction
        #[prost(message, tag = "2")]
        Commit(super::Commit),
        /// Execute a query
        #[prost(message, tag = "3")]
        ExecQuery(super::ExecQuery),
        /// Advance a result cursor
        #[prost(message, tag = "4")]
        Next(super::Next),
        /// Run a concept method
        #[prost(message, tag = "5")]
        RunConceptMethod(super::RunConceptMethod),
    }
}

impl TxRequest {
    fn with(request: tx_request::Request) -> Self {
        Self {
            request: Some(request),
        }
    }

    /// Create an OPEN request for a keyspace.
    pub fn open(keyspace: impl Into<String>) -> Self {
        Self::with(tx_request::Request::Open(Open {
            keyspace: Some(Keyspace::new(keyspace)),
        }))
    }

    /// Create an EXEC_QUERY request.
    pub fn exec_query(query: impl Into<String>, infer: Option<bool>) -> Self {
        Self::with(tx_request::Request::ExecQuery(ExecQuery {
            query: query.into(),
            infer,
        }))
    }

    /// Create a NEXT request for a result cursor.
    pub fn next(iterator_id: IteratorId) -> Self {
        Self::with(tx_request::Request::Next(Next {
            iterator_id: Some(iterator_id),
        }))
    }

    /// Create a RUN_CONCEPT_METHOD request fetching a concept's label.
    pub fn get_label(concept_id: impl Into<String>) -> Self {
        Self::with(tx_request::Request::RunConceptMethod(RunConceptMethod {
            id: Some(ConceptId::new(concept_id)),
            concept_method: Some(ConceptMethod::get_label()),
        }))
    }

    /// Create a COMMIT request.
    pub fn commit() -> Self {
        Self::with(tx_request::Request::Commit(Commit {}))
    }

    /// Get message name for logging.
    pub fn name(&self) -> &'static str {
        match &self.request {
            Some(tx_request::Request::Open(_)) => "OPEN",
            Some(tx_request::Request::Commit(_)) => "COMMIT",
            Some(tx_request::Request::ExecQuery(_)) => "EXEC_QUERY",
            Some(tx_request::Request::Next(_)) => "NEXT",
            Some(tx_request::Request::RunConceptMethod(_)) => "RUN_CONCEPT_METHOD",
            None => "EMPTY",
        }
    }

    /// Check if this is an EXEC_QUERY request.
    pub fn is_exec_query(&self) -> bool {
        matches!(self.request, Some(tx_request::Request::ExecQuery(_)))
    }

    /// Check if this is a NEXT request.
    pub fn is_next(&self) -> bool {
        matches!(self.request, Some(tx_request::Request::Next(_)))
    }

    /// Check if this is a COMMIT request.
    pub fn is_commit(&self) -> bool {
        matches!(self.request, Some(tx_request::Request::Commit(_)))
    }

    /// Check if this is a RUN_CONCEPT_METHOD request.
    pub fn is_concept_method(&self) -> bool {
        matches!(self.request, Some(tx_request::Request::RunConceptMethod(_)))
    }

    /// Query text of an EXEC_QUERY request.
    pub fn query_text(&self) -> Option<&str> {
        match &self.request {
            Some(tx_request::Request::ExecQuery(exec)) => Some(&exec.query),
            _ => None,
        }
    }
}

/// Unary request dropping a keyspace.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    /// Keyspace to delete
    #[prost(message, optional, tag = "1")]
    pub keyspace: ::core::option::Option<Keyspace>,
}

impl DeleteRequest {
    /// Create a delete request for a keyspace.
    pub fn new(keyspace: impl Into<String>) -> Self {
        Self {
            keyspace: Some(Keyspace::new(keyspace)),
        }
    }
}
