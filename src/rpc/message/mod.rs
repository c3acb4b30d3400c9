//! Grakn RPC messages.
//!
//! Messages are split by direction:
//!
//! - [`request`] - client to engine (`TxRequest` and its kinds)
//! - [`response`] - engine to client (`TxResponse` and its kinds)
//! - [`concept`] - concept identifiers, base types and concept methods
//! - [`iterator`] - result cursor handles shared by both directions

pub mod concept;
pub mod iterator;
pub mod request;
pub mod response;

pub use concept::{BaseType, Concept, ConceptId, ConceptMethod, ConceptResponse, Label, Unit};
pub use iterator::{IteratorId, Next};
pub use request::{
    Commit, DeleteRequest, ExecQuery, Keyspace, Open, RunConceptMethod, TxRequest,
};
pub use response::{Answer, DeleteResponse, Done, QueryResult, TxResponse};

/// Nested oneof types, re-exported under the names the envelopes use.
pub use concept::{concept_method, concept_response};
pub use request::tx_request;
pub use response::{query_result, tx_response};
