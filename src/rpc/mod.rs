//! # Grakn RPC Wire Layer
//!
//! Protocol messages and the typed gRPC stub used to talk to a Grakn engine.
//!
//! ## Overview
//!
//! The engine exposes one service, `ai.grakn.rpc.Grakn`, with two methods:
//!
//! - **Tx** - a bidirectional stream carrying one transaction. The client
//!   sends [`TxRequest`] envelopes and the engine answers each one with a
//!   [`TxResponse`] envelope, strictly in order.
//! - **Delete** - a unary call that drops a keyspace.
//!
//! Every envelope is a protobuf message with a single `oneof`; exactly one
//! kind is populated per message.
//!
//! ## Submodules
//!
//! - [`message`] - request, response and concept messages
//! - [`service`] - the gRPC client stub
//!
//! ## Note
//!
//! Most users should use the high-level [`crate::driver`] module instead of
//! interacting with the wire layer directly.

pub mod message;
pub mod service;

pub use message::{
    Answer, BaseType, Commit, Concept, ConceptId, ConceptMethod, ConceptResponse,
    DeleteRequest, DeleteResponse, Done, ExecQuery, IteratorId, Keyspace, Label, Next,
    Open, QueryResult, RunConceptMethod, TxRequest, TxResponse, Unit,
};
pub use message::{concept_method, concept_response, query_result, tx_request, tx_response};
pub use service::GraknClient;
