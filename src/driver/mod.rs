//! Driver Module
//!
//! 클라이언트 SDK (Rust 드라이버)
//!
//! # 구성
//!
//! - 클라이언트 (Client, ClientConfig, ServerAddress)
//! - 트랜잭션 (Transaction, TransactionContext)
//! - 요청 채널 (RequestChannel, RequestStream)
//! - 결과 디코딩 (LabelResolver, Answer, Concept)
//! - 전송 계층 (TxTransport, GrpcTransport, MemoryTransport)
//! - HTTP 클라이언트 (HttpClient)
//!
//! # Example
//!
//! ```ignore
//! use grakn_driver::driver::Client;
//!
//! // 엔진 연결 (바로 연결하고, 실패하면 연결 에러)
//! let client = Client::connect("localhost:48555", "grakn").await?;
//!
//! // 쿼리 하나 실행 후 커밋
//! let answers = client.execute("match $x sub concept; limit 3;").await?;
//! for answer in &answers {
//!     println!("{}", answer);
//! }
//!
//! // 트랜잭션 하나에서 여러 쿼리
//! let mut tx = client.open().await?;
//! tx.execute("insert $x isa person;").await?;
//! tx.execute("match $x isa person; get;").await?;
//! tx.commit().await?;
//! tx.close().await;
//! ```

pub mod memory;
mod channel;
mod client;
mod context;
mod decoder;
mod error;
mod http;
mod transaction;
mod transport;
mod types;

// Re-exports
pub use channel::{RequestChannel, RequestStream};
pub use client::{
    Client, ClientConfig, ClientConfigBuilder, ServerAddress, TransactionRunner,
    DEFAULT_ADDRESS, DEFAULT_CONNECT_TIMEOUT, DEFAULT_KEYSPACE,
};
pub use context::TransactionContext;
pub use decoder::{decode_query_result, LabelResolver};
pub use error::{DriverError, DriverResult, ERROR_TYPE_METADATA_KEY};
pub use http::{HttpClient, DEFAULT_HTTP_URI, GRAQL_JSON};
pub use memory::{MemoryTransport, Reply, ScriptedReply};
pub use transaction::{Transaction, TransactionState};
pub use transport::{GrpcTransport, ResponseStream, TxTransport};
pub use types::{Answer, Concept, Query};
