//! # Grakn Driver
//!
//! A Rust client driver for the Grakn knowledge graph engine, speaking its
//! streaming gRPC transaction protocol.
//!
//! ## Features
//!
//! - **Streaming transactions** - One duplex gRPC stream per transaction, with
//!   strict request/response pairing
//! - **Async/Await** - Built on Tokio; every call completes when its response arrives
//! - **Paginated results** - Result cursors are drained internally and returned as a
//!   complete, ordered sequence
//! - **Label resolution** - Type, role and rule concepts come back with their labels
//! - **HTTP fallback** - The stateless HTTP interface behind the same
//!   [`TransactionRunner`] capability
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! grakn-driver = "0.2"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use grakn_driver::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connects eagerly; an unreachable engine is reported here
//!     let client = Client::connect("localhost:48555", "grakn").await?;
//!
//!     // Open, execute, commit and close in one call
//!     let answers = client.execute("match $x sub concept; limit 3;").await?;
//!     for answer in &answers {
//!         println!("{}", answer);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! For several queries in one transaction, open a context and close it when done:
//!
//! ```rust,no_run
//! # use grakn_driver::Client;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::connect("localhost:48555", "grakn").await?;
//! let mut tx = client.open().await?;
//!
//! tx.execute("insert $x isa person;").await?;
//! let people = tx.execute("match $x isa person; get;").await?;
//!
//! tx.commit().await?;
//! tx.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! Or let the client close it on every exit path:
//!
//! ```rust,no_run
//! # use grakn_driver::Client;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let client = Client::connect("localhost:48555", "grakn").await?;
//! let count = client
//!     .with_transaction(|tx| {
//!         Box::pin(async move {
//!             let answers = tx.execute("match $x isa person; get;").await?;
//!             tx.commit().await?;
//!             Ok(answers.len())
//!         })
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Queries
//!
//! Inference is left to the engine unless set explicitly:
//!
//! ```rust
//! use grakn_driver::Query;
//!
//! let query = Query::new("match $x isa person; get;").with_infer(false);
//! assert_eq!(query.infer, Some(false));
//! ```
//!
//! ## Configuration
//!
//! Customize client behavior with [`ClientConfig`]:
//!
//! ```rust
//! use grakn_driver::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder("localhost:48555", "social_network")
//!     .unwrap()
//!     .with_connect_timeout(Duration::from_secs(2))
//!     .with_user_agent("my-app/1.0")
//!     .build();
//! ```
//!
//! ## Error Handling
//!
//! Failures reported by the engine are [`DriverError::Domain`] and carry its
//! message; failures to talk to it at all are [`DriverError::Connectivity`]:
//!
//! ```rust,no_run
//! # use grakn_driver::{Client, DriverError};
//! # async fn example(client: Client) {
//! match client.execute("match $x isa ;").await {
//!     Ok(answers) => println!("{} answers", answers.len()),
//!     Err(DriverError::Domain { message, .. }) => eprintln!("Rejected: {}", message),
//!     Err(e) if e.is_connectivity() => eprintln!("Engine unreachable: {}", e),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`driver`] - Client, transaction and result types
//! - [`rpc`] - Protocol messages and the gRPC service stub
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod driver;
pub mod rpc;

// Re-exports for convenience
pub use driver::{
    Answer, Client, ClientConfig, ClientConfigBuilder, Concept, DriverError, DriverResult,
    HttpClient, Query, ServerAddress, Transaction, TransactionContext, TransactionRunner,
    TransactionState,
};

/// Config alias for convenience
pub type Config = ClientConfig;
