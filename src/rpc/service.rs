//! gRPC client stub for the `ai.grakn.rpc.Grakn` service.
//!
//! Equivalent to what `tonic-build` emits for the service definition, kept in
//! source so building the crate does not need `protoc`.

use tonic::codegen::{http, Body, Bytes, StdError};

use super::message::{DeleteRequest, DeleteResponse, TxRequest, TxResponse};

/// Fully-qualified service name
pub const SERVICE_NAME: &str = "ai.grakn.rpc.Grakn";

const TX_PATH: &str = "/ai.grakn.rpc.Grakn/Tx";
const DELETE_PATH: &str = "/ai.grakn.rpc.Grakn/Delete";

/// Typed client for the Grakn service.
#[derive(Debug, Clone)]
pub struct GraknClient<T> {
    inner: tonic::client::Grpc<T>,
}

impl<T> GraknClient<T>
where
    T: tonic::client::GrpcService<tonic::body::BoxBody>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    /// Wrap an established channel.
    pub fn new(inner: T) -> Self {
        Self {
            inner: tonic::client::Grpc::new(inner),
        }
    }

    /// Open a transaction stream.
    ///
    /// Resolves once the engine has sent response headers; every
    /// [`TxResponse`] is then read from the returned stream.
    pub async fn tx(
        &mut self,
        request: impl tonic::IntoStreamingRequest<Message = TxRequest>,
    ) -> Result<tonic::Response<tonic::codec::Streaming<TxResponse>>, tonic::Status> {
        self.ready().await?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(TX_PATH);
        self.inner
            .streaming(request.into_streaming_request(), path, codec)
            .await
    }

    /// Delete a keyspace.
    pub async fn delete(
        &mut self,
        request: impl tonic::IntoRequest<DeleteRequest>,
    ) -> Result<tonic::Response<DeleteResponse>, tonic::Status> {
        self.ready().await?;
        let codec = tonic::codec::ProstCodec::default();
        let path = http::uri::PathAndQuery::from_static(DELETE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }

    async fn ready(&mut self) -> Result<(), tonic::Status> {
        self.inner.ready().await.map_err(|e| {
            tonic::Status::new(
                tonic::Code::Unknown,
                format!("Service was not ready: {}", e.into()),
            )
        })
    }
}
