//! Transport Stream
//!
//! 트랜잭션 스트림을 여는 전송 계층 추상화와 gRPC 구현

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;

use crate::rpc::{DeleteRequest, GraknClient, TxResponse};

use super::channel::RequestStream;
use super::client::ServerAddress;
use super::error::{DriverError, DriverResult};

/// 엔진 응답 스트림
///
/// 메시지를 하나씩 돌려주며, 엔진이 스트림을 중단하면 `Err(Status)`를 돌려준다.
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<TxResponse, Status>> + Send>>;

// ============================================================================
// TxTransport - 전송 계층
// ============================================================================

/// 트랜잭션 전송 계층
///
/// 요청 스트림을 엔진으로 보내는 쪽과 응답을 받는 쪽은 전송 계층이 관리하고,
/// 드라이버는 [`RequestChannel`](super::channel::RequestChannel)에 push하고
/// [`ResponseStream`]에서 하나씩 읽는다.
pub trait TxTransport: Send + Sync {
    /// 양방향 트랜잭션 스트림 열기
    fn open_stream(
        &self,
        requests: RequestStream,
    ) -> impl Future<Output = Result<ResponseStream, Status>> + Send;

    /// 키스페이스 삭제
    fn delete_keyspace(&self, keyspace: &str) -> impl Future<Output = Result<(), Status>> + Send;
}

// ============================================================================
// GrpcTransport - gRPC 전송
// ============================================================================

/// gRPC 전송 (클라이언트당 채널 하나)
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: GraknClient<Channel>,
    address: ServerAddress,
}

impl GrpcTransport {
    /// 엔진에 연결 (제한 시간 내에 연결되지 않으면 연결 에러)
    pub async fn connect(
        address: &ServerAddress,
        timeout: Duration,
        user_agent: &str,
    ) -> DriverResult<Self> {
        let endpoint = Endpoint::from_shared(address.to_uri())
            .map_err(|e| DriverError::configuration(format!("Invalid address {}: {}", address, e)))?
            .user_agent(user_agent)
            .map_err(|e| DriverError::configuration(format!("Invalid user agent: {}", e)))?
            .connect_timeout(timeout);

        let channel = match tokio::time::timeout(timeout, endpoint.connect()).await {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => {
                return Err(DriverError::connectivity_from(
                    format!("Failed to connect to {}", address),
                    e,
                ));
            }
            Err(_) => {
                return Err(DriverError::connectivity(format!(
                    "Timed out after {:?} connecting to {}",
                    timeout, address
                )));
            }
        };

        tracing::debug!(%address, "connected to engine");

        Ok(Self {
            client: GraknClient::new(channel),
            address: address.clone(),
        })
    }

    /// 서버 주소
    pub fn address(&self) -> &ServerAddress {
        &self.address
    }
}

impl TxTransport for GrpcTransport {
    async fn open_stream(&self, requests: RequestStream) -> Result<ResponseStream, Status> {
        // Channel은 복제해도 같은 연결을 공유함
        let mut client = self.client.clone();
        let response = client.tx(requests).await?;
        Ok(Box::pin(response.into_inner()))
    }

    async fn delete_keyspace(&self, keyspace: &str) -> Result<(), Status> {
        let mut client = self.client.clone();
        client.delete(DeleteRequest::new(keyspace)).await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
