//! Request Channel
//!
//! 트랜잭션(push)과 전송 계층(pull)을 잇는 요청 채널
//!
//! 트랜잭션은 방금 받은 응답을 보고 다음에 보낼 요청을 결정하므로 push 방식이고,
//! gRPC 스트리밍 호출은 요청 스트림을 pull 방식으로 소비한다. 무제한 mpsc 채널이
//! 두 쪽을 분리한다: push는 절대 대기하지 않고, pull은 메시지가 오거나 채널이
//! 닫히고 비워질 때까지 대기한다.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::rpc::TxRequest;

use super::error::{DriverError, DriverResult};

// ============================================================================
// RequestChannel - 송신 측
// ============================================================================

/// 요청 채널 (송신 측)
#[derive(Debug)]
pub struct RequestChannel {
    sender: Option<mpsc::UnboundedSender<TxRequest>>,
    pushed: u64,
}

impl RequestChannel {
    /// 새 채널 생성 (송신 측, 수신 스트림)
    pub fn new() -> (Self, RequestStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let channel = Self {
            sender: Some(sender),
            pushed: 0,
        };
        let stream = RequestStream {
            inner: UnboundedReceiverStream::new(receiver),
        };
        (channel, stream)
    }

    /// 요청 추가 (대기하지 않음)
    ///
    /// `close()` 이후이거나 수신 측이 이미 사라졌으면 실패한다.
    pub fn push(&mut self, request: TxRequest) -> DriverResult<()> {
        let sender = self.sender.as_ref().ok_or(DriverError::ChannelClosed)?;
        sender.send(request).map_err(|_| DriverError::ChannelClosed)?;
        self.pushed += 1;
        Ok(())
    }

    /// 채널 닫기
    ///
    /// 이미 버퍼에 있는 요청은 그대로 전달되고, 그 다음 pull은 스트림 종료를 돌려준다.
    pub fn close(&mut self) {
        self.sender.take();
    }

    /// 닫힘 여부
    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    /// 지금까지 push된 요청 수
    pub fn pushed(&self) -> u64 {
        self.pushed
    }
}

// ============================================================================
// RequestStream - 수신 측
// ============================================================================

/// 요청 스트림 (수신 측, 전송 계층 전용)
#[derive(Debug)]
pub struct RequestStream {
    inner: UnboundedReceiverStream<TxRequest>,
}

impl RequestStream {
    /// 다음 요청 대기 (채널이 닫히고 비워지면 None)
    pub async fn pull(&mut self) -> Option<TxRequest> {
        self.inner.next().await
    }
}

impl Stream for RequestStream {
    type Item = TxRequest;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

// ============================================================================
// Tests
// ============================================================================
