//! Transaction
//!
//! 트랜잭션 스트림 하나의 요청/응답 프로토콜
//!
//! 모든 교환은 `&mut self`로 이루어진다: 요청 하나를 push하고 응답 하나를 읽은 뒤에야
//! 다음 요청을 보낸다. 페이지 조회(NEXT)와 레이블 조회(RUN_CONCEPT_METHOD)는 같은
//! 스트림을 쓰므로 이 순서가 깨지면 응답이 엉뚱한 요청에 짝지어진다.

use std::fmt;

use futures::{stream, StreamExt};
use tonic::Status;

use crate::rpc::{concept_response, tx_response, IteratorId, TxRequest, TxResponse};

use super::channel::RequestChannel;
use super::decoder::{decode_query_result, LabelResolver};
use super::error::{DriverError, DriverResult};
use super::transport::{ResponseStream, TxTransport};
use super::types::{Answer, Query};

// ============================================================================
// TransactionState - 트랜잭션 상태
// ============================================================================

/// 트랜잭션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// 열림 (쿼리 실행 가능)
    Open,
    /// 커밋 요청됨
    Committed,
    /// 실패 (프로토콜 위반 또는 스트림 중단)
    Failed,
    /// 닫힘
    Closed,
}

impl TransactionState {
    /// 완료 상태 여부
    pub fn is_terminated(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Committed => write!(f, "committed"),
            Self::Failed => write!(f, "failed"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ============================================================================
// Transaction - 트랜잭션
// ============================================================================

/// 트랜잭션 하나 (요청 채널과 응답 스트림을 독점)
///
/// [`TransactionContext`](super::context::TransactionContext)를 통해서만 얻는다.
pub struct Transaction {
    /// 요청 채널 (송신 측)
    requests: RequestChannel,
    /// 응답 스트림
    responses: ResponseStream,
    /// 키스페이스
    keyspace: String,
    /// 상태
    state: TransactionState,
}

impl Transaction {
    /// 트랜잭션 열기
    ///
    /// OPEN을 보내고 엔진의 첫 응답(열림 확인)을 받을 때까지 대기한다.
    pub(crate) async fn open<T: TxTransport>(transport: &T, keyspace: &str) -> DriverResult<Self> {
        let (mut requests, stream) = RequestChannel::new();
        requests.push(TxRequest::open(keyspace))?;

        let responses = transport
            .open_stream(stream)
            .await
            .map_err(DriverError::from_status)?;

        let mut tx = Self {
            requests,
            responses,
            keyspace: keyspace.to_string(),
            state: TransactionState::Open,
        };

        // 열림 확인 (내용은 보지 않음)
        if let Err(e) = tx.next_response().await {
            tx.shutdown().await;
            return Err(e);
        }
        tracing::debug!(keyspace, "transaction opened");

        Ok(tx)
    }

    /// 쿼리 실행
    ///
    /// 결과 커서를 끝까지 읽어 모든 결과를 순서대로 돌려준다.
    pub async fn execute(&mut self, query: impl Into<Query>) -> DriverResult<Vec<Answer>> {
        self.ensure_open()?;
        let query = query.into();

        let response = self
            .exchange(TxRequest::exec_query(query.text.clone(), query.infer))
            .await?;
        let iterator_id = match response.response {
            Some(tx_response::Response::IteratorId(id)) => id,
            _ => {
                return Err(self.violation(format!(
                    "expected ITERATOR_ID after EXEC_QUERY, got {}",
                    response.name()
                )))
            }
        };

        let answers = self.drain_iterator(iterator_id).await?;
        tracing::debug!(query = %query, answers = answers.len(), "query executed");

        Ok(answers)
    }

    /// 커밋
    ///
    /// COMMIT을 보내기만 하고 응답은 기다리지 않는다. 엔진의 응답은 닫을 때 읽힌다.
    pub async fn commit(&mut self) -> DriverResult<()> {
        self.ensure_open()?;
        self.push(TxRequest::commit())?;
        self.state = TransactionState::Committed;
        tracing::debug!(keyspace = %self.keyspace, "transaction committed");
        Ok(())
    }

    /// 상태
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// 키스페이스
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// 스트림 정리: 요청 채널을 닫고 응답을 한 번 더 읽는다.
    ///
    /// 마지막 읽기가 있어야 전송 계층이 스트림 종료를 인식한다.
    pub(crate) async fn shutdown(&mut self) {
        if self.state == TransactionState::Closed {
            return;
        }

        self.requests.close();
        match self.responses.next().await {
            Some(Ok(response)) => {
                tracing::trace!(response = response.name(), "drained on close");
            }
            Some(Err(status)) => {
                tracing::warn!(
                    keyspace = %self.keyspace,
                    error = %DriverError::from_status(status),
                    "error while draining transaction stream"
                );
            }
            None => {}
        }

        tracing::debug!(
            keyspace = %self.keyspace,
            state = %self.state,
            requests = self.requests.pushed(),
            "transaction closed"
        );
        self.state = TransactionState::Closed;
    }

    /// 요청 채널과 응답 스트림을 분리 (Drop 시 정리 작업을 다른 태스크로 넘길 때)
    pub(crate) fn take_responses(&mut self) -> ResponseStream {
        self.requests.close();
        self.state = TransactionState::Closed;
        let drained = stream::empty::<Result<TxResponse, Status>>();
        std::mem::replace(&mut self.responses, Box::pin(drained))
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn ensure_open(&self) -> DriverResult<()> {
        match self.state {
            TransactionState::Open => Ok(()),
            state => Err(DriverError::transaction(format!("Transaction is {}", state))),
        }
    }

    /// 결과 커서를 DONE까지 읽기
    async fn drain_iterator(&mut self, iterator_id: IteratorId) -> DriverResult<Vec<Answer>> {
        let mut answers = Vec::new();

        loop {
            let response = self.exchange(TxRequest::next(iterator_id)).await?;
            match response.response {
                Some(tx_response::Response::Done(_)) => break,
                Some(tx_response::Response::QueryResult(result)) => {
                    match decode_query_result(&mut *self, result).await {
                        Ok(answer) => answers.push(answer),
                        Err(e) => {
                            // 커서가 중간에 멈췄으므로 이 스트림은 더 쓸 수 없다
                            self.state = TransactionState::Failed;
                            return Err(e);
                        }
                    }
                }
                _ => {
                    return Err(self.violation(format!(
                        "expected QUERY_RESULT or DONE after NEXT, got {}",
                        response.name()
                    )))
                }
            }
        }

        Ok(answers)
    }

    /// 요청 하나를 보내고 응답 하나를 읽는다.
    async fn exchange(&mut self, request: TxRequest) -> DriverResult<TxResponse> {
        self.push(request)?;
        self.next_response().await
    }

    fn push(&mut self, request: TxRequest) -> DriverResult<()> {
        tracing::trace!(request = request.name(), "send");
        if let Err(e) = self.requests.push(request) {
            self.state = TransactionState::Failed;
            return Err(e);
        }
        Ok(())
    }

    /// 다음 응답 읽기 (스트림 에러는 번역해서 돌려줌)
    async fn next_response(&mut self) -> DriverResult<TxResponse> {
        match self.responses.next().await {
            Some(Ok(response)) => {
                tracing::trace!(response = response.name(), "recv");
                Ok(response)
            }
            Some(Err(status)) => {
                self.state = TransactionState::Failed;
                Err(DriverError::from_status(status))
            }
            None => {
                self.state = TransactionState::Failed;
                Err(DriverError::connectivity("stream closed by engine"))
            }
        }
    }

    fn violation(&mut self, msg: String) -> DriverError {
        self.state = TransactionState::Failed;
        DriverError::protocol(msg)
    }
}

impl LabelResolver for Transaction {
    async fn resolve_label(&mut self, concept_id: &str) -> DriverResult<String> {
        let response = self.exchange(TxRequest::get_label(concept_id)).await?;
        match response.response {
            Some(tx_response::Response::ConceptResponse(concept)) => match concept.value {
                Some(concept_response::Value::Label(label)) => Ok(label.value),
                None => Err(self.violation(format!(
                    "CONCEPT_RESPONSE without label for {}",
                    concept_id
                ))),
            },
            _ => Err(self.violation(format!(
                "expected CONCEPT_RESPONSE for {}, got {}",
                concept_id,
                response.name()
            ))),
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("keyspace", &self.keyspace)
            .field("state", &self.state)
            .field("requests", &self.requests)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
