//! Transaction Context
//!
//! 트랜잭션 스트림의 수명 관리
//!
//! 컨텍스트를 얻으면 트랜잭션이 열려 있고, 놓으면 (정상 반환, 조기 반환, 에러 모두)
//! 요청 채널이 닫히고 응답을 한 번 더 읽는다. 명시적으로 [`TransactionContext::close`]를
//! 호출하는 것이 기본이고, 호출하지 않고 drop하면 채널을 바로 닫은 뒤 마지막 읽기를
//! 현재 tokio 런타임의 별도 태스크로 넘긴다.

use std::fmt;

use futures::StreamExt;
use tokio::runtime::Handle;

use super::error::{DriverError, DriverResult};
use super::transaction::{Transaction, TransactionState};
use super::transport::TxTransport;
use super::types::{Answer, Query};

/// 범위가 정해진 트랜잭션
pub struct TransactionContext {
    /// 트랜잭션 (Drop에서 꺼낼 수 있도록 Option)
    tx: Option<Transaction>,
}

impl TransactionContext {
    /// 트랜잭션을 열고 컨텍스트 생성
    pub(crate) async fn open<T: TxTransport>(transport: &T, keyspace: &str) -> DriverResult<Self> {
        let tx = Transaction::open(transport, keyspace).await?;
        Ok(Self { tx: Some(tx) })
    }

    /// 쿼리 실행
    pub async fn execute(&mut self, query: impl Into<Query>) -> DriverResult<Vec<Answer>> {
        self.transaction_mut()?.execute(query).await
    }

    /// 커밋
    pub async fn commit(&mut self) -> DriverResult<()> {
        self.transaction_mut()?.commit().await
    }

    /// 트랜잭션 참조
    pub fn transaction_mut(&mut self) -> DriverResult<&mut Transaction> {
        self.tx
            .as_mut()
            .ok_or_else(|| DriverError::transaction("Transaction context is closed"))
    }

    /// 트랜잭션 상태
    pub fn state(&self) -> TransactionState {
        self.tx
            .as_ref()
            .map(Transaction::state)
            .unwrap_or(TransactionState::Closed)
    }

    /// 컨텍스트 닫기 (요청 채널을 닫고 마지막 응답을 읽음)
    pub async fn close(mut self) {
        if let Some(mut tx) = self.tx.take() {
            tx.shutdown().await;
        }
    }
}

impl Drop for TransactionContext {
    fn drop(&mut self) {
        let Some(mut tx) = self.tx.take() else {
            return;
        };

        // 채널은 여기서 바로 닫힘
        let keyspace = tx.keyspace().to_string();
        let mut responses = tx.take_responses();

        match Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(%keyspace, "transaction context dropped without close");
                handle.spawn(async move {
                    let _ = responses.next().await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    %keyspace,
                    "transaction context dropped outside a runtime, final read skipped"
                );
            }
        }
    }
}

impl fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("tx", &self.tx)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::memory::{MemoryTransport, ScriptedReply};
    use crate::rpc::{TxRequest, TxResponse};

    #[tokio::test]
    async fn test_close_ends_stream() {
        let transport = MemoryTransport::new();
        let context = TransactionContext::open(&transport, "grakn").await.unwrap();
        assert_eq!(context.state(), TransactionState::Open);

        context.close().await;

        transport.wait_for_ended(1).await;
        assert_eq!(transport.streams_ended(), 1);
    }

    #[tokio::test]
    async fn test_execute_and_commit() {
        let transport = MemoryTransport::with_script(vec![ScriptedReply::on_query(
            "insert $x isa person;",
            TxResponse::iterator(1),
        )]);
        let mut context = TransactionContext::open(&transport, "grakn").await.unwrap();

        let answers = context.execute("insert $x isa person;").await.unwrap();
        assert!(answers.is_empty());

        context.commit().await.unwrap();
        assert_eq!(context.state(), TransactionState::Committed);
        context.close().await;

        transport.wait_for_ended(1).await;
        assert!(transport.requests().last().unwrap().is_commit());

        // 열림 확인, ITERATOR_ID, DONE, 그리고 닫을 때 읽은 커밋 응답
        assert_eq!(transport.responses_taken(), 4);
    }

    #[tokio::test]
    async fn test_close_after_error() {
        let transport = MemoryTransport::with_script(vec![ScriptedReply::reject_query(
            "GRAQL_SYNTAX_EXCEPTION",
            "sorry we changed the syntax again",
        )]);
        let mut context = TransactionContext::open(&transport, "grakn").await.unwrap();

        assert!(context.execute("match $x; get;").await.unwrap_err().is_domain());
        assert_eq!(context.state(), TransactionState::Failed);

        context.close().await;
        transport.wait_for_ended(1).await;
    }

    #[tokio::test]
    async fn test_drop_without_close_ends_stream() {
        let transport = MemoryTransport::new();

        {
            let mut context = TransactionContext::open(&transport, "grakn").await.unwrap();
            context.execute("match $x; get;").await.ok();
        }

        transport.wait_for_ended(1).await;
        assert_eq!(transport.streams_ended(), 1);
        assert_eq!(transport.requests()[0], TxRequest::open("grakn"));
    }
}
