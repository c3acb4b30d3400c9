//! Client
//!
//! 클라이언트 인스턴스 및 설정

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parking_lot::RwLock;

use super::context::TransactionContext;
use super::error::{DriverError, DriverResult};
use super::transaction::Transaction;
use super::transport::{GrpcTransport, TxTransport};
use super::types::{Answer, Query};

/// 기본 엔진 주소
pub const DEFAULT_ADDRESS: &str = "localhost:48555";

/// 기본 키스페이스
pub const DEFAULT_KEYSPACE: &str = "grakn";

/// 기본 연결 타임아웃
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ServerAddress - 서버 주소
// ============================================================================

/// 서버 주소 (`host:port`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
}

impl ServerAddress {
    /// 새 서버 주소 생성
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` 형식 파싱 (스킴은 허용하지 않음)
    pub fn parse(address: &str) -> DriverResult<Self> {
        if address.contains("://") {
            return Err(DriverError::configuration(format!(
                "Address must be host:port without a scheme: {}",
                address
            )));
        }

        let (host, port) = address.rsplit_once(':').ok_or_else(|| {
            DriverError::configuration(format!("Missing port in address: {}", address))
        })?;

        if host.is_empty() {
            return Err(DriverError::configuration(format!(
                "Missing host in address: {}",
                address
            )));
        }

        let port = port
            .parse()
            .map_err(|_| DriverError::configuration(format!("Invalid port: {}", port)))?;

        Ok(Self::new(host, port))
    }

    /// 전송 계층용 URI
    pub fn to_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl FromStr for ServerAddress {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::new("localhost", 48555)
    }
}

// ============================================================================
// ClientConfig - 클라이언트 설정
// ============================================================================

/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 서버 주소
    pub address: ServerAddress,
    /// 키스페이스
    pub keyspace: String,
    /// 연결 타임아웃
    pub connect_timeout: Duration,
    /// User Agent
    pub user_agent: String,
}

impl ClientConfig {
    /// 새 설정 생성
    pub fn new(address: &str, keyspace: impl Into<String>) -> DriverResult<Self> {
        let address = ServerAddress::parse(address)?;
        let keyspace = keyspace.into();
        if keyspace.is_empty() {
            return Err(DriverError::configuration("Keyspace must not be empty"));
        }

        Ok(Self {
            address,
            keyspace,
            ..Self::default()
        })
    }

    /// 빌더 시작
    pub fn builder(address: &str, keyspace: impl Into<String>) -> DriverResult<ClientConfigBuilder> {
        let config = Self::new(address, keyspace)?;
        Ok(ClientConfigBuilder { config })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: ServerAddress::default(),
            keyspace: DEFAULT_KEYSPACE.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: format!("grakn-driver/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ============================================================================
// ClientConfigBuilder - 설정 빌더
// ============================================================================

/// 클라이언트 설정 빌더
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// 연결 타임아웃 설정
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// User Agent 설정
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// 빌드
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// TransactionRunner - 쿼리 실행 능력
// ============================================================================

/// 쿼리를 실행하고 결과를 돌려주는 능력
///
/// 스트리밍 gRPC 클라이언트([`Client`])와 HTTP 클라이언트([`HttpClient`](super::http::HttpClient))가
/// 구현한다. 호출하는 쪽은 어느 쪽이 뒤에 있는지 알 필요가 없다.
pub trait TransactionRunner: Send + Sync {
    /// 쿼리 하나를 실행하고 결과를 돌려준다
    fn execute(&self, query: Query) -> impl Future<Output = DriverResult<Vec<Answer>>> + Send;
}

// ============================================================================
// Client - 클라이언트
// ============================================================================

/// 그래프 엔진 클라이언트
///
/// 엔진과의 채널 하나를 여러 트랜잭션이 순서대로 공유한다.
pub struct Client<T = GrpcTransport> {
    /// 설정
    config: ClientConfig,
    /// 전송 계층
    transport: T,
    /// 열린 상태
    open: Arc<RwLock<bool>>,
}

impl Client<GrpcTransport> {
    /// 엔진에 연결
    ///
    /// 연결은 즉시 맺는다. 제한 시간 안에 엔진에 닿지 못하면 연결 에러.
    pub async fn connect(address: &str, keyspace: &str) -> DriverResult<Self> {
        let config = ClientConfig::new(address, keyspace)?;
        Self::with_config(config).await
    }

    /// 설정으로 클라이언트 생성
    pub async fn with_config(config: ClientConfig) -> DriverResult<Self> {
        let transport =
            GrpcTransport::connect(&config.address, config.connect_timeout, &config.user_agent)
                .await?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: TxTransport> Client<T> {
    /// 전송 계층을 지정해 클라이언트 생성
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            open: Arc::new(RwLock::new(true)),
        }
    }

    /// 쿼리 하나를 실행하고 커밋
    ///
    /// 트랜잭션을 열고, 쿼리를 실행하고, 커밋하고, 닫는다. 에러가 나도 닫는다.
    pub async fn execute(&self, query: impl Into<Query>) -> DriverResult<Vec<Answer>> {
        let mut context = self.open().await?;

        let result = match context.execute(query).await {
            Ok(answers) => context.commit().await.map(|_| answers),
            Err(e) => Err(e),
        };

        context.close().await;
        result
    }

    /// 트랜잭션 열기 (여러 쿼리, 직접 커밋)
    pub async fn open(&self) -> DriverResult<TransactionContext> {
        self.ensure_open()?;
        TransactionContext::open(&self.transport, &self.config.keyspace).await
    }

    /// 트랜잭션 안에서 작업 실행
    ///
    /// 작업이 끝나면 (에러가 나도) 트랜잭션을 닫는다. 커밋은 작업이 직접 한다.
    pub async fn with_transaction<F, R>(&self, work: F) -> DriverResult<R>
    where
        F: for<'a> FnOnce(&'a mut Transaction) -> BoxFuture<'a, DriverResult<R>>,
    {
        let mut context = self.open().await?;

        let result = match context.transaction_mut() {
            Ok(tx) => work(tx).await,
            Err(e) => Err(e),
        };

        context.close().await;
        result
    }

    /// 키스페이스 삭제
    pub async fn delete_keyspace(&self) -> DriverResult<()> {
        self.ensure_open()?;
        self.transport
            .delete_keyspace(&self.config.keyspace)
            .await
            .map_err(DriverError::from_status)?;
        tracing::debug!(keyspace = %self.config.keyspace, "keyspace deleted");
        Ok(())
    }

    /// 연결 테스트 (트랜잭션을 열고 바로 닫음)
    pub async fn verify_connectivity(&self) -> DriverResult<()> {
        let context = self.open().await?;
        context.close().await;
        Ok(())
    }

    /// 클라이언트 설정
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 키스페이스
    pub fn keyspace(&self) -> &str {
        &self.config.keyspace
    }

    /// 클라이언트 종료 (이후 새 트랜잭션을 열 수 없음)
    pub fn close(&self) {
        *self.open.write() = false;
    }

    /// 열린 상태 여부
    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DriverError::connectivity("Client is closed"))
        }
    }
}

impl<T: TxTransport> TransactionRunner for Client<T> {
    async fn execute(&self, query: Query) -> DriverResult<Vec<Answer>> {
        Client::execute(self, query).await
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("address", &self.config.address)
            .field("keyspace", &self.config.keyspace)
            .field("open", &*self.open.read())
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
    use crate::rpc::{BaseType, Concept as WireConcept, IteratorId, TxRequest, TxResponse};
    use serde_json::json;
    use tonic::Status;

    const E2E_QUERY: &str = "match $x sub concept; limit 3;";

    fn x_bound_to(id: &str, base_type: BaseType) -> TxResponse {
        TxResponse::answer(vec![("x".to_string(), WireConcept::new(id, base_type))])
    }

    /// 메타 타입 세 개를 돌려주는 엔진 스크립트
    fn script_meta_types(transport: &MemoryTransport) {
        let next = TxRequest::next(IteratorId::new(5));
        transport.script(ScriptedReply::on_query(E2E_QUERY, TxResponse::iterator(5)));
        transport.script(ScriptedReply::on(next.clone(), x_bound_to("a", BaseType::MetaType)));
        transport.script(ScriptedReply::on(next.clone(), x_bound_to("b", BaseType::EntityType)));
        transport.script(ScriptedReply::on(next.clone(), x_bound_to("c", BaseType::AttributeType)));
        transport.script(ScriptedReply::on(next, TxResponse::done()));
        transport.script(ScriptedReply::on(TxRequest::get_label("b"), TxResponse::label("entity")));
        transport.script(ScriptedReply::on(TxRequest::get_label("c"), TxResponse::label("resource")));
    }

    fn memory_client() -> (Client<MemoryTransport>, MemoryTransport) {
        let transport = MemoryTransport::new();
        let client = Client::with_transport(ClientConfig::default(), transport.clone());
        (client, transport)
    }

    #[test]
    fn test_server_address() {
        let addr = ServerAddress::new("localhost", 48555);
        assert_eq!(addr.to_string(), "localhost:48555");
        assert_eq!(addr.to_uri(), "http://localhost:48555");
        assert_eq!(ServerAddress::default(), addr);
    }

    #[test]
    fn test_server_address_parse() {
        let addr = ServerAddress::parse("engine.local:1234").unwrap();
        assert_eq!(addr.host, "engine.local");
        assert_eq!(addr.port, 1234);

        let addr: ServerAddress = "127.0.0.1:48555".parse().unwrap();
        assert_eq!(addr, ServerAddress::new("127.0.0.1", 48555));

        assert!(ServerAddress::parse("http://localhost:48555").is_err());
        assert!(ServerAddress::parse("localhost").is_err());
        assert!(ServerAddress::parse(":48555").is_err());
        assert!(ServerAddress::parse("localhost:port").is_err());
        assert!(ServerAddress::parse("localhost:70000").is_err());
    }

    #[test]
    fn test_client_config() {
        let config = ClientConfig::new("localhost:48555", "social_network").unwrap();
        assert_eq!(config.address, ServerAddress::default());
        assert_eq!(config.keyspace, "social_network");
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent.starts_with("grakn-driver/"));

        let config = ClientConfig::default();
        assert_eq!(config.keyspace, DEFAULT_KEYSPACE);
        assert_eq!(config.address.to_string(), DEFAULT_ADDRESS);

        assert!(matches!(
            ClientConfig::new("localhost:48555", ""),
            Err(DriverError::Configuration(_))
        ));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::builder("localhost:48555", "grakn")
            .unwrap()
            .with_connect_timeout(Duration::from_millis(250))
            .with_user_agent("my-app/1.0")
            .build();

        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.user_agent, "my-app/1.0");
    }

    #[tokio::test]
    async fn test_execute_meta_types_end_to_end() {
        let (client, transport) = memory_client();
        script_meta_types(&transport);

        let answers = client.execute(E2E_QUERY).await.unwrap();

        assert_eq!(
            serde_json::to_value(&answers).unwrap(),
            json!([
                {"x": {"id": "a"}},
                {"x": {"id": "b", "label": "entity"}},
                {"x": {"id": "c", "label": "resource"}},
            ])
        );
        assert_eq!(transport.pending_replies(), 0);

        // NEXT 세 번 + DONE을 받는 NEXT 한 번
        let requests = transport.requests();
        assert_eq!(requests.iter().filter(|r| r.is_next()).count(), 4);
        assert_eq!(requests.iter().filter(|r| r.is_concept_method()).count(), 2);
    }

    #[tokio::test]
    async fn test_commit_is_last_request_and_channel_closed() {
        let (client, transport) = memory_client();
        script_meta_types(&transport);

        client.execute(E2E_QUERY).await.unwrap();
        transport.wait_for_ended(1).await;

        let requests = transport.stream_requests(0);
        assert_eq!(requests.first(), Some(&TxRequest::open(DEFAULT_KEYSPACE)));
        assert!(requests.last().unwrap().is_commit());
    }

    #[tokio::test]
    async fn test_execute_domain_error() {
        let (client, transport) = memory_client();
        transport.script(ScriptedReply::reject_query(
            "GRAQL_SYNTAX_EXCEPTION",
            "sorry we changed the syntax again",
        ));

        let err = client.execute("match $x isa ;").await.unwrap_err();
        match err {
            DriverError::Domain { error_type, message } => {
                assert_eq!(error_type, "GRAQL_SYNTAX_EXCEPTION");
                assert_eq!(message, "sorry we changed the syntax again");
            }
            other => panic!("expected domain error, got {:?}", other),
        }

        // 에러가 나도 채널은 닫히고 커밋은 보내지 않음
        transport.wait_for_ended(1).await;
        assert!(!transport.requests().iter().any(TxRequest::is_commit));
    }

    #[tokio::test]
    async fn test_execute_connectivity_error() {
        let (client, transport) = memory_client();
        transport.script(ScriptedReply::drop_on_query(Status::unavailable("")));

        let err = client.execute("match $x; get;").await.unwrap_err();
        assert!(err.is_connectivity());
        assert!(err.server_message().is_none());
    }

    #[tokio::test]
    async fn test_same_query_twice_uses_two_streams() {
        let (client, transport) = memory_client();
        script_meta_types(&transport);
        script_meta_types(&transport);

        let first = client.execute(E2E_QUERY).await.unwrap();
        let second = client.execute(E2E_QUERY).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.streams_opened(), 2);
        assert_eq!(transport.stream_requests(0), transport.stream_requests(1));
    }

    #[tokio::test]
    async fn test_open_multiple_queries() {
        let (client, transport) = memory_client();
        transport.script(ScriptedReply::on_query("insert $x isa person;", TxResponse::iterator(1)));
        transport.script(ScriptedReply::on(
            TxRequest::next(IteratorId::new(1)),
            x_bound_to("p1", BaseType::Entity),
        ));
        transport.script(ScriptedReply::on_query("match $x isa person; get;", TxResponse::iterator(2)));

        let mut context = client.open().await.unwrap();
        let inserted = context.execute("insert $x isa person;").await.unwrap();
        let matched = context.execute("match $x isa person; get;").await.unwrap();
        context.commit().await.unwrap();
        context.close().await;

        assert_eq!(inserted.len(), 1);
        assert!(matched.is_empty());
        assert_eq!(transport.streams_opened(), 1);
        transport.wait_for_ended(1).await;
    }

    #[tokio::test]
    async fn test_with_transaction() {
        let (client, transport) = memory_client();
        transport.script(ScriptedReply::on_query("insert $x isa person;", TxResponse::iterator(1)));

        let count = client
            .with_transaction(|tx| {
                Box::pin(async move {
                    let answers = tx.execute("insert $x isa person;").await?;
                    tx.commit().await?;
                    Ok(answers.len())
                })
            })
            .await
            .unwrap();

        assert_eq!(count, 0);
        transport.wait_for_ended(1).await;
        assert!(transport.requests().last().unwrap().is_commit());
    }

    #[tokio::test]
    async fn test_with_transaction_error_still_closes() {
        let (client, transport) = memory_client();

        let result: DriverResult<()> = client
            .with_transaction(|tx| {
                Box::pin(async move {
                    // 스크립트가 없으므로 ITERATOR_ID 대신 DONE
                    tx.execute("match $x; get;").await?;
                    Ok(())
                })
            })
            .await;

        assert!(matches!(result, Err(DriverError::Protocol(_))));
        transport.wait_for_ended(1).await;
    }

    #[tokio::test]
    async fn test_delete_keyspace() {
        let (client, transport) = memory_client();

        client.delete_keyspace().await.unwrap();
        assert_eq!(transport.deleted_keyspaces(), vec![DEFAULT_KEYSPACE.to_string()]);

        transport.refuse_streams(Status::unavailable("down"));
        assert!(client.delete_keyspace().await.unwrap_err().is_connectivity());
    }

    #[tokio::test]
    async fn test_verify_connectivity() {
        let (client, transport) = memory_client();

        client.verify_connectivity().await.unwrap();
        transport.wait_for_ended(1).await;
        assert_eq!(transport.requests(), vec![TxRequest::open(DEFAULT_KEYSPACE)]);
    }

    #[tokio::test]
    async fn test_closed_client_rejects_work() {
        let (client, transport) = memory_client();
        client.close();

        assert!(!client.is_open());
        assert!(client.execute("match $x; get;").await.is_err());
        assert_eq!(transport.streams_opened(), 0);
    }

    #[tokio::test]
    async fn test_client_as_transaction_runner() {
        async fn run<R: TransactionRunner>(runner: &R) -> DriverResult<Vec<Answer>> {
            runner.execute(Query::new(E2E_QUERY)).await
        }

        let (client, transport) = memory_client();
        script_meta_types(&transport);

        let answers = run(&client).await.unwrap();
        assert_eq!(answers.len(), 3);
    }

    #[tokio::test]
    async fn test_connect_to_nothing_fails_fast() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::builder(&format!("127.0.0.1:{}", port), "grakn")
            .unwrap()
            .with_connect_timeout(Duration::from_secs(1))
            .build();

        let started = std::time::Instant::now();
        let err = Client::with_config(config).await.unwrap_err();

        assert!(err.is_connectivity());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
