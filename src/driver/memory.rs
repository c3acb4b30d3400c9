//! In-memory transport.
//!
//! A scripted engine that lives in the same process. Each request is matched
//! against the scripted replies in order; the first match is consumed and
//! answered, and a request nothing matches is answered with `DONE`. A reply
//! can also abort the stream with a gRPC status, the way the engine reports a
//! rejected query.
//!
//! Every request is recorded per stream, so tests can check exactly what went
//! over the wire.
//!
//! ```ignore
//! let transport = MemoryTransport::new();
//! transport.script(ScriptedReply::on_query("match $x; get;", TxResponse::iterator(1)));
//! let client = Client::with_transport(ClientConfig::default(), transport.clone());
//! client.execute("match $x; get;").await?;
//! assert!(transport.requests().iter().any(TxRequest::is_commit));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tonic::metadata::MetadataMap;
use tonic::{Code, Status};

use crate::rpc::TxRequest;
use crate::rpc::TxResponse;

use super::channel::RequestStream;
use super::error::ERROR_TYPE_METADATA_KEY;
use super::transport::{ResponseStream, TxTransport};

type Matcher = Box<dyn Fn(&TxRequest) -> bool + Send + Sync>;

/// What the scripted engine does with a matched request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with a response message
    Respond(TxResponse),
    /// Abort the stream with a status
    Abort(Status),
}

/// One scripted reply, consumed by the first request it matches.
pub struct ScriptedReply {
    matcher: Matcher,
    reply: Reply,
}

impl ScriptedReply {
    /// Reply to any request accepted by `matcher`.
    pub fn when(matcher: impl Fn(&TxRequest) -> bool + Send + Sync + 'static, reply: Reply) -> Self {
        Self {
            matcher: Box::new(matcher),
            reply,
        }
    }

    /// Respond to a request equal to `request`.
    pub fn on(request: TxRequest, response: TxResponse) -> Self {
        Self::when(move |r| *r == request, Reply::Respond(response))
    }

    /// Respond to an EXEC_QUERY carrying `query`.
    pub fn on_query(query: impl Into<String>, response: TxResponse) -> Self {
        let query = query.into();
        Self::when(
            move |r| r.query_text() == Some(query.as_str()),
            Reply::Respond(response),
        )
    }

    /// Abort the stream on the first EXEC_QUERY, reporting a domain error.
    pub fn reject_query(error_type: &str, message: impl Into<String>) -> Self {
        Self::when(TxRequest::is_exec_query, Reply::Abort(domain_status(error_type, message)))
    }

    /// Abort the stream on the first EXEC_QUERY without any diagnostic metadata.
    pub fn drop_on_query(status: Status) -> Self {
        Self::when(TxRequest::is_exec_query, Reply::Abort(status))
    }
}

impl fmt::Debug for ScriptedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedReply")
            .field("reply", &self.reply)
            .finish()
    }
}

/// Build the status the engine uses to reject an operation.
pub fn domain_status(error_type: &str, message: impl Into<String>) -> Status {
    let mut metadata = MetadataMap::new();
    if let Ok(value) = error_type.parse() {
        metadata.insert(ERROR_TYPE_METADATA_KEY, value);
    }
    Status::with_metadata(Code::Unknown, message, metadata)
}

struct Engine {
    script: Mutex<Vec<ScriptedReply>>,
    streams: Mutex<Vec<Vec<TxRequest>>>,
    deleted: Mutex<Vec<String>>,
    refusal: Mutex<Option<Status>>,
    ended: watch::Sender<usize>,
    opened: AtomicUsize,
    taken: AtomicUsize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            streams: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            refusal: Mutex::new(None),
            ended: watch::channel(0).0,
            opened: AtomicUsize::new(0),
            taken: AtomicUsize::new(0),
        }
    }
}

impl Engine {
    fn refusal(&self) -> Option<Status> {
        self.refusal.lock().clone()
    }

    fn reply_to(&self, request: &TxRequest) -> Reply {
        let mut script = self.script.lock();
        match script.iter().position(|scripted| (scripted.matcher)(request)) {
            Some(index) => script.remove(index).reply,
            None => Reply::Respond(TxResponse::done()),
        }
    }

    fn record(&self, stream: usize, request: TxRequest) {
        if let Some(requests) = self.streams.lock().get_mut(stream) {
            requests.push(request);
        }
    }
}

/// Scripted in-process engine.
///
/// Cloning shares the same engine.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    engine: Arc<Engine>,
}

impl MemoryTransport {
    /// Create an engine with an empty script (every request gets `DONE`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given script.
    pub fn with_script(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        let transport = Self::new();
        for reply in replies {
            transport.script(reply);
        }
        transport
    }

    /// Append a scripted reply.
    pub fn script(&self, reply: ScriptedReply) {
        self.engine.script.lock().push(reply);
    }

    /// Number of scripted replies not consumed yet.
    pub fn pending_replies(&self) -> usize {
        self.engine.script.lock().len()
    }

    /// Refuse to open streams, as an unreachable engine would.
    pub fn refuse_streams(&self, status: Status) {
        *self.engine.refusal.lock() = Some(status);
    }

    /// All requests received, across streams, in arrival order per stream.
    pub fn requests(&self) -> Vec<TxRequest> {
        self.engine.streams.lock().iter().flatten().cloned().collect()
    }

    /// Requests received on one stream.
    pub fn stream_requests(&self, stream: usize) -> Vec<TxRequest> {
        self.engine
            .streams
            .lock()
            .get(stream)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of streams opened.
    pub fn streams_opened(&self) -> usize {
        self.engine.opened.load(Ordering::SeqCst)
    }

    /// Number of responses (or aborts) the driver has read, across streams.
    pub fn responses_taken(&self) -> usize {
        self.engine.taken.load(Ordering::SeqCst)
    }

    /// Number of streams whose request side has ended (or that were aborted).
    pub fn streams_ended(&self) -> usize {
        *self.engine.ended.borrow()
    }

    /// Wait until at least `count` streams have ended.
    pub async fn wait_for_ended(&self, count: usize) {
        let mut ended = self.engine.ended.subscribe();
        let _ = ended.wait_for(|n| *n >= count).await;
    }

    /// Keyspaces deleted through this transport.
    pub fn deleted_keyspaces(&self) -> Vec<String> {
        self.engine.deleted.lock().clone()
    }
}

impl fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("streams_opened", &self.streams_opened())
            .field("pending_replies", &self.pending_replies())
            .finish()
    }
}

impl TxTransport for MemoryTransport {
    async fn open_stream(&self, mut requests: RequestStream) -> Result<ResponseStream, Status> {
        if let Some(status) = self.engine.refusal() {
            return Err(status);
        }

        let stream = {
            let mut streams = self.engine.streams.lock();
            streams.push(Vec::new());
            streams.len() - 1
        };
        self.engine.opened.fetch_add(1, Ordering::SeqCst);

        let (responses, inbound) = mpsc::unbounded_channel();
        let engine = Arc::clone(&self.engine);

        tokio::spawn(async move {
            while let Some(request) = requests.pull().await {
                tracing::trace!(stream, request = request.name(), "engine received");
                engine.record(stream, request.clone());

                match engine.reply_to(&request) {
                    Reply::Respond(response) => {
                        if responses.send(Ok(response)).is_err() {
                            break;
                        }
                    }
                    Reply::Abort(status) => {
                        let _ = responses.send(Err(status));
                        break;
                    }
                }
            }
            drop(responses);
            engine.ended.send_modify(|n| *n += 1);
        });

        let engine = Arc::clone(&self.engine);
        let inbound = UnboundedReceiverStream::new(inbound).inspect(move |_| {
            engine.taken.fetch_add(1, Ordering::SeqCst);
        });

        Ok(Box::pin(inbound))
    }

    async fn delete_keyspace(&self, keyspace: &str) -> Result<(), Status> {
        if let Some(status) = self.engine.refusal() {
            return Err(status);
        }
        self.engine.deleted.lock().push(keyspace.to_string());
        Ok(())
    }
}
