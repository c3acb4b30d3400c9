//! Result cursor messages.
//!
//! The engine answers an `ExecQuery` with an [`IteratorId`]; the client then
//! pulls answers one at a time by sending [`Next`] with that handle until the
//! engine replies `Done`.

/// Handle of a server-side result cursor.
///
/// Issued by the engine; the client never invents one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct IteratorId {
    /// Cursor id
    #[prost(int32, tag = "1")]
    pub id: i32,
}

impl IteratorId {
    /// Create an iterator handle.
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

/// Request the next element of a result cursor.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Next {
    /// Cursor to advance
    #[prost(message, optional, tag = "1")]
    pub iterator_id: ::core::option::Option<IteratorId>,
}
