//! The connection abstraction the session engine reads frames from and
//! writes frames to.
//!
//! Deliberately minimal: frame boundaries, TLS, and the WebSocket
//! upgrade/subprotocol negotiation are the host application's concern. An
//! `async_trait` trait lets both a real socket and an in-memory test double
//! implement the same interface the session engine drives.
//!
//! All three methods take `&self`, not `&mut self`: the session engine's
//! inbound loop calls `recv` while outbound callers and the inbound
//! dispatcher's own replies call `send` concurrently, so a `Transport`
//! implementation is expected to manage its own interior mutability the way
//! a split WebSocket does — an owned read half behind the loop that calls
//! `recv`, and a cloneable write-sender (or a mutex around the write half)
//! backing `send`, mirroring the sender-task split real WebSocket servers
//! in this codebase's sibling services use.
use async_trait::async_trait;

/// A transport is considered closed once `recv` returns `None` or any
/// method returns `Err`; the session engine treats both the same way
/// (`OcppError::TransportClosed` for an in-flight waiter, loop exit for the
/// inbound reader).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Blocks until one complete message is available, or returns `None`
    /// once the connection is closed. Called only from the session's
    /// inbound loop; never concurrently with itself.
    async fn recv(&self) -> Result<Option<String>, TransportError>;

    /// Sends one complete message. Called from both the outbound caller and
    /// the inbound dispatcher's reply path, potentially concurrently.
    async fn send(&self, frame: String) -> Result<(), TransportError>;

    /// Initiates an orderly close. Idempotent.
    async fn close(&self) -> Result<(), TransportError>;
}

#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);
