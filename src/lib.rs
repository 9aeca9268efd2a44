//! An OCPP-J 1.6 request/response engine: envelope framing, per-action
//! schema validation, camelCase/snake_case key translation, handler
//! dispatch, and the single-outstanding-call session discipline OCPP
//! requires. The concrete WebSocket transport and the domain behaviour
//! behind each handler are supplied by the host application.

pub mod envelope;
pub mod error;
pub mod handler;
pub mod schema_registry;
pub mod session;
pub mod transport;
pub mod translate;

pub use envelope::Envelope;
pub use error::{ErrorCode, OcppError};
pub use handler::{HandlerArgs, HandlerRegistry};
pub use schema_registry::{Action, OcppVersion};
pub use session::{Session, SessionConfig};
pub use transport::{Transport, TransportError};
