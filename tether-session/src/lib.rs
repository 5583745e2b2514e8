//! Tether Session - terminal session bootstrap and resize synchronization
//!
//! This crate wires a terminal surface to a remote peer:
//! - `ConfigSource`: synchronous access to the current options
//! - `Transport`: named events sent to the peer
//! - `Session`: builds and attaches the surface, runs the resize protocol
//! - `HostContext`: one host page, its container and its single resize listener
//!
//! Everything runs on the caller's thread. Resize handling is synchronous:
//! refresh, optional fit, then notify.

mod config;
mod error;
mod host;
mod session;
mod transport;

pub use config::{ConfigSource, SharedConfig, StaticConfig};
pub use error::{Result, SessionError, TransportError};
pub use host::HostContext;
pub use session::{ResizeOutcome, Session, SessionId, SessionState};
pub use transport::{JsonLinesTransport, OutboundEvent, RecordingTransport, Transport};
