//! Message transport to the remote peer
//!
//! The session only ever sends; receiving remote output is the host's
//! business. Events are encoded as `{"event": ..., "payload": ...}`.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tether_core::Geometry;

use crate::error::TransportError;

/// Events sent to the remote peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "lowercase")]
pub enum OutboundEvent {
    /// The terminal grid changed size
    Resize(Geometry),
}

impl OutboundEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::Resize(_) => "resize",
        }
    }
}

/// A channel that can emit named events
pub trait Transport {
    /// Send one event
    fn emit(&mut self, event: &OutboundEvent) -> Result<(), TransportError>;

    /// Release the channel; later emits may fail
    fn unbind(&mut self) {}
}

/// Writes one JSON object per line
pub struct JsonLinesTransport<W: Write> {
    writer: Option<W>,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    /// Recover the writer, if still bound
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn emit(&mut self, event: &OutboundEvent) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::Unbound)?;
        serde_json::to_writer(&mut *writer, event)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn unbind(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                log::warn!("Failed to flush transport on unbind: {}", e);
            }
        }
    }
}

/// In-memory transport whose history can be inspected through clones
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    events: Rc<RefCell<Vec<OutboundEvent>>>,
    unbound: Rc<RefCell<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far, oldest first
    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events.borrow().clone()
    }

    pub fn is_unbound(&self) -> bool {
        *self.unbound.borrow()
    }
}

impl Transport for RecordingTransport {
    fn emit(&mut self, event: &OutboundEvent) -> Result<(), TransportError> {
        if self.is_unbound() {
            return Err(TransportError::Unbound);
        }
        self.events.borrow_mut().push(*event);
        Ok(())
    }

    fn unbind(&mut self) {
        *self.unbound.borrow_mut() = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_wire_format() {
        let event = OutboundEvent::Resize(Geometry::new(88, 26));
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "resize", "payload": {"cols": 88, "rows": 26}})
        );
        assert_eq!(event.name(), "resize");
    }

    #[test]
    fn test_json_lines_transport() {
        let mut transport = JsonLinesTransport::new(Vec::new());
        transport
            .emit(&OutboundEvent::Resize(Geometry::new(80, 24)))
            .unwrap();
        transport
            .emit(&OutboundEvent::Resize(Geometry::new(100, 30)))
            .unwrap();
        let output = String::from_utf8(transport.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            r#"{"event":"resize","payload":{"cols":100,"rows":30}}"#
        );
    }

    #[test]
    fn test_json_lines_unbound() {
        let mut transport = JsonLinesTransport::new(Vec::new());
        transport.unbind();
        assert!(matches!(
            transport.emit(&OutboundEvent::Resize(Geometry::MIN)),
            Err(TransportError::Unbound)
        ));
    }

    /// Accepts writes but fails every flush
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer gone"))
        }
    }

    #[test]
    fn test_unbind_releases_writer_when_flush_fails() {
        let mut transport = JsonLinesTransport::new(BrokenPipe);
        assert!(matches!(
            transport.emit(&OutboundEvent::Resize(Geometry::MIN)),
            Err(TransportError::Io(_))
        ));
        transport.unbind();
        assert!(transport.into_inner().is_none());
    }

    #[test]
    fn test_recording_transport_shares_history() {
        let recorder = RecordingTransport::new();
        let mut handle = recorder.clone();
        handle.emit(&OutboundEvent::Resize(Geometry::MIN)).unwrap();
        assert_eq!(recorder.events(), vec![OutboundEvent::Resize(Geometry::MIN)]);
        handle.unbind();
        assert!(recorder.is_unbound());
        assert!(handle.emit(&OutboundEvent::Resize(Geometry::MIN)).is_err());
    }
}
