//! Host context
//!
//! The host is the page a terminal lives in. It owns the container, the one
//! resize listener slot, the published handle to the active terminal and the
//! configuration panel callbacks. There is at most one active session per
//! host; starting another replaces it.

use tether_core::{
    AttachError, ConfigError, Container, GridSurface, HeadlessContainer, Reservation,
    TerminalOptions, ThemeRegistry,
};

use crate::config::ConfigSource;
use crate::error::Result;
use crate::session::{ResizeOutcome, Session, SessionId, SessionState};
use crate::transport::Transport;

type CloseConfigHandler = Box<dyn FnMut()>;
type SaveConfigHandler = Box<dyn FnMut(&TerminalOptions) -> std::result::Result<(), ConfigError>>;

/// One host page
pub struct HostContext<C: Container = HeadlessContainer> {
    container: Option<C>,
    registry: ThemeRegistry,
    session: Option<Session>,
    /// Session the resize listener dispatches to
    resize_listener: Option<SessionId>,
    next_id: u64,
    reserve: Reservation,
    close_config: Option<CloseConfigHandler>,
    save_config: Option<SaveConfigHandler>,
}

impl<C: Container> HostContext<C> {
    pub fn new(container: Option<C>, registry: ThemeRegistry) -> Self {
        Self {
            container,
            registry,
            session: None,
            resize_listener: None,
            next_id: 1,
            reserve: Reservation::NONE,
            close_config: None,
            save_config: None,
        }
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    pub fn container_mut(&mut self) -> Option<&mut C> {
        self.container.as_mut()
    }

    pub fn reservation(&self) -> Reservation {
        self.reserve
    }

    /// Pixels the container keeps for its scrollbar and padding
    ///
    /// Applies to the active session from its next resize and to every
    /// session started later.
    pub fn set_reservation(&mut self, reserve: Reservation) {
        self.reserve = reserve;
        if let Some(session) = self.session.as_mut() {
            session.set_reservation(reserve);
        }
    }

    /// Provide a container, ending any session mounted in the previous one
    pub fn set_container(&mut self, container: C) -> Option<C> {
        self.end_session();
        self.container.replace(container)
    }

    /// Remove the container, ending any session mounted in it
    pub fn take_container(&mut self) -> Option<C> {
        self.end_session();
        self.container.take()
    }

    /// Start a session, replacing the active one
    ///
    /// A missing container fails before anything changes. Otherwise the
    /// previous session is torn down first, so its resize listener is gone
    /// even if the new session fails to start. The terminal handle is only
    /// published once the new session is active.
    pub fn start_session(
        &mut self,
        transport: Box<dyn Transport>,
        config: Box<dyn ConfigSource>,
    ) -> Result<SessionId> {
        if self.container.is_none() {
            log::warn!("Cannot start terminal session: {}", AttachError::MissingContainer);
            return Err(AttachError::MissingContainer.into());
        }

        self.end_session();

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let container = self.container.as_mut().map(|c| c as &mut dyn Container);
        let session = Session::start(id, transport, config, &self.registry, container, self.reserve)?;

        self.resize_listener = Some(id);
        self.session = Some(session);
        log::debug!("Published terminal handle for {}", id);
        Ok(id)
    }

    /// End the active session, if any
    pub fn end_session(&mut self) {
        self.resize_listener = None;
        if let Some(mut session) = self.session.take() {
            let container = self.container.as_mut().map(|c| c as &mut dyn Container);
            session.end(container);
        }
    }

    /// Deliver a resize event to the installed listener
    ///
    /// Exactly one session is notified, or none when no listener is installed.
    pub fn dispatch_resize(&mut self) -> Option<ResizeOutcome> {
        let listener = self.resize_listener?;
        let session = self.session.as_mut().filter(|s| s.id() == listener)?;
        let container = self.container.as_ref()?;
        session.on_resize(container)
    }

    /// Published handle to the active terminal
    pub fn terminal(&self) -> Option<&GridSurface> {
        self.active_session().map(Session::surface)
    }

    pub fn terminal_mut(&mut self) -> Option<&mut GridSurface> {
        self.session
            .as_mut()
            .filter(|s| s.state() == SessionState::Active)
            .map(Session::surface_mut)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.session
            .as_ref()
            .filter(|s| s.state() == SessionState::Active)
    }

    pub fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.session
            .as_mut()
            .filter(|s| s.state() == SessionState::Active)
    }

    pub fn set_close_config_handler(&mut self, handler: impl FnMut() + 'static) {
        self.close_config = Some(Box::new(handler));
    }

    pub fn set_save_config_handler(
        &mut self,
        handler: impl FnMut(&TerminalOptions) -> std::result::Result<(), ConfigError> + 'static,
    ) {
        self.save_config = Some(Box::new(handler));
    }

    /// Invoke the close-configuration callback; `false` when none is set
    pub fn close_config(&mut self) -> bool {
        match self.close_config.as_mut() {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Invoke the save-configuration callback; `Ok(false)` when none is set
    pub fn save_config(
        &mut self,
        options: &TerminalOptions,
    ) -> std::result::Result<bool, ConfigError> {
        match self.save_config.as_mut() {
            Some(handler) => handler(options).map(|()| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use crate::transport::RecordingTransport;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tether_core::{Geometry, PixelSize, Surface};

    fn host() -> HostContext {
        HostContext::new(
            Some(HeadlessContainer::new(PixelSize::new(800, 480))),
            ThemeRegistry::builtin(),
        )
    }

    #[test]
    fn test_start_publishes_handle() {
        let mut host = host();
        assert!(host.terminal().is_none());
        host.start_session(
            Box::new(RecordingTransport::new()),
            Box::new(StaticConfig::default()),
        )
        .unwrap();
        assert!(host.terminal().is_some());
        assert!(host.terminal().unwrap().is_attached());
    }

    #[test]
    fn test_missing_container_publishes_nothing() {
        let mut host: HostContext = HostContext::new(None, ThemeRegistry::builtin());
        let recorder = RecordingTransport::new();
        let result = host.start_session(
            Box::new(recorder.clone()),
            Box::new(StaticConfig::default()),
        );
        assert!(matches!(
            result,
            Err(crate::SessionError::Attach(AttachError::MissingContainer))
        ));
        assert!(host.terminal().is_none());
        assert!(host.dispatch_resize().is_none());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_take_container_ends_session() {
        let mut host = host();
        let recorder = RecordingTransport::new();
        host.start_session(Box::new(recorder.clone()), Box::new(StaticConfig::default()))
            .unwrap();
        let container = host.take_container().unwrap();
        assert_eq!(container.mounted(), None);
        assert!(recorder.is_unbound());
        assert!(host.terminal().is_none());
        assert!(host.dispatch_resize().is_none());
    }

    #[test]
    fn test_reservation_reaches_sessions() {
        let mut host = host();
        let scrollbar = Reservation {
            scrollbar_width: 15,
            ..Reservation::NONE
        };
        host.set_reservation(scrollbar);
        host.start_session(
            Box::new(RecordingTransport::new()),
            Box::new(StaticConfig::default()),
        )
        .unwrap();
        assert_eq!(host.active_session().unwrap().reservation(), scrollbar);

        host.set_reservation(Reservation::NONE);
        assert_eq!(
            host.active_session().unwrap().reservation(),
            Reservation::NONE
        );
    }

    #[test]
    fn test_dispatch_resize_without_session() {
        let mut host = host();
        assert!(host.dispatch_resize().is_none());
    }

    #[test]
    fn test_terminal_mut_reaches_surface() {
        let mut host = host();
        host.start_session(
            Box::new(RecordingTransport::new()),
            Box::new(StaticConfig::default()),
        )
        .unwrap();
        host.terminal_mut().unwrap().resize(Geometry::new(3, 3));
        assert_eq!(host.terminal().unwrap().geometry(), Geometry::new(3, 3));
    }

    #[test]
    fn test_config_callbacks() {
        let mut host = host();
        assert!(!host.close_config());
        assert_eq!(host.save_config(&TerminalOptions::default()), Ok(false));

        let closed = Rc::new(RefCell::new(0));
        let saved = Rc::new(RefCell::new(Vec::new()));
        let closed_handle = Rc::clone(&closed);
        let saved_handle = Rc::clone(&saved);
        host.set_close_config_handler(move || *closed_handle.borrow_mut() += 1);
        host.set_save_config_handler(move |options| {
            saved_handle.borrow_mut().push(options.theme.clone());
            Ok(())
        });

        assert!(host.close_config());
        let options = TerminalOptions {
            theme: "Dracula".to_string(),
            ..TerminalOptions::default()
        };
        assert_eq!(host.save_config(&options), Ok(true));
        assert_eq!(*closed.borrow(), 1);
        assert_eq!(*saved.borrow(), vec!["Dracula".to_string()]);
    }

    #[test]
    fn test_save_config_error_propagates() {
        let mut host = host();
        host.set_save_config_handler(|_| Err(ConfigError::Read("read-only".into())));
        assert!(host.save_config(&TerminalOptions::default()).is_err());
    }
}
