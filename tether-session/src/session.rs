//! Session controller
//!
//! A session owns one surface, one transport and one configuration
//! accessor. It moves through
//! `Uninitialized -> Attached -> Active -> TornDown` and, while active,
//! runs the resize protocol: refresh the grid, optionally refit it to the
//! container, then tell the remote peer the committed geometry.

use std::fmt;

use tether_core::{
    compute_fit, AttachError, Container, Geometry, GridSurface, Reservation, Surface,
    TerminalOptions, ThemeRegistry,
};

use crate::config::ConfigSource;
use crate::error::Result;
use crate::transport::{OutboundEvent, Transport};

/// Identifies a session within its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Attached,
    Active,
    TornDown,
}

/// What one pass of the resize protocol did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Rows refreshed before any geometry change
    pub refreshed: (u16, u16),
    /// Geometry applied by the fit step, if it ran
    pub fitted: Option<Geometry>,
    /// Geometry sent to the peer
    pub notified: Geometry,
    /// Whether the transport accepted the notification
    pub delivered: bool,
}

/// A terminal session bound to a transport
pub struct Session<S: Surface = GridSurface> {
    id: SessionId,
    state: SessionState,
    surface: S,
    transport: Box<dyn Transport>,
    config: Box<dyn ConfigSource>,
    /// Fallback when the accessor fails mid-session
    last_options: TerminalOptions,
    reserve: Reservation,
}

impl Session<GridSurface> {
    /// Start a session on a [`GridSurface`] themed from `registry`
    pub fn start(
        id: SessionId,
        transport: Box<dyn Transport>,
        config: Box<dyn ConfigSource>,
        registry: &ThemeRegistry,
        container: Option<&mut dyn Container>,
        reserve: Reservation,
    ) -> Result<Self> {
        Self::start_with(id, transport, config, container, reserve, |options| {
            GridSurface::new(options, registry)
        })
    }
}

impl<S: Surface> Session<S> {
    /// Start a session on a surface produced by `build`
    ///
    /// `reserve` is withheld from the container on every fit. Fails without touching the transport when the configuration cannot
    /// be read or the container is missing.
    pub fn start_with(
        id: SessionId,
        transport: Box<dyn Transport>,
        config: Box<dyn ConfigSource>,
        container: Option<&mut dyn Container>,
        reserve: Reservation,
        build: impl FnOnce(&TerminalOptions) -> S,
    ) -> Result<Self> {
        let mut state = SessionState::Uninitialized;
        log::debug!("{}: {:?}", id, state);

        let options = config.current()?;
        let mut surface = build(&options);

        let Some(container) = container else {
            return Err(AttachError::MissingContainer.into());
        };

        if options.fit_on_resize {
            let fitted = compute_fit(container.pixel_size(), &surface.font_metrics(), reserve);
            surface.resize(fitted);
        }
        surface.attach(Some(container))?;
        state = SessionState::Attached;
        log::debug!("{}: {:?} at {:?}", id, state, surface.geometry());

        state = SessionState::Active;
        log::info!("{}: {:?}", id, state);

        Ok(Self {
            id,
            state,
            surface,
            transport,
            config,
            last_options: options,
            reserve,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reservation(&self) -> Reservation {
        self.reserve
    }

    /// Pixels withheld from the container from the next fit on
    pub fn set_reservation(&mut self, reserve: Reservation) {
        self.reserve = reserve;
    }

    /// Current options, or the last snapshot that could be read
    fn options(&mut self) -> &TerminalOptions {
        match self.config.current() {
            Ok(options) => self.last_options = options,
            Err(e) => log::warn!("{}: {}, using last known options", self.id, e),
        }
        &self.last_options
    }

    /// Run the resize protocol against `container`
    ///
    /// Returns `None` when the session is not active.
    pub fn on_resize(&mut self, container: &dyn Container) -> Option<ResizeOutcome> {
        if self.state != SessionState::Active {
            log::debug!("{}: ignoring resize in {:?}", self.id, self.state);
            return None;
        }

        let last_row = self.surface.geometry().last_row();
        self.surface.refresh(0, last_row);

        let fitted = if self.options().fit_on_resize {
            let geometry =
                compute_fit(container.pixel_size(), &self.surface.font_metrics(), self.reserve);
            self.surface.resize(geometry);
            Some(self.surface.geometry())
        } else {
            None
        };

        let notified = self.surface.geometry();
        let delivered = match self.transport.emit(&OutboundEvent::Resize(notified)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}: failed to send resize: {}", self.id, e);
                false
            }
        };

        Some(ResizeOutcome {
            refreshed: (0, last_row),
            fitted,
            notified,
            delivered,
        })
    }

    /// Tear the session down: unbind the transport and clear the container
    ///
    /// Ending an already torn down session does nothing.
    pub fn end(&mut self, container: Option<&mut dyn Container>) {
        if self.state == SessionState::TornDown {
            return;
        }
        self.transport.unbind();
        self.surface.detach(container);
        self.state = SessionState::TornDown;
        log::info!("{}: {:?}", self.id, self.state);
    }
}

impl<S: Surface> fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("geometry", &self.surface.geometry())
            .finish()
    }
}
