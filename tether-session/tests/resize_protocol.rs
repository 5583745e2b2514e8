//! Resize protocol tests
//!
//! These tests observe sessions through a surface and transport that log
//! into one shared journal, so the relative order of refresh, fit and
//! notify is visible.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use tether_core::{
    AttachError, ConfigError, Container, FontMetrics, Geometry, GridSurface, HeadlessContainer,
    PixelSize, Reservation, Surface, TerminalOptions, ThemeRecord, ThemeRegistry,
};
use tether_session::{
    HostContext, OutboundEvent, RecordingTransport, Session, SessionError, SessionId,
    SharedConfig, StaticConfig, Transport, TransportError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Refresh(u16, u16),
    Resize(Geometry),
    Notify(Geometry),
}

type Journal = Rc<RefCell<Vec<Step>>>;

/// Grid surface that logs refreshes and resizes
struct JournalSurface {
    inner: GridSurface,
    journal: Journal,
}

impl Surface for JournalSurface {
    fn geometry(&self) -> Geometry {
        self.inner.geometry()
    }

    fn resize(&mut self, geometry: Geometry) {
        self.journal.borrow_mut().push(Step::Resize(geometry));
        self.inner.resize(geometry);
    }

    fn refresh(&mut self, from_row: u16, to_row: u16) {
        self.journal.borrow_mut().push(Step::Refresh(from_row, to_row));
        self.inner.refresh(from_row, to_row);
    }

    fn font_metrics(&self) -> FontMetrics {
        self.inner.font_metrics()
    }

    fn theme(&self) -> &ThemeRecord {
        self.inner.theme()
    }

    fn attach(&mut self, container: Option<&mut dyn Container>) -> Result<(), AttachError> {
        self.inner.attach(container)
    }

    fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }

    fn detach(&mut self, container: Option<&mut dyn Container>) {
        self.inner.detach(container)
    }
}

struct JournalTransport {
    journal: Journal,
}

impl Transport for JournalTransport {
    fn emit(&mut self, event: &OutboundEvent) -> Result<(), TransportError> {
        let OutboundEvent::Resize(geometry) = *event;
        self.journal.borrow_mut().push(Step::Notify(geometry));
        Ok(())
    }
}

/// 9x18 pixel cells
fn options_9x18(fit_on_resize: bool) -> TerminalOptions {
    TerminalOptions {
        font_size: 15.0,
        line_height: 1.2,
        fit_on_resize,
        ..TerminalOptions::default()
    }
}

fn journaled_session(
    config: SharedConfig,
    container: &mut HeadlessContainer,
) -> (Session<JournalSurface>, Journal) {
    let journal = Journal::default();
    let registry = ThemeRegistry::builtin();
    let surface_journal = Rc::clone(&journal);
    let session = Session::start_with(
        SessionId(7),
        Box::new(JournalTransport {
            journal: Rc::clone(&journal),
        }),
        Box::new(config),
        Some(container),
        Reservation::NONE,
        move |options| JournalSurface {
            inner: GridSurface::new(options, &registry),
            journal: surface_journal,
        },
    )
    .unwrap();
    journal.borrow_mut().clear();
    (session, journal)
}

#[test]
fn test_resize_steps_in_order_with_fit() {
    let config = SharedConfig::new(options_9x18(true));
    let mut container = HeadlessContainer::new(PixelSize::new(0, 0));
    let (mut session, journal) = journaled_session(config, &mut container);

    container.set_pixel_size(PixelSize::new(800, 480));
    session.on_resize(&container).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            Step::Refresh(0, 0),
            Step::Resize(Geometry::new(88, 26)),
            Step::Notify(Geometry::new(88, 26)),
        ]
    );
}

#[test]
fn test_resize_without_fit_still_notifies() {
    let config = SharedConfig::new(options_9x18(true));
    let mut container = HeadlessContainer::new(PixelSize::new(800, 480));
    let (mut session, journal) = journaled_session(config.clone(), &mut container);

    config.update(|o| o.fit_on_resize = false);
    container.set_pixel_size(PixelSize::new(100, 100));
    session.on_resize(&container).unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![Step::Refresh(0, 25), Step::Notify(Geometry::new(88, 26))]
    );
}

#[test]
fn test_repeated_resize_sends_identical_payload() {
    let recorder = RecordingTransport::new();
    let mut host = HostContext::new(
        Some(HeadlessContainer::new(PixelSize::new(0, 0))),
        ThemeRegistry::builtin(),
    );
    host.start_session(
        Box::new(recorder.clone()),
        Box::new(StaticConfig(options_9x18(true))),
    )
    .unwrap();

    host.container_mut()
        .unwrap()
        .set_pixel_size(PixelSize::new(800, 480));
    host.dispatch_resize().unwrap();
    host.dispatch_resize().unwrap();

    let expected = OutboundEvent::Resize(Geometry::new(88, 26));
    assert_eq!(recorder.events(), vec![expected, expected]);
}

#[test]
fn test_second_session_replaces_listener() {
    let first = RecordingTransport::new();
    let second = RecordingTransport::new();
    let mut host = HostContext::new(
        Some(HeadlessContainer::new(PixelSize::new(800, 480))),
        ThemeRegistry::builtin(),
    );

    let first_id = host
        .start_session(Box::new(first.clone()), Box::new(StaticConfig::default()))
        .unwrap();
    host.dispatch_resize().unwrap();
    assert_eq!(first.events().len(), 1);

    let second_id = host
        .start_session(Box::new(second.clone()), Box::new(StaticConfig::default()))
        .unwrap();
    assert_ne!(first_id, second_id);
    assert!(first.is_unbound());

    host.dispatch_resize().unwrap();
    assert_eq!(first.events().len(), 1);
    assert_eq!(second.events().len(), 1);
    assert_eq!(host.active_session().unwrap().id(), second_id);
}

#[test]
fn test_attach_failure_keeps_transport_silent() {
    let recorder = RecordingTransport::new();
    let mut host: HostContext = HostContext::new(None, ThemeRegistry::builtin());

    let err = host
        .start_session(Box::new(recorder.clone()), Box::new(StaticConfig::default()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Attach(_)));
    assert!(host.terminal().is_none());
    assert!(host.dispatch_resize().is_none());
    assert!(recorder.events().is_empty());
}

#[test]
fn test_config_failure_on_restart_leaves_nothing_published() {
    let first = RecordingTransport::new();
    let second = RecordingTransport::new();
    let mut host = HostContext::new(
        Some(HeadlessContainer::new(PixelSize::new(800, 480))),
        ThemeRegistry::builtin(),
    );
    host.start_session(Box::new(first.clone()), Box::new(StaticConfig::default()))
        .unwrap();

    let err = host
        .start_session(
            Box::new(second.clone()),
            Box::new(|| -> Result<TerminalOptions, ConfigError> {
                Err(ConfigError::Read("config store offline".into()))
            }),
        )
        .unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));

    assert!(first.is_unbound());
    assert!(host.terminal().is_none());
    assert!(host.active_session().is_none());
    assert!(host.dispatch_resize().is_none());
    assert!(first.events().is_empty());
    assert!(second.events().is_empty());
    assert_eq!(host.container().unwrap().mounted(), None);
}

#[test]
fn test_unknown_theme_degrades_to_default() {
    let mut host = HostContext::new(
        Some(HeadlessContainer::new(PixelSize::new(800, 480))),
        ThemeRegistry::builtin(),
    );
    let options = TerminalOptions {
        theme: "Missing Theme".to_string(),
        ..TerminalOptions::default()
    };
    host.start_session(
        Box::new(RecordingTransport::new()),
        Box::new(StaticConfig(options)),
    )
    .unwrap();

    let registry = ThemeRegistry::builtin();
    assert_eq!(host.terminal().unwrap().theme(), registry.default_theme());
}

proptest! {
    #[test]
    fn notify_always_matches_committed_geometry(
        sizes in prop::collection::vec((0u32..2000, 0u32..2000, any::<bool>()), 1..20)
    ) {
        let config = SharedConfig::new(options_9x18(true));
        let mut container = HeadlessContainer::new(PixelSize::new(640, 480));
        let (mut session, journal) = journaled_session(config.clone(), &mut container);

        for (width, height, fit) in sizes {
            journal.borrow_mut().clear();
            config.update(|o| o.fit_on_resize = fit);
            container.set_pixel_size(PixelSize::new(width, height));
            let outcome = session.on_resize(&container).unwrap();

            let steps = journal.borrow().clone();
            prop_assert!(matches!(steps.first(), Some(Step::Refresh(0, _))));
            prop_assert_eq!(steps.last(), Some(&Step::Notify(session.surface().geometry())));
            prop_assert_eq!(steps.len(), if fit { 3 } else { 2 });
            prop_assert_eq!(outcome.notified, session.surface().geometry());
            prop_assert!(outcome.notified.cols >= 1 && outcome.notified.rows >= 1);
        }
    }
}
