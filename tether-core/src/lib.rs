//! Tether Core - terminal surface model
//!
//! This crate provides the platform-independent pieces of a terminal front-end:
//! - Color values and the theme registry
//! - User-adjustable terminal options
//! - Font cell metrics and grid fitting
//! - The `Surface` trait and an in-memory grid surface
//!
//! Nothing here performs I/O; given the same inputs every operation produces
//! the same result.

mod color;
mod container;
mod error;
mod fit;
mod geometry;
mod options;
mod scrollback;
mod surface;
pub mod theme;

pub use color::Color;
pub use container::{Container, HeadlessContainer};
pub use error::{AttachError, ConfigError, ThemeError};
pub use fit::compute_fit;
pub use geometry::{FontMetrics, Geometry, PixelSize, Reservation, MONOSPACE_ADVANCE};
pub use options::{CursorStyle, TerminalOptions, DEFAULT_FONT_FAMILY};
pub use scrollback::Scrollback;
pub use surface::{GridSurface, RenderStats, Surface};
pub use theme::{ThemeRecord, ThemeRegistry, DEFAULT_THEME};
