//! Terminal surfaces
//!
//! [`Surface`] is the seam between session logic and the widget that draws
//! the grid. [`GridSurface`] is the in-memory implementation: it keeps the
//! visible lines, a bounded scrollback and the appearance resolved from a
//! [`TerminalOptions`] snapshot at construction.

use std::collections::VecDeque;

use crate::color::Color;
use crate::container::Container;
use crate::error::AttachError;
use crate::geometry::{FontMetrics, Geometry};
use crate::options::{CursorStyle, TerminalOptions};
use crate::scrollback::Scrollback;
use crate::theme::{ThemeRecord, ThemeRegistry};

/// An interactive terminal grid
pub trait Surface {
    /// Current grid size; always at least 1x1
    fn geometry(&self) -> Geometry;

    /// Change the grid size; zero dimensions are raised to one
    fn resize(&mut self, geometry: Geometry);

    /// Re-render rows `from_row..=to_row`, clamped to the grid
    fn refresh(&mut self, from_row: u16, to_row: u16);

    /// Size of one character cell in pixels
    fn font_metrics(&self) -> FontMetrics;

    /// Applied theme
    fn theme(&self) -> &ThemeRecord;

    /// Clear `container` and mount this surface into it
    fn attach(&mut self, container: Option<&mut dyn Container>) -> Result<(), AttachError>;

    /// Whether the surface is mounted
    fn is_attached(&self) -> bool;

    /// Unmount and clear `container`
    fn detach(&mut self, container: Option<&mut dyn Container>);
}

/// Rendering bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of refreshes that touched at least one row
    pub frames: u64,
    /// Last refreshed row range, inclusive
    pub last_refresh: Option<(u16, u16)>,
}

/// In-memory terminal grid
#[derive(Debug, Clone)]
pub struct GridSurface {
    geometry: Geometry,
    lines: VecDeque<String>,
    scrollback: Scrollback,
    theme_name: String,
    theme: ThemeRecord,
    metrics: FontMetrics,
    cursor_style: CursorStyle,
    cursor_blink: bool,
    minimum_contrast_ratio: f64,
    word_separator: String,
    attached: bool,
    render: RenderStats,
}

impl GridSurface {
    /// Build a surface from an options snapshot
    ///
    /// An unknown theme name degrades to the registry's default theme.
    pub fn new(options: &TerminalOptions, registry: &ThemeRegistry) -> Self {
        Self::with_geometry(options, registry, Geometry::default())
    }

    /// Build a surface with an explicit initial geometry
    pub fn with_geometry(
        options: &TerminalOptions,
        registry: &ThemeRegistry,
        geometry: Geometry,
    ) -> Self {
        let geometry = geometry.clamped();
        let (theme_name, theme) = registry.resolve_entry(&options.theme);
        let (theme_name, theme) = (theme_name.to_string(), *theme);
        log::debug!(
            "Creating {}x{} surface with theme '{}' and font {} @ {}px",
            geometry.cols,
            geometry.rows,
            theme_name,
            options.font_family,
            options.font_size
        );

        Self {
            geometry,
            lines: (0..geometry.rows).map(|_| String::new()).collect(),
            scrollback: Scrollback::new(options.scrollback),
            theme_name,
            theme,
            metrics: FontMetrics::from_options(options),
            cursor_style: options.cursor_style,
            cursor_blink: options.cursor_blink,
            minimum_contrast_ratio: options.minimum_contrast_ratio,
            word_separator: options.word_separator.clone(),
            attached: false,
            render: RenderStats::default(),
        }
    }

    /// Name of the applied theme after fallback
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    pub fn cursor_blink(&self) -> bool {
        self.cursor_blink
    }

    pub fn render_stats(&self) -> RenderStats {
        self.render
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Visible line at `row`
    pub fn line(&self, row: u16) -> Option<&str> {
        self.lines.get(row as usize).map(String::as_str)
    }

    /// Append a line at the bottom, scrolling the top line into history
    pub fn write_line(&mut self, text: impl Into<String>) {
        if let Some(top) = self.lines.pop_front() {
            self.scrollback.push(top);
        }
        self.lines.push_back(text.into());
    }

    /// Foreground color adjusted to the configured minimum contrast
    pub fn effective_foreground(&self, color: Color) -> Color {
        color.ensure_contrast(&self.theme.background, self.minimum_contrast_ratio)
    }

    /// Whether `c` ends a word for selection purposes
    pub fn is_word_separator(&self, c: char) -> bool {
        self.word_separator.contains(c)
    }

    /// Bounds `(start, end)` of the word covering `col` in visible `row`
    pub fn word_at(&self, row: u16, col: u16) -> Option<(usize, usize)> {
        let chars: Vec<char> = self.line(row)?.chars().collect();
        let col = col as usize;
        if col >= chars.len() || self.is_word_separator(chars[col]) {
            return None;
        }
        let start = chars[..col]
            .iter()
            .rposition(|&c| self.is_word_separator(c))
            .map_or(0, |i| i + 1);
        let end = chars[col..]
            .iter()
            .position(|&c| self.is_word_separator(c))
            .map_or(chars.len(), |i| col + i);
        Some((start, end))
    }
}

impl Surface for GridSurface {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn resize(&mut self, geometry: Geometry) {
        let geometry = geometry.clamped();
        if geometry == self.geometry {
            return;
        }

        let new_rows = geometry.rows as usize;
        // Shrinking keeps the bottom of the grid
        while self.lines.len() > new_rows {
            if let Some(top) = self.lines.pop_front() {
                self.scrollback.push(top);
            }
        }
        // Growing pulls history back in before adding blank lines
        while self.lines.len() < new_rows {
            match self.scrollback.pop() {
                Some(line) => self.lines.push_front(line),
                None => self.lines.push_back(String::new()),
            }
        }

        log::debug!(
            "Surface resized {}x{} -> {}x{}",
            self.geometry.cols,
            self.geometry.rows,
            geometry.cols,
            geometry.rows
        );
        self.geometry = geometry;
    }

    fn refresh(&mut self, from_row: u16, to_row: u16) {
        let last = self.geometry.last_row();
        let from = from_row.min(last);
        let to = to_row.min(last);
        if from > to {
            return;
        }
        self.render.frames += 1;
        self.render.last_refresh = Some((from, to));
    }

    fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn theme(&self) -> &ThemeRecord {
        &self.theme
    }

    fn attach(&mut self, container: Option<&mut dyn Container>) -> Result<(), AttachError> {
        let container = container.ok_or(AttachError::MissingContainer)?;
        container.clear();
        container.mount(self.geometry);
        self.attached = true;
        Ok(())
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn detach(&mut self, container: Option<&mut dyn Container>) {
        if let Some(container) = container {
            container.clear();
        }
        self.attached = false;
    }
}
