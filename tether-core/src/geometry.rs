//! Grid geometry, container pixel sizes and font cell metrics

use serde::{Deserialize, Serialize};

use crate::options::TerminalOptions;

/// Terminal size in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    /// Number of columns (characters)
    pub cols: u16,
    /// Number of rows (characters)
    pub rows: u16,
}

impl Geometry {
    /// Smallest renderable grid
    pub const MIN: Geometry = Geometry { cols: 1, rows: 1 };

    /// Create a new geometry
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Same geometry with both dimensions raised to at least one cell
    pub fn clamped(self) -> Self {
        Self {
            cols: self.cols.max(1),
            rows: self.rows.max(1),
        }
    }

    /// Index of the last row
    pub fn last_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Container size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Advance width of a monospace glyph relative to the font size
pub const MONOSPACE_ADVANCE: f32 = 0.6;

/// Size of a single character cell in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl FontMetrics {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Derive cell metrics from font size, line height and letter spacing
    pub fn from_options(options: &TerminalOptions) -> Self {
        Self {
            cell_width: options.font_size * MONOSPACE_ADVANCE + options.letter_spacing,
            cell_height: options.font_size * options.line_height,
        }
    }

    /// Whether both dimensions are usable divisors
    pub fn is_valid(&self) -> bool {
        self.cell_width.is_finite()
            && self.cell_height.is_finite()
            && self.cell_width > 0.0
            && self.cell_height > 0.0
    }
}

/// Pixels withheld from the container before fitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reservation {
    /// Width of a vertical scrollbar
    pub scrollbar_width: u32,
    /// Padding on the left plus the right edge
    pub horizontal_padding: u32,
    /// Padding on the top plus the bottom edge
    pub vertical_padding: u32,
}

impl Reservation {
    pub const NONE: Reservation = Reservation {
        scrollbar_width: 0,
        horizontal_padding: 0,
        vertical_padding: 0,
    };

    /// Pixel size left for cells after the reservation
    pub fn available(&self, size: PixelSize) -> PixelSize {
        PixelSize {
            width: size
                .width
                .saturating_sub(self.scrollbar_width)
                .saturating_sub(self.horizontal_padding),
            height: size.height.saturating_sub(self.vertical_padding),
        }
    }
}
