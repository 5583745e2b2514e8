//! User-adjustable terminal options
//!
//! A [`TerminalOptions`] value is a snapshot: callers read it, never mutate
//! a shared copy. Every field has a default so partial sources deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::theme::DEFAULT_THEME;

/// Cursor shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Block,
    Underline,
    Bar,
}

impl CursorStyle {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "block" => Some(CursorStyle::Block),
            "underline" => Some(CursorStyle::Underline),
            "bar" | "beam" => Some(CursorStyle::Bar),
            _ => None,
        }
    }
}

/// Terminal configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalOptions {
    /// Theme name, resolved through the theme registry
    pub theme: String,
    /// CSS-style font family list
    pub font_family: String,
    /// Font size in pixels
    pub font_size: f32,
    pub font_weight: u16,
    pub font_weight_bold: u16,
    /// Line height multiplier (1.0 = normal)
    pub line_height: f32,
    /// Extra horizontal pixels between cells
    pub letter_spacing: f32,
    pub cursor_style: CursorStyle,
    pub cursor_blink: bool,
    /// Number of lines kept above the visible grid
    pub scrollback: usize,
    /// Minimum WCAG contrast ratio between text and background (1.0 disables)
    pub minimum_contrast_ratio: f64,
    /// Characters that end a word on double-click selection
    pub word_separator: String,
    /// Recompute the grid from the container size on every resize
    pub fit_on_resize: bool,
}

pub const DEFAULT_FONT_FAMILY: &str = "\"Fira Code VF\", ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace";

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 18.0,
            font_weight: 400,
            font_weight_bold: 500,
            line_height: 1.06,
            letter_spacing: 0.0,
            cursor_style: CursorStyle::Block,
            cursor_blink: false,
            scrollback: 5000,
            minimum_contrast_ratio: 4.5,
            word_separator: " ()[]{}',\"`".to_string(),
            fit_on_resize: true,
        }
    }
}

impl TerminalOptions {
    /// Check that every field is within its accepted range
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, message: &str) -> Result<()> {
            Err(ConfigError::Invalid {
                field,
                message: message.to_string(),
            })
        }

        if !(4.0..=200.0).contains(&self.font_size) {
            return invalid("font_size", "Font size must be between 4.0 and 200.0");
        }
        if !(0.5..=3.0).contains(&self.line_height) {
            return invalid("line_height", "Line height must be between 0.5 and 3.0");
        }
        if !self.letter_spacing.is_finite() || self.letter_spacing < 0.0 {
            return invalid("letter_spacing", "Letter spacing must be a non-negative number");
        }
        if !(1.0..=21.0).contains(&self.minimum_contrast_ratio) {
            return invalid(
                "minimum_contrast_ratio",
                "Minimum contrast ratio must be between 1.0 and 21.0",
            );
        }
        if self.scrollback > 10_000_000 {
            return invalid("scrollback", "Scrollback must be at most 10,000,000 lines");
        }
        if !(100..=900).contains(&self.font_weight) || !(100..=900).contains(&self.font_weight_bold) {
            return invalid("font_weight", "Font weights must be between 100 and 900");
        }
        Ok(())
    }
}
