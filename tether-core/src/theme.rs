//! Theme records and the theme registry
//!
//! A theme is a fixed set of color assignments. The registry maps theme
//! names to records; the built-in table is defined statically and user
//! themes can be layered on top of it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ThemeError;

/// Name of the theme used when none is configured or the configured one is unknown
pub const DEFAULT_THEME: &str = "Modern Midnight";

/// Standard ANSI color indices into [`ThemeRecord::ansi`]
pub mod ansi {
    pub const BLACK: usize = 0;
    pub const RED: usize = 1;
    pub const GREEN: usize = 2;
    pub const YELLOW: usize = 3;
    pub const BLUE: usize = 4;
    pub const MAGENTA: usize = 5;
    pub const CYAN: usize = 6;
    pub const WHITE: usize = 7;
    pub const BRIGHT_BLACK: usize = 8;
    pub const BRIGHT_WHITE: usize = 15;
}

/// Immutable color assignment for a terminal
///
/// Optional slots fall back to renderer defaults, see the accessor methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub foreground: Color,
    pub background: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_accent: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_inactive_background: Option<Color>,
    /// ANSI colors 0-7 followed by their bright variants 8-15
    pub ansi: [Color; 16],
}

impl ThemeRecord {
    const fn basic(foreground: u32, background: u32, ansi: [u32; 16]) -> Self {
        Self {
            foreground: Color::hex(foreground),
            background: Color::hex(background),
            cursor: None,
            cursor_accent: None,
            selection_background: None,
            selection_foreground: None,
            selection_inactive_background: None,
            ansi: palette(ansi),
        }
    }

    pub fn cursor(&self) -> Color {
        self.cursor.unwrap_or(self.foreground)
    }

    pub fn cursor_accent(&self) -> Color {
        self.cursor_accent.unwrap_or(self.background)
    }

    pub fn selection_background(&self) -> Color {
        self.selection_background
            .unwrap_or_else(|| self.foreground.with_alpha(77))
    }

    pub fn selection_foreground(&self) -> Color {
        self.selection_foreground.unwrap_or(self.foreground)
    }

    pub fn selection_inactive_background(&self) -> Color {
        self.selection_inactive_background
            .unwrap_or_else(|| self.selection_background())
    }

    /// Base color 0-7
    pub fn base(&self, index: usize) -> Option<Color> {
        (index < 8).then(|| self.ansi[index])
    }

    /// Bright variant of base color 0-7
    pub fn bright(&self, index: usize) -> Option<Color> {
        (index < 8).then(|| self.ansi[index + 8])
    }
}

const fn palette(hex: [u32; 16]) -> [Color; 16] {
    let mut out = [Color::BLACK; 16];
    let mut i = 0;
    while i < 16 {
        out[i] = Color::hex(hex[i]);
        i += 1;
    }
    out
}

/// VS Code default dark, base16 flavour
const VS_CODE_DARK: ThemeRecord = ThemeRecord {
    cursor: Some(Color::hex(0xd8d8d8)),
    ..ThemeRecord::basic(
        0xd8d8d8,
        0x181818,
        [
            0x181818, 0xab4642, 0xa1b56c, 0xf7ca88, 0x7cafc2, 0xba8baf, 0x86c1b9, 0xd8d8d8,
            0x585858, 0xab4642, 0xa1b56c, 0xf7ca88, 0x7cafc2, 0xba8baf, 0x86c1b9, 0xf8f8f8,
        ],
    )
};

const HYBRID: ThemeRecord = ThemeRecord::basic(
    0xc5c8c6,
    0x1d1f21,
    [
        0x282a2e, 0xa54242, 0x8c9440, 0xde935f, 0x5f819d, 0x85678f, 0x5e8d87, 0x707880,
        0x373b41, 0xcc6666, 0xb5bd68, 0xf0c674, 0x81a2be, 0xb294bb, 0x8abeb7, 0xc5c8c6,
    ],
);

const ROSE_PINE: ThemeRecord = ThemeRecord {
    cursor: Some(Color::hex(0x524f67)),
    ..ThemeRecord::basic(
        0xe0def4,
        0x191724,
        [
            0x26233a, 0xeb6f92, 0x31748f, 0xf6c177, 0x9ccfd8, 0xc4a7e7, 0xebbcba, 0xe0def4,
            0x6e6a86, 0xeb6f92, 0x31748f, 0xf6c177, 0x9ccfd8, 0xc4a7e7, 0xebbcba, 0xe0def4,
        ],
    )
};

const UBUNTU: ThemeRecord = ThemeRecord::basic(
    0xeeeeec,
    0x300a24,
    [
        0x2e3436, 0xcc0000, 0x4e9a06, 0xc4a000, 0x3465a4, 0x75507b, 0x06989a, 0xd3d7cf,
        0x555753, 0xef2929, 0x8ae234, 0xfce94f, 0x729fcf, 0xad7fa8, 0x34e2e2, 0xeeeeec,
    ],
);

const DRACULA: ThemeRecord = ThemeRecord::basic(
    0xf8f8f2,
    0x282a36,
    [
        0x000000, 0xff5555, 0x50fa7b, 0xf1fa8c, 0xbd93f9, 0xff79c6, 0x8be9fd, 0xbbbbbb,
        0x555555, 0xff5555, 0x50fa7b, 0xf1fa8c, 0xcaa9fa, 0xff79c6, 0x8be9fd, 0xffffff,
    ],
);

const GITHUB_DARK: ThemeRecord = ThemeRecord::basic(
    0xd1d5da,
    0x24292e,
    [
        0x586069, 0xea4a5a, 0x34d058, 0xffea7f, 0x2188ff, 0xb392f0, 0x39c5cf, 0xd1d5da,
        0x959da5, 0xf97583, 0x85e89d, 0xffea7f, 0x79b8ff, 0xb392f0, 0x56d4dd, 0xfafbfc,
    ],
);

const GRUVBOX_DARK: ThemeRecord = ThemeRecord::basic(
    0xebdbb2,
    0x282828,
    [
        0x282828, 0xcc241d, 0x98971a, 0xd79921, 0x458588, 0xb16286, 0x689d6a, 0xa89984,
        0x928374, 0xfb4934, 0xb8bb26, 0xfabd2f, 0x83a598, 0xd3869b, 0x8ec07c, 0xebdbb2,
    ],
);

const SOLARIZED_DARK: ThemeRecord = ThemeRecord::basic(
    0x839496,
    0x002b36,
    [
        0x073642, 0xdc322f, 0x859900, 0xb58900, 0x268bd2, 0xd33682, 0x2aa198, 0xeee8d5,
        0x002b36, 0xcb4b16, 0x586e75, 0x657b83, 0x839496, 0x6c71c4, 0x93a1a1, 0xfdf6e3,
    ],
);

const TOKYO_NIGHT: ThemeRecord = ThemeRecord::basic(
    0xa9b1d6,
    0x1a1b26,
    [
        0x32344a, 0xf7768e, 0x9ece6a, 0xe0af68, 0x7aa2f7, 0xad8ee6, 0x449dab, 0x787c99,
        0x444b6a, 0xff7a93, 0xb9f27c, 0xff9e64, 0x7da6ff, 0xbb9af7, 0x0db9d7, 0xacb0d0,
    ],
);

const MODERN_MIDNIGHT: ThemeRecord = ThemeRecord {
    cursor: Some(Color::hex(0x61ffca)),
    cursor_accent: Some(Color::hex(0x1c1e26)),
    selection_background: Some(Color::rgba(147, 163, 247, 77)),
    selection_foreground: Some(Color::hex(0xe4e4e4)),
    selection_inactive_background: Some(Color::rgba(147, 163, 247, 51)),
    ..ThemeRecord::basic(
        0xe4e4e4,
        0x1c1e26,
        [
            0x2b2d37, 0xff6b7d, 0x9affb3, 0xffe59e, 0x93a3f7, 0xd4a6ff, 0x89ddff, 0xe4e4e4,
            0x444b6a, 0xff8b98, 0xb4ffc9, 0xffecb3, 0xb3c2ff, 0xe2c4ff, 0xa8e7ff, 0xffffff,
        ],
    )
};

const NORD_PROFESSIONAL: ThemeRecord = ThemeRecord {
    cursor: Some(Color::hex(0x88c0d0)),
    cursor_accent: Some(Color::hex(0x2e3440)),
    selection_background: Some(Color::rgba(136, 192, 208, 77)),
    selection_foreground: Some(Color::hex(0xeceff4)),
    selection_inactive_background: Some(Color::rgba(136, 192, 208, 51)),
    ..ThemeRecord::basic(
        0xd8dee9,
        0x2e3440,
        [
            0x3b4252, 0xbf616a, 0xa3be8c, 0xebcb8b, 0x81a1c1, 0xb48ead, 0x88c0d0, 0xe5e9f0,
            0x4c566a, 0xcf6d75, 0xb1c89d, 0xf0d399, 0x8cafd2, 0xc49bb9, 0x93ccdc, 0xeceff4,
        ],
    )
};

const BUILTIN: &[(&str, ThemeRecord)] = &[
    ("VS Code Dark", VS_CODE_DARK),
    ("Hybrid", HYBRID),
    ("Rosé Pine", ROSE_PINE),
    ("Ubuntu", UBUNTU),
    ("Dracula", DRACULA),
    ("GitHub Dark", GITHUB_DARK),
    ("Gruvbox Dark", GRUVBOX_DARK),
    ("Solarized Dark", SOLARIZED_DARK),
    ("Tokyo Night", TOKYO_NIGHT),
    (DEFAULT_THEME, MODERN_MIDNIGHT),
    ("Nord Professional", NORD_PROFESSIONAL),
];

/// Mapping from theme name to theme record
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, ThemeRecord>,
}

impl ThemeRegistry {
    /// Registry holding only the built-in themes
    pub fn builtin() -> Self {
        let themes = BUILTIN
            .iter()
            .map(|(name, record)| (name.to_string(), *record))
            .collect();
        Self { themes }
    }

    /// Look up a theme by name
    ///
    /// Exact matches win; otherwise the name is matched case-insensitively.
    pub fn lookup(&self, name: &str) -> Result<&ThemeRecord, ThemeError> {
        self.entry(name).map(|(_, record)| record)
    }

    /// Look up a theme, returning its registered name with the record
    ///
    /// When several names differ from `name` only by case, the smallest
    /// registered name wins.
    pub fn entry(&self, name: &str) -> Result<(&str, &ThemeRecord), ThemeError> {
        if let Some((key, record)) = self.themes.get_key_value(name) {
            return Ok((key.as_str(), record));
        }
        self.themes
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(key, record)| (key.as_str(), record))
            .ok_or_else(|| ThemeError::Unknown(name.to_string()))
    }

    /// Look up a theme, substituting the default theme when it is unknown
    pub fn resolve(&self, name: &str) -> &ThemeRecord {
        self.resolve_entry(name).1
    }

    /// Like [`resolve`](Self::resolve), also returning the applied name
    pub fn resolve_entry(&self, name: &str) -> (&str, &ThemeRecord) {
        match self.entry(name) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("{}, falling back to '{}'", e, DEFAULT_THEME);
                (DEFAULT_THEME, self.default_theme())
            }
        }
    }

    /// The default theme record
    ///
    /// The default name can be shadowed by a user theme but never removed.
    pub fn default_theme(&self) -> &ThemeRecord {
        self.themes.get(DEFAULT_THEME).unwrap_or(&MODERN_MIDNIGHT)
    }

    /// Add or replace a theme, returning the record it replaced
    pub fn register(&mut self, name: impl Into<String>, record: ThemeRecord) -> Option<ThemeRecord> {
        self.themes.insert(name.into(), record)
    }

    /// Registered theme names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
