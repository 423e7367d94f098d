//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::services::scale::Intensity;
use crate::types::CLASS_FILLED;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Cursor, keybinding keys and other interactive elements
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Labels, separators, hints
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Section headers and dates
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    pub fn tooltip_bg(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(238),
            Self::Light => Color::Indexed(236),
        }
    }

    pub fn tooltip_fg(self) -> Color {
        Color::White
    }

    /// Intensity color, GitHub-style green gradient
    pub fn intensity_color(self, level: Intensity) -> Color {
        match self {
            Self::Dark => match level {
                Intensity::None => Color::Indexed(236),
                Intensity::Low => Color::Indexed(22),
                Intensity::Medium => Color::Indexed(28),
                Intensity::High => Color::Indexed(34),
                Intensity::Max => Color::Indexed(40),
            },
            Self::Light => match level {
                Intensity::None => Color::Indexed(254),
                Intensity::Low => Color::Indexed(194),
                Intensity::Medium => Color::Indexed(157),
                Intensity::High => Color::Indexed(71),
                Intensity::Max => Color::Indexed(28),
            },
        }
    }

    /// Color for a cell's class name. Unknown classes use the accent color.
    pub fn cell_color(self, class_name: &str) -> Color {
        if class_name == CLASS_FILLED {
            return self.intensity_color(Intensity::High);
        }
        match Intensity::from_class_name(class_name) {
            Some(level) => self.intensity_color(level),
            None => self.accent(),
        }
    }
}
