//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::services::ThemeMode;
use crate::types::Section;

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

    /// Theme for a configured preference (detects only for `auto`)
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::Dark,
            ThemeMode::Light => Self::Light,
        }
    }

    /// Primary text color (headers, body text)
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Active/accent color (selected card, keybinding keys)
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Secondary/muted text (separators, card labels, hints)
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Metric value color
    pub fn value(self) -> Color {
        match self {
            Self::Dark => Color::Rgb(0xff, 0xcf, 0x4d),
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Unselected card border
    pub fn card_border(self) -> Color {
        match self {
            Self::Dark => Color::Indexed(24),
            Self::Light => Color::Indexed(153),
        }
    }

    /// Error/negative indicator color
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Section heading color
    pub fn section(self, section: Section) -> Color {
        match (self, section) {
            (_, Section::Actions) => self.error(),
            (Self::Dark, Section::ProvidersSummary | Section::PartnerType) => Color::Green,
            (Self::Light, Section::ProvidersSummary | Section::PartnerType) => Color::Indexed(22),
            (Self::Dark, _) => Color::Magenta,
            (Self::Light, _) => Color::Indexed(90),
        }
    }
}
