//! Theming and color definitions.
//!
//! Colors are ANSI/indexed so they follow the terminal's own palette, with
//! a light and a dark variant of each role.

use ratatui::style::{Color, Modifier, Style};

use crate::app::ToastLevel;
use crate::config::ThemeMode;
use crate::content::LineKind;

/// Terminal background the palette is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Resolve a configured mode, detecting the background for `Auto`.
    pub fn resolve(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::Light,
            ThemeMode::Dark => Self::Dark,
            ThemeMode::Auto => std::env::var("COLORFGBG")
                .ok()
                .and_then(|value| Self::from_colorfgbg(&value))
                .unwrap_or_default(),
        }
    }

    /// Parse `COLORFGBG` (`fg;bg` or `fg;default;bg`); bg 7 and 9-15 are light.
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg == 7 || (9..=15).contains(&bg) {
            Self::Light
        } else {
            Self::Dark
        })
    }
}

/// Styles for every UI role under one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    theme: Theme,
}

impl Palette {
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    const fn pick(&self, light: Color, dark: Color) -> Color {
        match self.theme {
            Theme::Light => light,
            Theme::Dark => dark,
        }
    }

    const fn accent(&self) -> Color {
        self.pick(Color::Indexed(25), Color::LightBlue)
    }

    const fn muted(&self) -> Color {
        self.pick(Color::Indexed(242), Color::Indexed(245))
    }

    /// Style for a laid-out document row.
    pub fn line(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Hero => Style::default()
                .fg(self.pick(Color::Indexed(17), Color::White))
                .add_modifier(Modifier::BOLD),
            LineKind::Headline => Style::default().fg(self.accent()),
            LineKind::SectionTitle => Style::default()
                .fg(self.pick(Color::Indexed(24), Color::Cyan))
                .add_modifier(Modifier::BOLD),
            LineKind::Rule => Style::default().fg(self.accent()),
            LineKind::Heading => Style::default()
                .fg(self.pick(Color::Indexed(22), Color::Green))
                .add_modifier(Modifier::BOLD),
            LineKind::Label => Style::default()
                .fg(self.pick(Color::Indexed(58), Color::Yellow))
                .add_modifier(Modifier::BOLD),
            LineKind::Meta => Style::default()
                .fg(self.muted())
                .add_modifier(Modifier::ITALIC),
            LineKind::Tags => Style::default().fg(self.pick(Color::Indexed(90), Color::Magenta)),
            LineKind::Link => Style::default()
                .fg(self.accent())
                .add_modifier(Modifier::UNDERLINED),
            LineKind::FormHint => Style::default()
                .fg(self.pick(Color::Indexed(88), Color::LightRed))
                .add_modifier(Modifier::BOLD),
            LineKind::Paragraph | LineKind::Bullet | LineKind::Blank => Style::default(),
        }
    }

    pub fn nav_bar(&self) -> Style {
        Style::default()
            .bg(self.pick(Color::Indexed(255), Color::Indexed(235)))
            .fg(self.pick(Color::Indexed(238), Color::Indexed(252)))
    }

    pub fn nav_border(&self) -> Style {
        self.nav_bar().fg(self.pick(Color::Indexed(250), Color::Indexed(240)))
    }

    pub fn brand(&self) -> Style {
        self.nav_bar()
            .fg(self.pick(Color::Black, Color::White))
            .add_modifier(Modifier::BOLD)
    }

    /// A nav item; the active one is highlighted, the keyboard focus reversed.
    pub fn nav_item(&self, active: bool, focused: bool) -> Style {
        let mut style = self.nav_bar();
        if active {
            style = style
                .fg(self.accent())
                .bg(self.pick(Color::Indexed(153), Color::Indexed(17)))
                .add_modifier(Modifier::BOLD);
        }
        if focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }

    pub fn status_bar(&self) -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn popup(&self) -> Style {
        match self.theme {
            Theme::Light => Style::default().bg(Color::White).fg(Color::Black),
            Theme::Dark => Style::default().bg(Color::Black).fg(Color::White),
        }
    }

    pub fn popup_heading(&self) -> Style {
        Style::default()
            .fg(self.pick(Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.muted())
    }

    pub fn field(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.muted())
        }
    }

    pub fn toast(&self, level: ToastLevel) -> Style {
        match level {
            ToastLevel::Info => Style::default().bg(Color::DarkGray).fg(Color::White),
            ToastLevel::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
            ToastLevel::Error => Style::default().bg(Color::Red).fg(Color::White),
        }
    }

    pub fn success(&self) -> Style {
        Style::default().bg(self.pick(Color::Indexed(194), Color::Indexed(22))).fg(
            self.pick(Color::Indexed(22), Color::White),
        )
    }

    pub fn failure(&self) -> Style {
        Style::default().bg(self.pick(Color::Indexed(224), Color::Indexed(52))).fg(
            self.pick(Color::Indexed(88), Color::White),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_detection() {
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;default;7"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn test_explicit_modes_skip_detection() {
        assert_eq!(Theme::resolve(ThemeMode::Light), Theme::Light);
        assert_eq!(Theme::resolve(ThemeMode::Dark), Theme::Dark);
    }

    #[test]
    fn test_active_nav_item_is_bold() {
        let palette = Palette::new(Theme::Dark);
        assert!(palette.nav_item(true, false).add_modifier.contains(Modifier::BOLD));
        assert!(!palette.nav_item(false, false).add_modifier.contains(Modifier::BOLD));
        assert!(palette.nav_item(false, true).add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_themes_differ_for_titles() {
        let light = Palette::new(Theme::Light).line(LineKind::SectionTitle);
        let dark = Palette::new(Theme::Dark).line(LineKind::SectionTitle);
        assert_ne!(light.fg, dark.fg);
        assert_eq!(Palette::default().line(LineKind::Paragraph), Style::default());
    }
}
