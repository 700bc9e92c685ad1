use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::config::AppearanceConfig;

// ─── Color Palette (terminal-adaptive, transparency-friendly) ──────────

/// Background: always Reset (transparent) — respects terminal background
pub const BG: Color = Color::Reset;

/// Primary text color
pub const FG: Color = Color::White;

/// Dimmed text (labels, inactive elements)
pub const FG_DIM: Color = Color::DarkGray;

/// Border color
pub const BORDER: Color = Color::DarkGray;

/// Resolved styles for one run
#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_type: BorderType,
    /// The sprite itself
    pub sprite: Style,
    /// The sprite while it rests
    pub sprite_idle: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub status_bar: Style,
}

impl Theme {
    pub fn from_config(appearance: &AppearanceConfig) -> Self {
        let accent = appearance.accent;
        Self {
            fg: FG,
            fg_dim: FG_DIM,
            accent,
            border: BORDER,
            border_type: BorderType::Rounded,
            sprite: Style::default()
                .fg(accent)
                .bg(BG)
                .add_modifier(Modifier::BOLD),
            sprite_idle: Style::default().fg(accent).bg(BG),
            help_key: Style::default()
                .fg(accent)
                .bg(BG)
                .add_modifier(Modifier::BOLD),
            help_desc: Style::default().fg(FG_DIM).bg(BG),
            status_bar: Style::default().fg(FG).bg(BG),
        }
    }

    pub fn style_default(&self) -> Style {
        Style::default().fg(self.fg).bg(BG)
    }

    pub fn style_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(BG)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent).bg(BG)
    }

    pub fn style_accent_bold(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_border(&self) -> Style {
        Style::default().fg(self.border).bg(BG)
    }
}

