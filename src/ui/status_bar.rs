use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Mode};
use crate::driver::Snapshot;
use crate::ui::theme::Theme;

/// Render the bottom status bar: key hints left, sprite state right
pub fn render(f: &mut Frame, app: &App, snapshot: Option<Snapshot>, area: Rect) {
    let theme = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let hints = match app.mode {
        Mode::Normal => normal_hints(),
        Mode::Help => help_hints(),
    };
    let key_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| hint(theme, key, desc))
        .collect();
    let help = Paragraph::new(Line::from(key_spans)).style(theme.status_bar);
    f.render_widget(help, chunks[0]);

    let status = match snapshot {
        Some(snap) => Line::from(vec![
            Span::styled(format!("{} ", snap.variant), theme.style_accent_bold()),
            Span::styled(format!("{} ", snap.state), theme.style_default()),
            Span::styled(format!("frame {} ", snap.frame_index), theme.style_dim()),
            Span::styled(
                format!("({}, {}) ", snap.render.position.x, snap.render.position.y),
                theme.style_dim(),
            ),
        ]),
        None => Line::from(Span::styled("detached ", theme.style_dim())),
    };
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Right),
        chunks[1],
    );
}

fn normal_hints() -> &'static [(&'static str, &'static str)] {
    &[
        ("click", "Walk"),
        ("←/→", "Step"),
        ("Space", "Release"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
}

fn help_hints() -> &'static [(&'static str, &'static str)] {
    &[("?", "Close"), ("Esc", "Close")]
}

fn hint(theme: &Theme, key: &str, desc: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {key} "), theme.help_key),
        Span::styled(format!("{desc} "), theme.help_desc),
        Span::styled("│", Style::default().fg(theme.border)),
    ]
}
