use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Keybinding entries: (key, description)
const KEYBINDINGS: &[(&str, &str)] = &[
    ("Click", "Touch: walk there / step that way"),
    ("Drag", "Move the touch point"),
    ("Release", "Lift the touch"),
    ("← / h", "Touch the left edge"),
    ("→ / l", "Touch the right edge"),
    ("Space", "Lift a keyboard touch"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

/// Render the help overlay
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let width = 48_u16.min(area.width.saturating_sub(4));
    let height = (KEYBINDINGS.len() as u16 + 6).min(area.height.saturating_sub(2));

    let dialog = centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            " Keybindings ",
            t.style_accent_bold(),
        )]))
        .borders(Borders::ALL)
        .border_type(t.border_type)
        .border_style(t.style_accent())
        .style(t.style_default());

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    for (key, desc) in KEYBINDINGS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10}", key), t.help_key),
            Span::styled(*desc, t.style_default()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", t.style_dim()),
        Span::styled("?", t.help_key),
        Span::styled(" or ", t.style_dim()),
        Span::styled("Esc", t.help_key),
        Span::styled(" to close", t.style_dim()),
    ]));

    let para = Paragraph::new(lines).block(block);
    frame.render_widget(para, dialog);
}

/// A `width` x `height` rect centred in `area`
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
