pub mod help;
pub mod stage;
pub mod status_bar;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::app::{App, Mode};
use stage::SpriteWidget;

/// Top-level draw function: stage, status bar, overlays
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let bar_height = u16::from(app.show_help_bar);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(bar_height)])
        .split(area);

    // One snapshot per frame, so the stage and the status bar agree.
    let snapshot = app.motion.snapshot();
    let title = match snapshot {
        Some(snap) => format!(" sprite-walk · {} ", snap.variant),
        None => " sprite-walk ".to_string(),
    };

    let block = Block::bordered()
        .title(Line::from(Span::styled(title, app.theme.style_accent_bold())))
        .border_type(app.theme.border_type)
        .border_style(app.theme.style_border())
        .style(app.theme.style_default());
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);
    app.set_stage(inner);

    if let Some(state) = snapshot.map(|snap| snap.render) {
        let style = if state.idle {
            app.theme.sprite_idle
        } else {
            app.theme.sprite
        };
        f.render_widget(SpriteWidget::new(&app.sheet, state).style(style), inner);
    }

    if app.show_help_bar {
        status_bar::render(f, app, snapshot, chunks[1]);
    }

    if app.mode == Mode::Help {
        help::render(f, app, area);
    }
}
