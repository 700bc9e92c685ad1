use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::trace;

use crate::config::Config;
use crate::driver::SharedMotion;
use crate::event::Event;
use crate::motion::Point;
use crate::sprite::SpriteSheet;
use crate::ui::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

/// Host-side state: forwards pointer input to the controller and remembers
/// where the stage was last drawn.
pub struct App {
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_help_bar: bool,
    pub motion: SharedMotion,
    pub sheet: SpriteSheet,
    /// Inner stage area from the last draw, in terminal cells
    pub stage: Rect,
}

impl App {
    pub fn new(motion: SharedMotion, sheet: SpriteSheet, config: &Config) -> Self {
        Self {
            mode: Mode::Normal,
            should_quit: false,
            theme: Theme::from_config(&config.appearance),
            show_help_bar: config.appearance.show_help_bar,
            motion,
            sheet,
            stage: Rect::default(),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // The next draw re-measures the stage.
            Event::Resize(..) | Event::Tick => {}
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.mode == Mode::Help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.mode = Mode::Normal;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.mode = Mode::Help,
            // Keyboard stand-ins for a touch at either stage edge
            KeyCode::Left | KeyCode::Char('h') => self.motion.on_input_start(self.edge(false)),
            KeyCode::Right | KeyCode::Char('l') => self.motion.on_input_start(self.edge(true)),
            KeyCode::Char(' ') => self.motion.on_input_end(),
            _ => {}
        }
    }

    /// Left button press, drag and release act as touch down, move and up.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.mode != Mode::Normal {
            return;
        }
        let point = self.to_stage(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                trace!(x = point.x, y = point.y, "touch down");
                self.motion.on_input_start(point);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.motion.on_input_move(point),
            MouseEventKind::Up(MouseButton::Left) => self.motion.on_input_end(),
            _ => {}
        }
    }

    /// Record the stage drawn this frame; a new width reaches the controller.
    pub fn set_stage(&mut self, area: Rect) {
        if area.width != self.stage.width {
            self.motion.resize_viewport(i32::from(area.width));
        }
        self.stage = area;
    }

    /// Terminal cell to stage-local point
    fn to_stage(&self, column: u16, row: u16) -> Point {
        Point::new(
            i32::from(column) - i32::from(self.stage.x),
            i32::from(row) - i32::from(self.stage.y),
        )
    }

    /// Stage point on the left or right edge, at the sprite's current row
    fn edge(&self, right: bool) -> Point {
        let sprite = self.sheet.sprite_box();
        let y = self
            .motion
            .render_state()
            .map(|s| s.position.y + sprite.height / 2)
            .unwrap_or(0);
        let x = if right {
            i32::from(self.stage.width.saturating_sub(1))
        } else {
            0
        };
        Point::new(x, y)
    }
}
