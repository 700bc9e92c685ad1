use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::motion::RenderState;
use crate::sprite::{mirror_row, SpriteSheet, TRANSPARENT};

/// Draws one sprite frame at its stage position.
///
/// Cells outside `area` are clipped, transparent glyphs leave the buffer as
/// it was.
pub struct SpriteWidget<'a> {
    sheet: &'a SpriteSheet,
    state: RenderState,
    style: Style,
}

impl<'a> SpriteWidget<'a> {
    pub fn new(sheet: &'a SpriteSheet, state: RenderState) -> Self {
        Self {
            sheet,
            state,
            style: Style::default(),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for SpriteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let origin = self.state.position;
        for (dy, row) in self.sheet.frame(self.state.frame).iter().enumerate() {
            let row = if self.state.mirrored {
                mirror_row(row)
            } else {
                row.clone()
            };
            let y = i64::from(origin.y) + dy as i64;
            if y < 0 || y >= i64::from(area.height) {
                continue;
            }

            for (dx, glyph) in row.chars().enumerate() {
                if glyph == TRANSPARENT {
                    continue;
                }
                let x = i64::from(origin.x) + dx as i64;
                if x < 0 || x >= i64::from(area.width) {
                    continue;
                }
                let cell_x = area.x + x as u16;
                let cell_y = area.y + y as u16;
                if let Some(cell) = buf.cell_mut((cell_x, cell_y)) {
                    cell.set_char(glyph).set_style(self.style);
                }
            }
        }
    }
}
