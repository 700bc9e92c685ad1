use std::path::Path;

use tracing::{debug, info};
use unicode_width::UnicodeWidthChar;

use super::WalkCycle;
use crate::error::{SpriteError, SpriteResult};
use crate::motion::{FrameId, SpriteBox};

/// Glyph that is never drawn, so the stage shows through
pub const TRANSPARENT: char = '.';

const BUILTIN_WALK: &str = include_str!("../../assets/walker.txt");
const BUILTIN_IDLE: &str = include_str!("../../assets/walker_idle.txt");
const BUILTIN_FRAMES: usize = 6;

/// Glyph pairs swapped when a frame is flipped horizontally
const MIRROR_PAIRS: &[(char, char)] = &[
    ('/', '\\'),
    ('(', ')'),
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
];

/// Text frames cut from a horizontal strip, plus a separate idle frame.
///
/// Every frame is padded with [`TRANSPARENT`] to the same box.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    frames: Vec<Vec<String>>,
    idle: Vec<String>,
    sprite_box: SpriteBox,
}

impl SpriteSheet {
    /// The six-frame walker shipped with the binary
    pub fn builtin() -> SpriteResult<Self> {
        Self::from_strip(BUILTIN_WALK, BUILTIN_IDLE, BUILTIN_FRAMES)
    }

    /// Read a strip and an idle frame from disk
    pub fn load(walk: &Path, idle: &Path, frame_count: usize) -> SpriteResult<Self> {
        let walk_text = std::fs::read_to_string(walk)?;
        let idle_text = std::fs::read_to_string(idle)?;
        info!("Loaded sprite strip {}", walk.display());
        Self::from_strip(&walk_text, &idle_text, frame_count)
    }

    /// Slice `strip` into `frame_count` frames of `strip_width / frame_count`
    /// columns. Leftover columns past the last whole frame are dropped.
    pub fn from_strip(strip: &str, idle: &str, frame_count: usize) -> SpriteResult<Self> {
        if frame_count == 0 {
            return Err(SpriteError::Configuration(
                "frame count must be at least 1".into(),
            ));
        }

        let rows = parse_block(strip)?;
        let strip_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let frame_width = strip_width / frame_count;
        if frame_width == 0 || rows.is_empty() {
            return Err(SpriteError::Configuration(format!(
                "strip of {strip_width} columns cannot hold {frame_count} frames"
            )));
        }

        let idle_rows = parse_block(idle)?;
        let idle_width = idle_rows.iter().map(Vec::len).max().unwrap_or(0);
        if idle_width == 0 {
            return Err(SpriteError::Configuration("idle frame is empty".into()));
        }

        let width = frame_width.max(idle_width);
        let height = rows.len().max(idle_rows.len());
        let sprite_box = SpriteBox::new(to_i32(width)?, to_i32(height)?)?;

        let frames = (0..frame_count)
            .map(|i| {
                let cut: Vec<Vec<char>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .skip(i * frame_width)
                            .take(frame_width)
                            .copied()
                            .collect()
                    })
                    .collect();
                pad(&cut, width, height)
            })
            .collect();
        let idle = pad(&idle_rows, width, height);

        debug!(frame_count, width, height, "sprite sheet sliced");
        Ok(Self {
            frames,
            idle,
            sprite_box,
        })
    }

    pub fn sprite_box(&self) -> SpriteBox {
        self.sprite_box
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Walk frames get ids `0..N`, the idle frame gets `N`.
    pub fn walk_cycle(&self) -> SpriteResult<WalkCycle> {
        WalkCycle::sequential(self.frames.len())
    }

    /// Rows of the frame `id` names. Unknown ids resolve to the idle frame.
    pub fn frame(&self, id: FrameId) -> &[String] {
        self.frames
            .get(usize::from(id.0))
            .map(Vec::as_slice)
            .unwrap_or(&self.idle)
    }
}

/// Flip one row horizontally, swapping directional glyphs
pub fn mirror_row(row: &str) -> String {
    row.chars().rev().map(mirror_char).collect()
}

fn mirror_char(c: char) -> char {
    for &(a, b) in MIRROR_PAIRS {
        if c == a {
            return b;
        }
        if c == b {
            return a;
        }
    }
    c
}

/// Split into rows of glyphs, dropping blank lines around the art
fn parse_block(text: &str) -> SpriteResult<Vec<Vec<char>>> {
    let mut rows: Vec<Vec<char>> = text
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();
    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    while rows.first().is_some_and(Vec::is_empty) {
        rows.remove(0);
    }

    for row in &rows {
        if let Some(c) = row.iter().find(|c| c.width() != Some(1)) {
            return Err(SpriteError::Configuration(format!(
                "sprite glyph {c:?} is not one column wide"
            )));
        }
    }
    Ok(rows)
}

fn pad(rows: &[Vec<char>], width: usize, height: usize) -> Vec<String> {
    (0..height)
        .map(|y| {
            let row = rows.get(y).map(Vec::as_slice).unwrap_or(&[]);
            let mut line: String = row.iter().collect();
            line.extend(std::iter::repeat(TRANSPARENT).take(width - row.len()));
            line
        })
        .collect()
}

fn to_i32(n: usize) -> SpriteResult<i32> {
    i32::try_from(n).map_err(|_| SpriteError::Configuration(format!("sprite side {n} is too large")))
}
