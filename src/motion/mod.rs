pub mod seek;
pub mod stride;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpriteError, SpriteResult};

pub use seek::{SeekConfig, SeekController};
pub use stride::{StrideConfig, StrideController};

// ── Geometry ──────────────────────────────────────────────────────────

/// Top-left anchor of the sprite in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Bounding box of one sprite frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteBox {
    pub width: i32,
    pub height: i32,
}

impl SpriteBox {
    pub fn new(width: i32, height: i32) -> SpriteResult<Self> {
        let sprite = Self { width, height };
        sprite.validate()?;
        Ok(sprite)
    }

    /// Both sides must be positive before a controller may use the box.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SpriteError::Configuration(format!(
                "sprite box must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

// ── State ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// -1 for left, +1 for right
    pub fn sign(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MotionState {
    #[default]
    Idle,
    Moving { direction: Direction },
}

impl MotionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, MotionState::Idle)
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionState::Idle => write!(f, "idle"),
            MotionState::Moving {
                direction: Direction::Left,
            } => write!(f, "walking left"),
            MotionState::Moving {
                direction: Direction::Right,
            } => write!(f, "walking right"),
        }
    }
}

/// Opaque frame selector, resolved by the host against its sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameId(pub u16);

/// Everything the host needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderState {
    pub frame: FrameId,
    pub position: Point,
    /// Flipped horizontally: the sprite faces left
    pub mirrored: bool,
    pub idle: bool,
}

// ── Controller seam ───────────────────────────────────────────────────

/// Which motion model drives the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Walk toward the last touched point
    #[default]
    Seek,
    /// Step left or right while touched
    Stride,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Seek => write!(f, "seek"),
            Variant::Stride => write!(f, "stride"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seek" | "a" => Ok(Variant::Seek),
            "stride" | "b" => Ok(Variant::Stride),
            other => Err(format!("unknown variant \"{other}\" (expected seek or stride)")),
        }
    }
}

/// A sprite motion state machine.
///
/// Input handlers never fail; out-of-range input is normalized. `advance`
/// takes the elapsed time explicitly and never reads a clock, so a run is
/// reproducible from its input and tick sequence.
pub trait Motion: Send {
    /// Pointer went down at `point`
    fn on_input_start(&mut self, point: Point);

    /// Pointer dragged to `point`
    fn on_input_move(&mut self, point: Point);

    /// Pointer released
    fn on_input_end(&mut self);

    /// Run one tick, `elapsed_ms` after the previous one
    fn advance(&mut self, elapsed_ms: u64);

    fn render_state(&self) -> RenderState;

    fn state(&self) -> MotionState;

    /// Index into the walk cycle, always below its length
    fn frame_index(&self) -> usize;

    fn position(&self) -> Point;

    fn variant(&self) -> Variant;

    /// Stage width changed. Models without a viewport ignore this.
    fn resize_viewport(&mut self, _width: i32) {}
}
