pub mod sheet;

use crate::error::{SpriteError, SpriteResult};
use crate::motion::FrameId;

pub use sheet::{mirror_row, SpriteSheet, TRANSPARENT};

/// The frames of one stride, in order, plus the frame shown at rest.
///
/// Built once at startup and shared read-only between controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkCycle {
    frames: Vec<FrameId>,
    idle: FrameId,
}

impl WalkCycle {
    pub fn new(frames: Vec<FrameId>, idle: FrameId) -> SpriteResult<Self> {
        if frames.is_empty() {
            return Err(SpriteError::Configuration(
                "walk cycle needs at least one frame".into(),
            ));
        }
        Ok(Self { frames, idle })
    }

    /// Frames `0..frame_count`, idle frame `frame_count`
    pub fn sequential(frame_count: usize) -> SpriteResult<Self> {
        let count = u16::try_from(frame_count).map_err(|_| {
            SpriteError::Configuration(format!("frame count {frame_count} is too large"))
        })?;
        Self::new((0..count).map(FrameId).collect(), FrameId(count))
    }

    pub fn frame(&self, index: usize) -> FrameId {
        self.frames[index % self.frames.len()]
    }

    pub fn idle(&self) -> FrameId {
        self.idle
    }

    /// Index after `index`, wrapping to 0
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.frames.len()
    }
}
