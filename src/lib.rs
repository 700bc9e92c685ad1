//! A walking sprite driven by pointer input.
//!
//! [`motion`] holds the state machines, [`driver`] the guarded handle and the
//! tick scheduler, [`sprite`] the walk cycle and text sprite sheets. The
//! remaining modules are the terminal host used by the binary.

pub mod app;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod motion;
pub mod replay;
pub mod sprite;
pub mod ui;

pub use driver::{SharedMotion, Snapshot, TickDriver};
pub use error::{SpriteError, SpriteResult};
pub use motion::{
    Direction, FrameId, Motion, MotionState, Point, RenderState, SeekConfig, SeekController,
    SpriteBox, StrideConfig, StrideController, Variant,
};
pub use sprite::{SpriteSheet, WalkCycle};
