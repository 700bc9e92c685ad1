use std::sync::Arc;

use tracing::{debug, trace};

use super::{Direction, Motion, MotionState, Point, RenderState, SpriteBox, Variant};
use crate::error::{SpriteError, SpriteResult};
use crate::sprite::WalkCycle;

#[derive(Debug, Clone, Copy)]
pub struct StrideConfig {
    pub sprite: SpriteBox,
    /// Horizontal step per tick, positive. Direction comes from the touch.
    pub speed_x: i32,
    /// Minimum time a walk frame stays on screen
    pub frame_delay_ms: u64,
    pub viewport_width: i32,
    /// Turn around at the stage edges instead of stopping against them
    pub bounce: bool,
    pub start: Point,
}

/// Steps the sprite sideways while the pointer is held.
///
/// The touched half of the stage picks the direction. On release the sprite
/// finishes its current stride and only stops once the walk cycle is back on
/// frame 0. Frames advance on accumulated elapsed time, position on ticks.
#[derive(Debug, Clone)]
pub struct StrideController {
    cycle: Arc<WalkCycle>,
    sprite: SpriteBox,
    speed_x: i32,
    frame_delay_ms: u64,
    viewport_width: i32,
    bounce: bool,
    position: Point,
    state: MotionState,
    frame_index: usize,
    touching: bool,
    clock_ms: u64,
    last_frame_change_ms: u64,
}

impl StrideController {
    pub fn new(config: StrideConfig, cycle: Arc<WalkCycle>) -> SpriteResult<Self> {
        config.sprite.validate()?;
        if config.speed_x <= 0 {
            return Err(SpriteError::Configuration(format!(
                "stride speed must be positive, got {}",
                config.speed_x
            )));
        }
        let mut controller = Self {
            cycle,
            sprite: config.sprite,
            speed_x: config.speed_x,
            frame_delay_ms: config.frame_delay_ms,
            viewport_width: config.viewport_width.max(0),
            bounce: config.bounce,
            position: config.start,
            state: MotionState::Idle,
            frame_index: 0,
            touching: false,
            clock_ms: 0,
            last_frame_change_ms: 0,
        };
        controller.position.x = controller.clamp_x(controller.position.x);
        Ok(controller)
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Signed step: negative while walking left
    pub fn speed_x(&self) -> i32 {
        self.speed_x
    }

    fn max_x(&self) -> i32 {
        (self.viewport_width - self.sprite.width).max(0)
    }

    fn clamp_x(&self, x: i32) -> i32 {
        x.clamp(0, self.max_x())
    }

    fn head(&mut self, direction: Direction) {
        self.speed_x = direction.sign() * self.speed_x.abs();
        let next = MotionState::Moving { direction };
        if self.state != next {
            debug!(?direction, "stride started");
        }
        self.state = next;
    }
}

impl Motion for StrideController {
    fn on_input_start(&mut self, point: Point) {
        let direction = if point.x >= self.viewport_width / 2 {
            Direction::Right
        } else {
            Direction::Left
        };
        self.head(direction);
        self.touching = true;
    }

    fn on_input_move(&mut self, _point: Point) {}

    fn on_input_end(&mut self) {
        if self.touching {
            trace!(frame = self.frame_index, "released, finishing stride");
        }
        self.touching = false;
    }

    fn advance(&mut self, elapsed_ms: u64) {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms);

        let direction = match self.state {
            MotionState::Idle => {
                self.frame_index = 0;
                return;
            }
            MotionState::Moving { direction } => direction,
        };

        let wanted = self.position.x.saturating_add(self.speed_x);
        self.position.x = self.clamp_x(wanted);
        // A stage no wider than the sprite has nowhere to turn around to.
        if self.bounce && self.position.x != wanted && self.max_x() > 0 {
            self.head(direction.reversed());
        }

        if self.clock_ms - self.last_frame_change_ms >= self.frame_delay_ms {
            self.frame_index = self.cycle.next_index(self.frame_index);
            self.last_frame_change_ms = self.clock_ms;
        }

        if !self.touching && self.frame_index == 0 {
            debug!(x = self.position.x, "stride finished");
            self.state = MotionState::Idle;
        }
    }

    fn render_state(&self) -> RenderState {
        RenderState {
            frame: if self.state.is_idle() {
                self.cycle.idle()
            } else {
                self.cycle.frame(self.frame_index)
            },
            position: self.position,
            mirrored: self.speed_x < 0,
            idle: self.state.is_idle(),
        }
    }

    fn state(&self) -> MotionState {
        self.state
    }

    fn frame_index(&self) -> usize {
        self.frame_index
    }

    fn position(&self) -> Point {
        self.position
    }

    fn variant(&self) -> Variant {
        Variant::Stride
    }

    /// The sprite is pulled back inside a shrunken stage right away.
    fn resize_viewport(&mut self, width: i32) {
        self.viewport_width = width.max(0);
        self.position.x = self.clamp_x(self.position.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: u64 = 50;

    fn config(x: i32) -> StrideConfig {
        StrideConfig {
            sprite: SpriteBox {
                width: 20,
                height: 10,
            },
            speed_x: 10,
            frame_delay_ms: DELAY,
            viewport_width: 100,
            bounce: false,
            start: Point::new(x, 0),
        }
    }

    fn controller(config: StrideConfig) -> StrideController {
        let cycle = Arc::new(WalkCycle::sequential(6).unwrap());
        StrideController::new(config, cycle).unwrap()
    }

    #[test]
    fn rejects_non_positive_speed() {
        let cycle = Arc::new(WalkCycle::sequential(6).unwrap());
        for speed_x in [0, -4] {
            let result = StrideController::new(
                StrideConfig {
                    speed_x,
                    ..config(0)
                },
                cycle.clone(),
            );
            assert!(matches!(result, Err(SpriteError::Configuration(_))));
        }
    }

    #[test]
    fn touch_half_picks_direction() {
        let mut c = controller(config(40));
        c.on_input_start(Point::new(50, 5));
        assert_eq!(
            c.state(),
            MotionState::Moving {
                direction: Direction::Right
            }
        );
        assert_eq!(c.speed_x(), 10);

        c.on_input_start(Point::new(49, 5));
        assert_eq!(
            c.state(),
            MotionState::Moving {
                direction: Direction::Left
            }
        );
        assert_eq!(c.speed_x(), -10);
        assert!(c.render_state().mirrored);
    }

    #[test]
    fn repeated_start_is_idempotent() {
        let mut c = controller(config(40));
        c.on_input_start(Point::new(10, 0));
        let once = (c.state(), c.speed_x(), c.is_touching());
        c.on_input_start(Point::new(10, 0));
        assert_eq!((c.state(), c.speed_x(), c.is_touching()), once);
    }

    #[test]
    fn steps_right_and_stops_against_edge() {
        let mut c = controller(config(50));
        c.on_input_start(Point::new(90, 0));

        for _ in 0..3 {
            c.advance(DELAY);
        }
        assert_eq!(c.position().x, 80);
        assert_eq!(c.frame_index(), 3);

        c.advance(DELAY);
        assert_eq!(c.position().x, 80);
        assert!(!c.render_state().mirrored);
    }

    #[test]
    fn stays_inside_stage_whichever_way() {
        let mut c = controller(config(30));
        c.on_input_start(Point::new(0, 0));
        for _ in 0..20 {
            c.advance(DELAY);
            let x = c.position().x;
            assert!((0..=80).contains(&x), "x = {x}");
            assert!(c.frame_index() < 6);
        }
        assert_eq!(c.position().x, 0);
    }

    #[test]
    fn frames_wait_for_delay() {
        let mut c = controller(config(0));
        c.on_input_start(Point::new(99, 0));
        c.advance(20);
        c.advance(20);
        assert_eq!(c.frame_index(), 0);
        assert_eq!(c.position().x, 20);
        c.advance(10);
        assert_eq!(c.frame_index(), 1);
        c.advance(49);
        assert_eq!(c.frame_index(), 1);
    }

    #[test]
    fn release_finishes_the_stride() {
        let mut c = controller(config(0));
        c.viewport_width = 1000;
        c.on_input_start(Point::new(999, 0));
        for _ in 0..3 {
            c.advance(DELAY);
        }
        assert_eq!(c.frame_index(), 3);

        c.on_input_end();
        for expected in [4, 5] {
            c.advance(DELAY);
            assert_eq!(c.frame_index(), expected);
            assert!(!c.state().is_idle());
        }
        c.advance(DELAY);
        assert_eq!(c.frame_index(), 0);
        assert!(c.state().is_idle());
        assert_eq!(c.render_state().frame, c.cycle.idle());

        let rest = c.position();
        for _ in 0..4 {
            c.advance(DELAY);
            assert_eq!(c.position(), rest);
            assert!(c.render_state().idle);
        }
    }

    #[test]
    fn rests_facing_the_way_it_walked() {
        let mut c = controller(config(60));
        c.on_input_start(Point::new(0, 0));
        c.on_input_end();
        while !c.state().is_idle() {
            c.advance(DELAY);
            assert!(c.render_state().mirrored);
        }
        assert!(c.position().x < 60);
        assert!(c.render_state().mirrored);
    }

    #[test]
    fn new_touch_after_release_walks_again() {
        let mut c = controller(config(0));
        c.on_input_start(Point::new(99, 0));
        c.on_input_end();
        c.advance(0);
        assert!(c.state().is_idle());

        c.on_input_start(Point::new(99, 0));
        c.advance(DELAY);
        assert_eq!(c.position().x, 20);
        assert!(!c.state().is_idle());
    }

    #[test]
    fn bounce_turns_around_at_edge() {
        let mut c = controller(StrideConfig {
            bounce: true,
            ..config(70)
        });
        c.on_input_start(Point::new(90, 0));
        c.advance(DELAY);
        assert_eq!(c.position().x, 80);
        c.advance(DELAY);
        assert_eq!(c.position().x, 80);
        assert_eq!(
            c.state(),
            MotionState::Moving {
                direction: Direction::Left
            }
        );
        c.advance(DELAY);
        assert_eq!(c.position().x, 70);
    }

    #[test]
    fn start_and_resize_clamp_position() {
        let mut c = controller(config(500));
        assert_eq!(c.position().x, 80);
        c.resize_viewport(50);
        assert_eq!(c.position().x, 30);
        c.resize_viewport(10);
        assert_eq!(c.position().x, 0);
    }

    #[test]
    fn bounce_holds_still_on_a_stage_narrower_than_the_sprite() {
        let mut c = controller(StrideConfig {
            bounce: true,
            viewport_width: 15,
            ..config(0)
        });
        c.on_input_start(Point::new(10, 0));
        for _ in 0..6 {
            c.advance(DELAY);
            assert_eq!(c.position().x, 0);
            assert!(!c.render_state().mirrored);
        }
        assert_eq!(c.speed_x(), 10);
    }
}
