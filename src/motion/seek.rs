use std::sync::Arc;

use tracing::{debug, trace};

use super::{Direction, Motion, MotionState, Point, RenderState, SpriteBox, Variant};
use crate::error::{SpriteError, SpriteResult};
use crate::sprite::WalkCycle;

#[derive(Debug, Clone, Copy)]
pub struct SeekConfig {
    pub sprite: SpriteBox,
    /// Largest step per axis per tick, positive
    pub speed: i32,
    pub start: Point,
}

/// Walks the sprite toward the last touched point, one step per tick.
///
/// Each axis closes in independently: a step of `speed` while further away
/// than that, otherwise a snap onto the target. Facing only follows the
/// x axis, so a purely vertical walk keeps the previous facing.
#[derive(Debug, Clone)]
pub struct SeekController {
    cycle: Arc<WalkCycle>,
    sprite: SpriteBox,
    speed: i32,
    position: Point,
    target: Point,
    facing: Direction,
    state: MotionState,
    frame_index: usize,
}

impl SeekController {
    pub fn new(config: SeekConfig, cycle: Arc<WalkCycle>) -> SpriteResult<Self> {
        config.sprite.validate()?;
        if config.speed <= 0 {
            return Err(SpriteError::Configuration(format!(
                "seek speed must be positive, got {}",
                config.speed
            )));
        }
        Ok(Self {
            cycle,
            sprite: config.sprite,
            speed: config.speed,
            position: config.start,
            target: config.start,
            facing: Direction::Right,
            state: MotionState::Idle,
            frame_index: 0,
        })
    }

    pub fn target(&self) -> Point {
        self.target
    }

    /// The touch lands on the sprite's centre, not its corner.
    fn aim(&mut self, point: Point) {
        self.target = Point::new(
            point.x - self.sprite.width / 2,
            point.y - self.sprite.height / 2,
        );
        if self.target == self.position {
            self.settle();
        } else {
            self.state = MotionState::Moving {
                direction: self.facing,
            };
        }
    }

    fn settle(&mut self) {
        if !self.state.is_idle() {
            debug!(x = self.position.x, y = self.position.y, "target reached");
        }
        self.state = MotionState::Idle;
        self.frame_index = 0;
    }
}

fn step_axis(pos: i32, target: i32, speed: i32) -> i32 {
    if pos.abs_diff(target) > speed.unsigned_abs() {
        if pos < target {
            pos + speed
        } else {
            pos - speed
        }
    } else {
        target
    }
}

impl Motion for SeekController {
    fn on_input_start(&mut self, point: Point) {
        self.aim(point);
        trace!(x = self.target.x, y = self.target.y, "new target");
    }

    fn on_input_move(&mut self, point: Point) {
        self.aim(point);
    }

    fn on_input_end(&mut self) {}

    fn advance(&mut self, _elapsed_ms: u64) {
        let before = self.position;
        self.position = Point::new(
            step_axis(before.x, self.target.x, self.speed),
            step_axis(before.y, self.target.y, self.speed),
        );

        if self.position.x > before.x {
            self.facing = Direction::Right;
        } else if self.position.x < before.x {
            self.facing = Direction::Left;
        }

        if self.position == self.target {
            self.settle();
        } else {
            self.state = MotionState::Moving {
                direction: self.facing,
            };
            self.frame_index = self.cycle.next_index(self.frame_index);
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
            // Facing outlives the walk: a sprite that arrived leftward rests flipped.
            mirrored: self.facing == Direction::Left,
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
        Variant::Seek
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::FrameId;

    const SPRITE: SpriteBox = SpriteBox {
        width: 10,
        height: 20,
    };

    fn controller(start: Point, speed: i32) -> SeekController {
        let cycle = Arc::new(WalkCycle::sequential(6).unwrap());
        SeekController::new(
            SeekConfig {
                sprite: SPRITE,
                speed,
                start,
            },
            cycle,
        )
        .unwrap()
    }

    /// Touch point that puts the target at `target`
    fn touch_for(target: Point) -> Point {
        Point::new(target.x + SPRITE.width / 2, target.y + SPRITE.height / 2)
    }

    #[test]
    fn rejects_degenerate_sprite_box() {
        let cycle = Arc::new(WalkCycle::sequential(6).unwrap());
        let config = SeekConfig {
            sprite: SpriteBox {
                width: 0,
                height: 4,
            },
            speed: 1,
            start: Point::default(),
        };
        assert!(SeekController::new(config, cycle).is_err());
    }

    #[test]
    fn rejects_speed_that_never_arrives() {
        for speed in [0, -3] {
            let cycle = Arc::new(WalkCycle::sequential(6).unwrap());
            let config = SeekConfig {
                sprite: SPRITE,
                speed,
                start: Point::default(),
            };
            assert!(matches!(
                SeekController::new(config, cycle),
                Err(SpriteError::Configuration(_))
            ));
        }
    }

    #[test]
    fn touch_targets_sprite_centre() {
        let mut c = controller(Point::new(0, 0), 5);
        c.on_input_start(Point::new(100, 50));
        assert_eq!(c.target(), Point::new(95, 40));
        c.on_input_move(Point::new(30, 30));
        assert_eq!(c.target(), Point::new(25, 20));
    }

    #[test]
    fn repeated_start_is_idempotent() {
        let mut once = controller(Point::new(0, 0), 5);
        once.on_input_start(Point::new(70, 70));
        let mut twice = once.clone();
        twice.on_input_start(Point::new(70, 70));
        assert_eq!(once.target(), twice.target());
        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn walks_right_then_snaps_onto_target() {
        let mut c = controller(Point::new(0, 200), 40);
        c.on_input_start(touch_for(Point::new(300, 200)));

        for _ in 0..7 {
            c.advance(100);
        }
        assert_eq!(c.position(), Point::new(280, 200));
        assert!(!c.render_state().idle);

        c.advance(100);
        assert_eq!(c.position(), Point::new(300, 200));
        assert_eq!(c.state(), MotionState::Idle);
        assert_eq!(c.render_state().frame, FrameId(6));
    }

    #[test]
    fn converges_within_bound_and_stays() {
        let start = Point::new(-37, 12);
        let target = Point::new(55, -90);
        let speed = 7;
        let mut c = controller(start, speed);
        c.on_input_start(touch_for(target));

        let span = (start.x - target.x).abs().max((start.y - target.y).abs());
        let bound = (span + speed - 1) / speed + 1;
        let mut ticks = 0;
        while c.position() != target {
            c.advance(100);
            ticks += 1;
            assert!(ticks <= bound, "took more than {bound} ticks");
        }

        for _ in 0..5 {
            c.advance(100);
            assert_eq!(c.position(), target);
            assert!(c.state().is_idle());
        }
    }

    #[test]
    fn facing_follows_horizontal_movement() {
        let mut c = controller(Point::new(100, 100), 10);
        c.on_input_start(touch_for(Point::new(50, 100)));
        c.advance(100);
        assert_eq!(c.position().x, 90);
        assert!(c.render_state().mirrored);

        c.on_input_start(touch_for(Point::new(200, 100)));
        c.advance(100);
        assert_eq!(c.position().x, 100);
        assert!(!c.render_state().mirrored);
    }

    #[test]
    fn leftward_arrival_stays_mirrored() {
        let mut c = controller(Point::new(10, 0), 3);
        c.on_input_start(touch_for(Point::new(0, 0)));
        let mut last_x = c.position().x;
        while !c.state().is_idle() {
            c.advance(100);
            assert!(c.position().x < last_x);
            assert!(c.render_state().mirrored);
            last_x = c.position().x;
        }
        assert_eq!(c.position(), Point::new(0, 0));
        let rest = c.render_state();
        assert!(rest.idle && rest.mirrored);
    }

    #[test]
    fn vertical_walk_keeps_previous_facing() {
        let mut c = controller(Point::new(100, 100), 10);
        c.on_input_start(touch_for(Point::new(80, 100)));
        c.advance(100);
        assert!(c.render_state().mirrored);

        c.on_input_start(touch_for(Point::new(90, 300)));
        c.advance(100);
        assert_eq!(c.position(), Point::new(90, 110));
        assert!(c.render_state().mirrored);
    }

    #[test]
    fn frame_cycles_while_walking_and_rests_at_zero() {
        let mut c = controller(Point::new(0, 0), 1);
        c.on_input_start(touch_for(Point::new(20, 0)));
        let mut seen = Vec::new();
        for _ in 0..8 {
            c.advance(100);
            assert!(c.frame_index() < 6);
            seen.push(c.frame_index());
        }
        assert_eq!(seen, [1, 2, 3, 4, 5, 0, 1, 2]);

        for _ in 0..20 {
            c.advance(100);
        }
        assert!(c.state().is_idle());
        assert_eq!(c.frame_index(), 0);
    }

    #[test]
    fn release_does_not_stop_the_walk() {
        let mut c = controller(Point::new(0, 0), 10);
        c.on_input_start(touch_for(Point::new(50, 0)));
        c.on_input_end();
        for _ in 0..5 {
            c.advance(100);
        }
        assert_eq!(c.position(), Point::new(50, 0));
    }
}
