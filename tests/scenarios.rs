//! End-to-end walks through the public API: construct a controller, feed it
//! touches and ticks the way a host would, and check what the host would draw.

use std::sync::Arc;

use sprite_walk::{
    Direction, FrameId, Motion, MotionState, Point, SeekConfig, SeekController, SharedMotion,
    SpriteBox, SpriteError, SpriteSheet, StrideConfig, StrideController, WalkCycle,
};

const FRAMES: usize = 6;
const IDLE: FrameId = FrameId(FRAMES as u16);

fn cycle() -> Arc<WalkCycle> {
    Arc::new(WalkCycle::sequential(FRAMES).unwrap())
}

fn seek(start: Point, speed: i32, sprite: SpriteBox) -> SeekController {
    SeekController::new(
        SeekConfig {
            sprite,
            speed,
            start,
        },
        cycle(),
    )
    .unwrap()
}

fn stride(x: i32, delay: u64) -> StrideController {
    StrideController::new(
        StrideConfig {
            sprite: SpriteBox {
                width: 20,
                height: 20,
            },
            speed_x: 10,
            frame_delay_ms: delay,
            viewport_width: 100,
            bounce: false,
            start: Point::new(x, 0),
        },
        cycle(),
    )
    .unwrap()
}

#[test]
fn seek_reaches_target_on_eighth_tick() {
    let sprite = SpriteBox {
        width: 40,
        height: 60,
    };
    let mut c = seek(Point::new(0, 200), 40, sprite);
    // Touching (320, 230) aims the sprite's corner at (300, 200).
    c.on_input_start(Point::new(320, 230));

    for _ in 0..7 {
        c.advance(100);
    }
    assert_eq!(c.position(), Point::new(280, 200));
    assert_eq!(
        c.state(),
        MotionState::Moving {
            direction: Direction::Right
        }
    );

    c.advance(100);
    let drawn = c.render_state();
    assert_eq!(drawn.position, Point::new(300, 200));
    assert!(drawn.idle);
    assert_eq!(drawn.frame, IDLE);
    assert!(!drawn.mirrored);
}

#[test]
fn seek_facing_tracks_every_horizontal_step() {
    let sprite = SpriteBox {
        width: 2,
        height: 2,
    };
    let mut c = seek(Point::new(50, 50), 3, sprite);
    let touches = [
        Point::new(0, 80),
        Point::new(90, 10),
        Point::new(52, 52),
        Point::new(10, 51),
    ];

    for touch in touches {
        c.on_input_start(touch);
        for _ in 0..12 {
            let before = c.position();
            c.advance(100);
            let after = c.render_state();
            assert!(c.frame_index() < FRAMES);
            if after.position.x > before.x {
                assert!(!after.mirrored);
            } else if after.position.x < before.x {
                assert!(after.mirrored);
            }
        }
    }
}

#[test]
fn seek_arriving_leftward_rests_mirrored() {
    let sprite = SpriteBox {
        width: 2,
        height: 2,
    };
    let mut c = seek(Point::new(10, 0), 3, sprite);
    c.on_input_start(Point::new(1, 1));

    let xs: Vec<_> = (0..4)
        .map(|_| {
            c.advance(100);
            let drawn = c.render_state();
            assert!(drawn.mirrored);
            drawn.position.x
        })
        .collect();
    assert_eq!(xs, [7, 4, 1, 0]);
    assert!(c.render_state().idle);

    c.advance(100);
    assert!(c.render_state().mirrored);
}

#[test]
fn stride_walks_then_stops_against_right_edge() {
    let mut c = stride(50, 30);
    c.on_input_start(Point::new(75, 10));
    assert!(!c.render_state().mirrored);

    for _ in 0..3 {
        c.advance(30);
    }
    assert_eq!(c.position().x, 80);
    assert_eq!(c.frame_index(), 3);

    c.advance(30);
    assert_eq!(c.position().x, 80);
    assert_eq!(c.frame_index(), 4);
}

#[test]
fn stride_release_mid_stride_waits_for_frame_zero() {
    let mut c = stride(0, 30);
    c.resize_viewport(10_000);
    c.on_input_start(Point::new(9_000, 0));
    for _ in 0..3 {
        c.advance(30);
    }
    assert_eq!(c.frame_index(), 3);

    c.on_input_end();
    let mut ticks = 0;
    while !c.state().is_idle() {
        c.advance(30);
        ticks += 1;
        assert!(ticks <= FRAMES, "never came to rest");
    }
    assert_eq!(ticks, 3);
    assert_eq!(c.frame_index(), 0);

    let rest = c.render_state();
    assert_eq!(rest.frame, IDLE);
    for _ in 0..5 {
        c.advance(30);
        assert_eq!(c.render_state(), rest);
    }

    c.on_input_start(Point::new(0, 0));
    c.advance(30);
    assert!(c.render_state().mirrored);
}

#[test]
fn stride_never_leaves_the_stage() {
    let mut c = stride(40, 0);
    for (i, touch_x) in [90, 10, 60, 0, 99].into_iter().enumerate() {
        c.on_input_start(Point::new(touch_x, 0));
        for _ in 0..(4 + i) {
            c.advance(16);
            let x = c.position().x;
            assert!((0..=80).contains(&x), "x = {x}");
        }
        c.on_input_end();
    }
}

#[test]
fn construction_rejects_degenerate_setup() {
    assert!(matches!(
        WalkCycle::sequential(0),
        Err(SpriteError::Configuration(_))
    ));
    let flat = SeekController::new(
        SeekConfig {
            sprite: SpriteBox {
                width: 3,
                height: 0,
            },
            speed: 1,
            start: Point::default(),
        },
        cycle(),
    );
    assert!(matches!(flat, Err(SpriteError::Configuration(_))));
    assert!(SpriteSheet::from_strip("abc", "i", 0).is_err());
}

#[test]
fn shared_handle_serves_host_and_ticks() {
    let sheet = SpriteSheet::builtin().unwrap();
    let sprite = sheet.sprite_box();
    let motion = SharedMotion::new(Box::new(seek(Point::new(0, 0), 1, sprite)));

    motion.on_input_start(Point::new(10, 1));
    let last = (0..20)
        .map(|_| motion.advance(100).unwrap())
        .last()
        .unwrap();
    assert_eq!(last, motion.render_state().unwrap());
    assert!(last.idle);
    assert_eq!(last.frame, sheet.walk_cycle().unwrap().idle());

    assert!(motion.detach().is_some());
    assert!(matches!(
        motion.advance(100),
        Err(SpriteError::PreconditionViolation(_))
    ));
}
