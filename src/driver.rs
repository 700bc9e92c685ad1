use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::{SpriteError, SpriteResult};
use crate::motion::{Motion, MotionState, Point, RenderState, Variant};

type Slot = Option<Box<dyn Motion>>;

/// Everything the host draws in one frame, read under a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub variant: Variant,
    pub state: MotionState,
    pub frame_index: usize,
    pub render: RenderState,
}

/// The one handle through which input, ticks and reads reach a controller.
///
/// Every call takes the same lock, so a [`RenderState`] snapshot never mixes
/// fields from two different ticks.
#[derive(Clone)]
pub struct SharedMotion {
    inner: Arc<Mutex<Slot>>,
}

impl SharedMotion {
    pub fn new(motion: Box<dyn Motion>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(motion))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Controllers do not panic mid-update, so a poisoned slot is still whole.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_input(&self, what: &str, f: impl FnOnce(&mut dyn Motion)) {
        match self.lock().as_deref_mut() {
            Some(motion) => f(motion),
            None => debug!("dropping {} on detached controller", what),
        }
    }

    pub fn on_input_start(&self, point: Point) {
        self.with_input("input start", |m| m.on_input_start(point));
    }

    pub fn on_input_move(&self, point: Point) {
        self.with_input("input move", |m| m.on_input_move(point));
    }

    pub fn on_input_end(&self) {
        self.with_input("input end", |m| m.on_input_end());
    }

    pub fn resize_viewport(&self, width: i32) {
        self.with_input("resize", |m| m.resize_viewport(width));
    }

    pub fn advance(&self, elapsed_ms: u64) -> SpriteResult<RenderState> {
        let mut slot = self.lock();
        let motion = slot.as_deref_mut().ok_or_else(detached)?;
        motion.advance(elapsed_ms);
        Ok(motion.render_state())
    }

    /// Advance unless `stop` is already raised. The flag is read under the
    /// lock, pairing with [`SharedMotion::raise`].
    fn advance_unless(
        &self,
        stop: &AtomicBool,
        elapsed_ms: u64,
    ) -> SpriteResult<Option<RenderState>> {
        let mut slot = self.lock();
        if stop.load(Ordering::Acquire) {
            return Ok(None);
        }
        let motion = slot.as_deref_mut().ok_or_else(detached)?;
        motion.advance(elapsed_ms);
        Ok(Some(motion.render_state()))
    }

    /// Raise `stop` while holding the lock, so no tick is halfway through.
    fn raise(&self, stop: &AtomicBool) {
        let _slot = self.lock();
        stop.store(true, Ordering::Release);
    }

    pub fn render_state(&self) -> SpriteResult<RenderState> {
        self.lock()
            .as_deref()
            .map(|m| m.render_state())
            .ok_or_else(detached)
    }

    /// Variant, state, frame index and render state from the same tick
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.lock().as_deref().map(|m| Snapshot {
            variant: m.variant(),
            state: m.state(),
            frame_index: m.frame_index(),
            render: m.render_state(),
        })
    }

    /// Take the controller out, as when the stage goes away
    pub fn detach(&self) -> Option<Box<dyn Motion>> {
        let motion = self.lock().take();
        if motion.is_some() {
            info!("controller detached");
        }
        motion
    }

    pub fn is_attached(&self) -> bool {
        self.lock().is_some()
    }
}

fn detached() -> SpriteError {
    SpriteError::PreconditionViolation("controller is detached".into())
}

/// Calls `advance` on a fixed period with the elapsed time it measured.
///
/// Ticks run one after another on a single task. A late tick is not doubled
/// up; the next one simply reports the longer elapsed time.
pub struct TickDriver {
    motion: SharedMotion,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl TickDriver {
    /// Start ticking. `on_tick` sees each new snapshot and ends the driver by
    /// returning false.
    pub fn spawn<F>(motion: SharedMotion, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(RenderState) -> bool + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let task_motion = motion.clone();
        let task_stop = stop.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; use it as the baseline.
            interval.tick().await;
            let mut last = Instant::now();

            loop {
                interval.tick().await;
                let now = Instant::now();
                let elapsed_ms = now.duration_since(last).as_millis() as u64;
                last = now;

                match task_motion.advance_unless(&task_stop, elapsed_ms) {
                    Ok(Some(state)) => {
                        if !on_tick(state) {
                            debug!("tick consumer gone, driver exiting");
                            return;
                        }
                    }
                    Ok(None) => return,
                    Err(e) => {
                        error!("tick driver halted: {}", e);
                        return;
                    }
                }
            }
        });

        info!("tick driver started at {}ms", period.as_millis());
        Self {
            motion,
            stop,
            handle,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop ticking. Once this returns no tick will touch the controller again.
    pub async fn shutdown(self) {
        self.motion.raise(&self.stop);
        self.handle.abort();
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                error!("tick driver panicked: {}", e);
            }
        }
        info!("tick driver stopped");
    }
}
