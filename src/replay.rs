use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::driver::SharedMotion;
use crate::error::SpriteResult;
use crate::motion::{Point, RenderState};

/// A scripted run without a terminal
#[derive(Debug, Clone, Copy)]
pub struct ReplayPlan {
    pub ticks: u32,
    /// Pressed before the first tick
    pub touch: Option<Point>,
    /// Released after this many ticks
    pub release_after: Option<u32>,
    /// Elapsed time reported for every tick
    pub tick_ms: u64,
}

#[derive(Serialize)]
struct TickRecord {
    tick: u32,
    #[serde(flatten)]
    state: RenderState,
}

/// Run `plan` against `motion`, writing one JSON object per tick.
///
/// Every tick reports the same nominal elapsed time, so the output is
/// identical from run to run.
pub fn run<W: Write>(motion: &SharedMotion, plan: &ReplayPlan, out: &mut W) -> SpriteResult<()> {
    if let Some(point) = plan.touch {
        motion.on_input_start(point);
    }

    for tick in 1..=plan.ticks {
        let state = motion.advance(plan.tick_ms)?;
        serde_json::to_writer(&mut *out, &TickRecord { tick, state })?;
        out.write_all(b"\n")?;

        if plan.touch.is_some() && plan.release_after == Some(tick) {
            debug!(tick, "scripted release");
            motion.on_input_end();
        }
    }
    out.flush()?;
    Ok(())
}
