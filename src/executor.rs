use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use log::{info, warn};

use crate::error::ArmError;
use crate::motion::{MotionContext, MoveOutcome};
use crate::plan::clamp_step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Idle,
    Executing(usize),
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    Completed,
    Cancelled,
}

/// Runs motion plans one step at a time, each step settling fully before
/// the next. All producers (prompt pipeline, direct single-channel
/// writes, reset) go through the same mutex, so only one of them touches
/// the position store and the wire at a time.
pub struct PlanExecutor {
    ctx: Mutex<MotionContext>,
    state: Mutex<ExecState>,
    cancel: AtomicBool,
}

impl PlanExecutor {
    pub fn new(ctx: MotionContext) -> Self {
        PlanExecutor {
            ctx: Mutex::new(ctx),
            state: Mutex::new(ExecState::Idle),
            cancel: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ExecState {
        *self.state.lock().unwrap()
    }

    pub fn position(&self) -> Vec<u16> {
        self.ctx.lock().unwrap().store.snapshot()
    }

    /// Ask the running plan to stop. Remaining frames and steps are
    /// skipped at the next poll; the frame already on the wire cannot be
    /// taken back.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Execute raw plan steps strictly in order. Malformed steps are
    /// reported and skipped; the first actuator failure aborts the rest
    /// of the plan.
    pub fn execute_plan(&self, steps: &[&str]) -> Result<PlanOutcome, ArmError> {
        let mut ctx = self.ctx.lock().unwrap();
        self.cancel.store(false, Ordering::Relaxed);

        for (index, raw) in steps.iter().enumerate() {
            *self.state.lock().unwrap() = ExecState::Executing(index);

            let target = match clamp_step(raw, ctx.channels()) {
                Ok(target) => target,
                Err(e) => {
                    warn!("skipping step {}: {}", index, e);
                    continue;
                }
            };

            match ctx.move_to(&target, &self.cancel) {
                Ok(MoveOutcome::Completed) => {}
                Ok(MoveOutcome::Cancelled) => {
                    info!("plan cancelled at step {}", index);
                    *self.state.lock().unwrap() = ExecState::Idle;
                    return Ok(PlanOutcome::Cancelled);
                }
                Err(e) => {
                    *self.state.lock().unwrap() = ExecState::Aborted;
                    return Err(e);
                }
            }
        }

        *self.state.lock().unwrap() = ExecState::Idle;
        Ok(PlanOutcome::Completed)
    }

    /// Instantaneous single-channel write, the slider-drag path. Clamped
    /// against the channel's bounds, serialized behind the same lock as
    /// plan execution.
    pub fn set_channel(&self, channel: usize, pulse: i32) -> Result<(), ArmError> {
        let mut ctx = self.ctx.lock().unwrap();
        let Some(ch) = ctx.channels().get(channel) else {
            warn!("ignoring write to unknown channel {}", channel);
            return Ok(());
        };
        let clamped = ch.clamp(pulse);
        ctx.store.set(channel, clamped)
    }

    /// Drive every channel back to neutral.
    pub fn reset(&self) -> Result<(), ArmError> {
        let mut ctx = self.ctx.lock().unwrap();
        ctx.store.reset()
    }
}
