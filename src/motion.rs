use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::debug;

use crate::config::ChannelConfig;
use crate::error::ArmError;
use crate::position::PositionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Completed,
    Cancelled,
}

/// Intermediate pulse widths for one channel moving from `start` to `end`
/// over `steps` frames: `start + round((end - start) * s / steps)` for
/// s = 1..=steps. Always exactly `steps` frames, and the last frame lands
/// on `end`.
pub fn frame_sequence(start: u16, end: u16, steps: u32) -> Vec<u16> {
    let span = end as f64 - start as f64;
    (1..=steps)
        .map(|s| (start as f64 + span * (s as f64 / steps as f64)).round() as u16)
        .collect()
}

/// Owns the position store and drives it through interpolated moves.
/// Channels move one after another within a step; the short per-frame
/// delay makes them look simultaneous, but frames are not interleaved
/// across channels. Known limitation, kept on purpose for a
/// deterministic wire order.
pub struct MotionContext {
    pub store: PositionStore,
    channels: Vec<ChannelConfig>,
    steps: u32,
    frame_delay: Duration,
}

impl MotionContext {
    pub fn new(
        store: PositionStore,
        channels: Vec<ChannelConfig>,
        steps: u32,
        frame_delay_ms: u64,
    ) -> Self {
        MotionContext {
            store,
            channels,
            steps,
            frame_delay: Duration::from_millis(frame_delay_ms),
        }
    }

    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    /// Move every channel from its current position to `target`, one
    /// frame at a time with a blocking pause between frames. `target`
    /// must already be validated: one value per channel, inside bounds.
    ///
    /// The cancel flag is polled before each frame; once set, remaining
    /// frames and channels are skipped and the store stays at the last
    /// frame actually written.
    pub fn move_to(&mut self, target: &[u16], cancel: &AtomicBool) -> Result<MoveOutcome, ArmError> {
        let channels = self.channels.clone();
        for (channel, ch) in channels.iter().enumerate() {
            if ch.locked {
                // Pinned channels get one direct write, no interpolation.
                self.store.set(channel, ch.neutral)?;
                continue;
            }

            let start = self.store.get(channel);
            let end = target[channel];
            debug!("channel {} ({}): {} -> {}", channel, ch.name, start, end);

            for frame in frame_sequence(start, end, self.steps) {
                if cancel.load(Ordering::Relaxed) {
                    return Ok(MoveOutcome::Cancelled);
                }
                self.store.set(channel, frame)?;
                thread::sleep(self.frame_delay);
            }

            // Guard against rounding drift on the last frame.
            if self.store.get(channel) != end {
                self.store.set(channel, end)?;
            }
        }
        Ok(MoveOutcome::Completed)
    }
}
