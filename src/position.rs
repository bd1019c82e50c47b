use crate::config::ChannelConfig;
use crate::error::ArmError;
use crate::maestro::Actuator;

/// Last-commanded pulse width per channel. Single source of truth for
/// "where is the arm now"; every mutation goes to the hardware first and
/// only then updates the in-memory value, so a reader never observes a
/// position the hardware has not been told to reach.
pub struct PositionStore {
    actuator: Box<dyn Actuator>,
    neutral: Vec<u16>,
    current: Vec<u16>,
}

impl PositionStore {
    pub fn new(actuator: Box<dyn Actuator>, channels: &[ChannelConfig]) -> Self {
        let neutral: Vec<u16> = channels.iter().map(|ch| ch.neutral).collect();
        let current = neutral.clone();
        PositionStore {
            actuator,
            neutral,
            current,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.current.len()
    }

    pub fn get(&self, channel: usize) -> u16 {
        self.current[channel]
    }

    pub fn snapshot(&self) -> Vec<u16> {
        self.current.clone()
    }

    /// Command one channel. No clamping here; callers hand in values the
    /// validator has already bounded.
    pub fn set(&mut self, channel: usize, pulse: u16) -> Result<(), ArmError> {
        self.actuator.set_target(channel as u8, pulse)?;
        self.current[channel] = pulse;
        Ok(())
    }

    /// Drive every channel back to its configured neutral.
    pub fn reset(&mut self) -> Result<(), ArmError> {
        for channel in 0..self.current.len() {
            let neutral = self.neutral[channel];
            self.set(channel, neutral)?;
        }
        Ok(())
    }
}
