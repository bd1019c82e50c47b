use serde::{Serialize, Deserialize};
use std::fs;
use std::io::{self, Write};

use crate::error::ConfigError;

// Maestro targets are 14-bit quarter-microsecond values.
pub const MAX_TARGET: u16 = 0x3FFF;

// The wire frame carries the channel index in a single byte.
pub const MAX_CHANNELS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    pub min: u16,         // Minimum pulse width
    pub max: u16,         // Maximum pulse width
    pub neutral: u16,     // Startup / reset pulse width
    pub locked: bool,     // Channel is pinned to neutral, ignores targets
}

impl ChannelConfig {
    fn new(name: &'static str, min: u16, max: u16, neutral: u16) -> Self {
        ChannelConfig {
            name: String::from(name),
            min,
            max,
            neutral,
            locked: false,
        }
    }

    fn locked_at(name: &'static str, value: u16) -> Self {
        ChannelConfig {
            name: String::from(name),
            min: value,
            max: value,
            neutral: value,
            locked: true,
        }
    }

    /// Clamp a raw requested pulse into this channel's safe range.
    /// Locked channels always come out at their pinned value.
    pub fn clamp(&self, raw: i32) -> u16 {
        if self.locked {
            return self.neutral;
        }
        raw.clamp(self.min as i32, self.max as i32) as u16
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmConfig {
    pub serial_port: String,
    pub channels: Vec<ChannelConfig>,
    pub interpolation_steps: u32,
    pub frame_delay_ms: u64,
    pub wake_word: String,
}

impl ArmConfig {
    /// Default EEZYbotArm layout: claw, base, a pinned middle servo, reach.
    pub fn new() -> Self {
        let mut channels = Vec::new();
        channels.push(ChannelConfig::new("Claw", 4000, 8000, 6000));
        channels.push(ChannelConfig::new("Base", 4000, 8000, 6000));
        channels.push(ChannelConfig::locked_at("Fixed", 5000));
        channels.push(ChannelConfig::new("Reach", 4000, 6000, 5000));

        ArmConfig {
            serial_port: String::from("/dev/ttyACM0"),
            channels,
            interpolation_steps: 20,
            frame_delay_ms: 10,
            wake_word: String::from("terminator"),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Startup-time invariant check. Any violation here is fatal; the
    /// rest of the code assumes a well-formed table and never re-checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if self.channels.len() > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels {
                count: self.channels.len(),
            });
        }
        if self.interpolation_steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        for (index, ch) in self.channels.iter().enumerate() {
            if ch.min > ch.max || ch.neutral < ch.min || ch.neutral > ch.max {
                return Err(ConfigError::BadBounds {
                    channel: index,
                    min: ch.min,
                    max: ch.max,
                    neutral: ch.neutral,
                });
            }
            if ch.locked && (ch.min != ch.max || ch.neutral != ch.min) {
                return Err(ConfigError::BadLockedChannel { channel: index });
            }
            if ch.max > MAX_TARGET {
                return Err(ConfigError::TargetOverflow {
                    channel: index,
                    max: ch.max,
                });
            }
        }
        Ok(())
    }

    pub fn save(&self, path: &str) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load(path: &str) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let loaded: ArmConfig = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ArmConfig::new();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.channel_count(), 4);
    }

    #[test]
    fn neutral_outside_bounds_is_rejected() {
        let mut cfg = ArmConfig::new();
        cfg.channels[0].neutral = 9000;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadBounds { channel: 0, .. })
        ));
    }

    #[test]
    fn locked_channel_must_be_pinned() {
        let mut cfg = ArmConfig::new();
        cfg.channels[2].max = 5100;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadLockedChannel { channel: 2 })
        ));
    }

    #[test]
    fn bounds_above_protocol_ceiling_are_rejected() {
        let mut cfg = ArmConfig::new();
        cfg.channels[1].max = 20000;
        cfg.channels[1].neutral = 17000;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TargetOverflow { channel: 1, .. })
        ));
    }

    #[test]
    fn more_channels_than_the_wire_can_address_is_rejected() {
        let mut cfg = ArmConfig::new();
        let template = cfg.channels[0].clone();
        cfg.channels = (0..257).map(|_| template.clone()).collect();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TooManyChannels { count: 257 })
        ));

        cfg.channels.truncate(256);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_interpolation_steps_is_rejected() {
        let mut cfg = ArmConfig::new();
        cfg.interpolation_steps = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroSteps)));
    }

    #[test]
    fn clamp_limits_out_of_range_values() {
        let ch = ChannelConfig::new("Claw", 4000, 8000, 6000);
        assert_eq!(ch.clamp(9000), 8000);
        assert_eq!(ch.clamp(-100), 4000);
        assert_eq!(ch.clamp(5500), 5500);
    }

    #[test]
    fn clamp_is_idempotent() {
        let ch = ChannelConfig::new("Reach", 4000, 6000, 5000);
        for raw in [-500, 0, 3999, 4000, 5000, 6000, 6001, 16383, 30000] {
            let once = ch.clamp(raw);
            assert_eq!(ch.clamp(once as i32), once);
        }
    }

    #[test]
    fn locked_channel_clamps_to_pinned_value() {
        let ch = ChannelConfig::locked_at("Fixed", 5000);
        assert_eq!(ch.clamp(8000), 5000);
        assert_eq!(ch.clamp(0), 5000);
    }
}
