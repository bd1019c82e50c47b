use std::io;
use thiserror::Error;

/// Errors surfaced while turning prompts into motion.
#[derive(Debug, Error)]
pub enum ArmError {
    /// A plan step failed validation. Recoverable: the pipeline logs the
    /// offending step and continues with the next one.
    #[error("malformed step '{step}': {reason}")]
    MalformedStep { step: String, reason: String },

    /// A hardware write failed. Fatal to the running plan; the position
    /// store keeps the last value the hardware acknowledged.
    #[error("actuator write failed on channel {channel}: {source}")]
    ActuatorWrite {
        channel: u8,
        #[source]
        source: io::Error,
    },

    /// The external translator failed or produced nothing usable.
    /// The whole plan is abandoned before any hardware write.
    #[error("translator failed: {0}")]
    Translator(String),
}

/// Startup-time configuration violations. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no channels configured")]
    NoChannels,

    #[error("interpolation step count must be at least 1")]
    ZeroSteps,

    #[error("channel {channel}: bounds min={min} max={max} neutral={neutral} violate min <= neutral <= max")]
    BadBounds {
        channel: usize,
        min: u16,
        max: u16,
        neutral: u16,
    },

    #[error("channel {channel}: locked channel must have min == max == neutral")]
    BadLockedChannel { channel: usize },

    #[error("channel {channel}: max pulse {max} exceeds the 14-bit protocol ceiling")]
    TargetOverflow { channel: usize, max: u16 },

    #[error("{count} channels configured, the wire protocol addresses at most 256")]
    TooManyChannels { count: usize },
}
