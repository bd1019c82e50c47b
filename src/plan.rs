use crate::config::ChannelConfig;
use crate::error::ArmError;

pub const STEP_DELIMITER: char = '|';

/// Split translated plan text into raw step strings. Empty segments
/// (stray delimiters, trailing whitespace) are dropped.
pub fn split_plan(text: &str) -> Vec<&str> {
    text.split(STEP_DELIMITER)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .collect()
}

/// Validate and clamp one raw step into a target vector.
///
/// The step must contain exactly one integer per channel; anything else
/// is a `MalformedStep`. Out-of-range values are clamped silently into
/// the channel's bounds, and locked channels are forced to their pinned
/// value no matter what was requested.
pub fn clamp_step(raw: &str, channels: &[ChannelConfig]) -> Result<Vec<u16>, ArmError> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    if tokens.len() != channels.len() {
        return Err(ArmError::MalformedStep {
            step: raw.to_string(),
            reason: format!("expected {} values, got {}", channels.len(), tokens.len()),
        });
    }

    let mut target = Vec::with_capacity(channels.len());
    for (token, ch) in tokens.iter().zip(channels) {
        let value: i32 = token.parse().map_err(|_| ArmError::MalformedStep {
            step: raw.to_string(),
            reason: format!("'{}' is not an integer", token),
        })?;
        target.push(ch.clamp(value));
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArmConfig;

    fn channels() -> Vec<ChannelConfig> {
        ArmConfig::new().channels
    }

    #[test]
    fn splits_on_pipe_and_trims() {
        let steps = split_plan("6000,6000,5000,6000 | 6000,6000,5000,4000");
        assert_eq!(steps, vec!["6000,6000,5000,6000", "6000,6000,5000,4000"]);
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(split_plan(" | 6000,6000,5000,5000 |"), vec!["6000,6000,5000,5000"]);
        assert!(split_plan("   ").is_empty());
        assert!(split_plan("").is_empty());
    }

    #[test]
    fn valid_step_passes_through() {
        let target = clamp_step("8000,6000,5000,5000", &channels()).unwrap();
        assert_eq!(target, vec![8000, 6000, 5000, 5000]);
    }

    #[test]
    fn out_of_range_values_clamp_before_motion() {
        let target = clamp_step("9000,-100,5000,5000", &channels()).unwrap();
        assert_eq!(target, vec![8000, 4000, 5000, 5000]);
    }

    #[test]
    fn locked_channel_ignores_requested_value() {
        let target = clamp_step("6000,6000,8000,5000", &channels()).unwrap();
        assert_eq!(target[2], 5000);
    }

    #[test]
    fn wrong_arity_is_malformed() {
        let err = clamp_step("6000,6000,5000", &channels()).unwrap_err();
        assert!(matches!(err, ArmError::MalformedStep { .. }));
    }

    #[test]
    fn non_integer_token_is_malformed() {
        let err = clamp_step("6000,open,5000,5000", &channels()).unwrap_err();
        match err {
            ArmError::MalformedStep { reason, .. } => assert!(reason.contains("open")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
