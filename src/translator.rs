use std::fmt::Write;

use crate::config::ChannelConfig;
use crate::error::ArmError;

/// Free-text to plan-text oracle, typically backed by a language model.
/// The core assumes nothing about it: output may be garbage and is fully
/// validated downstream before anything reaches the hardware.
pub trait Translator: Send {
    fn translate(&self, prompt: &str, position: &[u16]) -> Result<String, ArmError>;
}

/// Returns the prompt unchanged. Lets the text listener accept plans
/// typed directly in plan syntax, and keeps the pipeline runnable with
/// no language model attached.
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, prompt: &str, _position: &[u16]) -> Result<String, ArmError> {
        Ok(prompt.to_string())
    }
}

/// Domain description handed to a language-model translator: the plan
/// format rules plus one line per channel, with the live starting
/// position spliced in.
pub fn system_prompt(channels: &[ChannelConfig], position: &[u16]) -> String {
    let mut text = String::new();
    let count = channels.len();

    writeln!(
        text,
        "You control a {count}-servo robotic arm. Output movement sequences as \
         pipe-delimited steps, each step exactly {count} comma-separated integers, \
         one per servo, in channel order. Do not omit values or shorten the output."
    )
    .unwrap();
    writeln!(text).unwrap();
    writeln!(text, "Servo meanings:").unwrap();

    for (index, ch) in channels.iter().enumerate() {
        if ch.locked {
            writeln!(
                text,
                "- Servo {index} = {}: ALWAYS {}. Never change it.",
                ch.name, ch.neutral
            )
            .unwrap();
        } else {
            writeln!(
                text,
                "- Servo {index} = {}: range {} to {}, neutral {}.",
                ch.name, ch.min, ch.max, ch.neutral
            )
            .unwrap();
        }
    }

    let neutral_step: Vec<u16> = channels.iter().map(|ch| ch.neutral).collect();
    writeln!(text).unwrap();
    writeln!(
        text,
        "Only output multiple steps if the user chains actions (\"then\", \"after that\")."
    )
    .unwrap();
    writeln!(text, "The current starting position is: {}", step_text(position)).unwrap();
    writeln!(text, "The default/neutral position is: {}", step_text(&neutral_step)).unwrap();

    writeln!(text).unwrap();
    writeln!(text, "Examples:").unwrap();
    if let Some((index, ch)) = channels.iter().enumerate().find(|(_, ch)| !ch.locked) {
        let mut step = neutral_step.clone();
        step[index] = ch.max;
        writeln!(
            text,
            "- \"Move {} to {}\" => \"{}\"",
            ch.name,
            ch.max,
            step_text(&step)
        )
        .unwrap();
    }
    if let Some((index, ch)) = channels.iter().enumerate().rev().find(|(_, ch)| !ch.locked) {
        let mut out = neutral_step.clone();
        out[index] = ch.max;
        let mut back = neutral_step;
        back[index] = ch.min;
        writeln!(
            text,
            "- \"Move {} to {} then {}\" => \"{} | {}\"",
            ch.name,
            ch.max,
            ch.min,
            step_text(&out),
            step_text(&back)
        )
        .unwrap();
    }

    text
}

fn step_text(values: &[u16]) -> String {
    values
        .iter()
        .map(u16::to_string)
        .collect::<Vec<String>>()
        .join(",")
}
