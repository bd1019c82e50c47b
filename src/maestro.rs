use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use crate::error::ArmError;

const SET_TARGET_OPCODE: u8 = 0x84;
const BAUD_RATE: u32 = 9600;

/// Anything that can receive a per-channel pulse-width command.
/// The real implementation talks Pololu compact protocol over serial;
/// tests substitute a recording mock.
pub trait Actuator: Send {
    fn set_target(&mut self, channel: u8, target: u16) -> Result<(), ArmError>;
}

/// Compact-protocol Set Target frame. The target is a 14-bit quantity
/// split into two 7-bit payload bytes; higher bits are dropped on the
/// wire, so upstream validation keeps targets at or below 16383.
pub fn encode_set_target(channel: u8, target: u16) -> [u8; 4] {
    [
        SET_TARGET_OPCODE,
        channel,
        (target & 0x7F) as u8,
        ((target >> 7) & 0x7F) as u8,
    ]
}

/// Serial connection to a Pololu Maestro servo controller.
pub struct MaestroController {
    port: Box<dyn serialport::SerialPort>,
}

impl MaestroController {
    pub fn open(path: &str) -> Result<Self> {
        let port = serialport::new(path, BAUD_RATE)
            .timeout(Duration::from_millis(500))
            .open()?;
        Ok(MaestroController { port })
    }
}

impl Actuator for MaestroController {
    fn set_target(&mut self, channel: u8, target: u16) -> Result<(), ArmError> {
        let command = encode_set_target(channel, target);
        self.port
            .write_all(&command)
            .map_err(|e| ArmError::ActuatorWrite { channel, source: e })
    }
}
