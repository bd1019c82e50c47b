use std::io;
use std::sync::{Arc, Mutex};

use crate::error::ArmError;
use crate::maestro::Actuator;

/// Records every (channel, target) write. Clones share the same log, so
/// a test can keep one handle while the store owns the other.
#[derive(Clone)]
pub struct MockActuator {
    writes: Arc<Mutex<Vec<(u8, u16)>>>,
    fail_after: Option<usize>,
    on_write: Option<Arc<dyn Fn(usize) + Send + Sync>>,
}

impl MockActuator {
    pub fn new() -> Self {
        MockActuator {
            writes: Arc::new(Mutex::new(Vec::new())),
            fail_after: None,
            on_write: None,
        }
    }

    /// Succeeds for the first `n` writes, then fails every write.
    pub fn failing_after(n: usize) -> Self {
        MockActuator {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    /// Calls `hook` with the running write count after each successful
    /// write. Lets a test react mid-plan, e.g. to request cancellation.
    pub fn with_write_hook(hook: Arc<dyn Fn(usize) + Send + Sync>) -> Self {
        MockActuator {
            on_write: Some(hook),
            ..Self::new()
        }
    }

    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.writes.lock().unwrap().clone()
    }
}

impl Actuator for MockActuator {
    fn set_target(&mut self, channel: u8, target: u16) -> Result<(), ArmError> {
        let mut writes = self.writes.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if writes.len() >= limit {
                return Err(ArmError::ActuatorWrite {
                    channel,
                    source: io::Error::new(io::ErrorKind::BrokenPipe, "connection lost"),
                });
            }
        }
        writes.push((channel, target));
        let count = writes.len();
        drop(writes);
        if let Some(hook) = &self.on_write {
            hook(count);
        }
        Ok(())
    }
}
